//! Seat inventory seed file.
//!
//! ```json
//! {"seats": [{"seat_id": "A-1", "event_id": "E1", "row_label": "A",
//!             "number": 1, "ticket_type_id": "standard", "status": "AVAILABLE"}]}
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::domain::{EventId, Seat, SeatId, SeatStatus, TicketTypeId, ValueObjectError};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid seed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid seat #{index}: {source}")]
    InvalidSeat {
        index: usize,
        #[source]
        source: ValueObjectError,
    },
}

#[derive(Debug, Deserialize)]
pub struct SeedFile {
    pub seats: Vec<SeedSeat>,
}

#[derive(Debug, Deserialize)]
pub struct SeedSeat {
    pub seat_id: String,
    pub event_id: String,
    pub row_label: String,
    pub number: u32,
    pub ticket_type_id: String,
    #[serde(default = "default_status")]
    pub status: SeatStatus,
}

fn default_status() -> SeatStatus {
    SeatStatus::Available
}

impl SeedSeat {
    fn into_seat(self) -> Result<Seat, ValueObjectError> {
        Seat::new(
            SeatId::new(self.seat_id)?,
            EventId::new(self.event_id)?,
            self.row_label,
            self.number,
            TicketTypeId::new(self.ticket_type_id)?,
            // holds live only in the hold table
            match self.status {
                SeatStatus::Held => SeatStatus::Available,
                other => other,
            },
        )
    }
}

/// Parse a seed document.
pub fn parse_seed(json: &str) -> Result<Vec<Seat>, SeedError> {
    let file: SeedFile = serde_json::from_str(json)?;
    file.seats
        .into_iter()
        .enumerate()
        .map(|(index, seat)| {
            seat.into_seat()
                .map_err(|source| SeedError::InvalidSeat { index, source })
        })
        .collect()
}

/// Read and parse a seed file.
pub fn load_seed_file(path: &Path) -> Result<Vec<Seat>, SeedError> {
    let json = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_seed(&json)
}
