//! HTTP API request / response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::SeatStatus;

/// Query string of the seat map endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SeatMapQuery {
    pub ticket_type_id: String,
}

/// One seat of the seat map with its effective status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatViewDto {
    pub seat_id: String,
    pub row_label: String,
    pub number: u32,
    pub ticket_type_id: String,
    pub status: SeatStatus,
    /// Set when the seat is held
    pub hold_expires_at: Option<String>, // ISO 8601
}

/// Live hold listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveHoldDto {
    pub seat_id: String,
    pub expires_at: String, // ISO 8601
    pub remaining_seconds: u64,
}

/// Booking confirmation request, sent by the booking pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmBookingRequest {
    pub session_id: String,
    pub seat_ids: Vec<String>,
}

/// Booking confirmation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmBookingResponse {
    pub event_id: String,
    pub booked_seat_ids: Vec<String>,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
