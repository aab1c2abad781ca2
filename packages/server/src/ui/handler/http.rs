//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use seatlock_shared::time::millis_to_rfc3339;

use crate::{
    domain::{EventId, SeatId, SessionId, TicketTypeId},
    infrastructure::dto::http::{
        ConfirmBookingRequest, ConfirmBookingResponse, ErrorResponse, LiveHoldDto, SeatMapQuery,
        SeatViewDto,
    },
    ui::state::AppState,
    usecase::BookingError,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn parse_event_id(event_id: String) -> Result<EventId, ApiError> {
    EventId::new(event_id).map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

async fn ensure_event_exists(state: &AppState, event_id: &EventId) -> Result<(), ApiError> {
    match state.seats.event_exists(event_id).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(api_error(
            StatusCode::NOT_FOUND,
            format!("unknown event: {event_id}"),
        )),
        Err(e) => Err(api_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string())),
    }
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let sessions = state.rooms.count_connected_sessions().await;
    Json(serde_json::json!({"status": "ok", "connected_sessions": sessions}))
}

/// Seat grid of one ticket type with live holds overlaid
pub async fn get_seat_map(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Query(query): Query<SeatMapQuery>,
) -> Result<Json<Vec<SeatViewDto>>, ApiError> {
    let event_id = parse_event_id(event_id)?;
    let ticket_type_id = TicketTypeId::new(query.ticket_type_id)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    ensure_event_exists(&state, &event_id).await?;

    let views = state
        .seat_map()
        .execute(&event_id, &ticket_type_id)
        .await
        .map_err(|e| api_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;

    Ok(Json(
        views
            .into_iter()
            .map(|view| SeatViewDto {
                seat_id: view.seat.seat_id.to_string(),
                row_label: view.seat.row_label,
                number: view.seat.number,
                ticket_type_id: view.seat.ticket_type_id.to_string(),
                status: view.status,
                hold_expires_at: view
                    .hold
                    .map(|hold| millis_to_rfc3339(hold.expires_at.value())),
            })
            .collect(),
    ))
}

/// Live holds of an event (operations / debugging)
pub async fn get_live_holds(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<Json<Vec<LiveHoldDto>>, ApiError> {
    let event_id = parse_event_id(event_id)?;
    ensure_event_exists(&state, &event_id).await?;

    let now = state.clock.now();
    let mut holds = state
        .holds
        .list_live(&event_id, now)
        .await
        .map_err(|e| api_error(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;
    holds.sort_by(|a, b| a.seat_id.as_str().cmp(b.seat_id.as_str()));

    Ok(Json(
        holds
            .iter()
            .map(|hold| LiveHoldDto {
                seat_id: hold.seat_id.to_string(),
                expires_at: millis_to_rfc3339(hold.expires_at.value()),
                remaining_seconds: hold.remaining_seconds(now),
            })
            .collect(),
    ))
}

/// Booking confirmation hook for the booking pipeline
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
    Json(request): Json<ConfirmBookingRequest>,
) -> Result<Json<ConfirmBookingResponse>, ApiError> {
    let event_id = parse_event_id(event_id)?;
    let session_id = SessionId::new(request.session_id)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    let seat_ids = request
        .seat_ids
        .into_iter()
        .map(SeatId::new)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))?;
    ensure_event_exists(&state, &event_id).await?;

    match state
        .confirm_booking()
        .execute(&event_id, &session_id, seat_ids)
        .await
    {
        Ok(booked) => Ok(Json(ConfirmBookingResponse {
            event_id: event_id.to_string(),
            booked_seat_ids: booked.iter().map(ToString::to_string).collect(),
        })),
        Err(e) => {
            tracing::warn!(
                "Booking for session '{}' on event '{}' rejected: {}",
                session_id,
                event_id,
                e
            );
            let status = match e {
                BookingError::EmptySelection => StatusCode::BAD_REQUEST,
                BookingError::SeatNotHeld(_) | BookingError::AlreadyBooked => StatusCode::CONFLICT,
                BookingError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            };
            Err(api_error(status, e.to_string()))
        }
    }
}
