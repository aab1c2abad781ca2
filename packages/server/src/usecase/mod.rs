//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（Session Gateway・HTTP ハンドラ・Expiry Sweeper）から呼び出され、Domain 層を操作します。

pub mod confirm_booking;
pub mod deselect_seat;
pub mod disconnect_session;
pub mod error;
pub mod get_seat_map;
pub mod join_event;
pub mod leave_event;
pub mod notify;
pub mod select_seat;
pub mod session_gateway;
pub mod sweep_expired_holds;

#[cfg(test)]
pub(crate) mod test_support;

pub use confirm_booking::ConfirmBookingUseCase;
pub use deselect_seat::{DeselectOutcome, DeselectSeatUseCase};
pub use disconnect_session::DisconnectSessionUseCase;
pub use error::{
    BookingError, DeselectSeatError, JoinEventError, ProtocolError, SelectSeatError,
};
pub use get_seat_map::{GetSeatMapUseCase, SeatView};
pub use join_event::JoinEventUseCase;
pub use leave_event::LeaveEventUseCase;
pub use notify::Notifier;
pub use select_seat::SelectSeatUseCase;
pub use session_gateway::{ConnectionState, GatewayUseCases, Intent, SessionGateway};
pub use sweep_expired_holds::SweepExpiredHoldsUseCase;
