//! Session Gateway: 接続ごとのプロトコル状態機械
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SessionGateway の状態遷移（CONNECTED → IN_ROOM → CONNECTED / DISCONNECTED）
//! - 各インテントに対する返信とブロードキャストの宛先
//! - 不正なインテントは送信者にのみ返され、ブロードキャストされないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：2 セッションによる選択・競合・解除・再選択のシナリオ
//! - 異常系：不正な座席 ID、ルーム外の座席選択、存在しないイベント
//! - エッジケース：ルームの切り替え、切断後のメッセージ

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{
    EventId, Hold, LockFailureReason, Notification, RepositoryError, RoomRepository, SeatId,
    SessionId, SessionIdFactory,
};

use super::{
    DeselectSeatError, DeselectSeatUseCase, DisconnectSessionUseCase, JoinEventUseCase,
    LeaveEventUseCase, Notifier, ProtocolError, SelectSeatUseCase,
};

/// A decoded client intent. Ids are kept as sent and validated here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    JoinEvent { event_id: String },
    LeaveEvent { event_id: String },
    SelectSeat { event_id: String, seat_id: String },
    DeselectSeat { event_id: String, seat_id: String },
}

/// Protocol state of one connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// No event joined
    Connected,
    /// Viewing one event room
    InRoom(EventId),
    /// Terminal; cleanup has run
    Disconnected,
}

/// Use cases a gateway routes intents to
pub struct GatewayUseCases {
    pub join_event: JoinEventUseCase,
    pub leave_event: LeaveEventUseCase,
    pub select_seat: SelectSeatUseCase,
    pub deselect_seat: DeselectSeatUseCase,
    pub disconnect_session: DisconnectSessionUseCase,
}

/// Per-connection message handler.
///
/// Owns the session id and the connection state, and routes each client
/// intent to the matching use case. Nothing here touches the socket: replies
/// go through the channel registered in [`SessionGateway::open`].
pub struct SessionGateway {
    session_id: SessionId,
    state: ConnectionState,
    usecases: GatewayUseCases,
    notifier: Notifier,
}

impl SessionGateway {
    /// Register a new session on `sender` and greet it with `session_established`.
    ///
    /// # Errors
    ///
    /// Fails if the channel manager rejects the registration.
    pub async fn open(
        rooms: Arc<dyn RoomRepository>,
        usecases: GatewayUseCases,
        sender: UnboundedSender<Notification>,
    ) -> Result<Self, RepositoryError> {
        let session_id = SessionIdFactory::generate();
        rooms.register_session(session_id.clone(), sender).await?;

        let notifier = Notifier::new(rooms);
        notifier
            .send(
                &session_id,
                &Notification::SessionEstablished {
                    session_id: session_id.clone(),
                },
            )
            .await;
        tracing::info!("Session '{}' connected", session_id);

        Ok(Self {
            session_id,
            state: ConnectionState::Connected,
            usecases,
            notifier,
        })
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Handle one intent, answering a protocol error with an `error`
    /// message to this session only.
    pub async fn dispatch(&mut self, intent: Intent) {
        if let Err(e) = self.handle(intent).await {
            self.reject(&e).await;
        }
    }

    /// Report a protocol error to this session.
    pub async fn reject(&self, error: &ProtocolError) {
        tracing::warn!("Rejected message from session '{}': {}", self.session_id, error);
        self.notifier
            .send(
                &self.session_id,
                &Notification::rejected(error.code(), error.to_string()),
            )
            .await;
    }

    /// Handle one intent.
    ///
    /// Seat-acquisition failures are answered here with `seat_lock_failed` and
    /// are not errors of this method.
    pub async fn handle(&mut self, intent: Intent) -> Result<(), ProtocolError> {
        if self.state == ConnectionState::Disconnected {
            tracing::debug!(
                "Ignoring message for disconnected session '{}'",
                self.session_id
            );
            return Ok(());
        }

        match intent {
            Intent::JoinEvent { event_id } => self.join(event_id).await,
            Intent::LeaveEvent { event_id } => {
                let current = self.room_for(&event_id)?;
                self.usecases
                    .leave_event
                    .execute(&self.session_id, &current)
                    .await;
                self.state = ConnectionState::Connected;
                Ok(())
            }
            Intent::SelectSeat { event_id, seat_id } => {
                self.select(event_id, seat_id).await;
                Ok(())
            }
            Intent::DeselectSeat { event_id, seat_id } => {
                let current = self.room_for(&event_id)?;
                let seat_id = SeatId::new(seat_id)
                    .map_err(|e| ProtocolError::Malformed(e.to_string()))?;
                match self
                    .usecases
                    .deselect_seat
                    .execute(&self.session_id, &current, &seat_id)
                    .await
                {
                    Ok(_) | Err(DeselectSeatError::OwnershipViolation(_)) => Ok(()),
                    Err(DeselectSeatError::Unavailable(reason)) => {
                        Err(ProtocolError::Unavailable(reason))
                    }
                }
            }
        }
    }

    /// Connection dropped: leave every room and release this session's holds.
    pub async fn disconnect(&mut self) -> Vec<Hold> {
        if self.state == ConnectionState::Disconnected {
            return Vec::new();
        }
        self.state = ConnectionState::Disconnected;
        self.usecases
            .disconnect_session
            .execute(&self.session_id)
            .await
    }

    async fn join(&mut self, event_id: String) -> Result<(), ProtocolError> {
        let event_id = EventId::new(event_id.clone())
            .map_err(|_| ProtocolError::UnknownEvent(event_id))?;
        let previous = match &self.state {
            ConnectionState::InRoom(current) => Some(current.clone()),
            _ => None,
        };

        self.usecases
            .join_event
            .execute(&self.session_id, &event_id)
            .await?;

        if let Some(previous) = previous
            && previous != event_id
        {
            self.usecases
                .leave_event
                .execute(&self.session_id, &previous)
                .await;
        }
        self.state = ConnectionState::InRoom(event_id);
        Ok(())
    }

    async fn select(&self, event_id: String, seat_id: String) {
        let reason = match self.room_for(&event_id) {
            Err(_) => Some(LockFailureReason::NotInRoom),
            Ok(current) => match SeatId::new(seat_id.clone()) {
                Err(_) => Some(LockFailureReason::UnknownSeat),
                Ok(seat) => self
                    .usecases
                    .select_seat
                    .execute(&self.session_id, &current, &seat)
                    .await
                    .err()
                    .map(|e| e.reason()),
            },
        };

        if let Some(reason) = reason {
            self.notifier
                .send(
                    &self.session_id,
                    &Notification::SeatLockFailed {
                        event_id,
                        seat_id,
                        reason,
                    },
                )
                .await;
        }
    }

    /// The current room, if `event_id` names it.
    fn room_for(&self, event_id: &str) -> Result<EventId, ProtocolError> {
        match &self.state {
            ConnectionState::InRoom(current) if current.as_str() == event_id => {
                Ok(current.clone())
            }
            ConnectionState::InRoom(current) => Err(ProtocolError::WrongEvent {
                current: current.to_string(),
                requested: event_id.to_string(),
            }),
            ConnectionState::Connected | ConnectionState::Disconnected => {
                Err(ProtocolError::NotInRoom)
            }
        }
    }
}
