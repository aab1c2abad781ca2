//! InMemory Room Repository 実装（Channel Manager）
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! 接続中のセッション（通知の送信チャネル）と、イベントごとの
//! ルーム所属を 1 つの Mutex で管理します。所属と sender を同じロックで
//! 扱うので、退出したセッションにブロードキャストが届くことはありません。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::UnboundedSender};

use crate::domain::{EventId, Notification, RepositoryError, RoomRepository, SessionId};

#[derive(Default)]
struct Registry {
    clients: HashMap<SessionId, UnboundedSender<Notification>>,
    rooms: HashMap<EventId, HashSet<SessionId>>,
    memberships: HashMap<SessionId, HashSet<EventId>>,
}

impl Registry {
    fn deliver(&self, session_id: &SessionId, notification: &Notification) -> bool {
        match self.clients.get(session_id) {
            Some(sender) => {
                if sender.send(notification.clone()).is_err() {
                    tracing::warn!("Failed to send message to session '{}'", session_id);
                    return false;
                }
                true
            }
            None => false,
        }
    }
}

/// インメモリ Room Repository 実装
#[derive(Default)]
pub struct InMemoryRoomRepository {
    registry: Mutex<Registry>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn register_session(
        &self,
        session_id: SessionId,
        sender: UnboundedSender<Notification>,
    ) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().await;
        if registry.clients.contains_key(&session_id) {
            return Err(RepositoryError::DuplicateSession(session_id.into_string()));
        }
        registry.clients.insert(session_id, sender);
        Ok(())
    }

    async fn join(
        &self,
        session_id: &SessionId,
        event_id: &EventId,
    ) -> Result<(), RepositoryError> {
        let mut registry = self.registry.lock().await;
        if !registry.clients.contains_key(session_id) {
            return Err(RepositoryError::SessionNotFound(session_id.to_string()));
        }
        registry
            .rooms
            .entry(event_id.clone())
            .or_default()
            .insert(session_id.clone());
        registry
            .memberships
            .entry(session_id.clone())
            .or_default()
            .insert(event_id.clone());
        Ok(())
    }

    async fn leave(&self, session_id: &SessionId, event_id: &EventId) -> bool {
        let mut registry = self.registry.lock().await;
        let was_member = match registry.rooms.get_mut(event_id) {
            Some(members) => {
                let removed = members.remove(session_id);
                if members.is_empty() {
                    registry.rooms.remove(event_id);
                }
                removed
            }
            None => false,
        };
        if let Some(events) = registry.memberships.get_mut(session_id) {
            events.remove(event_id);
            if events.is_empty() {
                registry.memberships.remove(session_id);
            }
        }
        was_member
    }

    async fn broadcast(
        &self,
        event_id: &EventId,
        notification: &Notification,
        exclude: Option<&SessionId>,
    ) -> usize {
        let registry = self.registry.lock().await;
        let Some(members) = registry.rooms.get(event_id) else {
            return 0;
        };
        members
            .iter()
            .filter(|member| Some(*member) != exclude)
            .filter(|member| registry.deliver(member, notification))
            .count()
    }

    async fn send_to(&self, session_id: &SessionId, notification: &Notification) -> bool {
        let registry = self.registry.lock().await;
        registry.deliver(session_id, notification)
    }

    async fn disconnect_all(&self, session_id: &SessionId) -> Vec<EventId> {
        let mut registry = self.registry.lock().await;
        registry.clients.remove(session_id);
        let events: Vec<EventId> = registry
            .memberships
            .remove(session_id)
            .map(|events| events.into_iter().collect())
            .unwrap_or_default();
        for event_id in &events {
            if let Some(members) = registry.rooms.get_mut(event_id) {
                members.remove(session_id);
                if members.is_empty() {
                    registry.rooms.remove(event_id);
                }
            }
        }
        events
    }

    async fn members(&self, event_id: &EventId) -> Vec<SessionId> {
        let registry = self.registry.lock().await;
        registry
            .rooms
            .get(event_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    async fn is_connected(&self, session_id: &SessionId) -> bool {
        let registry = self.registry.lock().await;
        registry.clients.contains_key(session_id)
    }

    async fn count_connected_sessions(&self) -> usize {
        let registry = self.registry.lock().await;
        registry.clients.len()
    }
}
