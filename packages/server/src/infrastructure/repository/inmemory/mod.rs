//! InMemory 実装

pub mod hold;
pub mod room;
pub mod seat;

pub use hold::InMemoryHoldRepository;
pub use room::InMemoryRoomRepository;
pub use seat::InMemorySeatRepository;
