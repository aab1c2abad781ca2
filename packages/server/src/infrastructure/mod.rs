//! Infrastructure layer: store implementations and wire formats.

pub mod dto;
pub mod repository;
