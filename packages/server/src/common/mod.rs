//! Cross-cutting helpers shared by every layer.

pub mod clock;
