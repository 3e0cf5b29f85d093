//! Crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LootError {
    #[error("Item template not found in catalog: {0}")]
    MissingTemplate(String),

    #[error("Corrupt preset for {tpl}: {reason}")]
    CorruptPreset { tpl: String, reason: String },

    #[error("Grid region {width}x{height} at ({x}, {y}) is not free")]
    SlotOccupied {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LootError {
    /// Errors that must abort the whole generation pass rather than a single item.
    pub fn is_fatal(&self) -> bool {
        matches!(self, LootError::CorruptPreset { .. })
    }
}

pub type Result<T> = std::result::Result<T, LootError>;
