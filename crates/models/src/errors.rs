use thiserror::Error;

use crate::moderation::ModerationStatus;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
    #[error("invalid moderation transition: {from} -> {to}")]
    InvalidTransition { from: ModerationStatus, to: ModerationStatus },
}
