use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Testimonial moderation. `Pending` is initial; `Approved` and `Rejected`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ModerationStatus {
    pub fn is_terminal(self) -> bool { !matches!(self, ModerationStatus::Pending) }

    pub fn can_transition_to(self, next: ModerationStatus) -> bool {
        matches!(
            (self, next),
            (ModerationStatus::Pending, ModerationStatus::Approved)
                | (ModerationStatus::Pending, ModerationStatus::Rejected)
        )
    }

    pub fn transition(self, next: ModerationStatus) -> Result<ModerationStatus, ModelError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ModelError::InvalidTransition { from: self, to: next })
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ModerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ModerationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ModerationStatus::Pending),
            "approved" => Ok(ModerationStatus::Approved),
            "rejected" => Ok(ModerationStatus::Rejected),
            _ => Err(ModelError::UnknownVariant { kind: "status", value: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ModerationStatus::*;
    use super::*;

    #[test]
    fn pending_moves_to_either_terminal_state() {
        assert_eq!(Pending.transition(Approved), Ok(Approved));
        assert_eq!(Pending.transition(Rejected), Ok(Rejected));
    }

    #[test]
    fn terminal_states_never_move() {
        for from in [Approved, Rejected] {
            assert!(from.is_terminal());
            for to in [Pending, Approved, Rejected] {
                assert_eq!(from.transition(to), Err(ModelError::InvalidTransition { from, to }));
            }
        }
        assert!(Pending.transition(Pending).is_err());
    }
}
