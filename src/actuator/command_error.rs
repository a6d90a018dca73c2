use std::fmt;

use crate::fault::FaultClass;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Json(String),
    MissingCmd,
    UnknownCmd(String),
    /// Radio command text that does not split into the expected fields.
    BadRadioFormat(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CommandError::*;
        match self {
            Json(e) => write!(f, "command is not valid JSON: {e}"),
            MissingCmd => write!(f, "command has no 'cmd' field"),
            UnknownCmd(c) => write!(f, "unknown command {c:?}"),
            BadRadioFormat(t) => write!(f, "malformed radio command {t:?}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl CommandError {
    pub fn fault_class(&self) -> FaultClass {
        FaultClass::Malformed
    }
}
