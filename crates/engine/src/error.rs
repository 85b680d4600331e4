use thiserror::Error;

use crate::screen::ScreenId;
use crate::selection::Depth;

/// A transition was requested that the current state cannot accept.
///
/// These are programming errors in the caller, not operator mistakes; the
/// terminal layer only ever offers choices the wizard itself produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("cannot set {depth} before {missing} is chosen")]
    MissingParent { depth: Depth, missing: Depth },

    #[error("{screen} does not accept a {choice} value")]
    WrongChoice { screen: ScreenId, choice: &'static str },

    #[error("{choice} is not offered on {screen}")]
    NotOffered { screen: ScreenId, choice: String },

    #[error("{screen} has nothing to confirm")]
    NotConfirmable { screen: ScreenId },

    #[error("a task is already running")]
    Busy,

    #[error("{field} must not be empty")]
    EmptyValue { field: &'static str },
}

/// Operator input rejected on the text entry screen. Shown inline as a hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    RequiredField { field: &'static str },
}
