use uuid::Uuid;

use crate::deduce::ControlKind;
use crate::path::Rule;

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("Pest parsing error: {0}")]
    PestError(#[from] Box<pest::error::Error<Rule>>),

    #[error("Path '{0}' has no segments")]
    Empty(String),
}

pub type PathResult<T> = Result<T, PathError>;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("No target found for the control panel")]
    NoTarget,

    #[error("Invalid path: {0}")]
    Path(#[from] PathError),

    #[error("Unknown control: {0}")]
    UnknownControl(Uuid),

    #[error("Input does not fit a {kind} control bound to '{path}'")]
    InputMismatch { kind: ControlKind, path: String },

    #[error("'{option}' is not an option of '{path}'")]
    UnknownOption { option: String, path: String },

    #[error("Invalid color value: {0}")]
    InvalidColor(String),
}

pub type PanelResult<T> = Result<T, PanelError>;
