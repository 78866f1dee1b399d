use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Username must not be empty")]
    EmptyUsername,
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Sheet size must be at least 1")]
    InvalidSize,
    #[error("Texts do not match the sheet shape")]
    InvalidSheetShape,
    #[error("Operation is not allowed in the current session phase")]
    WrongPhase,
}

pub type Result<T> = core::result::Result<T, TrackerError>;
