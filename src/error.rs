//! Error types for the extraction run
//!
//! Errors are layered the same way the run is: [`BrowserError`] comes out of the
//! browser boundary, [`ActionError`] out of the action executor, and the setup
//! and enumeration errors are the fatal classes surfaced by [`ExtractError`].

use std::time::Duration;
use thiserror::Error;

/// Errors raised by a [`PageDriver`](crate::browser::PageDriver) implementation
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("JavaScript evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

/// Outcome of a failed [`ActionExecutor`](crate::extract::ActionExecutor) call
#[derive(Debug, Error)]
pub enum ActionError {
    /// The session budget expired or the run was cancelled
    #[error("session cancelled")]
    SessionCancelled,

    /// The per-call deadline fired while the session was still alive
    #[error("action timed out after {0:?}")]
    ActionTimedOut(Duration),

    #[error("action failed: {0}")]
    ActionFailed(String),
}

impl ActionError {
    pub fn is_session_cancelled(&self) -> bool {
        matches!(self, ActionError::SessionCancelled)
    }
}

/// Fatal failures while preparing the page
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("navigation failed: {0}")]
    NavigationFailed(#[source] ActionError),

    #[error("page load verification failed: {0}")]
    PageLoadVerificationFailed(#[source] ActionError),

    #[error("failed to uncheck toggle: {0}")]
    CheckboxToggleFailed(#[source] ActionError),
}

impl NavigationError {
    pub fn action_error(&self) -> &ActionError {
        match self {
            NavigationError::NavigationFailed(e)
            | NavigationError::PageLoadVerificationFailed(e)
            | NavigationError::CheckboxToggleFailed(e) => e,
        }
    }
}

/// Failure to read the dropdown's options
#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("options error: {0}")]
    Action(#[from] ActionError),

    #[error("options payload malformed: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Reasons an in-page detail payload could not become a
/// [`SpecRecord`](crate::record::SpecRecord)
#[derive(Debug, Error)]
pub enum RecordParseError {
    #[error("no value returned from page")]
    Missing,

    #[error("payload is neither a JSON string nor an object: {0}")]
    UnexpectedShape(String),

    #[error("malformed record JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("record name {found:?} does not match requested item {expected:?}")]
    NameMismatch { expected: String, found: String },
}

/// Step of an option's processing pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStage {
    /// Selecting the option and triggering the search
    Select,
    /// Reading the item names from the results
    Harvest,
    /// Re-opening the dropdown for the next option
    Reopen,
}

impl std::fmt::Display for OptionStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionStage::Select => f.write_str("select and search"),
            OptionStage::Harvest => f.write_str("harvest item names"),
            OptionStage::Reopen => f.write_str("reopen dropdown"),
        }
    }
}

/// A failed step of one option's pass; the option is skipped, the run goes on
#[derive(Debug, Error)]
#[error("{stage} failed: {source}")]
pub struct OptionError {
    pub stage: OptionStage,
    #[source]
    pub source: ActionError,
}

/// A single item whose details could not be extracted; it contributes no record
#[derive(Debug, Error)]
pub enum DetailError {
    #[error("evaluating detail script: {0}")]
    Action(#[from] ActionError),

    #[error("parsing detail payload: {0}")]
    Parse(#[from] RecordParseError),
}

/// Run-level failures; anything else is absorbed by the loop
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("setup failed: {0}")]
    Setup(#[from] NavigationError),

    #[error(transparent)]
    Enumeration(EnumerationError),

    #[error("session cancelled")]
    SessionCancelled,
}

impl From<EnumerationError> for ExtractError {
    fn from(err: EnumerationError) -> Self {
        match err {
            EnumerationError::Action(ActionError::SessionCancelled) => ExtractError::SessionCancelled,
            other => ExtractError::Enumeration(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BrowserError>;
