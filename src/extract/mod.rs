//! The extraction control loop.
//!
//! One run navigates once, lists the dropdown's options, then for each option
//! searches and extracts a [`SpecRecord`] per listed item:
//!
//! ```text
//! navigator::setup -> options::list_options -> processor::process_options
//!                                                 \-> details::extract_details
//! ```
//!
//! All browser work goes through the [`ActionExecutor`], one call at a time, each
//! under a deadline derived from the session budget.

pub mod action;
pub mod deadline;
pub mod details;
pub mod navigator;
pub mod options;
pub mod processor;
pub mod scripts;
pub mod session;

pub use action::{Action, ActionExecutor};
pub use deadline::{Budget, CancelHandle, Deadline};
pub use session::ExtractionSession;

use crate::browser::PageDriver;
use crate::config::ExtractConfig;
use crate::error::ExtractError;
use crate::record::SpecRecord;

/// Run a full extraction against `driver` with a fresh session
pub fn run<D: PageDriver + ?Sized>(driver: &D, config: ExtractConfig) -> Result<Vec<SpecRecord>, ExtractError> {
    let session = ExtractionSession::new(driver, config);
    extract(&session)
}

/// Run a full extraction within an existing session.
///
/// Setup and enumeration failures and session cancellation fail the run; every
/// other failure only costs the option or item it happened in.
pub fn extract<D: PageDriver + ?Sized>(session: &ExtractionSession<'_, D>) -> Result<Vec<SpecRecord>, ExtractError> {
    if session.budget().is_exhausted() {
        return Err(ExtractError::SessionCancelled);
    }

    navigator::setup(session, &session.config().url)?;

    let options = options::list_options(session)?;
    let records = processor::process_options(session, &options)?;

    let failed = records.iter().filter(|r| !r.is_success()).count();
    log::info!(
        "Extraction finished: {} record(s) from {} option(s), {} without details",
        records.len(),
        options.len(),
        failed
    );

    Ok(records)
}
