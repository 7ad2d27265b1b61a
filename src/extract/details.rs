use crate::browser::PageDriver;
use crate::error::{ActionError, DetailError};
use crate::extract::action::Action;
use crate::extract::scripts;
use crate::extract::session::ExtractionSession;
use crate::record::SpecRecord;

/// Extract one record per identifier, in order.
///
/// An item whose panel is missing yields a record carrying an error. An item
/// whose script fails or whose payload does not parse yields nothing. Once the
/// session is cancelled the remaining identifiers are not attempted.
pub fn extract_details<D: PageDriver + ?Sized>(session: &ExtractionSession<'_, D>, identifiers: &[String]) -> Vec<SpecRecord> {
    let mut records = Vec::with_capacity(identifiers.len());

    for (i, name) in identifiers.iter().enumerate() {
        match extract_one(session, name) {
            Ok(record) => {
                if !record.is_success() {
                    log::warn!("No details for '{}': {}", name, record.error);
                }
                if session.debug() {
                    log::debug!("Extracted record:\n{}", record);
                }
                records.push(record);
            }
            Err(DetailError::Action(ActionError::SessionCancelled)) => {
                log::warn!("Session cancelled, {} item(s) left without details", identifiers.len() - i);
                break;
            }
            Err(err) => log::warn!("Error getting specs for '{}': {}", name, err),
        }
    }

    records
}

fn extract_one<D: PageDriver + ?Sized>(session: &ExtractionSession<'_, D>, name: &str) -> Result<SpecRecord, DetailError> {
    let payload = session
        .executor()
        .run_capture(&[Action::evaluate(scripts::item_details(session.layout(), name))])?;

    if session.debug() {
        log::debug!("Raw payload for '{}': {}", name, payload);
    }

    Ok(SpecRecord::parse(name, payload)?)
}
