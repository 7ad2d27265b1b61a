use crate::browser::PageDriver;
use crate::error::{ActionError, ExtractError, OptionError, OptionStage};
use crate::extract::action::Action;
use crate::extract::details::extract_details;
use crate::extract::scripts;
use crate::extract::session::ExtractionSession;
use crate::record::SpecRecord;

/// Run every option through select, search, harvest and detail extraction.
///
/// A failing step skips the rest of that option's pass; records already
/// extracted for it are kept. Only a cancelled session ends the loop early, and
/// then the run fails as a whole.
pub fn process_options<D: PageDriver + ?Sized>(
    session: &ExtractionSession<'_, D>,
    options: &[String],
) -> Result<Vec<SpecRecord>, ExtractError> {
    let mut results = Vec::new();

    for (i, option) in options.iter().enumerate() {
        log::info!("Processing option {}/{}: {}", i + 1, options.len(), option);

        let outcome = process_option(session, option).and_then(|records| {
            log::info!("Option '{}' contributed {} record(s)", option, records.len());
            results.extend(records);
            reopen_dropdown(session)
        });

        match outcome {
            Ok(()) => {}
            Err(OptionError { source: ActionError::SessionCancelled, stage }) => {
                log::error!("Session cancelled during {} for option '{}'", stage, option);
                return Err(ExtractError::SessionCancelled);
            }
            Err(err) => log::warn!("Skipping option '{}': {}", option, err),
        }
    }

    Ok(results)
}

/// Select `option`, search, and extract details for every item it lists
fn process_option<D: PageDriver + ?Sized>(session: &ExtractionSession<'_, D>, option: &str) -> Result<Vec<SpecRecord>, OptionError> {
    let layout = session.layout();
    let settle = session.settle();
    let executor = session.executor();

    executor
        .run(&[
            Action::select(layout, option),
            Action::sleep(settle.option_select),
            Action::click(layout.search_button.as_str()),
            Action::sleep(settle.search_results),
        ])
        .map_err(|source| OptionError { stage: OptionStage::Select, source })?;

    let names = executor
        .run_capture(&[Action::evaluate(scripts::item_names(layout))])
        .and_then(|value| {
            scripts::parse_string_list(value)
                .map_err(|e| ActionError::ActionFailed(format!("malformed item names: {}", e)))
        })
        .map_err(|source| OptionError { stage: OptionStage::Harvest, source })?;

    if names.is_empty() {
        log::info!("No items found for option '{}'", option);
        return Ok(Vec::new());
    }

    log::info!("Found {} item(s) for option '{}'", names.len(), option);
    if session.debug() {
        for (j, name) in names.iter().enumerate() {
            log::debug!("{}. {}", j + 1, name);
        }
    }

    Ok(extract_details(session, &names))
}

fn reopen_dropdown<D: PageDriver + ?Sized>(session: &ExtractionSession<'_, D>) -> Result<(), OptionError> {
    session
        .executor()
        .run(&[Action::click(session.layout().dropdown.as_str()), Action::sleep(session.settle().dropdown_open)])
        .map(|_| ())
        .map_err(|source| OptionError { stage: OptionStage::Reopen, source })
}
