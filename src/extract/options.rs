use crate::browser::PageDriver;
use crate::error::EnumerationError;
use crate::extract::action::Action;
use crate::extract::scripts;
use crate::extract::session::ExtractionSession;

/// Open the dropdown and read its option labels in DOM order.
///
/// An empty dropdown yields an empty list, not an error.
pub fn list_options<D: PageDriver + ?Sized>(session: &ExtractionSession<'_, D>) -> Result<Vec<String>, EnumerationError> {
    let layout = session.layout();
    let value = session.executor().run_capture(&[
        Action::click(layout.dropdown.as_str()),
        Action::sleep(session.settle().dropdown_open),
        Action::evaluate(scripts::list_options(layout)),
    ])?;

    let options = scripts::parse_string_list(value).map_err(EnumerationError::Malformed)?;

    log::info!("Found {} valid options", options.len());
    for (i, option) in options.iter().enumerate() {
        log::info!("Option {}: {}", i + 1, option);
    }

    Ok(options)
}
