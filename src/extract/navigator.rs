use crate::browser::PageDriver;
use crate::error::NavigationError;
use crate::extract::action::Action;
use crate::extract::scripts;
use crate::extract::session::ExtractionSession;

/// Load `url` and put the page into the state the option loop expects.
///
/// The navigation and load check each run under the navigation timeout; clearing
/// the toggle runs under the per-action timeout. Any failure is fatal.
pub fn setup<D: PageDriver + ?Sized>(session: &ExtractionSession<'_, D>, url: &str) -> Result<(), NavigationError> {
    let executor = session.executor();
    let layout = session.layout();
    let nav_timeout = session.config().navigation_timeout;

    log::info!("Navigating to {}", url);
    executor
        .run_within(nav_timeout, &[Action::navigate(url), Action::sleep(session.settle().after_navigation)])
        .map_err(NavigationError::NavigationFailed)?;

    log::info!("Navigation complete, verifying page load");
    executor
        .run_within(nav_timeout, &[Action::wait_ready(layout.ready_anchor.as_str())])
        .map_err(NavigationError::PageLoadVerificationFailed)?;

    log::info!("Clearing toggle {}", layout.toggle);
    let was_checked = executor
        .run_capture(&[
            Action::wait_visible(layout.toggle.as_str()),
            Action::evaluate(scripts::uncheck_toggle(layout)),
            Action::sleep(session.settle().toggle),
        ])
        .map_err(NavigationError::CheckboxToggleFailed)?;

    if session.debug() {
        log::debug!("Toggle was checked: {}", was_checked);
    }

    Ok(())
}
