use crate::browser::PageDriver;
use crate::config::PageLayout;
use crate::error::{ActionError, BrowserError};
use crate::extract::deadline::{Budget, Deadline};
use crate::extract::scripts;
use serde_json::Value;
use std::time::Duration;

/// One atomic browser interaction
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(String),
    /// Wait until the selector exists and the document has loaded
    WaitReady(String),
    WaitVisible(String),
    Click(String),
    /// Click the dropdown entry labelled `text`; fails when none matches
    Select { text: String, script: String },
    /// Evaluate a script and capture its result
    Evaluate(String),
    Sleep(Duration),
}

impl Action {
    pub fn navigate(url: impl Into<String>) -> Self {
        Action::Navigate(url.into())
    }

    pub fn wait_ready(selector: impl Into<String>) -> Self {
        Action::WaitReady(selector.into())
    }

    pub fn wait_visible(selector: impl Into<String>) -> Self {
        Action::WaitVisible(selector.into())
    }

    pub fn click(selector: impl Into<String>) -> Self {
        Action::Click(selector.into())
    }

    pub fn select(layout: &PageLayout, text: &str) -> Self {
        Action::Select { text: text.to_string(), script: scripts::select_option(layout, text) }
    }

    pub fn evaluate(script: impl Into<String>) -> Self {
        Action::Evaluate(script.into())
    }

    pub fn sleep(duration: Duration) -> Self {
        Action::Sleep(duration)
    }
}

/// Why a sequence stopped before its deadline was classified
enum Interrupt {
    Expired,
    Browser(BrowserError),
    Rejected(String),
}

impl From<BrowserError> for Interrupt {
    fn from(err: BrowserError) -> Self {
        Interrupt::Browser(err)
    }
}

/// Runs action sequences as single units under a deadline derived from the
/// session budget.
pub struct ActionExecutor<'s, D: PageDriver + ?Sized> {
    driver: &'s D,
    budget: &'s Budget,
    action_timeout: Duration,
}

impl<'s, D: PageDriver + ?Sized> ActionExecutor<'s, D> {
    pub fn new(driver: &'s D, budget: &'s Budget, action_timeout: Duration) -> Self {
        Self { driver, budget, action_timeout }
    }

    /// Run `actions` under the per-action timeout.
    ///
    /// Returns the results of the `Evaluate` actions in order.
    pub fn run(&self, actions: &[Action]) -> Result<Vec<Value>, ActionError> {
        self.run_within(self.action_timeout, actions)
    }

    /// Like [`run`](Self::run) but under `timeout` instead of the per-action timeout
    pub fn run_within(&self, timeout: Duration, actions: &[Action]) -> Result<Vec<Value>, ActionError> {
        if self.budget.is_exhausted() {
            return Err(ActionError::SessionCancelled);
        }

        let deadline = self.budget.child(timeout);
        let mut captured = Vec::new();

        for action in actions {
            if deadline.is_expired() || self.budget.is_cancelled() {
                return Err(self.classify(Interrupt::Expired, &deadline));
            }
            if let Err(interrupt) = self.perform(action, &deadline, &mut captured) {
                return Err(self.classify(interrupt, &deadline));
            }
        }

        // A blocking call may overrun the time it was given
        if deadline.is_expired() {
            return Err(self.classify(Interrupt::Expired, &deadline));
        }

        Ok(captured)
    }

    /// Run `actions` and return the result of the last `Evaluate` among them
    pub fn run_capture(&self, actions: &[Action]) -> Result<Value, ActionError> {
        let mut captured = self.run(actions)?;
        Ok(captured.pop().unwrap_or(Value::Null))
    }

    fn perform(&self, action: &Action, deadline: &Deadline, captured: &mut Vec<Value>) -> Result<(), Interrupt> {
        log::trace!("action {:?}", action);
        let left = deadline.remaining();

        match action {
            Action::Navigate(url) => self.driver.navigate(url, left)?,
            Action::WaitReady(selector) => self.driver.wait_ready(selector, left)?,
            Action::WaitVisible(selector) => self.driver.wait_visible(selector, left)?,
            Action::Click(selector) => self.driver.click(selector, left)?,
            Action::Select { text, script } => {
                if self.driver.evaluate(script, left)? != Value::Bool(true) {
                    return Err(Interrupt::Rejected(format!("no dropdown entry matches {:?}", text)));
                }
            }
            Action::Evaluate(script) => captured.push(self.driver.evaluate(script, left)?),
            Action::Sleep(duration) => {
                if *duration > left {
                    self.driver.pause(left);
                    return Err(Interrupt::Expired);
                }
                self.driver.pause(*duration);
            }
        }

        Ok(())
    }

    fn classify(&self, interrupt: Interrupt, deadline: &Deadline) -> ActionError {
        if self.budget.is_exhausted() {
            return ActionError::SessionCancelled;
        }

        match interrupt {
            Interrupt::Expired | Interrupt::Browser(BrowserError::Timeout(_)) => {
                ActionError::ActionTimedOut(deadline.timeout())
            }
            _ if deadline.is_expired() => ActionError::ActionTimedOut(deadline.timeout()),
            Interrupt::Browser(err) => ActionError::ActionFailed(err.to_string()),
            Interrupt::Rejected(reason) => ActionError::ActionFailed(reason),
        }
    }
}
