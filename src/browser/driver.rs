use crate::error::Result;
use serde_json::Value;
use std::time::Duration;

/// The browser capabilities the extraction loop depends on.
///
/// Every call receives the time left on the caller's deadline and must give up
/// with [`BrowserError::Timeout`](crate::error::BrowserError::Timeout) once it
/// runs out. Implementations are driven strictly sequentially; there is one page
/// and calls never overlap.
pub trait PageDriver {
    /// Load `url` in the working tab
    fn navigate(&self, url: &str, timeout: Duration) -> Result<()>;

    /// Wait until an element matching `selector` exists and the document has loaded
    fn wait_ready(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Wait until an element matching `selector` is rendered with a non-empty box
    fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Click the first element matching `selector`
    fn click(&self, selector: &str, timeout: Duration) -> Result<()>;

    /// Evaluate a script in the page and return its result by value
    fn evaluate(&self, script: &str, timeout: Duration) -> Result<Value>;

    /// Idle for `duration`, letting the page settle
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
