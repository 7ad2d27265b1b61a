use crate::{browser::{config::LaunchOptions, driver::PageDriver},
            error::{BrowserError, Result}};
use headless_chrome::{Browser, Tab};
use serde_json::Value;
use std::{ffi::OsStr,
          sync::Arc,
          time::{Duration, Instant}};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Flags that keep a long unattended run stable: no popups, no background work,
/// no update or sync traffic competing with the page
const STABILITY_ARGS: &[&str] = &[
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-popup-blocking",
    "--disable-notifications",
    "--disable-extensions",
    "--disable-component-update",
    "--disable-background-downloads",
    "--disable-client-side-phishing-detection",
    "--disable-sync",
    "--disable-default-apps",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-breakpad",
    "--disable-component-extensions-with-background-pages",
    "--disable-dev-shm-usage",
    "--disable-ipc-flooding-protection",
    "--disable-renderer-backgrounding",
    "--ignore-certificate-errors",
    "--start-maximized",
];

/// Browser session that owns a Chrome/Chromium instance and the one tab the run works in.
///
/// The browser process is shut down when the session is dropped, so holding the
/// session in a scope is enough to release it on every exit path.
pub struct BrowserSession {
    /// Kept alive for the lifetime of the tab
    browser: Browser,

    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        launch_opts.args.extend(STABILITY_ARGS.iter().map(|arg| OsStr::new(*arg)));
        if options.headless {
            launch_opts.args.push(OsStr::new("--disable-gpu"));
        }

        launch_opts.idle_browser_timeout = options.idle_timeout;
        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.path = options.chrome_path;
        launch_opts.user_data_dir = options.user_data_dir;
        launch_opts.sandbox = options.sandbox;

        log::debug!("Launching browser (headless: {})", options.headless);
        let browser = Browser::new(launch_opts).map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| BrowserError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab })
    }

    /// Get the working tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Poll `predicate` until it evaluates to `true` or `timeout` elapses
    fn poll_until(&self, predicate: &str, timeout: Duration, what: &str) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            // Evaluation errors while the page is still loading are expected
            if let Ok(remote) = self.tab.evaluate(predicate, false) {
                if remote.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                    return Ok(());
                }
            }

            if Instant::now() >= deadline {
                return Err(BrowserError::Timeout(format!("{} not satisfied within {:?}", what, timeout)));
            }

            std::thread::sleep(POLL_INTERVAL);
        }
    }
}

impl PageDriver for BrowserSession {
    fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        self.tab.set_default_timeout(timeout);
        self.tab
            .navigate_to(url)
            .map_err(|e| BrowserError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;
        self.tab
            .wait_until_navigated()
            .map_err(|e| BrowserError::NavigationFailed(format!("Navigation to {} did not complete: {}", url, e)))?;
        Ok(())
    }

    fn wait_ready(&self, selector: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|e| BrowserError::Timeout(format!("'{}' never appeared: {}", selector, e)))?;

        let left = timeout.saturating_sub(started.elapsed());
        self.poll_until("document.readyState !== 'loading'", left, "document ready")
    }

    fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()> {
        let selector_literal = serde_json::to_string(selector)
            .map_err(|e| BrowserError::EvaluationFailed(e.to_string()))?;
        let predicate = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return false;
                const style = window.getComputedStyle(el);
                return style.visibility !== 'hidden' && style.display !== 'none'
                    && el.getClientRects().length > 0;
            }})()"#,
            selector_literal
        );
        self.poll_until(&predicate, timeout, &format!("visibility of '{}'", selector))
    }

    fn click(&self, selector: &str, timeout: Duration) -> Result<()> {
        let element = self
            .tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map_err(|e| BrowserError::ElementNotFound(format!("Element '{}' not found: {}", selector, e)))?;
        element
            .click()
            .map_err(|e| BrowserError::TabOperationFailed(format!("Failed to click '{}': {}", selector, e)))?;
        Ok(())
    }

    fn evaluate(&self, script: &str, timeout: Duration) -> Result<Value> {
        self.tab.set_default_timeout(timeout);
        let remote = self
            .tab
            .evaluate(script, false)
            .map_err(|e| BrowserError::EvaluationFailed(e.to_string()))?;
        Ok(remote.value.unwrap_or(Value::Null))
    }
}
