//! # spec-harvest
//!
//! Drives Chrome through a product catalog page and extracts a specification record
//! for every item listed under every option of the page's dropdown.
//!
//! ## How a run works
//!
//! - **Setup**: navigate, wait for the page, clear the toggle that narrows the catalog
//! - **Enumerate**: open the dropdown and read its option labels
//! - **Process**: per option, select it, search, read the item names, re-open the dropdown
//! - **Details**: per item, find its detail panel and read the labelled table rows
//!
//! Failures inside one option or one item are logged and skipped. Only setup,
//! enumeration and an exhausted session budget fail the run.
//!
//! ## Running the CLI
//!
//! ```bash
//! cargo run -- --url https://example.com/racquets --headless
//!
//! # Debug logging and JSON output
//! cargo run -- --url https://example.com/racquets --debug --format json
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use spec_harvest::{BrowserSession, ExtractConfig, LaunchOptions};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let browser = BrowserSession::launch(LaunchOptions::new().headless(true))?;
//!
//! let config = ExtractConfig::new("https://example.com/racquets");
//! let records = spec_harvest::extract::run(&browser, config)?;
//!
//! for record in records.iter().filter(|r| r.is_success()) {
//!     println!("{}: {}", record.name, record.head_size);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Anything implementing [`PageDriver`] can stand in for the browser, which is how
//! the control loop is tested without Chrome.
//!
//! ## Module Overview
//!
//! - [`browser`]: Chrome launch and the [`PageDriver`] boundary
//! - [`extract`]: the control loop, action executor and in-page scripts
//! - [`record`]: [`SpecRecord`] and its parsing from page payloads
//! - [`config`]: timeouts, settle delays and selectors
//! - [`error`]: error types for every layer

pub mod browser;
pub mod config;
pub mod error;
pub mod extract;
pub mod record;

pub use browser::{BrowserSession, LaunchOptions, PageDriver};
pub use config::{ExtractConfig, PageLayout, SettleDelays};
pub use error::{ActionError, BrowserError, ExtractError, Result};
pub use extract::ExtractionSession;
pub use record::SpecRecord;
