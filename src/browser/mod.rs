//! Browser boundary: launching Chrome and the [`PageDriver`] trait the extraction loop drives

pub mod config;
pub mod driver;
pub mod session;

pub use config::LaunchOptions;
pub use driver::PageDriver;
pub use session::BrowserSession;
