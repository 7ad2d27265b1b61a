//! Run configuration: timeouts, settle delays and the page layout

use std::time::Duration;

/// Pauses that let client-side rendering catch up after an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettleDelays {
    /// After the initial navigation
    pub after_navigation: Duration,
    /// After opening the dropdown
    pub dropdown_open: Duration,
    /// After picking an option, before searching
    pub option_select: Duration,
    /// After triggering the search
    pub search_results: Duration,
    /// After clearing the toggle
    pub toggle: Duration,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            after_navigation: Duration::from_secs(5),
            dropdown_open: Duration::from_secs(1),
            option_select: Duration::from_secs(1),
            search_results: Duration::from_secs(2),
            toggle: Duration::from_secs(1),
        }
    }
}

impl SettleDelays {
    /// No settling at all; for pages that render synchronously
    pub fn none() -> Self {
        Self {
            after_navigation: Duration::ZERO,
            dropdown_open: Duration::ZERO,
            option_select: Duration::ZERO,
            search_results: Duration::ZERO,
            toggle: Duration::ZERO,
        }
    }
}

/// Where things live on the catalog page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    /// Element that must be ready before anything else happens
    pub ready_anchor: String,
    /// Checkbox that narrows the catalog when checked
    pub toggle: String,
    /// Control that opens the dropdown
    pub dropdown: String,
    /// Entries of the opened dropdown
    pub option_items: String,
    /// Entry label meaning "no choice"
    pub placeholder: String,
    pub search_button: String,
    /// Item name elements in the search results
    pub result_names: String,
    /// Name elements heading each detail panel
    pub detail_names: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            ready_anchor: "body".to_string(),
            toggle: "#currentcheckbox".to_string(),
            dropdown: ".drop_arrow".to_string(),
            option_items: ".optionslist li".to_string(),
            placeholder: "Select".to_string(),
            search_button: "#search_button".to_string(),
            result_names: ".rac_info .rac_name".to_string(),
            detail_names: ".rac_name".to_string(),
        }
    }
}

/// Everything one extraction run needs besides the browser itself
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub url: String,

    /// Launch the browser without a window
    pub headless: bool,

    /// Log raw payloads and every record
    pub debug: bool,

    /// Bound on the whole run
    pub global_timeout: Duration,

    /// Bound on each unit of browser interaction
    pub action_timeout: Duration,

    /// Bound on each page setup step; longer than `action_timeout` by default
    pub navigation_timeout: Duration,

    pub settle: SettleDelays,

    pub layout: PageLayout,
}

impl ExtractConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headless: false,
            debug: false,
            global_timeout: Duration::from_secs(30 * 60),
            action_timeout: Duration::from_secs(60),
            navigation_timeout: Duration::from_secs(30),
            settle: SettleDelays::default(),
            layout: PageLayout::default(),
        }
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn global_timeout(mut self, timeout: Duration) -> Self {
        self.global_timeout = timeout;
        self
    }

    pub fn action_timeout(mut self, timeout: Duration) -> Self {
        self.action_timeout = timeout;
        self
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn settle(mut self, settle: SettleDelays) -> Self {
        self.settle = settle;
        self
    }

    pub fn layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }
}
