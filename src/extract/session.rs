use crate::browser::PageDriver;
use crate::config::{ExtractConfig, PageLayout, SettleDelays};
use crate::extract::action::ActionExecutor;
use crate::extract::deadline::{Budget, CancelHandle};
use std::time::Duration;

/// State shared by every step of one run: the page, the session budget and the
/// run configuration.
///
/// Created once and read-only afterwards. The browser behind the driver is owned
/// by the caller and outlives the session.
pub struct ExtractionSession<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    budget: Budget,
    config: ExtractConfig,
}

impl<'a, D: PageDriver + ?Sized> ExtractionSession<'a, D> {
    /// Start the session budget now, bounded by `config.global_timeout`
    pub fn new(driver: &'a D, config: ExtractConfig) -> Self {
        let budget = Budget::new(config.global_timeout);
        Self { driver, budget, config }
    }

    pub fn driver(&self) -> &'a D {
        self.driver
    }

    pub fn budget(&self) -> &Budget {
        &self.budget
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.budget.cancel_handle()
    }

    pub fn config(&self) -> &ExtractConfig {
        &self.config
    }

    pub fn layout(&self) -> &PageLayout {
        &self.config.layout
    }

    pub fn settle(&self) -> &SettleDelays {
        &self.config.settle
    }

    pub fn action_timeout(&self) -> Duration {
        self.config.action_timeout
    }

    pub fn debug(&self) -> bool {
        self.config.debug
    }

    pub fn executor(&self) -> ActionExecutor<'_, D> {
        ActionExecutor::new(self.driver, &self.budget, self.config.action_timeout)
    }
}
