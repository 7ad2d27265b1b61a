use serde_json::{Map, Value, json};
use spec_harvest::error::{ActionError, EnumerationError, ExtractError, NavigationError};
use spec_harvest::extract::{self, CancelHandle, ExtractionSession, scripts};
use spec_harvest::record::{FIELD_KEYS, SpecRecord};
use spec_harvest::{BrowserError, ExtractConfig, PageDriver, PageLayout, SettleDelays};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const ACTION_TIMEOUT: Duration = Duration::from_millis(50);
const SLOW: Duration = Duration::from_millis(150);

/// In-memory stand-in for the catalog page.
///
/// Answers the extractor's scripts by recognising them verbatim, so it models
/// what the page would return rather than interpreting JavaScript. Lists and
/// records come back as JSON strings, the only form a real tab returns them in.
#[derive(Default)]
struct FakeCatalog {
    layout: PageLayout,
    options: Vec<String>,
    /// option -> item names listed after searching it
    results: HashMap<String, Vec<String>>,
    /// item name -> (field key, value) rows of its detail panel
    panels: HashMap<String, Vec<(&'static str, &'static str)>>,
    toggle_checked: bool,

    slow_options: bool,
    missing_toggle: bool,
    unselectable: HashSet<String>,
    slow_items: HashSet<String>,
    garbled_items: HashSet<String>,
    /// Options whose result list comes back unparseable
    garbled_results: HashSet<String>,
    /// Options whose result list cannot be read at all
    unreadable_results: HashSet<String>,
    /// Dropdown clicks allowed before clicking it starts failing
    dropdown_clicks_allowed: Option<usize>,
    /// Cancel the run when this option gets selected
    cancel_on_select: Option<String>,

    cancel: RefCell<Option<CancelHandle>>,
    state: RefCell<PageState>,
}

#[derive(Default)]
struct PageState {
    navigations: usize,
    dropdown_clicks: usize,
    toggle_clicked: bool,
    selected: Option<String>,
    searched: Option<String>,
    option_lists: usize,
}

impl FakeCatalog {
    fn new(options: &[&str]) -> Self {
        Self { options: options.iter().map(|o| o.to_string()).collect(), ..Default::default() }
    }

    fn with_results(mut self, option: &str, items: &[&str]) -> Self {
        self.results.insert(option.to_string(), items.iter().map(|i| i.to_string()).collect());
        self
    }

    fn with_panel(mut self, item: &str, rows: &[(&'static str, &'static str)]) -> Self {
        self.panels.insert(item.to_string(), rows.to_vec());
        self
    }

    fn known_items(&self) -> impl Iterator<Item = &String> {
        self.results.values().flatten()
    }

    fn detail_payload(&self, name: &str) -> Value {
        let Some(rows) = self.panels.get(name) else {
            return Value::String(json!({"name": name, "error": "not found"}).to_string());
        };

        let mut record = Map::new();
        record.insert("name".into(), json!(name));
        record.insert("error".into(), json!(""));
        for key in FIELD_KEYS {
            let value = rows.iter().find(|(k, _)| *k == key).map(|(_, v)| *v).unwrap_or("");
            record.insert(key.into(), json!(value));
        }
        Value::String(Value::Object(record).to_string())
    }
}

impl PageDriver for FakeCatalog {
    fn navigate(&self, _url: &str, _timeout: Duration) -> spec_harvest::Result<()> {
        self.state.borrow_mut().navigations += 1;
        Ok(())
    }

    fn wait_ready(&self, _selector: &str, _timeout: Duration) -> spec_harvest::Result<()> {
        Ok(())
    }

    fn wait_visible(&self, selector: &str, _timeout: Duration) -> spec_harvest::Result<()> {
        if self.missing_toggle && selector == self.layout.toggle {
            return Err(BrowserError::Timeout(format!("{} never became visible", selector)));
        }
        Ok(())
    }

    fn click(&self, selector: &str, _timeout: Duration) -> spec_harvest::Result<()> {
        let mut state = self.state.borrow_mut();
        if selector == self.layout.dropdown {
            if let Some(allowed) = self.dropdown_clicks_allowed {
                if state.dropdown_clicks >= allowed {
                    return Err(BrowserError::ElementNotFound(selector.to_string()));
                }
            }
            state.dropdown_clicks += 1;
        } else if selector == self.layout.search_button {
            state.searched = state.selected.clone();
        }
        Ok(())
    }

    fn evaluate(&self, script: &str, _timeout: Duration) -> spec_harvest::Result<Value> {
        let layout = &self.layout;

        if script == scripts::list_options(layout) {
            self.state.borrow_mut().option_lists += 1;
            if self.slow_options {
                std::thread::sleep(SLOW);
            }
            return Ok(stringified(&self.options));
        }

        if script == scripts::uncheck_toggle(layout) {
            let was_checked = self.toggle_checked;
            self.state.borrow_mut().toggle_clicked = was_checked;
            return Ok(json!(was_checked));
        }

        if script == scripts::item_names(layout) {
            let state = self.state.borrow();
            if let Some(option) = state.searched.as_ref() {
                if self.garbled_results.contains(option) {
                    return Ok(json!("[\"half a list"));
                }
                if self.unreadable_results.contains(option) {
                    return Err(BrowserError::EvaluationFailed("results container detached".to_string()));
                }
            }
            let names = state.searched.as_ref().and_then(|o| self.results.get(o)).cloned().unwrap_or_default();
            return Ok(stringified(&names));
        }

        for option in &self.options {
            if script == scripts::select_option(layout, option) {
                if self.unselectable.contains(option) {
                    return Ok(json!(false));
                }
                if self.cancel_on_select.as_deref() == Some(option.as_str()) {
                    if let Some(handle) = self.cancel.borrow().as_ref() {
                        handle.cancel();
                    }
                }
                self.state.borrow_mut().selected = Some(option.clone());
                return Ok(json!(true));
            }
        }

        for name in self.known_items() {
            if script == scripts::item_details(layout, name) {
                if self.slow_items.contains(name) {
                    std::thread::sleep(SLOW);
                }
                if self.garbled_items.contains(name) {
                    return Ok(json!("{\"name\": "));
                }
                return Ok(self.detail_payload(name));
            }
        }

        Err(BrowserError::EvaluationFailed("unrecognised script".to_string()))
    }

    fn pause(&self, _duration: Duration) {}
}

fn stringified(list: &[String]) -> Value {
    Value::String(json!(list).to_string())
}

fn config() -> ExtractConfig {
    ExtractConfig::new("https://catalog.test/racquets")
        .global_timeout(Duration::from_secs(30))
        .action_timeout(ACTION_TIMEOUT)
        .navigation_timeout(Duration::from_secs(1))
        .settle(SettleDelays::none())
}

fn record(name: &str, head_size: &str) -> SpecRecord {
    SpecRecord { name: name.to_string(), head_size: head_size.to_string(), ..Default::default() }
}

#[test]
fn test_single_item_with_partial_panel() {
    let page = FakeCatalog::new(&["A", "B"])
        .with_results("A", &["X"])
        .with_results("B", &[])
        .with_panel("X", &[("headSize", "100")]);

    let records = extract::run(&page, config()).unwrap();

    assert_eq!(records, vec![record("X", "100")]);
    assert!(records[0].is_success());
    assert_eq!(records[0].string_tension, "");
}

#[test]
fn test_enumeration_timeout_fails_run_after_setup() {
    let page = FakeCatalog { slow_options: true, ..FakeCatalog::new(&["A"]) };

    let err = extract::run(&page, config()).unwrap_err();

    assert!(matches!(err, ExtractError::Enumeration(EnumerationError::Action(ActionError::ActionTimedOut(_)))));
    let state = page.state.borrow();
    assert_eq!(state.navigations, 1);
    assert_eq!(state.option_lists, 1);
    assert!(state.selected.is_none());
}

#[test]
fn test_unmatched_item_yields_error_record() {
    let page = FakeCatalog::new(&["A"]).with_results("A", &["Y"]);

    let records = extract::run(&page, config()).unwrap();

    assert_eq!(records, vec![SpecRecord::not_found("Y")]);
    assert_eq!(records[0].error, "not found");
    assert!(records[0].fields().iter().all(|(_, value)| value.is_empty()));
}

#[test]
fn test_failed_option_is_skipped() {
    let mut page = FakeCatalog::new(&["A", "B", "C"])
        .with_results("A", &["A1"])
        .with_results("B", &["B1"])
        .with_results("C", &["C1", "C2"])
        .with_panel("A1", &[("headSize", "98")])
        .with_panel("B1", &[("headSize", "100")])
        .with_panel("C1", &[("headSize", "102")])
        .with_panel("C2", &[("headSize", "104")]);
    page.unselectable.insert("B".to_string());

    let records = extract::run(&page, config()).unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["A1", "C1", "C2"]);
}

#[test]
fn test_failed_harvest_skips_option() {
    let mut page = FakeCatalog::new(&["A", "B", "C"])
        .with_results("A", &["A1"])
        .with_results("B", &["B1"])
        .with_results("C", &["C1"])
        .with_panel("A1", &[("headSize", "98")])
        .with_panel("B1", &[("headSize", "100")])
        .with_panel("C1", &[("headSize", "102")]);
    page.garbled_results.insert("A".to_string());
    page.unreadable_results.insert("B".to_string());

    let records = extract::run(&page, config()).unwrap();

    assert_eq!(records, vec![record("C1", "102")]);
    assert_eq!(page.state.borrow().searched.as_deref(), Some("C"));
}

#[test]
fn test_slow_item_times_out_alone() {
    let mut page = FakeCatalog::new(&["A"])
        .with_results("A", &["Slow", "Fast"])
        .with_panel("Slow", &[("headSize", "95")])
        .with_panel("Fast", &[("headSize", "97"), ("stringPattern", "16x19")]);
    page.slow_items.insert("Slow".to_string());

    let records = extract::run(&page, config()).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Fast");
    assert_eq!(records[0].string_pattern, "16x19");
}

#[test]
fn test_garbled_payload_contributes_nothing() {
    let mut page = FakeCatalog::new(&["A"])
        .with_results("A", &["Bad", "Missing", "Good"])
        .with_panel("Bad", &[("headSize", "1")])
        .with_panel("Good", &[("balance", "32 cm")]);
    page.garbled_items.insert("Bad".to_string());

    let records = extract::run(&page, config()).unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0], SpecRecord::not_found("Missing"));
    assert_eq!(records[1].name, "Good");
    assert_eq!(records[1].balance, "32 cm");
}

#[test]
fn test_checked_toggle_is_cleared() {
    let page = FakeCatalog { toggle_checked: true, ..FakeCatalog::new(&[]) };
    assert!(extract::run(&page, config()).unwrap().is_empty());
    assert!(page.state.borrow().toggle_clicked);

    let page = FakeCatalog::new(&[]);
    assert!(extract::run(&page, config()).unwrap().is_empty());
    assert!(!page.state.borrow().toggle_clicked);
}

#[test]
fn test_missing_toggle_is_fatal() {
    let page = FakeCatalog { missing_toggle: true, ..FakeCatalog::new(&["A"]).with_results("A", &["X"]) };

    let err = extract::run(&page, config()).unwrap_err();

    match err {
        ExtractError::Setup(NavigationError::CheckboxToggleFailed(ActionError::ActionTimedOut(_))) => {}
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(page.state.borrow().option_lists, 0);
}

#[test]
fn test_failed_reopen_keeps_records() {
    let page = FakeCatalog {
        // One click to list the options, then every reopen fails
        dropdown_clicks_allowed: Some(1),
        ..FakeCatalog::new(&["A", "B"])
            .with_results("A", &["A1"])
            .with_results("B", &["B1"])
            .with_panel("A1", &[("headSize", "98")])
            .with_panel("B1", &[("headSize", "100")])
    };

    let records = extract::run(&page, config()).unwrap();

    assert_eq!(records, vec![record("A1", "98"), record("B1", "100")]);
}

#[test]
fn test_cancelled_session_fails_fast() {
    let page = FakeCatalog::new(&["A"]);
    let session = ExtractionSession::new(&page, config());
    session.cancel_handle().cancel();

    let err = extract::extract(&session).unwrap_err();

    assert!(matches!(err, ExtractError::SessionCancelled));
    assert_eq!(page.state.borrow().navigations, 0);
}

#[test]
fn test_cancellation_mid_run_aborts() {
    let page = FakeCatalog {
        cancel_on_select: Some("B".to_string()),
        ..FakeCatalog::new(&["A", "B", "C"])
            .with_results("A", &["A1"])
            .with_results("B", &["B1"])
            .with_panel("A1", &[("headSize", "98")])
    };
    let session = ExtractionSession::new(&page, config());
    *page.cancel.borrow_mut() = Some(session.cancel_handle());

    let err = extract::extract(&session).unwrap_err();

    assert!(matches!(err, ExtractError::SessionCancelled));
    assert_ne!(page.state.borrow().searched.as_deref(), Some("C"));
}

#[test]
fn test_rerun_yields_equal_records() {
    let page = FakeCatalog::new(&["A", "B"])
        .with_results("A", &["X", "Y"])
        .with_results("B", &["Z"])
        .with_panel("X", &[("headSize", "100"), ("length", "27 in")])
        .with_panel("Z", &[("stiffness", "66")]);

    let first = extract::run(&page, config()).unwrap();
    let second = extract::run(&page, config()).unwrap();

    assert_eq!(first.len(), 3);
    assert_eq!(first, second);
}
