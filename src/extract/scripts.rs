//! In-page scripts evaluated by the extraction loop.
//!
//! Every argument is embedded as a JSON literal, so item names and selectors
//! containing quotes or backticks cannot break out of the script. Scripts that
//! yield arrays or objects return them stringified: CDP hands back only
//! primitives by value.

use crate::config::PageLayout;
use crate::record::{FIELD_KEYS, FIELD_LABELS, NOT_FOUND};
use serde_json::Value;

/// `s` as a JavaScript string literal
fn js_string(s: &str) -> String {
    Value::String(s.to_owned()).to_string()
}

/// Decode the payload of a list-yielding script.
///
/// The JavaScript returns a JSON string; an already structured array is
/// accepted too.
pub fn parse_string_list(payload: Value) -> Result<Vec<String>, serde_json::Error> {
    match payload {
        Value::String(json) => serde_json::from_str(&json),
        other => serde_json::from_value(other),
    }
}

/// Stringified trimmed, non-empty, non-placeholder labels of the dropdown entries in DOM order
pub fn list_options(layout: &PageLayout) -> String {
    format!(
        r#"JSON.stringify(Array.from(document.querySelectorAll({items}))
    .map(el => el.textContent.trim())
    .filter(text => text !== '' && text !== {placeholder}))"#,
        items = js_string(&layout.option_items),
        placeholder = js_string(&layout.placeholder),
    )
}

/// Clicks the toggle only when it is checked; yields whether it was
pub fn uncheck_toggle(layout: &PageLayout) -> String {
    format!(
        r#"(() => {{
    const toggle = document.querySelector({toggle});
    if (!toggle) throw new Error('toggle not found');
    const wasChecked = toggle.checked;
    if (wasChecked) toggle.click();
    return wasChecked;
}})()"#,
        toggle = js_string(&layout.toggle),
    )
}

/// Clicks the dropdown entry whose trimmed text equals `text`; yields whether one matched
pub fn select_option(layout: &PageLayout, text: &str) -> String {
    format!(
        r#"(() => {{
    const wanted = {text};
    const entry = Array.from(document.querySelectorAll({items}))
        .find(el => el.textContent.trim() === wanted);
    if (!entry) return false;
    entry.click();
    return true;
}})()"#,
        text = js_string(text),
        items = js_string(&layout.option_items),
    )
}

/// Stringified trimmed names of the items in the current search results
pub fn item_names(layout: &PageLayout) -> String {
    format!(
        r#"JSON.stringify(Array.from(document.querySelectorAll({names}))
    .map(el => el.textContent.trim()))"#,
        names = js_string(&layout.result_names),
    )
}

/// Stringified detail record for the item called `name`.
///
/// Name elements are tried from the last exact match backwards. A match's panel
/// is its nearest ancestor holding table rows, provided no ancestor on the way
/// names a different item; a results-list entry therefore never borrows the
/// rows of a neighbouring panel. Without such a panel the last match's parent is
/// read. A field's value is the first cell of the row whose text starts with the
/// field's label, or `''` when no row does.
pub fn item_details(layout: &PageLayout, name: &str) -> String {
    let fields: Vec<[&str; 2]> = FIELD_KEYS.iter().zip(FIELD_LABELS.iter()).map(|(k, l)| [*k, *l]).collect();
    let fields = serde_json::json!(fields).to_string();

    format!(
        r#"(() => {{
    const name = {name};
    const fields = {fields};
    const names = {names};
    const matches = [];
    for (const el of document.querySelectorAll(names)) {{
        if (el.textContent.trim() === name) matches.push(el);
    }}
    if (matches.length === 0) return JSON.stringify({{ name, error: {not_found} }});

    const namesOnly = el => Array.from(el.querySelectorAll(names))
        .every(other => other.textContent.trim() === name);
    let panel = null;
    for (let i = matches.length - 1; i >= 0 && !panel; i--) {{
        for (let el = matches[i].parentElement; el && namesOnly(el); el = el.parentElement) {{
            if (el.querySelector('tr')) {{ panel = el; break; }}
        }}
    }}
    panel = panel || matches[matches.length - 1].parentElement;
    if (!panel) return JSON.stringify({{ name, error: 'detail panel not found' }});

    const rows = Array.from(panel.querySelectorAll('tr'));
    const record = {{ name, error: '' }};
    for (const [key, label] of fields) {{
        const row = rows.find(tr => tr.textContent.trim().startsWith(label));
        const cell = row ? row.querySelector('td') : null;
        record[key] = cell ? cell.textContent.trim() : '';
    }}
    return JSON.stringify(record);
}})()"#,
        name = js_string(name),
        fields = fields,
        names = js_string(&layout.detail_names),
        not_found = js_string(NOT_FOUND),
    )
}
