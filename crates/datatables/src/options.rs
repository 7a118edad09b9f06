//! Table-level configuration.
//!
//! [`TableOptions`] mirrors the client-side widget defaults. It is sent to the
//! browser as-is by [`DataTable::get_initial_options`](crate::DataTable::get_initial_options)
//! and seeds the request state before any parameters are applied.
//!
//! Unknown keys are kept in [`TableOptions::extra`] and passed through to the
//! client untouched, so newer widget options need no code change here.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use datatables_seeker::Dir;

use crate::error::Result;

/// Client-side grid options with server-side defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableOptions {
    #[serde(rename = "jQueryUI")]
    pub jquery_ui: bool,
    pub paging_type: String,
    pub length_menu: Value,
    pub page_length: i64,
    pub display_start: i64,
    pub server_side: bool,
    pub processing: bool,
    pub paging: bool,
    pub length_change: bool,
    pub ordering: bool,
    pub searching: bool,
    /// Initial global search term.
    pub search: Option<String>,
    pub search_cols: Vec<Value>,
    pub auto_width: bool,
    /// Initial ordering as `(column index, direction)` pairs.
    pub order: Vec<(usize, Dir)>,
    pub search_delay: u64,
    pub dom: String,
    pub order_cells_top: bool,
    pub state_save: bool,
    pub fixed_header: bool,
    /// Options this struct does not model, passed through verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            jquery_ui: false,
            paging_type: "full_numbers".to_string(),
            length_menu: json!([[10, 25, 50, -1], [10, 25, 50, "All"]]),
            page_length: 10,
            display_start: 0,
            server_side: true,
            processing: true,
            paging: true,
            length_change: true,
            ordering: true,
            searching: false,
            search: None,
            search_cols: Vec::new(),
            auto_width: false,
            order: Vec::new(),
            search_delay: 400,
            dom: "lftrip".to_string(),
            order_cells_top: true,
            state_save: false,
            fixed_header: false,
            extra: Map::new(),
        }
    }
}

impl TableOptions {
    /// Parses options from a JSON document. Missing keys take their defaults.
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Returns an option by its wire name, modelled or not.
    pub fn get(&self, name: &str) -> Option<Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map.get(name).cloned(),
            _ => None,
        }
    }
}

/// Where the client keeps the grid state between page loads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistState {
    /// State is not persisted.
    None,
    /// State is written to the URL query string.
    #[default]
    Query,
    /// State is written to the URL fragment.
    Fragment,
    /// State is kept in local storage.
    Local,
    /// State is kept in session storage.
    Session,
}

impl PersistState {
    /// Returns the wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            PersistState::None => "none",
            PersistState::Query => "query",
            PersistState::Fragment => "fragment",
            PersistState::Local => "local",
            PersistState::Session => "session",
        }
    }
}
