//! Per-request grid state.
//!
//! A [`DataTableState`] starts from the table's configured defaults and is
//! then updated from the request's parameters. Malformed input degrades
//! quietly: unparseable paging keeps the previous values, and order or search
//! entries that cannot be honored are dropped and logged at debug level.

use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::debug;

use datatables_seeker::Dir;

use crate::column::{Column, ColumnSet};
use crate::options::TableOptions;
use crate::params::{as_int, as_string, keyed_entries, list_entries, ParameterBag};

/// A column's active search term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchColumn {
    pub index: usize,
    pub search: String,
}

/// Normalized state of one grid request.
#[derive(Clone, Debug, PartialEq)]
pub struct DataTableState {
    draw: Json,
    start: i64,
    length: i64,
    global_search: String,
    search_columns: IndexMap<String, SearchColumn>,
    order_by: Vec<(usize, Dir)>,
    exporter_name: Option<String>,
    is_callback: bool,
}

impl Default for DataTableState {
    fn default() -> Self {
        Self {
            draw: Json::from(0),
            start: 0,
            length: -1,
            global_search: String::new(),
            search_columns: IndexMap::new(),
            order_by: Vec::new(),
            exporter_name: None,
            is_callback: false,
        }
    }
}

fn normalize_length(length: i64) -> i64 {
    if length < 1 {
        -1
    } else {
        length
    }
}

/// Resolves a column reference given as an index or a name. Names win over
/// indexes, so a column called `"2024"` stays addressable.
fn resolve_column<'c>(columns: &'c ColumnSet, reference: &Json) -> Option<&'c Column> {
    match reference {
        Json::Number(n) => n
            .as_u64()
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| columns.get(i)),
        Json::String(s) => resolve_column_key(columns, s),
        _ => None,
    }
}

fn resolve_column_key<'c>(columns: &'c ColumnSet, key: &str) -> Option<&'c Column> {
    columns.get_by_name(key).or_else(|| {
        key.trim()
            .parse::<usize>()
            .ok()
            .and_then(|index| columns.get(index))
    })
}

/// Search term from `{search: {value}}`, `{search: {search}}`, `{search: "x"}`
/// or a bare string.
fn column_term(entry: &Json) -> Option<String> {
    match entry {
        Json::String(s) => Some(s.clone()),
        Json::Object(map) => match map.get("search")? {
            Json::Object(search) => search
                .get("value")
                .or_else(|| search.get("search"))
                .and_then(as_string),
            other => as_string(other),
        },
        _ => None,
    }
}

fn global_term(search: &Json) -> Option<String> {
    match search {
        Json::Object(map) => map
            .get("value")
            .or_else(|| map.get("search"))
            .and_then(as_string),
        other => as_string(other),
    }
}

impl DataTableState {
    /// Seeds state from table options: display start, page length, initial
    /// search, search columns and order.
    pub fn from_defaults(options: &TableOptions, columns: &ColumnSet) -> Self {
        let mut state = Self {
            start: options.display_start.max(0),
            length: normalize_length(options.page_length),
            global_search: options.search.clone().unwrap_or_default(),
            ..Self::default()
        };
        for &(index, dir) in &options.order {
            if let Some(column) = columns.get(index) {
                state.add_order_by(column, dir);
            }
        }
        for (index, entry) in options.search_cols.iter().enumerate() {
            if let (Some(column), Some(term)) = (columns.get(index), column_term(entry)) {
                state.set_column_search(column, term);
            }
        }
        state
    }

    /// Applies request parameters on top of the current state.
    ///
    /// `order` and `columns`, when present, replace the existing order list
    /// and search terms entirely.
    pub fn apply_parameters(&mut self, params: &ParameterBag, columns: &ColumnSet, is_initial: bool) {
        self.is_callback = !is_initial;

        if let Some(draw) = params.get("draw") {
            self.draw = draw.clone();
        }
        if let Some(start) = params.get("start").and_then(as_int) {
            self.start = start.max(0);
        }
        if let Some(length) = params.get("length").and_then(as_int) {
            self.length = normalize_length(length);
        }
        if let Some(search) = params.get("search").and_then(global_term) {
            self.global_search = search;
        }
        self.exporter_name = params
            .get("_exporter")
            .and_then(as_string)
            .filter(|name| !name.is_empty());

        if let Some(order) = params.get("order") {
            self.apply_order(order, columns);
        }
        if let Some(search_columns) = params.get("columns") {
            self.apply_column_searches(search_columns, columns);
        }

        debug!(
            draw = %self.draw,
            start = self.start,
            length = self.length,
            global_search = %self.global_search,
            order = self.order_by.len(),
            searches = self.search_columns.len(),
            exporter = ?self.exporter_name,
            is_initial,
            "applied grid request parameters"
        );
    }

    fn apply_order(&mut self, order: &Json, columns: &ColumnSet) {
        self.order_by.clear();
        let Some(entries) = list_entries(order) else {
            debug!(%order, "ignoring order parameter that is not a list");
            return;
        };
        for entry in entries {
            let (reference, dir) = match entry {
                Json::Object(map) => (map.get("column"), map.get("dir")),
                Json::Array(pair) => (pair.first(), pair.get(1)),
                _ => (None, None),
            };
            let Some(column) = reference.and_then(|r| resolve_column(columns, r)) else {
                debug!(%entry, "dropping order entry for unknown column");
                continue;
            };
            let dir = dir.and_then(Json::as_str).map(Dir::parse).unwrap_or_default();
            if !self.add_order_by(column, dir) {
                debug!(column = column.name(), "dropping order entry for non-orderable column");
            }
        }
    }

    fn apply_column_searches(&mut self, entries: &Json, columns: &ColumnSet) {
        self.search_columns.clear();
        for (key, entry) in keyed_entries(entries) {
            let Some(column) = resolve_column_key(columns, &key) else {
                debug!(key = %key, "dropping search for unknown column");
                continue;
            };
            if let Some(term) = column_term(entry) {
                self.set_column_search(column, term);
            }
        }
    }

    /// Appends an order entry if the column is orderable and has an order
    /// field. Returns whether it was added.
    pub fn add_order_by(&mut self, column: &Column, dir: Dir) -> bool {
        let has_field = column.order_field().map_or(false, |f| !f.is_empty());
        if !column.is_orderable() || !has_field {
            return false;
        }
        self.order_by.push((column.index(), dir));
        true
    }

    /// Sets a column's search term. Terms for non-searchable columns, terms
    /// that are blank after trimming, and terms the column's filter rejects
    /// are ignored. Returns whether the term was kept.
    pub fn set_column_search(&mut self, column: &Column, term: impl Into<String>) -> bool {
        let term = term.into();
        if !column.is_searchable() || term.trim().is_empty() || !column.accepts_search(&term) {
            return false;
        }
        self.search_columns.insert(
            column.name().to_string(),
            SearchColumn {
                index: column.index(),
                search: term,
            },
        );
        true
    }

    pub fn draw(&self) -> &Json {
        &self.draw
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn set_start(&mut self, start: i64) {
        self.start = start.max(0);
    }

    /// Page size; `-1` means unbounded.
    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn set_length(&mut self, length: i64) {
        self.length = normalize_length(length);
    }

    pub fn global_search(&self) -> &str {
        &self.global_search
    }

    pub fn set_global_search(&mut self, search: impl Into<String>) {
        self.global_search = search.into();
    }

    pub fn search_columns(&self) -> &IndexMap<String, SearchColumn> {
        &self.search_columns
    }

    pub fn order_by(&self) -> &[(usize, Dir)] {
        &self.order_by
    }

    /// Order entries resolved against the column set.
    pub fn order_by_columns<'c>(&self, columns: &'c ColumnSet) -> Vec<(&'c Column, Dir)> {
        self.order_by
            .iter()
            .filter_map(|&(index, dir)| columns.get(index).map(|column| (column, dir)))
            .collect()
    }

    pub fn exporter_name(&self) -> Option<&str> {
        self.exporter_name.as_deref()
    }

    pub fn is_export(&self) -> bool {
        self.exporter_name.is_some()
    }

    pub fn is_callback(&self) -> bool {
        self.is_callback
    }

    /// A copy covering every matching row.
    pub fn without_paging(&self) -> Self {
        Self {
            start: 0,
            length: -1,
            ..self.clone()
        }
    }
}
