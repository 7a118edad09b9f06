//! Export boundary.
//!
//! A request carrying `_exporter` is answered by the named [`Exporter`]
//! instead of the JSON envelope. File formats live outside this crate; an
//! exporter receives the columns and every matching transformed row.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value as Json;
use tracing::warn;

use crate::column::ColumnSet;
use crate::error::{DataTableError, Result};

/// A rendered export file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOutput {
    pub filename: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

/// Turns transformed rows into a file.
pub trait Exporter: Send + Sync {
    /// Name matched against the request's `_exporter` parameter.
    fn name(&self) -> &str;

    fn export(&self, columns: &ColumnSet, rows: &[Json]) -> Result<ExportOutput>;
}

/// Exporters available to a table, by name.
#[derive(Clone, Default)]
pub struct ExporterManager {
    exporters: IndexMap<String, Arc<dyn Exporter>>,
}

impl ExporterManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an exporter, replacing one with the same name.
    pub fn register(&mut self, exporter: impl Exporter + 'static) -> &mut Self {
        let exporter: Arc<dyn Exporter> = Arc::new(exporter);
        self.exporters.insert(exporter.name().to_string(), exporter);
        self
    }

    pub fn get(&self, name: &str) -> Result<&Arc<dyn Exporter>> {
        self.exporters.get(name).ok_or_else(|| {
            warn!(exporter = name, "unknown exporter requested");
            DataTableError::configuration(format!("unknown exporter '{}'", name))
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.exporters.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.exporters.is_empty()
    }

    /// Runs the named exporter.
    pub fn export(&self, name: &str, columns: &ColumnSet, rows: &[Json]) -> Result<ExportOutput> {
        self.get(name)?.export(columns, rows)
    }
}

impl fmt::Debug for ExporterManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.exporters.keys()).finish()
    }
}
