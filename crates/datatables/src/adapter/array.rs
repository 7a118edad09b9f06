//! In-memory adapter over JSON rows.

use std::fmt;
use std::sync::Arc;

use serde_json::Value as Json;
use tracing::trace;

use datatables_seeker::{Clause, Op, Query as SeekerQuery};

use super::{Adapter, ConfigurableAdapter, RawResultSet};
use crate::column::ColumnSet;
use crate::error::{DataTableError, Result};
use crate::state::DataTableState;

type SeekerProcessor = Arc<dyn Fn(SeekerQuery) -> SeekerQuery + Send + Sync>;

/// Options for [`ArrayAdapter`].
#[derive(Clone, Default)]
pub struct ArrayAdapterOptions {
    data: Vec<Json>,
    query: Vec<SeekerProcessor>,
}

impl ArrayAdapterOptions {
    /// Rows to serve. Every row must be a JSON object.
    pub fn new(data: Vec<Json>) -> Self {
        Self {
            data,
            query: Vec::new(),
        }
    }

    /// Adds a default clause set, applied before request filters.
    pub fn query<F>(mut self, processor: F) -> Self
    where
        F: Fn(SeekerQuery) -> SeekerQuery + Send + Sync + 'static,
    {
        self.query.push(Arc::new(processor));
        self
    }
}

impl fmt::Debug for ArrayAdapterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayAdapterOptions")
            .field("rows", &self.data.len())
            .field("query", &self.query.len())
            .finish()
    }
}

/// Filters, orders and pages rows held in memory.
///
/// Global search is a case-insensitive contains over the globally
/// searchable fields, any of which may match. It forms its own any-of group,
/// so OR clauses from default processors still apply. Column searches are
/// case-insensitive contains and must all match. The total is the row
/// count; the filtered count is the number of matching rows.
#[derive(Clone)]
pub struct ArrayAdapter {
    rows: Arc<Vec<Json>>,
    processors: Vec<SeekerProcessor>,
}

impl fmt::Debug for ArrayAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArrayAdapter")
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}

impl ArrayAdapter {
    pub fn build_query(&self, state: &DataTableState, columns: &ColumnSet) -> SeekerQuery {
        let mut query = self
            .processors
            .iter()
            .fold(SeekerQuery::new(), |query, processor| processor(query));

        let global = state.global_search();
        if !global.is_empty() {
            let clauses = columns
                .iter()
                .filter(|c| c.is_global_searchable())
                .filter_map(|c| c.filter_field().filter(|f| !f.is_empty()))
                .map(|field| Clause::new(field, Op::IContains, global))
                .collect::<Vec<_>>();
            query = query.and_any(clauses);
        }

        for search in state.search_columns().values() {
            let Some(column) = columns.get(search.index) else {
                continue;
            };
            let term = search.search.trim();
            if term.is_empty() || !column.accepts_search(&search.search) {
                continue;
            }
            if let Some(field) = column.filter_field().filter(|f| !f.is_empty()) {
                query = query.and_icontains(field, term);
            }
        }

        for (column, dir) in state.order_by_columns(columns) {
            if let Some(field) = column.order_field().filter(|f| !f.is_empty()) {
                if column.is_orderable() {
                    query = query.order_by(field, dir);
                }
            }
        }

        let start = usize::try_from(state.start()).unwrap_or(0);
        if start > 0 {
            query = query.offset(start);
        }
        if let Ok(length) = usize::try_from(state.length()) {
            if length > 0 {
                query = query.limit(length);
            }
        }
        query
    }
}

impl ConfigurableAdapter for ArrayAdapter {
    type Options = ArrayAdapterOptions;

    fn configure(options: ArrayAdapterOptions) -> Result<Self> {
        if let Some(position) = options.data.iter().position(|row| !row.is_object()) {
            return Err(DataTableError::configuration(format!(
                "array adapter row {} is not an object",
                position
            )));
        }
        Ok(Self {
            rows: Arc::new(options.data),
            processors: options.query,
        })
    }
}

impl Adapter for ArrayAdapter {
    fn fetch(&self, state: &DataTableState, columns: &ColumnSet) -> Result<RawResultSet> {
        let query = self.build_query(state, columns);
        let page = query.page(&self.rows);
        trace!(total = page.total, matched = page.matched, returned = page.items.len(), "array query");
        let rows = page.items.into_iter().cloned().collect();
        Ok(RawResultSet::from_rows(page.total as u64, page.matched as u64, rows))
    }

    fn derives_field_from_name(&self) -> bool {
        true
    }
}
