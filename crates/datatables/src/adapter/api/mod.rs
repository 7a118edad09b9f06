//! Adapter for REST-style list endpoints.
//!
//! The request state becomes a flat [`Query`] built in a fixed order:
//! default processors, global search, column searches, ordering, paging.
//! An [`ApiClient`] executes it.

mod client;
mod query;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use super::{Adapter, ConfigurableAdapter, RawResultSet};
use crate::column::{Column, ColumnSet};
use crate::error::{DataTableError, Result};
use crate::state::DataTableState;

pub use client::{ApiClient, ApiResultSet};
pub use query::{Query, QueryValue};

/// Seeds every query before request filters are added.
pub type QueryProcessor = Arc<dyn Fn(&mut Query) + Send + Sync>;

/// Options for [`ApiAdapter`]. `client` is required.
#[derive(Clone, Default)]
pub struct ApiAdapterOptions {
    client: Option<Arc<dyn ApiClient>>,
    query: Vec<QueryProcessor>,
}

impl ApiAdapterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn client(mut self, client: impl ApiClient + 'static) -> Self {
        self.client = Some(Arc::new(client));
        self
    }

    pub fn shared_client(mut self, client: Arc<dyn ApiClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Adds a default query processor. Processors run in the order added.
    pub fn query<F>(mut self, processor: F) -> Self
    where
        F: Fn(&mut Query) + Send + Sync + 'static,
    {
        self.query.push(Arc::new(processor));
        self
    }
}

impl fmt::Debug for ApiAdapterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiAdapterOptions")
            .field("client", &self.client.as_ref().map(|_| "<client>"))
            .field("query", &self.query.len())
            .finish()
    }
}

/// Reads rows from an [`ApiClient`].
///
/// Columns without a field use their name. The client's total is reported
/// as both the total and the filtered count.
#[derive(Clone)]
pub struct ApiAdapter {
    client: Arc<dyn ApiClient>,
    processors: Vec<QueryProcessor>,
}

impl fmt::Debug for ApiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiAdapter")
            .field("processors", &self.processors.len())
            .finish_non_exhaustive()
    }
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|f| !f.is_empty())
}

impl ApiAdapter {
    /// Builds the query for a request.
    pub fn build_query(&self, state: &DataTableState, columns: &ColumnSet) -> Query {
        let mut query = Query::new();

        for processor in &self.processors {
            processor(&mut query);
        }

        let global = state.global_search();
        if !global.is_empty() {
            let targets: Vec<&Column> = columns.iter().filter(|c| c.is_global_searchable()).collect();
            if targets.is_empty() {
                debug!(search = global, "no globally searchable column, ignoring global search");
            }
            for column in targets {
                if let Some(field) = non_empty(column.filter_field()) {
                    query.add_filter(field, global);
                }
            }
        }

        for search in state.search_columns().values() {
            let Some(column) = columns.get(search.index) else {
                continue;
            };
            if search.search.trim().is_empty() || !column.accepts_search(&search.search) {
                continue;
            }
            column.apply_filter_callback(&mut query, &search.search);
            if let Some(field) = non_empty(column.filter_field()) {
                query.add_filter(field, search.search.as_str());
            }
        }

        for (column, dir) in state.order_by_columns(columns) {
            if !column.is_orderable() {
                continue;
            }
            if let Some(field) = non_empty(column.order_field()) {
                query.add_order_by(field, dir.as_str());
            }
        }

        let (start, length) = (state.start(), state.length());
        if length > 0 {
            query.set_items_per_page(length);
            if start > 0 {
                query.set_page((start / length).saturating_add(1));
            }
        }

        trace!(query = %query.to_query_string(), "built api query");
        query
    }
}

impl ConfigurableAdapter for ApiAdapter {
    type Options = ApiAdapterOptions;

    fn configure(options: ApiAdapterOptions) -> Result<Self> {
        let client = options.client.ok_or_else(|| {
            DataTableError::configuration("the api adapter requires a 'client' option")
        })?;
        Ok(Self {
            client,
            processors: options.query,
        })
    }
}

impl Adapter for ApiAdapter {
    fn fetch(&self, state: &DataTableState, columns: &ColumnSet) -> Result<RawResultSet> {
        let query = self.build_query(state, columns);
        let result = self.client.list(&query).map_err(DataTableError::Adapter)?;
        let total = result.total_records;
        Ok(RawResultSet::from_rows(total, total, result.data))
    }

    fn derives_field_from_name(&self) -> bool {
        true
    }
}
