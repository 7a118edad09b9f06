//! Server-side request handling for DataTables-style grids.
//!
//! A grid widget sends its state (paging, ordering, global and per-column
//! search, optional export format) with every refresh. This crate parses
//! that request against a configured column model, turns it into a backend
//! query through an adapter, and answers with the envelope the widget
//! expects:
//!
//! ```text
//! {"draw": 3, "recordsTotal": 57, "recordsFiltered": 12, "data": [...]}
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use datatables::prelude::*;
//!
//! let mut table = DataTable::default();
//! table
//!     .add("name", ColumnBuilder::text().label("Name"))?
//!     .add("city", ColumnBuilder::text())?
//!     .create_adapter::<ArrayAdapter>(ArrayAdapterOptions::new(vec![
//!         json!({"name": "Ada", "city": "London"}),
//!         json!({"name": "Grace", "city": "Arlington"}),
//!     ]))?;
//!
//! let body = ParameterBag::from_query_str("draw=1&start=0&length=10&search[value]=lon");
//! table.handle_request(&GridRequest::post(body))?;
//!
//! let DataTableResponse::Json(envelope) = table.get_response()? else {
//!     unreachable!()
//! };
//! assert_eq!(envelope.records_filtered, 1);
//! assert_eq!(envelope.data[0]["name"], "Ada");
//! # Ok::<(), datatables::DataTableError>(())
//! ```
//!
//! # Modules
//!
//! - [`column`]: the column model, built-in column kinds and option schemas
//! - [`filter`]: per-column search-term validity
//! - [`state`]: the normalized request state
//! - [`adapter`]: backend adapters and the row transform pipeline
//! - [`table`]: the orchestrator
//! - [`exporter`]: the export boundary

pub mod adapter;
pub mod column;
pub mod error;
pub mod exporter;
pub mod filter;
pub mod options;
pub mod params;
pub mod state;
pub mod table;

pub use adapter::{
    get_data, Adapter, ApiAdapter, ApiAdapterOptions, ApiClient, ApiResultSet, ArrayAdapter,
    ArrayAdapterOptions, ConfigurableAdapter, Query, QueryProcessor, QueryValue, RawResultSet,
    ResultSet, RowTransformer,
};
pub use column::{
    ActionColumn, ActionColumnItem, ActionItems, ActionLayout, BoolColumn, CellTemplate,
    CheckboxColumn, Column, ColumnBuilder, ColumnOptions, ColumnSet, ColumnType, Data,
    DateTimeColumn, MapColumn, NumberColumn, OptionKind, OptionSchema, Render, TextColumn,
};
pub use datatables_seeker::Dir;
pub use error::{BoxError, DataTableError, Result};
pub use exporter::{ExportOutput, Exporter, ExporterManager};
pub use filter::{ChoiceFilter, Filter, FilterSpec, PatternFilter, SharedFilter, TextFilter};
pub use options::{PersistState, TableOptions};
pub use params::ParameterBag;
pub use state::{DataTableState, SearchColumn};
pub use table::{ColumnRef, DataTable, DataTableResponse, GridRequest, ResultEnvelope};

/// Everything needed to configure and serve a table.
pub mod prelude {
    pub use crate::{
        ActionColumn, ActionColumnItem, ApiAdapter, ApiAdapterOptions, ApiClient, ApiResultSet,
        ArrayAdapter, ArrayAdapterOptions, ColumnBuilder, ConfigurableAdapter, DataTable,
        DataTableError, DataTableResponse, Dir, GridRequest, ParameterBag, Query, TableOptions,
    };
}
