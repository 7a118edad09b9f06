//! Backend adapters.
//!
//! An [`Adapter`] turns the request state into backend rows plus counts.
//! [`get_data`] drives any adapter: it fetches, extracts each column's value
//! from every raw row, runs the column transforms and assembles a
//! [`ResultSet`]. A failure anywhere aborts the whole call, so callers never
//! see a partial result.

pub mod api;
mod array;

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value as Json};
use tracing::trace;

use datatables_seeker::lookup;

use crate::column::{Column, ColumnSet};
use crate::error::Result;
use crate::state::DataTableState;

pub use api::{ApiAdapter, ApiAdapterOptions, ApiClient, ApiResultSet, Query, QueryProcessor, QueryValue};
pub use array::{ArrayAdapter, ArrayAdapterOptions};

/// Rows fetched from a backend, before column transforms.
pub struct RawResultSet {
    /// Row count ignoring all filters.
    pub total_records: u64,
    /// Row count after filters.
    pub total_display_records: u64,
    pub rows: Box<dyn Iterator<Item = Result<Json>> + Send>,
}

impl RawResultSet {
    pub fn new<I>(total_records: u64, total_display_records: u64, rows: I) -> Self
    where
        I: IntoIterator<Item = Result<Json>>,
        I::IntoIter: Send + 'static,
    {
        Self {
            total_records,
            total_display_records,
            rows: Box::new(rows.into_iter()),
        }
    }

    pub fn from_rows(total_records: u64, total_display_records: u64, rows: Vec<Json>) -> Self {
        Self::new(total_records, total_display_records, rows.into_iter().map(Ok))
    }
}

impl fmt::Debug for RawResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResultSet")
            .field("total_records", &self.total_records)
            .field("total_display_records", &self.total_display_records)
            .finish_non_exhaustive()
    }
}

/// A data source for a table.
pub trait Adapter: Send + Sync {
    /// Runs the request against the backend.
    fn fetch(&self, state: &DataTableState, columns: &ColumnSet) -> Result<RawResultSet>;

    /// Path of a column's value inside a raw row, when the column sets no
    /// explicit property path.
    fn map_property_path(&self, column: &Column) -> Option<String> {
        column.field().map(str::to_string)
    }

    /// Whether columns without a field should use their name as field.
    fn derives_field_from_name(&self) -> bool {
        false
    }
}

/// An adapter built from typed options, failing fast on bad ones.
pub trait ConfigurableAdapter: Adapter + Sized {
    type Options;

    fn configure(options: Self::Options) -> Result<Self>;
}

/// Transformed rows plus counts.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ResultSet {
    pub total_records: u64,
    pub total_display_records: u64,
    pub data: Vec<Json>,
}

/// Table-wide hook receiving `(transformed row, raw row)`.
pub type RowTransformer = Arc<dyn Fn(Map<String, Json>, &Json) -> Json + Send + Sync>;

/// Fetches through `adapter` and transforms every row.
pub fn get_data(
    adapter: &dyn Adapter,
    state: &DataTableState,
    columns: &ColumnSet,
    transformer: Option<&RowTransformer>,
) -> Result<ResultSet> {
    let raw = adapter.fetch(state, columns)?;

    let paths: Vec<(&Column, Option<String>)> = columns
        .iter()
        .map(|column| {
            let path = column
                .property_path()
                .map(str::to_string)
                .or_else(|| adapter.map_property_path(column));
            (column, path)
        })
        .collect();

    let mut data = Vec::new();
    for row in raw.rows {
        let row = row?;
        let mut cells = Map::new();
        for (column, path) in &paths {
            let value = path
                .as_deref()
                .and_then(|path| lookup(&row, path))
                .cloned()
                .unwrap_or(Json::Null);
            cells.insert(column.name().to_string(), column.transform(value, &row)?);
        }
        data.push(match transformer {
            Some(transform) => transform(cells, &row),
            None => Json::Object(cells),
        });
    }

    trace!(
        total = raw.total_records,
        filtered = raw.total_display_records,
        rows = data.len(),
        "transformed result set"
    );

    Ok(ResultSet {
        total_records: raw.total_records,
        total_display_records: raw.total_display_records,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::ColumnBuilder;
    use crate::error::DataTableError;
    use serde_json::json;

    struct Fixed(Vec<Json>);

    impl Adapter for Fixed {
        fn fetch(&self, _state: &DataTableState, _columns: &ColumnSet) -> Result<RawResultSet> {
            Ok(RawResultSet::from_rows(10, self.0.len() as u64, self.0.clone()))
        }
    }

    struct Broken;

    impl Adapter for Broken {
        fn fetch(&self, _state: &DataTableState, _columns: &ColumnSet) -> Result<RawResultSet> {
            let rows = vec![
                Ok(json!({"name": "ok"})),
                Err(DataTableError::adapter("connection reset")),
            ];
            Ok(RawResultSet::new(2, 2, rows))
        }
    }

    fn columns() -> ColumnSet {
        let mut set = ColumnSet::new();
        for (name, builder) in [
            ("name", ColumnBuilder::text().field("name")),
            ("city", ColumnBuilder::text().property_path("address.city")),
            ("missing", ColumnBuilder::text().data("-")),
        ] {
            let column = builder.build(name, set.next_index()).unwrap();
            set.push(column).unwrap();
        }
        set
    }

    #[test]
    fn extracts_by_path_and_transforms() {
        let adapter = Fixed(vec![json!({"name": "Ann <3", "address": {"city": "Oslo"}})]);
        let result = get_data(&adapter, &DataTableState::default(), &columns(), None).unwrap();
        assert_eq!(result.total_records, 10);
        assert_eq!(result.total_display_records, 1);
        assert_eq!(
            result.data,
            vec![json!({"name": "Ann &lt;3", "city": "Oslo", "missing": "-"})]
        );
    }

    #[test]
    fn row_transformer_sees_cells_and_raw_row() {
        let adapter = Fixed(vec![json!({"id": 5, "name": "Ann"})]);
        let transformer: RowTransformer = Arc::new(|mut cells: Map<String, Json>, raw: &Json| {
            cells.insert("DT_RowId".to_string(), json!(format!("row_{}", raw["id"])));
            Json::Object(cells)
        });
        let result =
            get_data(&adapter, &DataTableState::default(), &columns(), Some(&transformer)).unwrap();
        assert_eq!(result.data[0]["DT_RowId"], json!("row_5"));
        assert_eq!(result.data[0]["name"], json!("Ann"));
    }

    #[test]
    fn row_failure_aborts_whole_result() {
        let err = get_data(&Broken, &DataTableState::default(), &columns(), None).unwrap_err();
        assert!(matches!(err, DataTableError::Adapter(_)));
    }
}
