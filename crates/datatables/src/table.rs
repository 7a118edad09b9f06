//! The table orchestrator.
//!
//! A [`DataTable`] owns the column model, the adapter and the per-request
//! state. One request cycle is:
//!
//! 1. [`DataTable::handle_request`] parses the request into a
//!    [`DataTableState`]. GET is the initial page load, POST a data refresh.
//! 2. [`DataTable::get_response`] either hands the request to an exporter
//!    or fetches through the adapter and builds the
//!    `{draw, recordsTotal, recordsFiltered, data}` envelope.
//!
//! Tables are cheap to clone. The column set and adapter are shared, so a
//! configured table can be cloned per request.

use std::fmt;
use std::sync::Arc;

use http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use http::{Method, StatusCode};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as Json};
use tracing::error;

use datatables_seeker::Dir;

use crate::adapter::{get_data, Adapter, ConfigurableAdapter, ResultSet, RowTransformer};
use crate::column::{Column, ColumnBuilder, ColumnSet};
use crate::error::{DataTableError, Result};
use crate::exporter::{ExportOutput, Exporter, ExporterManager};
use crate::options::{PersistState, TableOptions};
use crate::params::ParameterBag;
use crate::state::DataTableState;

const DEFAULT_NAME: &str = "dt";
const DEFAULT_TEMPLATE: &str = "datatable.html";
const DEFAULT_TRANSLATION_DOMAIN: &str = "messages";

/// A column reference by position or by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRef<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for ColumnRef<'_> {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl<'a> From<&'a str> for ColumnRef<'a> {
    fn from(name: &'a str) -> Self {
        ColumnRef::Name(name)
    }
}

/// The parts of an HTTP request a table reads.
#[derive(Clone, Debug)]
pub struct GridRequest {
    method: Method,
    query: ParameterBag,
    body: ParameterBag,
}

impl GridRequest {
    pub fn new(method: Method, query: ParameterBag, body: ParameterBag) -> Self {
        Self {
            method,
            query,
            body,
        }
    }

    /// An initial page load.
    pub fn get(query: ParameterBag) -> Self {
        Self::new(Method::GET, query, ParameterBag::new())
    }

    /// A data refresh from the grid widget.
    pub fn post(body: ParameterBag) -> Self {
        Self::new(Method::POST, ParameterBag::new(), body)
    }

    /// Reads the query string and body of an HTTP request. JSON bodies are
    /// recognized by content type; anything else is parsed as a form.
    pub fn from_http<B: AsRef<[u8]>>(request: &http::Request<B>) -> Result<Self> {
        let query = request
            .uri()
            .query()
            .map(ParameterBag::from_query_str)
            .unwrap_or_default();

        let bytes = request.body().as_ref();
        let is_json = request
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map_or(false, |value| value.starts_with("application/json"));
        let body = if bytes.is_empty() {
            ParameterBag::new()
        } else if is_json {
            ParameterBag::from_json(serde_json::from_slice(bytes)?)?
        } else {
            ParameterBag::from_query_str(&String::from_utf8_lossy(bytes))
        };

        Ok(Self::new(request.method().clone(), query, body))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn query(&self) -> &ParameterBag {
        &self.query
    }

    pub fn body(&self) -> &ParameterBag {
        &self.body
    }
}

/// The grid widget's response envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub draw: Json,
    #[serde(rename = "recordsTotal")]
    pub records_total: u64,
    #[serde(rename = "recordsFiltered")]
    pub records_filtered: u64,
    pub data: Vec<Json>,
}

/// What [`DataTable::get_response`] produced.
#[derive(Clone, Debug, PartialEq)]
pub enum DataTableResponse {
    Json(ResultEnvelope),
    Export(ExportOutput),
}

impl DataTableResponse {
    /// Converts into an HTTP response. Exports are sent as attachments.
    pub fn into_http(self) -> Result<http::Response<Vec<u8>>> {
        let response = match self {
            DataTableResponse::Json(envelope) => http::Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, "application/json")
                .body(serde_json::to_vec(&envelope)?),
            DataTableResponse::Export(output) => http::Response::builder()
                .status(StatusCode::OK)
                .header(CONTENT_TYPE, output.content_type)
                .header(
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", output.filename),
                )
                .body(output.body),
        };
        response.map_err(|err| DataTableError::Export(err.to_string()))
    }
}

/// A server-side grid.
#[derive(Clone)]
pub struct DataTable {
    name: String,
    method: Method,
    persist_state: PersistState,
    template: String,
    template_params: Map<String, Json>,
    translation_domain: String,
    language_from_cdn: bool,
    options: TableOptions,
    columns: Arc<ColumnSet>,
    adapter: Option<Arc<dyn Adapter>>,
    transformer: Option<RowTransformer>,
    exporters: ExporterManager,
    state: Option<DataTableState>,
    filter_defaults: IndexMap<String, String>,
    init: bool,
}

impl Default for DataTable {
    fn default() -> Self {
        Self::new(TableOptions::default())
    }
}

impl fmt::Debug for DataTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("columns", &self.columns.len())
            .field("has_adapter", &self.adapter.is_some())
            .field("exporters", &self.exporters)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl DataTable {
    pub fn new(options: TableOptions) -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            method: Method::POST,
            persist_state: PersistState::default(),
            template: DEFAULT_TEMPLATE.to_string(),
            template_params: Map::new(),
            translation_domain: DEFAULT_TRANSLATION_DOMAIN.to_string(),
            language_from_cdn: true,
            options,
            columns: Arc::new(ColumnSet::new()),
            adapter: None,
            transformer: None,
            exporters: ExporterManager::new(),
            state: None,
            filter_defaults: IndexMap::new(),
            init: false,
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<&mut Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(DataTableError::configuration("table name cannot be empty"));
        }
        self.name = name;
        Ok(self)
    }

    /// HTTP method the widget uses for data refreshes.
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = method;
        self
    }

    pub fn persist_state(&self) -> PersistState {
        self.persist_state
    }

    pub fn set_persist_state(&mut self, persist_state: PersistState) -> &mut Self {
        self.persist_state = persist_state;
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn template_params(&self) -> &Map<String, Json> {
        &self.template_params
    }

    pub fn set_template(
        &mut self,
        template: impl Into<String>,
        params: Map<String, Json>,
    ) -> &mut Self {
        self.template = template.into();
        self.template_params = params;
        self
    }

    pub fn translation_domain(&self) -> &str {
        &self.translation_domain
    }

    pub fn set_translation_domain(&mut self, domain: impl Into<String>) -> &mut Self {
        self.translation_domain = domain.into();
        self
    }

    pub fn language_from_cdn(&self) -> bool {
        self.language_from_cdn
    }

    pub fn set_language_from_cdn(&mut self, from_cdn: bool) -> &mut Self {
        self.language_from_cdn = from_cdn;
        self
    }

    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    pub fn option(&self, name: &str) -> Option<Json> {
        self.options.get(name)
    }

    /// Sets the hook applied to every transformed row.
    pub fn set_transformer<F>(&mut self, transformer: F) -> &mut Self
    where
        F: Fn(Map<String, Json>, &Json) -> Json + Send + Sync + 'static,
    {
        self.transformer = Some(Arc::new(transformer));
        self
    }

    pub fn add_exporter(&mut self, exporter: impl Exporter + 'static) -> &mut Self {
        self.exporters.register(exporter);
        self
    }

    pub fn exporters(&self) -> &ExporterManager {
        &self.exporters
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    /// Registers a column at the next index.
    pub fn add(&mut self, name: &str, builder: ColumnBuilder) -> Result<&mut Self> {
        if self.columns.contains(name) {
            return Err(DataTableError::configuration(format!(
                "there is already a column named '{}'",
                name
            )));
        }
        let mut column = builder.build(name, self.columns.next_index())?;
        if self.adapter.as_ref().map_or(false, |a| a.derives_field_from_name()) {
            column.apply_default_field();
        }
        Arc::make_mut(&mut self.columns).push(column)?;
        Ok(self)
    }

    /// Registers a column from a JSON option bag.
    pub fn add_from_options(
        &mut self,
        name: &str,
        kind: &str,
        options: &Map<String, Json>,
    ) -> Result<&mut Self> {
        let builder = ColumnBuilder::from_options(kind, options)?;
        self.add(name, builder)
    }

    /// Appends to the initial order.
    pub fn add_order_by<'a>(&mut self, column: impl Into<ColumnRef<'a>>, dir: Dir) -> Result<&mut Self> {
        let index = match column.into() {
            ColumnRef::Index(index) => self.get_column(index)?.index(),
            ColumnRef::Name(name) => self.get_column_by_name(name)?.index(),
        };
        self.options.order.push((index, dir));
        Ok(self)
    }

    pub fn get_column(&self, index: usize) -> Result<&Column> {
        self.columns.column(index)
    }

    pub fn get_column_by_name(&self, name: &str) -> Result<&Column> {
        self.columns.column_by_name(name)
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn shared_columns(&self) -> Arc<ColumnSet> {
        Arc::clone(&self.columns)
    }

    /// Header label for a column, with this table's name and HTML id.
    pub fn column_label(&self, column: &Column) -> Result<String> {
        column.header_label(&self.name, &self.html_id())
    }

    /// Whether any column can be filtered individually.
    pub fn has_filters(&self) -> bool {
        self.columns.iter().any(Column::is_searchable)
    }

    // ------------------------------------------------------------------
    // Adapter
    // ------------------------------------------------------------------

    pub fn set_adapter(&mut self, adapter: impl Adapter + 'static) -> &mut Self {
        self.set_shared_adapter(Arc::new(adapter))
    }

    pub fn set_shared_adapter(&mut self, adapter: Arc<dyn Adapter>) -> &mut Self {
        if adapter.derives_field_from_name() {
            for column in Arc::make_mut(&mut self.columns).iter_mut() {
                column.apply_default_field();
            }
        }
        self.adapter = Some(adapter);
        self
    }

    /// Configures an adapter from its options and attaches it. Bad options
    /// fail here, before any request is handled.
    pub fn create_adapter<A>(&mut self, options: A::Options) -> Result<&mut Self>
    where
        A: ConfigurableAdapter + 'static,
    {
        let adapter = A::configure(options)?;
        Ok(self.set_adapter(adapter))
    }

    pub fn adapter(&self) -> Option<&Arc<dyn Adapter>> {
        self.adapter.as_ref()
    }

    // ------------------------------------------------------------------
    // Request cycle
    // ------------------------------------------------------------------

    /// Parses a request into the table state.
    ///
    /// GET reads the query string and counts as the initial load, which
    /// also seeds [`filter_defaults`](Self::filter_defaults). POST reads the
    /// body. Other methods are a configuration error.
    pub fn handle_request(&mut self, request: &GridRequest) -> Result<&mut Self> {
        let (params, init) = if *request.method() == Method::GET {
            (request.query(), true)
        } else if *request.method() == Method::POST {
            (request.body(), false)
        } else {
            return Err(DataTableError::configuration(format!(
                "unknown request method '{}'",
                request.method()
            )));
        };
        self.init = init;

        let mut state = self
            .state
            .take()
            .unwrap_or_else(|| DataTableState::from_defaults(&self.options, &self.columns));
        state.apply_parameters(params, &self.columns, init);

        if init {
            self.filter_defaults = state
                .search_columns()
                .iter()
                .map(|(name, search)| (name.clone(), search.search.clone()))
                .collect();
        }
        self.state = Some(state);
        Ok(self)
    }

    /// True for data refreshes; false on initial load or before any request.
    pub fn is_callback(&self) -> bool {
        match &self.state {
            Some(state) if !self.init => state.is_callback(),
            _ => false,
        }
    }

    pub fn state(&self) -> Option<&DataTableState> {
        self.state.as_ref()
    }

    /// Initial values for the filter form, by column name.
    pub fn filter_defaults(&self) -> &IndexMap<String, String> {
        &self.filter_defaults
    }

    /// Answers the handled request.
    #[tracing::instrument(skip(self), fields(table = %self.name))]
    pub fn get_response(&self) -> Result<DataTableResponse> {
        let state = self.require_state()?;

        if let Some(name) = state.exporter_name() {
            let exporter = self.exporters.get(name)?;
            let result = self.fetch(&state.without_paging())?;
            let output = exporter.export(&self.columns, &result.data)?;
            return Ok(DataTableResponse::Export(output));
        }

        let result = self.fetch(state)?;
        Ok(DataTableResponse::Json(ResultEnvelope {
            draw: state.draw().clone(),
            records_total: result.total_records,
            records_filtered: result.total_display_records,
            data: result.data,
        }))
    }

    /// Fetches and transforms the rows for the handled request.
    pub fn get_result_set(&self) -> Result<ResultSet> {
        self.fetch(self.require_state()?)
    }

    fn require_state(&self) -> Result<&DataTableState> {
        self.state.as_ref().ok_or_else(|| {
            DataTableError::invalid_state(
                "the table does not know its state yet, call handle_request first",
            )
        })
    }

    fn fetch(&self, state: &DataTableState) -> Result<ResultSet> {
        let adapter = self.adapter.as_ref().ok_or_else(|| {
            DataTableError::invalid_state(
                "no adapter configured, call set_adapter or create_adapter first",
            )
        })?;
        get_data(adapter.as_ref(), state, &self.columns, self.transformer.as_ref()).map_err(|err| {
            error!(error = %err, "fetching grid data failed");
            err
        })
    }

    // ------------------------------------------------------------------
    // Frontend bootstrap
    // ------------------------------------------------------------------

    /// Widget options for the first render: table options merged with the
    /// column definitions and the current (or default) paging, search and
    /// order.
    pub fn get_initial_options(&self) -> Result<Map<String, Json>> {
        let defaults;
        let state = match &self.state {
            Some(state) => state,
            None => {
                defaults = DataTableState::from_defaults(&self.options, &self.columns);
                &defaults
            }
        };

        let mut options = match serde_json::to_value(&self.options)? {
            Json::Object(map) => map,
            _ => Map::new(),
        };

        let columns = self
            .columns
            .iter()
            .map(|column| {
                json!({
                    "data": column.name(),
                    "orderable": column.is_orderable(),
                    "searchable": column.is_searchable(),
                    "visible": column.is_visible(),
                    "className": column.class_name(),
                })
            })
            .collect();
        options.insert("columns".to_string(), Json::Array(columns));
        options.insert("pageLength".to_string(), json!(state.length()));
        options.insert("displayStart".to_string(), json!(state.start()));

        let search_cols = self
            .columns
            .iter()
            .map(|column| {
                state
                    .search_columns()
                    .get(column.name())
                    .map_or(Json::Null, |search| json!({"search": search.search}))
            })
            .collect();
        options.insert("searchCols".to_string(), Json::Array(search_cols));

        let order = state
            .order_by()
            .iter()
            .map(|(index, dir)| json!([index, dir.as_str()]))
            .collect();
        options.insert("order".to_string(), Json::Array(order));

        if !state.global_search().is_empty() {
            options.insert("search".to_string(), json!({"search": state.global_search()}));
        }

        Ok(options)
    }

    /// Bootstrap settings for the client script.
    pub fn settings(&self) -> Result<Json> {
        Ok(json!({
            "name": self.name,
            "htmlId": self.html_id(),
            "filterHtmlId": self.filter_html_id(),
            "method": self.method.as_str(),
            "state": self.persist_state.as_str(),
            "languageFromCDN": self.language_from_cdn,
            "translationDomain": self.translation_domain,
            "template": self.template,
            "templateParams": self.template_params,
            "options": self.get_initial_options()?,
        }))
    }

    /// DOM id: the name with dots replaced by underscores.
    pub fn html_id(&self) -> String {
        self.name.replace('.', "_")
    }

    pub fn filter_html_id(&self) -> String {
        format!("{}-filter", self.html_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{ArrayAdapter, ArrayAdapterOptions, RawResultSet};
    use serde_json::json;

    fn table() -> DataTable {
        let mut table = DataTable::default();
        table
            .add("id", ColumnBuilder::number().field("id").global_searchable(false))
            .unwrap()
            .add("name", ColumnBuilder::text().field("name"))
            .unwrap();
        table
    }

    fn rows() -> Vec<Json> {
        (1..=25)
            .map(|i| json!({"id": i, "name": format!("user {:02}", i)}))
            .collect()
    }

    #[test]
    fn is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DataTable>();
    }

    #[test]
    fn name_validation_and_ids() {
        let mut table = DataTable::default();
        assert!(matches!(table.set_name(""), Err(DataTableError::Configuration(_))));
        table.set_name("admin.users").unwrap();
        assert_eq!(table.html_id(), "admin_users");
        assert_eq!(table.filter_html_id(), "admin_users-filter");
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let mut table = table();
        let err = table.add("name", ColumnBuilder::text()).unwrap_err();
        assert!(matches!(err, DataTableError::Configuration(_)));
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn column_lookup_errors() {
        let table = table();
        assert_eq!(table.get_column(1).unwrap().name(), "name");
        assert!(matches!(table.get_column(2), Err(DataTableError::NotFound(_))));
        assert!(matches!(
            table.get_column_by_name("email"),
            Err(DataTableError::NotFound(_))
        ));
    }

    #[test]
    fn response_before_request_is_invalid_state() {
        let table = table();
        assert!(matches!(table.get_response(), Err(DataTableError::InvalidState(_))));
    }

    #[test]
    fn response_without_adapter_is_invalid_state() {
        let mut table = table();
        table.handle_request(&GridRequest::post(ParameterBag::new())).unwrap();
        assert!(matches!(table.get_response(), Err(DataTableError::InvalidState(_))));
    }

    #[test]
    fn unsupported_method_is_configuration_error() {
        let mut table = table();
        let request = GridRequest::new(Method::PUT, ParameterBag::new(), ParameterBag::new());
        assert!(matches!(
            table.handle_request(&request),
            Err(DataTableError::Configuration(_))
        ));
    }

    #[test]
    fn callback_flag_follows_method() {
        let mut table = table();
        assert!(!table.is_callback());
        table.handle_request(&GridRequest::get(ParameterBag::new())).unwrap();
        assert!(!table.is_callback());
        table.handle_request(&GridRequest::post(ParameterBag::new())).unwrap();
        assert!(table.is_callback());
    }

    #[test]
    fn envelope_from_array_adapter() {
        let mut table = table();
        table
            .create_adapter::<ArrayAdapter>(ArrayAdapterOptions::new(rows()))
            .unwrap();
        let mut body = ParameterBag::new();
        body.insert("draw", 4)
            .insert("start", 20)
            .insert("length", 10)
            .insert("order", json!([[0, "desc"]]));
        table.handle_request(&GridRequest::post(body)).unwrap();

        let DataTableResponse::Json(envelope) = table.get_response().unwrap() else {
            panic!("expected json response");
        };
        assert_eq!(envelope.draw, json!(4));
        assert_eq!(envelope.records_total, 25);
        assert_eq!(envelope.records_filtered, 25);
        let ids: Vec<_> = envelope.data.iter().map(|row| row["id"].clone()).collect();
        assert_eq!(ids, vec![json!(5), json!(4), json!(3), json!(2), json!(1)]);
        assert_eq!(envelope.data[0]["name"], json!("user 05"));
    }

    #[test]
    fn adapter_derives_fields_for_existing_and_later_columns() {
        let mut table = DataTable::default();
        table.add("before", ColumnBuilder::text()).unwrap();
        table
            .create_adapter::<ArrayAdapter>(ArrayAdapterOptions::new(Vec::new()))
            .unwrap();
        table.add("after", ColumnBuilder::text()).unwrap();
        assert_eq!(table.get_column(0).unwrap().field(), Some("before"));
        assert_eq!(table.get_column(1).unwrap().field(), Some("after"));
    }

    #[test]
    fn cloned_tables_share_columns() {
        let table = table();
        let clone = table.clone();
        assert!(Arc::ptr_eq(&table.shared_columns(), &clone.shared_columns()));
    }

    #[test]
    fn initial_load_seeds_filter_defaults() {
        let mut table = table();
        let query = ParameterBag::from_query_str("columns[name]=ann&columns[id]=3");
        table.handle_request(&GridRequest::get(query)).unwrap();
        assert_eq!(table.filter_defaults().get("name").map(String::as_str), Some("ann"));
        assert_eq!(table.filter_defaults().len(), 2);

        let body = ParameterBag::from_query_str("columns[name]=bob");
        table.handle_request(&GridRequest::post(body)).unwrap();
        assert_eq!(table.filter_defaults().get("name").map(String::as_str), Some("ann"));
    }

    #[test]
    fn initial_options_merge_state() {
        let mut table = table();
        table.add_order_by("name", Dir::Desc).unwrap();
        let options = table.get_initial_options().unwrap();
        assert_eq!(options["order"], json!([[1, "desc"]]));
        assert_eq!(options["pageLength"], json!(10));
        assert_eq!(options["searchCols"], json!([null, null]));
        assert_eq!(options["columns"][1]["data"], json!("name"));
        assert_eq!(options["columns"][0]["className"], Json::Null);
        assert_eq!(table.get_initial_options().unwrap(), options);
    }

    #[test]
    fn export_lifts_paging() {
        struct Count;
        impl Exporter for Count {
            fn name(&self) -> &str {
                "count"
            }
            fn export(&self, _columns: &ColumnSet, rows: &[Json]) -> Result<ExportOutput> {
                Ok(ExportOutput {
                    filename: "count.txt".into(),
                    content_type: "text/plain".into(),
                    body: rows.len().to_string().into_bytes(),
                })
            }
        }

        let mut table = table();
        table.add_exporter(Count);
        table
            .create_adapter::<ArrayAdapter>(ArrayAdapterOptions::new(rows()))
            .unwrap();
        let mut body = ParameterBag::new();
        body.insert("length", 10).insert("_exporter", "count");
        table.handle_request(&GridRequest::post(body)).unwrap();

        let DataTableResponse::Export(output) = table.get_response().unwrap() else {
            panic!("expected export");
        };
        assert_eq!(output.body, b"25");

        let http = DataTableResponse::Export(output).into_http().unwrap();
        assert_eq!(
            http.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"count.txt\""
        );
    }

    #[test]
    fn adapter_failure_yields_no_envelope() {
        struct Down;
        impl Adapter for Down {
            fn fetch(&self, _: &DataTableState, _: &ColumnSet) -> Result<RawResultSet> {
                Err(DataTableError::adapter("database is down"))
            }
        }
        let mut table = table();
        table.set_adapter(Down);
        table.handle_request(&GridRequest::post(ParameterBag::new())).unwrap();
        let err = table.get_response().unwrap_err();
        assert_eq!(err.to_string(), "adapter failure: database is down");
    }

    #[test]
    fn grid_request_from_http() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/users?_dt=dt")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(b"draw=2&order[0][column]=1".to_vec())
            .unwrap();
        let grid = GridRequest::from_http(&request).unwrap();
        assert_eq!(grid.query().get("_dt"), Some(&json!("dt")));
        assert_eq!(grid.body().get("draw"), Some(&json!("2")));

        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/users")
            .header(CONTENT_TYPE, "application/json")
            .body(br#"{"draw": 9}"#.to_vec())
            .unwrap();
        let grid = GridRequest::from_http(&request).unwrap();
        assert_eq!(grid.body().get("draw"), Some(&json!(9)));
    }
}
