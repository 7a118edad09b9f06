//! End-to-end request cycles through the API adapter.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value as Json};

use datatables::prelude::*;
use datatables::{BoxError, ChoiceFilter, DataTableState};

/// Records every query it receives and answers with fixed rows.
#[derive(Clone, Default)]
struct RecordingClient {
    queries: Arc<Mutex<Vec<Query>>>,
    rows: Vec<Json>,
    total: u64,
}

impl RecordingClient {
    fn with_rows(rows: Vec<Json>, total: u64) -> Self {
        Self {
            queries: Arc::default(),
            rows,
            total,
        }
    }

    fn last_query(&self) -> Query {
        self.queries.lock().unwrap().last().cloned().expect("no query recorded")
    }
}

impl ApiClient for RecordingClient {
    fn list(&self, query: &Query) -> Result<ApiResultSet, BoxError> {
        self.queries.lock().unwrap().push(query.clone());
        Ok(ApiResultSet::new(self.total, self.rows.clone()))
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn users_table(client: &RecordingClient) -> DataTable {
    init_tracing();
    let mut table = DataTable::default();
    table.set_name("users").unwrap();
    table
        .add("id", ColumnBuilder::number().global_searchable(false))
        .unwrap()
        .add("name", ColumnBuilder::text())
        .unwrap()
        .add("created", ColumnBuilder::datetime().field("created_at"))
        .unwrap()
        .add(
            "status",
            ColumnBuilder::text().filter(ChoiceFilter::new(["open", "closed"])),
        )
        .unwrap()
        .add("internal", ColumnBuilder::text().orderable(false).searchable(false))
        .unwrap();
    table
        .create_adapter::<ApiAdapter>(ApiAdapterOptions::new().client(client.clone()))
        .unwrap();
    table
}

fn post(table: &mut DataTable, body: Json) {
    let body = ParameterBag::from_json(body).unwrap();
    table.handle_request(&GridRequest::post(body)).unwrap();
}

fn envelope_json(table: &DataTable) -> Json {
    match table.get_response().unwrap() {
        DataTableResponse::Json(envelope) => serde_json::to_value(envelope).unwrap(),
        DataTableResponse::Export(_) => panic!("unexpected export"),
    }
}

#[test]
fn global_search_hits_only_globally_searchable_fields() {
    let client = RecordingClient::default();
    let mut table = users_table(&client);
    post(&mut table, json!({"draw": 1, "search": {"value": "foo"}}));
    table.get_response().unwrap();

    let query = client.last_query();
    assert_eq!(query.get_str("name"), Some("foo"));
    assert_eq!(query.get_str("created_at"), Some("foo"));
    assert_eq!(query.get("id"), None);
    assert_eq!(query.get("internal"), None);
}

#[test]
fn pagination_becomes_page_number() {
    let client = RecordingClient::default();
    let mut table = users_table(&client);
    post(&mut table, json!({"start": 20, "length": 10}));
    table.get_response().unwrap();

    let query = client.last_query();
    assert_eq!(query.items_per_page(), Some(10));
    assert_eq!(query.page(), Some(3));
}

#[test]
fn sort_uses_order_field() {
    let client = RecordingClient::default();
    let mut table = users_table(&client);
    post(&mut table, json!({"order": [[2, "desc"], [4, "asc"]]}));
    table.get_response().unwrap();

    let query = client.last_query();
    assert_eq!(query.get_str("order[created_at]"), Some("desc"));
    assert_eq!(query.get("order[internal]"), None);
}

#[test]
fn rejected_and_blank_terms_add_no_filter() {
    let client = RecordingClient::default();
    let mut table = users_table(&client);
    post(
        &mut table,
        json!({"columns": {"status": "pending", "name": "   ", "internal": "x"}}),
    );
    table.get_response().unwrap();
    let query = client.last_query();
    assert_eq!(query.get("status"), None);
    assert_eq!(query.get("name"), None);
    assert_eq!(query.get("internal"), None);
    assert_eq!(query.items_per_page(), Some(10));

    post(&mut table, json!({"columns": {"status": "open"}}));
    table.get_response().unwrap();
    assert_eq!(client.last_query().get_str("status"), Some("open"));
}

#[test]
fn envelope_echoes_draw_and_transforms_rows() {
    let client = RecordingClient::with_rows(
        vec![json!({"id": "7", "name": "<Ann>", "created_at": "2024-01-02 03:04:05", "status": "open", "internal": "x"})],
        41,
    );
    let mut table = users_table(&client);
    post(&mut table, json!({"draw": "12"}));

    let envelope = envelope_json(&table);
    assert_eq!(envelope["draw"], json!("12"));
    assert_eq!(envelope["recordsTotal"], json!(41));
    assert_eq!(envelope["recordsFiltered"], json!(41));
    assert_eq!(
        envelope["data"][0],
        json!({
            "id": 7,
            "name": "&lt;Ann&gt;",
            "created": "2024-01-02T03:04:05+00:00",
            "status": "open",
            "internal": "x",
        })
    );
    let keys: Vec<_> = envelope
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["draw", "recordsTotal", "recordsFiltered", "data"]);
}

#[test]
fn default_query_processors_run_before_request_filters() {
    let client = RecordingClient::default();
    let mut table = users_table(&client);
    table
        .create_adapter::<ApiAdapter>(
            ApiAdapterOptions::new()
                .client(client.clone())
                .query(|q: &mut Query| {
                    q.add_filter("tenant", "acme");
                }),
        )
        .unwrap();
    post(&mut table, json!({"search": {"value": "x"}}));
    table.get_response().unwrap();

    let query = client.last_query();
    let keys: Vec<_> = query.iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys[0], "tenant");
}

#[test]
fn initial_options_are_idempotent_and_reflect_state() {
    let client = RecordingClient::default();
    let mut table = users_table(&client);
    let first = table.get_initial_options().unwrap();
    assert_eq!(first, table.get_initial_options().unwrap());

    let query = ParameterBag::from_query_str("order[0][column]=1&order[0][dir]=desc&columns[3][search][value]=closed");
    table.handle_request(&GridRequest::get(query)).unwrap();
    let options = table.get_initial_options().unwrap();
    assert_eq!(options["order"], json!([[1, "desc"]]));
    assert_eq!(options["searchCols"][3], json!({"search": "closed"}));
    assert_eq!(table.filter_defaults().get("status").map(String::as_str), Some("closed"));
    assert!(!table.is_callback());
}

#[test]
fn settings_describe_the_table() {
    let client = RecordingClient::default();
    let table = users_table(&client);
    let settings = table.settings().unwrap();
    assert_eq!(settings["name"], json!("users"));
    assert_eq!(settings["htmlId"], json!("users"));
    assert_eq!(settings["filterHtmlId"], json!("users-filter"));
    assert_eq!(settings["method"], json!("POST"));
    assert_eq!(settings["state"], json!("query"));
    assert_eq!(settings["options"]["columns"][0]["data"], json!("id"));
}

#[test]
fn columns_from_json_options() {
    let mut table = DataTable::default();
    let options = json!({"field": "is_active", "trueValue": "Yes", "falseValue": "No"});
    table
        .add_from_options("active", "bool", options.as_object().unwrap())
        .unwrap();
    let bad = json!({"field": 3});
    let err = table
        .add_from_options("broken", "text", bad.as_object().unwrap())
        .unwrap_err();
    assert!(matches!(err, DataTableError::Configuration(_)));
    assert_eq!(table.columns().len(), 1);

    let column = table.get_column_by_name("active").unwrap();
    assert_eq!(column.transform(json!(1), &json!({})).unwrap(), json!("Yes"));
}

#[test]
fn shared_table_serves_concurrent_requests() {
    let client = RecordingClient::with_rows(vec![json!({"id": 1, "name": "a"})], 1);
    let template = users_table(&client);

    let handles: Vec<_> = (0..4)
        .map(|draw| {
            let mut table = template.clone();
            std::thread::spawn(move || {
                let body = ParameterBag::from_json(json!({"draw": draw})).unwrap();
                table.handle_request(&GridRequest::post(body)).unwrap();
                match table.get_response().unwrap() {
                    DataTableResponse::Json(envelope) => envelope.draw,
                    DataTableResponse::Export(_) => Json::Null,
                }
            })
        })
        .collect();

    let mut draws: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    draws.sort_by_key(|d| d.as_i64());
    assert_eq!(draws, vec![json!(0), json!(1), json!(2), json!(3)]);
    assert!(template.state().is_none());
}

#[test]
fn state_can_be_inspected_after_request() {
    let client = RecordingClient::default();
    let mut table = users_table(&client);
    post(&mut table, json!({"start": "5", "length": "0"}));
    let state: &DataTableState = table.state().unwrap();
    assert_eq!(state.start(), 5);
    assert_eq!(state.length(), -1);
    assert!(table.is_callback());
}
