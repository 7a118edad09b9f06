//! Property-based tests for request parsing and query building.

use proptest::prelude::*;
use serde_json::{json, Value as Json};

use datatables::prelude::*;
use datatables::{ColumnSet, DataTableState};

fn columns() -> ColumnSet {
    let mut table = DataTable::default();
    table
        .add("id", ColumnBuilder::number().field("id").orderable(false))
        .unwrap()
        .add("name", ColumnBuilder::text().field("name"))
        .unwrap()
        .add("code", ColumnBuilder::text().field("code").filter(|v: &str| v.len() == 3))
        .unwrap();
    table.columns().clone()
}

fn adapter() -> ApiAdapter {
    ApiAdapter::configure(ApiAdapterOptions::new().client(
        |_: &Query| -> Result<ApiResultSet, datatables::BoxError> { Ok(ApiResultSet::default()) },
    ))
    .unwrap()
}

fn state_for(params: Json) -> DataTableState {
    let mut state = DataTableState::default();
    state.apply_parameters(&ParameterBag::from_json(params).unwrap(), &columns(), false);
    state
}

fn draw_strategy() -> impl Strategy<Value = Json> {
    prop_oneof![
        any::<i64>().prop_map(Json::from),
        "[a-zA-Z0-9]{0,12}".prop_map(Json::from),
    ]
}

proptest! {
    /// page = start / length + 1 when start > 0, unset when start == 0.
    #[test]
    fn page_math(start in 0i64..10_000, length in 1i64..500) {
        let query = adapter().build_query(&state_for(json!({"start": start, "length": length})), &columns());
        prop_assert_eq!(query.items_per_page(), Some(length));
        if start > 0 {
            prop_assert_eq!(query.page(), Some(start / length + 1));
        } else {
            prop_assert_eq!(query.page(), None);
        }
    }

    /// Non-positive lengths disable paging entirely.
    #[test]
    fn unbounded_length_sets_no_paging(start in 0i64..10_000, length in -100i64..=0) {
        let query = adapter().build_query(&state_for(json!({"start": start, "length": length})), &columns());
        prop_assert_eq!(query.items_per_page(), None);
        prop_assert_eq!(query.page(), None);
    }

    /// Order entries on the non-orderable column never reach the query.
    #[test]
    fn non_orderable_columns_are_never_ordered(
        entries in prop::collection::vec((0usize..3, prop::bool::ANY), 0..6),
    ) {
        let order: Vec<Json> = entries
            .iter()
            .map(|(column, desc)| json!([column, if *desc { "desc" } else { "asc" }]))
            .collect();
        let state = state_for(json!({"order": order}));
        prop_assert!(state.order_by().iter().all(|(index, _)| *index != 0));
        let query = adapter().build_query(&state, &columns());
        prop_assert!(query.get("order[id]").is_none());
    }

    /// Whitespace-only terms add no filter.
    #[test]
    fn blank_terms_add_no_filter(term in "[ \t]{0,8}") {
        let state = state_for(json!({"columns": {"name": term.clone(), "code": term}}));
        prop_assert!(state.search_columns().is_empty());
        let query = adapter().build_query(&state, &columns());
        prop_assert!(query.get("name").is_none());
        prop_assert!(query.get("code").is_none());
    }

    /// Filter-rejected terms add no filter and raise no error.
    #[test]
    fn rejected_terms_add_no_filter(term in "[a-z]{4,10}") {
        let state = state_for(json!({"columns": {"code": term}}));
        let query = adapter().build_query(&state, &columns());
        prop_assert!(query.get("code").is_none());
    }

    /// Accepted terms reach the query verbatim.
    #[test]
    fn accepted_terms_are_kept(term in "[a-z]{3}") {
        let state = state_for(json!({"columns": {"code": term.clone()}}));
        let query = adapter().build_query(&state, &columns());
        prop_assert_eq!(query.get_str("code"), Some(term.as_str()));
    }

    /// The draw value comes back unchanged, whatever its type.
    #[test]
    fn draw_round_trips(draw in draw_strategy()) {
        let mut table = DataTable::default();
        table.add("name", ColumnBuilder::text()).unwrap();
        table
            .create_adapter::<ArrayAdapter>(ArrayAdapterOptions::new(vec![json!({"name": "x"})]))
            .unwrap();
        let body = ParameterBag::from_json(json!({"draw": draw.clone()})).unwrap();
        table.handle_request(&GridRequest::post(body)).unwrap();
        match table.get_response().unwrap() {
            DataTableResponse::Json(envelope) => prop_assert_eq!(envelope.draw, draw),
            DataTableResponse::Export(_) => prop_assert!(false, "unexpected export"),
        }
    }

    /// Initial options do not change between calls.
    #[test]
    fn initial_options_idempotent(page_length in -5i64..100, search in "[a-z]{0,5}") {
        let options = TableOptions {
            page_length,
            search: Some(search),
            ..TableOptions::default()
        };
        let mut table = DataTable::new(options);
        table.add("name", ColumnBuilder::text().field("name")).unwrap();
        let first = table.get_initial_options().unwrap();
        prop_assert_eq!(first, table.get_initial_options().unwrap());
    }
}
