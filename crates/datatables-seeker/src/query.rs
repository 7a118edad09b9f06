//! Query builder and executor.
//!
//! The [`Query`] struct provides a fluent builder API for constructing queries
//! and methods for executing them against collections of rows.

use regex::Regex;
use serde_json::Value as Json;

use crate::clause::{Clause, ClauseValue};
use crate::error::Result;
use crate::op::Op;
use crate::ordering::{compare_by_orderings, Dir, OrderBy};
use crate::value::{json_accessor, Value};

/// A query for filtering, ordering and paging collections.
///
/// Queries consist of three clause groups:
/// - **AND**: All clauses must match
/// - **OR**: At least one clause must match (or none if empty)
/// - **NOT**: No clause may match
///
/// Any number of extra any-of groups can be added with [`Query::and_any`];
/// each one must have at least one matching clause, independently of the
/// OR group.
///
/// ```text
/// match = (all AND clauses match)
///       ∧ (at least one OR clause matches, OR no OR clauses exist)
///       ∧ (every any-of group has a matching clause)
///       ∧ (no NOT clause matches)
/// ```
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use datatables_seeker::{Dir, Query};
///
/// let rows = vec![
///     json!({"name": "Write docs", "priority": 3}),
///     json!({"name": "Fix bug", "priority": 5}),
///     json!({"name": "Old task", "priority": 1}),
/// ];
///
/// let page = Query::new()
///     .and_gte("priority", 3i64)
///     .order_by("priority", Dir::Desc)
///     .limit(1)
///     .page(&rows);
///
/// assert_eq!(page.total, 3);
/// assert_eq!(page.matched, 2);
/// assert_eq!(page.items[0]["name"], "Fix bug");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    and_clauses: Vec<Clause>,
    or_clauses: Vec<Clause>,
    any_groups: Vec<Vec<Clause>>,
    not_clauses: Vec<Clause>,
    orderings: Vec<OrderBy>,
    limit: Option<usize>,
    offset: Option<usize>,
}

/// One page of query results together with the counts a grid needs.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    /// Number of items before any clause was applied.
    pub total: usize,
    /// Number of items matching the clauses, before offset and limit.
    pub matched: usize,
    /// The ordered, paged matching items.
    pub items: Vec<&'a T>,
}

impl Query {
    /// Creates a new empty query.
    ///
    /// An empty query matches all items.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Clause builders
    // ========================================================================

    /// Adds an AND clause.
    pub fn and(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.and_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds an OR clause.
    pub fn or(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.or_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds a NOT clause.
    pub fn not(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.not_clauses.push(Clause::new(field, op, value));
        self
    }

    /// Adds a group of which at least one clause must match. An empty group
    /// is ignored.
    pub fn and_any(mut self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        let group: Vec<Clause> = clauses.into_iter().collect();
        if !group.is_empty() {
            self.any_groups.push(group);
        }
        self
    }

    /// Adds an AND equality clause.
    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Eq, value)
    }

    /// Adds an AND greater-than-or-equal clause.
    pub fn and_gte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gte, value)
    }

    /// Adds an AND less-than-or-equal clause.
    pub fn and_lte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lte, value)
    }

    /// Adds an AND case-insensitive substring clause.
    pub fn and_icontains(self, field: &str, value: &str) -> Self {
        self.and(field, Op::IContains, value)
    }

    /// Adds an OR case-insensitive substring clause.
    pub fn or_icontains(self, field: &str, value: &str) -> Self {
        self.or(field, Op::IContains, value)
    }

    /// Adds an AND regex clause.
    ///
    /// Returns an error if the pattern is invalid.
    pub fn and_regex(self, field: &str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        Ok(self.and(field, Op::Regex, ClauseValue::Regex(regex)))
    }

    /// Adds a NOT equality clause.
    pub fn not_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Eq, value)
    }

    // ========================================================================
    // Ordering and limits
    // ========================================================================

    /// Adds an ordering clause.
    pub fn order_by(mut self, field: &str, dir: Dir) -> Self {
        self.orderings.push(OrderBy::new(field, dir));
        self
    }

    /// Sets the maximum number of results to return.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn offset(mut self, n: usize) -> Self {
        self.offset = Some(n);
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the AND clauses.
    pub fn and_clauses(&self) -> &[Clause] {
        &self.and_clauses
    }

    /// Returns the OR clauses.
    pub fn or_clauses(&self) -> &[Clause] {
        &self.or_clauses
    }

    /// Returns the any-of groups.
    pub fn any_groups(&self) -> &[Vec<Clause>] {
        &self.any_groups
    }

    /// Returns the NOT clauses.
    pub fn not_clauses(&self) -> &[Clause] {
        &self.not_clauses
    }

    /// Returns the ordering clauses.
    pub fn orderings(&self) -> &[OrderBy] {
        &self.orderings
    }

    /// Returns the limit, if set.
    pub fn get_limit(&self) -> Option<usize> {
        self.limit
    }

    /// Returns the offset, if set.
    pub fn get_offset(&self) -> Option<usize> {
        self.offset
    }

    /// Returns `true` if this query has no clauses (matches everything).
    pub fn is_empty(&self) -> bool {
        self.and_clauses.is_empty()
            && self.or_clauses.is_empty()
            && self.any_groups.is_empty()
            && self.not_clauses.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Tests if a single item matches this query.
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        let and_pass = self
            .and_clauses
            .iter()
            .all(|clause| clause.matches(&accessor(item, &clause.field)));
        if !and_pass {
            return false;
        }

        let or_pass = self.or_clauses.is_empty()
            || self
                .or_clauses
                .iter()
                .any(|clause| clause.matches(&accessor(item, &clause.field)));
        if !or_pass {
            return false;
        }

        let any_pass = self.any_groups.iter().all(|group| {
            group
                .iter()
                .any(|clause| clause.matches(&accessor(item, &clause.field)))
        });
        if !any_pass {
            return false;
        }

        self.not_clauses
            .iter()
            .all(|clause| !clause.matches(&accessor(item, &clause.field)))
    }

    /// Filters, orders and pages a slice, keeping the counts.
    pub fn execute<'a, T, F>(&self, items: &'a [T], accessor: F) -> Page<'a, T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let mut matching: Vec<&'a T> = items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .collect();
        let matched = matching.len();

        if !self.orderings.is_empty() {
            // Stable sort keeps source order among equal keys.
            matching.sort_by(|a, b| compare_by_orderings(*a, *b, &self.orderings, &accessor));
        }

        let offset = self.offset.unwrap_or(0);
        let items_page: Vec<&'a T> = matching
            .into_iter()
            .skip(offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .collect();

        Page {
            total: items.len(),
            matched,
            items: items_page,
        }
    }

    /// Filters a slice, returning references to matching items in order.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        self.execute(items, accessor).items
    }

    /// Counts the number of matching items, ignoring offset and limit.
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        items
            .iter()
            .filter(|item| self.matches(*item, &accessor))
            .count()
    }

    /// Executes against JSON rows using dotted field paths.
    pub fn page<'a>(&self, rows: &'a [Json]) -> Page<'a, Json> {
        self.execute(rows, json_accessor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_rows() -> Vec<Json> {
        vec![
            json!({"name": "Task A", "priority": 1, "archived": false}),
            json!({"name": "Task B", "priority": 2, "archived": false}),
            json!({"name": "Urgent Task", "priority": 5, "archived": false}),
            json!({"name": "Critical Task", "priority": 5, "archived": true}),
            json!({"name": "Done Task", "priority": 3, "archived": true}),
        ]
    }

    fn names(page: &Page<'_, Json>) -> Vec<String> {
        page.items
            .iter()
            .map(|row| row["name"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn empty_query_matches_all() {
        let rows = sample_rows();
        let page = Query::new().page(&rows);
        assert_eq!(page.total, 5);
        assert_eq!(page.matched, 5);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn and_clauses_all_apply() {
        let rows = sample_rows();
        let page = Query::new()
            .and_eq("priority", 5i64)
            .and_eq("archived", false)
            .page(&rows);
        assert_eq!(names(&page), vec!["Urgent Task"]);
    }

    #[test]
    fn or_clauses_any_applies() {
        let rows = sample_rows();
        let page = Query::new()
            .or_icontains("name", "urgent")
            .or_icontains("name", "CRITICAL")
            .page(&rows);
        assert_eq!(page.matched, 2);
    }

    #[test]
    fn or_on_numeric_field_uses_display_form() {
        let rows = sample_rows();
        let page = Query::new().or_icontains("priority", "5").page(&rows);
        assert_eq!(page.matched, 2);
    }

    #[test]
    fn any_groups_combine_with_or_clauses() {
        let rows = sample_rows();
        let query = Query::new()
            .or("priority", Op::Eq, 5i64)
            .or("priority", Op::Eq, 3i64)
            .and_any([
                Clause::new("name", Op::IContains, "critical"),
                Clause::new("name", Op::IContains, "done"),
                Clause::new("name", Op::IContains, "task a"),
            ]);
        let page = query.page(&rows);
        assert_eq!(names(&page), vec!["Critical Task", "Done Task"]);
        assert_eq!(query.any_groups().len(), 1);
    }

    #[test]
    fn every_any_group_must_match() {
        let rows = sample_rows();
        let page = Query::new()
            .and_any([Clause::new("name", Op::IContains, "task")])
            .and_any([
                Clause::new("priority", Op::Eq, 1i64),
                Clause::new("priority", Op::Eq, 2i64),
            ])
            .page(&rows);
        assert_eq!(names(&page), vec!["Task A", "Task B"]);
    }

    #[test]
    fn empty_any_group_is_ignored() {
        let query = Query::new().and_any(Vec::new());
        assert!(query.is_empty());
        assert_eq!(query.count(&sample_rows(), json_accessor), 5);
    }

    #[test]
    fn not_clauses_exclude() {
        let rows = sample_rows();
        let page = Query::new().not_eq("archived", true).page(&rows);
        assert_eq!(page.matched, 3);
    }

    #[test]
    fn ordering_is_stable_for_ties() {
        let rows = sample_rows();
        let page = Query::new().order_by("priority", Dir::Desc).page(&rows);
        assert_eq!(
            names(&page),
            vec!["Urgent Task", "Critical Task", "Done Task", "Task B", "Task A"]
        );
    }

    #[test]
    fn offset_and_limit_page_after_counting() {
        let rows = sample_rows();
        let page = Query::new()
            .not_eq("archived", true)
            .order_by("priority", Dir::Asc)
            .offset(1)
            .limit(1)
            .page(&rows);
        assert_eq!(page.total, 5);
        assert_eq!(page.matched, 3);
        assert_eq!(names(&page), vec!["Task B"]);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let rows = sample_rows();
        let page = Query::new().offset(10).page(&rows);
        assert!(page.items.is_empty());
        assert_eq!(page.matched, 5);
    }

    #[test]
    fn invalid_regex_is_an_error() {
        assert!(Query::new().and_regex("name", "(unclosed").is_err());
    }

    #[test]
    fn regex_clause_filters() {
        let rows = sample_rows();
        let query = Query::new().and_regex("name", "^Task [AB]$").unwrap();
        assert_eq!(query.count(&rows, json_accessor), 2);
    }
}
