//! Seeker - in-memory query engine for JSON rows.
//!
//! Seeker filters, orders and pages collections of rows. It backs the
//! in-memory array adapter of the `datatables` crate, but works on any slice
//! given an accessor function. It supports:
//!
//! - Scalar field types: strings, numbers, booleans
//! - Operators: equality, comparison, substring (with and without case), regex
//! - Clause groups: AND, OR, NOT with fixed combination semantics
//! - Multi-field ordering with ascending/descending
//! - Pagination with limit and offset, keeping total and matched counts
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use datatables_seeker::{Dir, Query};
//!
//! let rows = vec![
//!     json!({"name": "Ada", "team": {"name": "core"}}),
//!     json!({"name": "Grace", "team": {"name": "compilers"}}),
//!     json!({"name": "Linus", "team": {"name": "core"}}),
//! ];
//!
//! let page = Query::new()
//!     .and_eq("team.name", "core")
//!     .order_by("name", Dir::Desc)
//!     .page(&rows);
//!
//! assert_eq!(page.matched, 2);
//! assert_eq!(page.items[0]["name"], "Linus");
//! ```
//!
//! # Query Semantics
//!
//! ```text
//! match = (all AND clauses match)
//!       ∧ (at least one OR clause matches, OR no OR clauses exist)
//!       ∧ (every any-of group has a matching clause)
//!       ∧ (no NOT clause matches)
//! ```
//!
//! A grid's global search becomes its own any-of group (one clause per
//! searchable column) so it never mixes with caller OR filters. Per-column
//! searches land in the AND group.

mod clause;
mod error;
mod op;
mod ordering;
mod query;
mod value;

pub use clause::{Clause, ClauseValue};
pub use error::{Result, SeekerError};
pub use op::Op;
pub use ordering::{compare_by_orderings, compare_values, Dir, OrderBy};
pub use query::{Page, Query};
pub use value::{json_accessor, lookup, Number, Value};
