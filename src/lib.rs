//! # dotq — Dotted Search Queries
//!
//! Serializes a structured search query (a condition tree, sort orders and
//! display options) into the compact dotted query language, and parses it back.
//!
//! ## Quick Example
//!
//! ```rust
//! use dotq::prelude::*;
//!
//! let query = Query::new(
//!     Condition::and(vec![
//!         Condition::tag("work"),
//!         Condition::or(vec![Condition::tag("home"), Condition::tag("office")])?,
//!     ])?,
//! )
//! .order_by(SortOrder::desc(SortField::Book));
//!
//! assert_eq!(dotq::build(&query), "t.work (t.home or t.office) .o.b");
//! assert_eq!(dotq::parse("t.work (t.home or t.office) .o.b")?, query);
//! # Ok::<(), dotq::error::QueryError>(())
//! ```
//!
//! ## Prefixes
//!
//! | Token        | Meaning                        |
//! |--------------|--------------------------------|
//! | `b.`         | In book                        |
//! | `i.`         | Has state                      |
//! | `it.`        | Has state type (done/todo/none)|
//! | `p.` / `ps.` | Priority / explicitly set      |
//! | `t.` / `tn.` | Tag / own tag                  |
//! | `s.` `d.` `c.` | Scheduled, deadline, closed  |
//! | `o.`         | Sort order                     |
//! | `ad.`        | Agenda days                    |
//! | leading `.`  | Negation, or descending order  |

pub mod ast;
pub mod builder;
pub mod config;
pub mod error;
pub mod parser;
pub mod quote;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::builder::{DottedQueryBuilder, ToDotted};
    pub use crate::error::*;
    pub use crate::parser::parse;
}

/// Serialize a query to its dotted form.
///
/// # Example
///
/// ```
/// use dotq::prelude::*;
///
/// let query = Query::new(Condition::scheduled(Relation::Gt, "7d")).agenda_days(3);
/// assert_eq!(dotq::build(&query), "s.gt.7d ad.3");
/// ```
pub fn build(query: &ast::Query) -> String {
    builder::build(query)
}

/// Parse a dotted query string.
pub fn parse(input: &str) -> Result<ast::Query, error::QueryError> {
    parser::parse(input)
}
