pub mod conditions;
pub mod operators;
pub mod query;

pub use self::conditions::{Condition, Operands};
pub use self::operators::{Relation, SortField, StateType};
pub use self::query::{Options, Query, SortOrder};
