use serde::{Deserialize, Serialize};

use crate::ast::{Condition, SortField};

/// One ordering key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: SortField,
    #[serde(default)]
    pub desc: bool,
}

impl SortOrder {
    pub fn asc(field: SortField) -> Self {
        Self { field, desc: false }
    }

    pub fn desc(field: SortField) -> Self {
        Self { field, desc: true }
    }
}

/// Display settings. Only fields differing from [`Options::default`] are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Number of days shown in agenda mode; 0 means agenda is off.
    pub agenda_days: u32,
}

/// A complete search query: filter tree, ordering, and options.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    pub condition: Option<Condition>,
    pub sort_orders: Vec<SortOrder>,
    pub options: Options,
}

impl Query {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition: Some(condition),
            ..Self::default()
        }
    }

    pub fn order_by(mut self, order: SortOrder) -> Self {
        self.sort_orders.push(order);
        self
    }

    pub fn agenda_days(mut self, days: u32) -> Self {
        self.options.agenda_days = days;
        self
    }
}
