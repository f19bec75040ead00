use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::QueryError;

/// Comparison between a note's timestamp and an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Relation {
    pub const ALL: [Relation; 6] = [
        Relation::Eq,
        Relation::Ne,
        Relation::Lt,
        Relation::Le,
        Relation::Gt,
        Relation::Ge,
    ];

    /// Token used for this relation in the dotted language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Eq => "eq",
            Relation::Ne => "ne",
            Relation::Lt => "lt",
            Relation::Le => "le",
            Relation::Gt => "gt",
            Relation::Ge => "ge",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Relation {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Relation::ALL
            .into_iter()
            .find(|rel| rel.as_str() == s)
            .ok_or_else(|| QueryError::InvalidRelation(s.to_string()))
    }
}

/// Kind of a note's workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateType {
    Done,
    Todo,
    None,
}

impl StateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateType::Done => "done",
            StateType::Todo => "todo",
            StateType::None => "none",
        }
    }
}

impl FromStr for StateType {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "done" => Ok(StateType::Done),
            "todo" => Ok(StateType::Todo),
            "none" => Ok(StateType::None),
            _ => Err(QueryError::InvalidStateType(s.to_string())),
        }
    }
}

/// Field a result list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Book,
    Scheduled,
    Deadline,
    Closed,
    Priority,
    State,
}

impl SortField {
    /// Short code emitted after `o.`.
    pub fn code(&self) -> &'static str {
        match self {
            SortField::Book => "b",
            SortField::Scheduled => "s",
            SortField::Deadline => "d",
            SortField::Closed => "c",
            SortField::Priority => "p",
            SortField::State => "state",
        }
    }

    /// Accepts the short code as well as the long field names.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "b" | "book" => Some(SortField::Book),
            "s" | "sched" | "scheduled" => Some(SortField::Scheduled),
            "d" | "deadline" => Some(SortField::Deadline),
            "c" | "closed" => Some(SortField::Closed),
            "p" | "pri" | "priority" => Some(SortField::Priority),
            "state" => Some(SortField::State),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relation_tokens_are_lowercase() {
        for rel in Relation::ALL {
            assert_eq!(rel.as_str(), rel.as_str().to_lowercase());
            assert_eq!(rel.as_str().parse::<Relation>().unwrap(), rel);
        }
    }

    #[test]
    fn test_unknown_relation() {
        let err = "gte".parse::<Relation>().unwrap_err();
        assert!(matches!(err, QueryError::InvalidRelation(s) if s == "gte"));
    }

    #[test]
    fn test_state_type_parse() {
        assert_eq!("todo".parse::<StateType>().unwrap(), StateType::Todo);
        let err = "DONE".parse::<StateType>().unwrap_err();
        assert!(matches!(err, QueryError::InvalidStateType(s) if s == "DONE"));
    }

    #[test]
    fn test_sort_field_long_names() {
        assert_eq!(SortField::from_code("book"), Some(SortField::Book));
        assert_eq!(SortField::from_code("sched"), Some(SortField::Scheduled));
        assert_eq!(SortField::from_code("x"), None);
    }
}
