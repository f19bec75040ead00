use serde::{Deserialize, Serialize};

use crate::ast::{Relation, StateType};
use crate::error::{QueryError, QueryResult};

/// One node of the filter expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    /// Note is in the named book (`b.`)
    InBook {
        name: String,
        #[serde(default)]
        negate: bool,
    },
    /// Note has this workflow state (`i.`)
    HasState {
        state: String,
        #[serde(default)]
        negate: bool,
    },
    /// Note's state is of this kind (`it.`)
    HasStateType {
        state_type: StateType,
        #[serde(default)]
        negate: bool,
    },
    /// Effective priority, defaults included (`p.`)
    HasPriority {
        priority: String,
        #[serde(default)]
        negate: bool,
    },
    /// Explicitly set priority (`ps.`)
    HasSetPriority {
        priority: String,
        #[serde(default)]
        negate: bool,
    },
    /// Tag on the note or inherited (`t.`)
    HasTag {
        tag: String,
        #[serde(default)]
        negate: bool,
    },
    /// Tag set on the note itself (`tn.`)
    HasOwnTag { tag: String },
    Scheduled { relation: Relation, interval: String },
    Deadline { relation: Relation, interval: String },
    Closed { relation: Relation, interval: String },
    /// Free-text search term
    HasText {
        text: String,
        #[serde(default)]
        is_quoted: bool,
    },
    Or { operands: Operands },
    And { operands: Operands },
}

impl Condition {
    pub fn in_book(name: impl Into<String>) -> Self {
        Condition::InBook {
            name: name.into(),
            negate: false,
        }
    }

    pub fn state(state: impl Into<String>) -> Self {
        Condition::HasState {
            state: state.into(),
            negate: false,
        }
    }

    pub fn state_type(state_type: StateType) -> Self {
        Condition::HasStateType {
            state_type,
            negate: false,
        }
    }

    pub fn priority(priority: impl Into<String>) -> Self {
        Condition::HasPriority {
            priority: priority.into(),
            negate: false,
        }
    }

    pub fn set_priority(priority: impl Into<String>) -> Self {
        Condition::HasSetPriority {
            priority: priority.into(),
            negate: false,
        }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Condition::HasTag {
            tag: tag.into(),
            negate: false,
        }
    }

    pub fn own_tag(tag: impl Into<String>) -> Self {
        Condition::HasOwnTag { tag: tag.into() }
    }

    pub fn scheduled(relation: Relation, interval: impl Into<String>) -> Self {
        Condition::Scheduled {
            relation,
            interval: interval.into(),
        }
    }

    pub fn deadline(relation: Relation, interval: impl Into<String>) -> Self {
        Condition::Deadline {
            relation,
            interval: interval.into(),
        }
    }

    pub fn closed(relation: Relation, interval: impl Into<String>) -> Self {
        Condition::Closed {
            relation,
            interval: interval.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Condition::HasText {
            text: text.into(),
            is_quoted: false,
        }
    }

    pub fn quoted_text(text: impl Into<String>) -> Self {
        Condition::HasText {
            text: text.into(),
            is_quoted: true,
        }
    }

    /// Alternation of `operands`. Fails on an empty list.
    pub fn or(operands: Vec<Condition>) -> QueryResult<Self> {
        Ok(Condition::Or {
            operands: Operands::new("or", operands)?,
        })
    }

    /// Conjunction of `operands`. Fails on an empty list.
    pub fn and(operands: Vec<Condition>) -> QueryResult<Self> {
        Ok(Condition::And {
            operands: Operands::new("and", operands)?,
        })
    }

    /// Flip the negation flag. Variants without one are returned as is.
    pub fn negated(mut self) -> Self {
        match &mut self {
            Condition::InBook { negate, .. }
            | Condition::HasState { negate, .. }
            | Condition::HasStateType { negate, .. }
            | Condition::HasPriority { negate, .. }
            | Condition::HasSetPriority { negate, .. }
            | Condition::HasTag { negate, .. } => *negate = !*negate,
            Condition::HasOwnTag { .. }
            | Condition::Scheduled { .. }
            | Condition::Deadline { .. }
            | Condition::Closed { .. }
            | Condition::HasText { .. }
            | Condition::Or { .. }
            | Condition::And { .. } => {}
        }
        self
    }
}

/// Operands of an `And`/`Or`. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Condition>", into = "Vec<Condition>")]
pub struct Operands(Vec<Condition>);

impl Operands {
    pub fn new(kind: &'static str, conditions: Vec<Condition>) -> QueryResult<Self> {
        if conditions.is_empty() {
            return Err(QueryError::EmptyOperands(kind));
        }
        Ok(Self(conditions))
    }

    pub fn as_slice(&self) -> &[Condition] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Condition> {
        self.0.iter()
    }
}

impl TryFrom<Vec<Condition>> for Operands {
    type Error = QueryError;

    fn try_from(conditions: Vec<Condition>) -> Result<Self, Self::Error> {
        Operands::new("operands", conditions)
    }
}

impl From<Operands> for Vec<Condition> {
    fn from(operands: Operands) -> Self {
        operands.0
    }
}

impl<'a> IntoIterator for &'a Operands {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_or_rejected() {
        let err = Condition::or(vec![]).unwrap_err();
        assert!(matches!(err, QueryError::EmptyOperands("or")));
    }

    #[test]
    fn test_empty_and_rejected_from_json() {
        let json = r#"{"type":"and","operands":[]}"#;
        assert!(serde_json::from_str::<Condition>(json).is_err());
    }

    #[test]
    fn test_negate_defaults_to_false() {
        let cond: Condition = serde_json::from_str(r#"{"type":"has_tag","tag":"work"}"#).unwrap();
        assert_eq!(cond, Condition::tag("work"));
    }

    #[test]
    fn test_negated_flips_flag() {
        assert_eq!(
            Condition::tag("x").negated(),
            Condition::HasTag {
                tag: "x".to_string(),
                negate: true
            }
        );
        assert_eq!(Condition::tag("x").negated().negated(), Condition::tag("x"));
        assert_eq!(Condition::own_tag("x").negated(), Condition::own_tag("x"));
    }
}
