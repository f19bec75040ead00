//! Dotted query serializer.
//!
//! Converts a [`Query`] into its single-line dotted form, the inverse of
//! [`crate::parser::parse`].

use crate::ast::*;
use crate::quote::{quote_always, quote_if_needed, BOOK_DELIMITERS};

/// Trait for converting query nodes to dotted-language text.
pub trait ToDotted {
    /// Convert this node to its dotted form.
    fn to_dotted(&self) -> String;
}

/// Serializer entry point.
#[derive(Debug, Default, Clone, Copy)]
pub struct DottedQueryBuilder;

impl DottedQueryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Condition, then one token per sort order, then changed options, space-joined.
    pub fn build(&self, query: &Query) -> String {
        let mut tokens: Vec<String> = Vec::with_capacity(query.sort_orders.len() + 2);

        if let Some(condition) = &query.condition {
            let token = condition_token(condition, true);
            if !token.is_empty() {
                tokens.push(token);
            }
        }

        tokens.extend(query.sort_orders.iter().map(SortOrder::to_dotted));
        tokens.extend(option_tokens(&query.options));

        let out = tokens.join(" ");
        tracing::trace!(query = %out, "built dotted query");
        out
    }
}

impl ToDotted for Query {
    fn to_dotted(&self) -> String {
        DottedQueryBuilder.build(self)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

impl ToDotted for Condition {
    /// Renders the condition as the top-level one.
    fn to_dotted(&self) -> String {
        condition_token(self, true)
    }
}

impl ToDotted for SortOrder {
    fn to_dotted(&self) -> String {
        format!("{}o.{}", dot(self.desc), self.field.code())
    }
}

impl ToDotted for Options {
    fn to_dotted(&self) -> String {
        option_tokens(self).join(" ")
    }
}

fn dot(flag: bool) -> &'static str {
    if flag { "." } else { "" }
}

/// `is_top_level` is true only for the root of the tree. Any `Or` below it is
/// parenthesized; `And` never parenthesizes its operands.
fn condition_token(cond: &Condition, is_top_level: bool) -> String {
    match cond {
        Condition::InBook { name, negate } => {
            format!("{}b.{}", dot(*negate), quote_if_needed(name, BOOK_DELIMITERS))
        }
        Condition::HasState { state, negate } => format!("{}i.{}", dot(*negate), state),
        Condition::HasStateType { state_type, negate } => {
            format!("{}it.{}", dot(*negate), state_type.as_str())
        }
        Condition::HasPriority { priority, negate } => format!("{}p.{}", dot(*negate), priority),
        Condition::HasSetPriority { priority, negate } => {
            format!("{}ps.{}", dot(*negate), priority)
        }
        Condition::HasTag { tag, negate } => format!("{}t.{}", dot(*negate), tag),
        Condition::HasOwnTag { tag } => format!("tn.{}", tag),
        Condition::Scheduled { relation, interval } => {
            date_token("s", *relation, Relation::Le, interval)
        }
        Condition::Deadline { relation, interval } => {
            date_token("d", *relation, Relation::Le, interval)
        }
        Condition::Closed { relation, interval } => {
            date_token("c", *relation, Relation::Eq, interval)
        }
        Condition::HasText { text, is_quoted } => {
            if *is_quoted {
                let mut buf = String::new();
                quote_always(&mut buf, text);
                buf
            } else {
                text.clone()
            }
        }
        Condition::Or { operands } => {
            let joined = operand_tokens(operands).join(" or ");
            if is_top_level || joined.is_empty() {
                joined
            } else {
                format!("({})", joined)
            }
        }
        Condition::And { operands } => operand_tokens(operands).join(" "),
    }
}

/// Child tokens of an `And`/`Or`. Empty ones (blank unquoted text) are dropped
/// so joined tokens stay one separator apart.
fn operand_tokens(operands: &Operands) -> Vec<String> {
    operands
        .iter()
        .map(|c| condition_token(c, false))
        .filter(|token| !token.is_empty())
        .collect()
}

/// The default relation is elided: `s.7d` rather than `s.le.7d`.
fn date_token(prefix: &str, relation: Relation, default: Relation, interval: &str) -> String {
    if relation == default {
        format!("{}.{}", prefix, interval)
    } else {
        format!("{}.{}.{}", prefix, relation.as_str(), interval)
    }
}

/// One token per field that differs from the default.
fn option_tokens(options: &Options) -> Vec<String> {
    let default = Options::default();
    let mut tokens = Vec::new();

    if options.agenda_days != default.agenda_days {
        tokens.push(format!("ad.{}", options.agenda_days));
    }

    tokens
}

/// Serialize `query` to a dotted query string.
pub fn build(query: &Query) -> String {
    DottedQueryBuilder.build(query)
}
