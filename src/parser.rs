//! Dotted query parser.
//!
//! Turns a dotted query string back into a [`Query`].
//!
//! # Syntax Overview
//!
//! ```text
//! .b.work s.today (p.a or t.urgent) o.s .o.p ad.7
//! ───┬─── ───┬─── ────────┬──────── ───┬─── ──┬─
//!    │       │            │            │      └── Options (agenda days)
//!    │       │            │            └── Sort orders (leading dot = desc)
//!    │       │            └── Grouped alternation
//!    │       └── Date condition (default relation elided)
//!    └── Negated book condition
//! ```
//!
//! Whitespace-separated conditions are conjoined, `or` binds looser than
//! juxtaposition, and parentheses group. Sort and option tokens may appear
//! anywhere. Any token that is not recognized becomes free text.

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, one_of},
    combinator::{all_consuming, map, map_opt, map_res, opt, rest, value},
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::ast::*;
use crate::error::{QueryError, QueryResult};
use crate::quote::{tokenize, Token};

/// Parse a complete dotted query string.
pub fn parse(input: &str) -> QueryResult<Query> {
    let tokens = tokenize(input.trim())?;
    let mut parser = TokenParser {
        tokens: &tokens,
        pos: 0,
        query: Query::default(),
    };

    let condition = parser.parse_or()?;
    // parse_or only stops early at a closing paren
    if parser.peek().is_some() {
        return Err(QueryError::parse(parser.pos, "unbalanced ')'"));
    }

    parser.query.condition = condition;
    tracing::debug!(tokens = tokens.len(), "parsed dotted query");
    Ok(parser.query)
}

/// What a single word token stands for.
#[derive(Debug, Clone, PartialEq)]
enum Item {
    Condition(Condition),
    Order(SortOrder),
    AgendaDays(u32),
}

struct TokenParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    query: Query,
}

impl<'a> TokenParser<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// `or-expr ::= and-expr { "or" and-expr }`
    fn parse_or(&mut self) -> QueryResult<Option<Condition>> {
        let mut alternatives = Vec::new();

        loop {
            let operand = self.parse_and()?;
            let at_or = self.peek().is_some_and(|t| t.is_keyword("or"));

            match operand {
                Some(cond) => alternatives.push(cond),
                None if at_or => {
                    return Err(QueryError::parse(self.pos, "'or' without left operand"));
                }
                None if !alternatives.is_empty() => {
                    return Err(QueryError::parse(self.pos, "dangling 'or'"));
                }
                None => {}
            }

            if !at_or {
                break;
            }
            self.pos += 1;
        }

        collapse(alternatives, Condition::or)
    }

    /// `and-expr ::= primary { primary }`
    fn parse_and(&mut self) -> QueryResult<Option<Condition>> {
        let mut operands = Vec::new();

        while let Some(token) = self.peek() {
            match token {
                Token::Close => break,
                t if t.is_keyword("or") => break,
                Token::Open => {
                    let open_at = self.pos;
                    self.pos += 1;
                    let inner = self.parse_or()?;
                    if !matches!(self.peek(), Some(Token::Close)) {
                        return Err(QueryError::parse(open_at, "unbalanced '('"));
                    }
                    self.pos += 1;
                    match inner {
                        Some(cond) => operands.push(cond),
                        None => return Err(QueryError::parse(open_at, "empty group")),
                    }
                }
                Token::Word { text, quoted } => {
                    let item = classify(text, *quoted, self.pos)?;
                    self.pos += 1;
                    match item {
                        Item::Condition(cond) => operands.push(cond),
                        Item::Order(order) => self.query.sort_orders.push(order),
                        Item::AgendaDays(days) => self.query.options.agenda_days = days,
                    }
                }
            }
        }

        collapse(operands, Condition::and)
    }
}

/// Zero operands is no condition, one is the operand itself.
fn collapse(
    mut operands: Vec<Condition>,
    combine: fn(Vec<Condition>) -> QueryResult<Condition>,
) -> QueryResult<Option<Condition>> {
    match operands.len() {
        0 => Ok(None),
        1 => Ok(operands.pop()),
        _ => combine(operands).map(Some),
    }
}

fn classify(text: &str, quoted: bool, position: usize) -> QueryResult<Item> {
    if quoted {
        return Ok(Item::Condition(Condition::quoted_text(text)));
    }

    if let Some(days) = text.strip_prefix("ad.") {
        return days
            .parse()
            .map(Item::AgendaDays)
            .map_err(|_| QueryError::parse(position, format!("invalid agenda days: '{}'", days)));
    }

    match all_consuming(parse_item)(text) {
        Ok((_, item)) => Ok(item),
        Err(_) => Ok(Item::Condition(Condition::text(text))),
    }
}

fn parse_item(input: &str) -> IResult<&str, Item> {
    alt((
        map(parse_order, Item::Order),
        map(parse_date, Item::Condition),
        map(parse_own_tag, Item::Condition),
        map(parse_negatable, Item::Condition),
    ))(input)
}

/// `[.]o.<field>`
fn parse_order(input: &str) -> IResult<&str, SortOrder> {
    let (input, desc) = opt(char('.'))(input)?;
    let (input, field) = preceded(tag("o."), map_opt(rest, SortField::from_code))(input)?;
    Ok((
        input,
        SortOrder {
            field,
            desc: desc.is_some(),
        },
    ))
}

fn parse_relation(input: &str) -> IResult<&str, Relation> {
    map_res(
        alt((tag("eq"), tag("ne"), tag("lt"), tag("le"), tag("gt"), tag("ge"))),
        str::parse,
    )(input)
}

/// `s[.rel].<interval>`, `d[.rel].<interval>`, `c[.rel].<interval>`
fn parse_date(input: &str) -> IResult<&str, Condition> {
    let (input, (kind, _, relation, interval)) = tuple((
        one_of("sdc"),
        char('.'),
        opt(terminated(parse_relation, char('.'))),
        rest,
    ))(input)?;

    let cond = match kind {
        's' => Condition::scheduled(relation.unwrap_or(Relation::Le), interval),
        'd' => Condition::deadline(relation.unwrap_or(Relation::Le), interval),
        _ => Condition::closed(relation.unwrap_or(Relation::Eq), interval),
    };
    Ok((input, cond))
}

fn parse_own_tag(input: &str) -> IResult<&str, Condition> {
    map(preceded(tag("tn."), rest), Condition::own_tag)(input)
}

#[derive(Debug, Clone, Copy)]
enum Prefix {
    Book,
    StateType,
    State,
    SetPriority,
    Priority,
    Tag,
}

/// `[.]b.`, `[.]i.`, `[.]it.`, `[.]p.`, `[.]ps.`, `[.]t.`
fn parse_negatable(input: &str) -> IResult<&str, Condition> {
    let (input, (negate, prefix)) = pair(
        opt(char('.')),
        alt((
            value(Prefix::Book, tag("b.")),
            value(Prefix::StateType, tag("it.")),
            value(Prefix::State, tag("i.")),
            value(Prefix::SetPriority, tag("ps.")),
            value(Prefix::Priority, tag("p.")),
            value(Prefix::Tag, tag("t.")),
        )),
    )(input)?;

    let (input, cond) = match prefix {
        Prefix::StateType => map_opt(rest, |s: &str| {
            s.parse().ok().map(Condition::state_type)
        })(input)?,
        Prefix::Book => map(rest, Condition::in_book)(input)?,
        Prefix::State => map(rest, Condition::state)(input)?,
        Prefix::SetPriority => map(rest, Condition::set_priority)(input)?,
        Prefix::Priority => map(rest, Condition::priority)(input)?,
        Prefix::Tag => map(rest, Condition::tag)(input)?,
    };

    let cond = if negate.is_some() { cond.negated() } else { cond };
    Ok((input, cond))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cond(input: &str) -> Condition {
        parse(input).unwrap().condition.unwrap()
    }

    #[test]
    fn test_single_leaves() {
        assert_eq!(cond("b.work"), Condition::in_book("work"));
        assert_eq!(cond(".b.work"), Condition::in_book("work").negated());
        assert_eq!(cond("i.NEXT"), Condition::state("NEXT"));
        assert_eq!(cond("it.done"), Condition::state_type(StateType::Done));
        assert_eq!(cond(".it.none"), Condition::state_type(StateType::None).negated());
        assert_eq!(cond("p.a"), Condition::priority("a"));
        assert_eq!(cond("ps.b"), Condition::set_priority("b"));
        assert_eq!(cond("t.home"), Condition::tag("home"));
        assert_eq!(cond("tn.home"), Condition::own_tag("home"));
    }

    #[test]
    fn test_quoted_book() {
        assert_eq!(cond(r#"b."my book""#), Condition::in_book("my book"));
    }

    #[test]
    fn test_dates() {
        assert_eq!(cond("s.7d"), Condition::scheduled(Relation::Le, "7d"));
        assert_eq!(cond("s.gt.7d"), Condition::scheduled(Relation::Gt, "7d"));
        assert_eq!(cond("d.today"), Condition::deadline(Relation::Le, "today"));
        assert_eq!(cond("c.1d"), Condition::closed(Relation::Eq, "1d"));
        assert_eq!(cond("c.lt.1d"), Condition::closed(Relation::Lt, "1d"));
        // a relation name with nothing after it is the interval
        assert_eq!(cond("s.eq"), Condition::scheduled(Relation::Le, "eq"));
    }

    #[test]
    fn test_unrecognized_is_text() {
        assert_eq!(cond("milk"), Condition::text("milk"));
        assert_eq!(cond(".tn.x"), Condition::text(".tn.x"));
        assert_eq!(cond("it.maybe"), Condition::text("it.maybe"));
        assert_eq!(cond(".s.today"), Condition::text(".s.today"));
        assert_eq!(cond(r#""t.work""#), Condition::quoted_text("t.work"));
    }

    #[test]
    fn test_juxtaposition_is_and() {
        assert_eq!(
            cond("t.a t.b"),
            Condition::and(vec![Condition::tag("a"), Condition::tag("b")]).unwrap()
        );
    }

    #[test]
    fn test_or_binds_looser() {
        let expected = Condition::or(vec![
            Condition::tag("a"),
            Condition::and(vec![Condition::tag("b"), Condition::tag("c")]).unwrap(),
        ])
        .unwrap();
        assert_eq!(cond("t.a or t.b t.c"), expected);
    }

    #[test]
    fn test_group() {
        let expected = Condition::and(vec![
            Condition::tag("work"),
            Condition::or(vec![Condition::tag("home"), Condition::tag("office")]).unwrap(),
        ])
        .unwrap();
        assert_eq!(cond("t.work (t.home or t.office)"), expected);
    }

    #[test]
    fn test_orders_and_options() {
        let query = parse("t.a .o.b o.state o.sched ad.3").unwrap();
        assert_eq!(query.condition, Some(Condition::tag("a")));
        assert_eq!(
            query.sort_orders,
            vec![
                SortOrder::desc(SortField::Book),
                SortOrder::asc(SortField::State),
                SortOrder::asc(SortField::Scheduled),
            ]
        );
        assert_eq!(query.options.agenda_days, 3);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse("").unwrap(), Query::default());
        assert_eq!(parse("   ").unwrap(), Query::default());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse("(t.a"), Err(QueryError::Parse { position: 0, .. })));
        assert!(matches!(parse("t.a)"), Err(QueryError::Parse { position: 1, .. })));
        assert!(matches!(parse("or t.a"), Err(QueryError::Parse { position: 0, .. })));
        assert!(matches!(parse("t.a or"), Err(QueryError::Parse { position: 2, .. })));
        assert!(matches!(parse("t.a ()"), Err(QueryError::Parse { position: 1, .. })));
        assert!(matches!(parse("ad.x"), Err(QueryError::Parse { position: 0, .. })));
    }
}
