//! Textual predicate queries.
//!
//! A query is a single predicate call. Class names are identifiers or double-quoted strings,
//! dates use the `YYYY-MM-DD` or `YYYY/MM/DD` formats, and an interval is either a single date or
//! a `[start, end]` pair:
//!
//! ```text
//! holds(Forest, [2001-09-01, 2003-09-01], contains)
//! holds_any([Forest, Pasture], 2001-09-01)
//! recur(Forest, 2001-09-01, [2002-09-01, 2003-09-01])
//! evolve(holds(Forest, 2001-09-01), holds(Deforestation, [2002-09-01, 2003-09-01], contains))
//! convert(holds(Forest, 2001-09-01), holds(Pasture, 2002-09-01), keep_columns)
//! sweep(Forest, Pasture)
//! ```
//!
//! The relation of `holds` and `holds_any` defaults to `equals`. The predicates over two
//! intervals accept a trailing `keep_columns` flag.

use std::fmt::{Debug, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use nom::branch::alt;
use nom::bytes::complete::{is_not, tag};
use nom::character::complete::{alpha1, alphanumeric1, char, digit1, one_of, space0};
use nom::combinator::{map, map_res, opt, recognize};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, pair, preceded, separated_pair, tuple};
use nom::{IResult, Parser};
use thiserror::Error;

use crate::dataset::Dataset;
use crate::interval::{parse_date, Interval};
use crate::predicates::{Convert, ConvertSweep, Evolve, Holds, HoldsAny, PredicateError, Recur, Relation};
use crate::table::ResultTable;
use crate::Predicate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseQueryError {
    #[error("Invalid query: {0}")]
    Syntax(String),

    #[error("Could not parse remaining input \"{0}\"")]
    Incomplete(String),
}

/// Predicate produced by [`parse_query`].
pub struct ParsedQuery {
    inner: Box<dyn Predicate>,
}

impl ParsedQuery {
    fn new<P>(predicate: P) -> Self
    where
        P: Predicate + 'static,
    {
        Self {
            inner: Box::new(predicate),
        }
    }
}

impl Debug for ParsedQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedQuery").finish_non_exhaustive()
    }
}

impl Predicate for ParsedQuery {
    #[inline]
    fn evaluate(&self, data: &Dataset<'_>) -> Result<ResultTable, PredicateError> {
        self.inner.evaluate(data)
    }
}

fn op0<'a>(value: &'a str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| -> IResult<&'a str, &'a str> {
        let mut parser = delimited(space0, tag(value), space0);
        parser(input)
    }
}

fn call<'a, P, T>(name: &'a str, mut args: P) -> impl FnMut(&'a str) -> IResult<&'a str, T>
where
    P: Parser<&'a str, T, nom::error::Error<&'a str>>,
{
    move |input: &'a str| {
        let (next, _) = pair(op0(name), op0("("))(input)?;
        let (next, value) = args.parse(next)?;
        let (rest, _) = op0(")")(next)?;

        Ok((rest, value))
    }
}

fn class_name(input: &str) -> IResult<&str, String> {
    let bare = recognize(pair(alpha1, many0(alt((alphanumeric1, tag("_"))))));
    let quoted = delimited(char('"'), is_not("\""), char('"'));
    let mut parser = map(alt((quoted, bare)), |name: &str| name.to_string());

    parser(input)
}

fn date(input: &str) -> IResult<&str, NaiveDate> {
    let text = recognize(tuple((digit1, one_of("-/"), digit1, one_of("-/"), digit1)));
    let mut parser = map_res(text, parse_date);

    parser(input)
}

fn interval(input: &str) -> IResult<&str, Interval> {
    let bounds = delimited(op0("["), separated_pair(date, op0(","), date), op0("]"));
    let range = map_res(bounds, |(start, end): (NaiveDate, NaiveDate)| Interval::new(start, end));
    let instant = map(date, Interval::instant);
    let mut parser = alt((range, instant));

    parser(input)
}

fn relation(input: &str) -> IResult<&str, Relation> {
    let mut parser = opt(preceded(op0(","), map_res(alpha1, Relation::from_str)));
    let (rest, relation) = parser(input)?;

    Ok((rest, relation.unwrap_or_default()))
}

/// Parses the optional `keep_columns` flag into the value of `remove_columns`.
fn remove_columns(input: &str) -> IResult<&str, bool> {
    let mut parser = opt(preceded(op0(","), tag("keep_columns")));
    let (rest, flag) = parser(input)?;

    Ok((rest, flag.is_none()))
}

fn holds(input: &str) -> IResult<&str, Holds> {
    let mut parser = call("holds", tuple((class_name, op0(","), interval, relation)));
    let (rest, (class, _, interval, relation)) = parser(input)?;

    Ok((rest, Holds::new(class, interval, relation)))
}

fn holds_any(input: &str) -> IResult<&str, HoldsAny> {
    let classes = delimited(op0("["), separated_list1(op0(","), class_name), op0("]"));
    let mut parser = call("holds_any", tuple((classes, op0(","), interval, relation)));
    let (rest, (classes, _, interval, relation)) = parser(input)?;

    Ok((rest, HoldsAny::new(classes, interval, relation)))
}

fn recur(input: &str) -> IResult<&str, Recur> {
    let args = tuple((class_name, op0(","), interval, op0(","), interval, remove_columns));
    let mut parser = call("recur", args);
    let (rest, (class, _, first, _, second, remove)) = parser(input)?;

    Ok((rest, Recur::new(class, first, second).remove_columns(remove)))
}

fn operands(input: &str) -> IResult<&str, (Holds, Holds, bool)> {
    let mut parser = tuple((holds, op0(","), holds, remove_columns));
    let (rest, (first, _, second, remove)) = parser(input)?;

    Ok((rest, (first, second, remove)))
}

fn evolve(input: &str) -> IResult<&str, Evolve> {
    let (rest, (first, second, remove)) = call("evolve", operands)(input)?;

    Ok((rest, Evolve::new(first, second).remove_columns(remove)))
}

fn convert(input: &str) -> IResult<&str, Convert> {
    let (rest, (first, second, remove)) = call("convert", operands)(input)?;

    Ok((rest, Convert::new(first, second).remove_columns(remove)))
}

fn sweep(input: &str) -> IResult<&str, ConvertSweep> {
    let args = tuple((class_name, op0(","), class_name, remove_columns));
    let mut parser = call("sweep", args);
    let (rest, (from, _, to, remove)) = parser(input)?;

    Ok((rest, ConvertSweep::new(from, to).remove_columns(remove)))
}

fn query(input: &str) -> IResult<&str, ParsedQuery> {
    let mut parser = alt((
        map(holds_any, ParsedQuery::new),
        map(holds, ParsedQuery::new),
        map(recur, ParsedQuery::new),
        map(evolve, ParsedQuery::new),
        map(convert, ParsedQuery::new),
        map(sweep, ParsedQuery::new),
    ));

    parser(input)
}

/// Parse a query into a predicate that can be evaluated over any [`Dataset`].
///
/// ```rust
/// use lucc::parser::parse_query;
///
/// let query = parse_query("convert(holds(Forest, 2001-09-01), holds(Pasture, 2002-09-01))");
/// assert!(query.is_ok());
///
/// let query = parse_query("holds(Forest, [2003-09-01, 2001-09-01])");
/// assert!(query.is_err());
/// ```
pub fn parse_query(input: &str) -> Result<ParsedQuery, ParseQueryError> {
    let (rest, parsed) = query(input).map_err(|err| ParseQueryError::Syntax(err.to_string()))?;
    let rest = rest.trim();

    if !rest.is_empty() {
        Err(ParseQueryError::Incomplete(rest.to_string()))
    } else {
        Ok(parsed)
    }
}
