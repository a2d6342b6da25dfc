//! Per-clause parsers. Each turns one extracted clause body into its typed
//! fragment of the [`Query`](crate::Query) and reports its own errors.

use thiserror::Error;

use crate::ast::{Limit, OrderByField, SelectField, SortDirection, TslQuery};
use crate::util::smart_split;

/// Error local to a single clause body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClauseError {
    /// `FROM` with nothing after it.
    #[error("FROM clause cannot be empty")]
    EmptyFrom,
    /// `ORDER BY` direction other than `ASC`/`DESC`.
    #[error("invalid sort direction '{0}': must be 'ASC' or 'DESC'")]
    InvalidSortDirection(String),
    /// `ORDER BY` item with more than two words.
    #[error("invalid ORDER BY field '{0}': expected 'field [ASC|DESC]' but found multiple directions")]
    InvalidOrderByField(String),
    /// `LIMIT` that is not an integer.
    #[error("invalid LIMIT value: {0}")]
    InvalidLimit(String),
    /// `LIMIT` below zero.
    #[error("LIMIT value must be non-negative: {0}")]
    NegativeLimit(i64),
}

/// Parse the `SELECT` list into fields with optional `AS` aliases.
///
/// Commas inside parentheses do not separate items, so `COUNT(a, b)` is one
/// field. A blank item between commas becomes an empty field; an empty body
/// selects everything.
pub fn parse_select(body: &str) -> Vec<SelectField> {
    smart_split(body, ',')
        .into_iter()
        .map(str::trim)
        .map(|item| match split_alias(item) {
            Some((field, alias)) => SelectField {
                field: field.into(),
                alias: alias.to_string(),
            },
            None => SelectField {
                field: item.into(),
                alias: String::new(),
            },
        })
        .collect()
}

/// Split `expr AS alias` where the alias is the final word.
fn split_alias(item: &str) -> Option<(&str, &str)> {
    let (head, alias) = item.rsplit_once(char::is_whitespace)?;
    let (field, keyword) = head.trim_end().rsplit_once(char::is_whitespace)?;
    let field = field.trim_end();
    if keyword.eq_ignore_ascii_case("AS") && !field.is_empty() {
        Some((field, alias))
    } else {
        None
    }
}

/// Parse the `FROM` body into a resource identifier.
pub fn parse_from(body: &str) -> Result<String, ClauseError> {
    match body.trim() {
        "" => Err(ClauseError::EmptyFrom),
        resource => Ok(resource.to_string()),
    }
}

/// Wrap the `WHERE` body as an uninterpreted TSL filter.
pub fn parse_where(body: &str) -> TslQuery {
    body.trim().into()
}

/// Parse the `ORDER BY` list into sort keys.
///
/// Each item is `field` or `field ASC|DESC`; the direction defaults to
/// ascending. Anything with three or more words is rejected outright.
pub fn parse_order_by(body: &str) -> Result<Vec<OrderByField>, ClauseError> {
    let mut fields = Vec::new();

    for part in smart_split(body, ',') {
        let part = part.trim();
        let tokens: Vec<&str> = part.split_whitespace().collect();
        let direction = match tokens.as_slice() {
            [] => continue,
            [_] => SortDirection::default(),
            [_, dir] => dir.parse()?,
            _ => return Err(ClauseError::InvalidOrderByField(part.to_string())),
        };
        fields.push(OrderByField {
            field: tokens[0].into(),
            direction,
        });
    }
    Ok(fields)
}

/// Parse the `LIMIT` body as a non-negative base-10 integer.
pub fn parse_limit(body: &str) -> Result<Limit, ClauseError> {
    let text = body.trim();
    let n: i64 = text
        .parse()
        .map_err(|_| ClauseError::InvalidLimit(text.to_string()))?;
    u64::try_from(n)
        .map(Limit::Bounded)
        .map_err(|_| ClauseError::NegativeLimit(n))
}
