use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::clauses::ClauseError;

/// Integer used on the wire for [`Limit::Unlimited`].
pub const UNLIMITED_SENTINEL: i64 = -1;

/// Raw TSL expression text.
///
/// KubeSQL does not interpret TSL; the wrapper marks text that must be handed
/// to a TSL evaluator rather than treated as validated SQL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TslQuery(pub String);

impl TslQuery {
    /// Borrow the raw expression text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the expression is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TslQuery {
    fn from(s: &str) -> Self {
        TslQuery(s.to_string())
    }
}

impl From<String> for TslQuery {
    fn from(s: String) -> Self {
        TslQuery(s)
    }
}

impl PartialEq<&str> for TslQuery {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for TslQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sort direction of an `ORDER BY` item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    /// Ascending, the default.
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    /// Descending.
    #[serde(rename = "DESC")]
    Desc,
}

impl SortDirection {
    /// Canonical upper-case keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ClauseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ASC") {
            Ok(SortDirection::Asc)
        } else if s.eq_ignore_ascii_case("DESC") {
            Ok(SortDirection::Desc)
        } else {
            Err(ClauseError::InvalidSortDirection(s.to_string()))
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row-count bound requested by `LIMIT`.
///
/// Serialized as a plain integer, [`UNLIMITED_SENTINEL`] standing for
/// [`Limit::Unlimited`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Limit {
    /// No `LIMIT` clause.
    #[default]
    Unlimited,
    /// At most this many results.
    Bounded(u64),
}

impl Limit {
    /// The bound, if any.
    pub fn get(self) -> Option<u64> {
        match self {
            Limit::Unlimited => None,
            Limit::Bounded(n) => Some(n),
        }
    }

    /// Whether no bound applies.
    pub fn is_unlimited(self) -> bool {
        matches!(self, Limit::Unlimited)
    }
}

impl Serialize for Limit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Limit::Unlimited => serializer.serialize_i64(UNLIMITED_SENTINEL),
            Limit::Bounded(n) => serializer.serialize_u64(*n),
        }
    }
}

impl<'de> Deserialize<'de> for Limit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        match raw {
            UNLIMITED_SENTINEL => Ok(Limit::Unlimited),
            n if n >= 0 => Ok(Limit::Bounded(n as u64)),
            n => Err(serde::de::Error::custom(format!(
                "LIMIT value must be non-negative: {n}"
            ))),
        }
    }
}

/// One projection item of the `SELECT` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SelectField {
    /// Field expression, e.g. `metadata.name` or `COUNT(*)`.
    pub field: TslQuery,
    /// Output alias; empty when none was given.
    pub alias: String,
}

impl fmt::Display for SelectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alias.is_empty() {
            write!(f, "{}", self.field)
        } else {
            write!(f, "{} AS {}", self.field, self.alias)
        }
    }
}

/// One sort key of the `ORDER BY` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OrderByField {
    /// Field expression to sort by.
    pub field: TslQuery,
    /// Sort direction.
    pub direction: SortDirection,
}

impl fmt::Display for OrderByField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.direction)
    }
}

/// A parsed KubeSQL query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Query {
    /// Projection; empty selects everything.
    pub select: Vec<SelectField>,
    /// Resource identifier, e.g. `pods` or `mynamespace/services`.
    pub from: String,
    /// TSL filter; empty means no filter.
    pub r#where: TslQuery,
    /// Sort keys in priority order.
    pub order_by: Vec<OrderByField>,
    /// Maximum number of results.
    pub limit: Limit,
}

/// Canonical KubeSQL text: present clauses in fixed order, space separated.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();

        if !self.select.is_empty() {
            parts.push(format!("SELECT {}", join(&self.select)));
        }
        if !self.from.is_empty() {
            parts.push(format!("FROM {}", self.from));
        }
        if !self.r#where.is_empty() {
            parts.push(format!("WHERE {}", self.r#where));
        }
        if !self.order_by.is_empty() {
            parts.push(format!("ORDER BY {}", join(&self.order_by)));
        }
        if let Some(n) = self.limit.get() {
            parts.push(format!("LIMIT {n}"));
        }

        f.write_str(&parts.join(" "))
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
