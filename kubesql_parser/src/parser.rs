//! Parser orchestration: normalize, extract clauses, parse each clause.

use thiserror::Error;
use tracing::debug;

use crate::ast::{Limit, Query};
use crate::clauses::{self, ClauseError};
use crate::extract::{extract_clauses, Clause};
use crate::util::normalize;

/// Query-level parsing error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The query has no `FROM` clause.
    #[error("FROM clause is mandatory")]
    MissingFrom,
    /// A clause body was malformed.
    #[error("error parsing {clause} clause: {cause}")]
    Clause {
        /// Clause that failed.
        clause: Clause,
        /// What was wrong inside it.
        cause: ClauseError,
    },
}

impl ParseError {
    fn in_clause(clause: Clause) -> impl FnOnce(ClauseError) -> ParseError {
        move |cause| ParseError::Clause { clause, cause }
    }
}

/// Parser for a single KubeSQL query string.
#[derive(Debug, Clone)]
pub struct Parser {
    query: String,
}

impl Parser {
    /// Create a parser over `query`; surrounding whitespace is dropped.
    pub fn new(query: &str) -> Self {
        Self {
            query: query.trim().to_string(),
        }
    }

    /// The trimmed query text this parser was built with.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Parse the query, stopping at the first malformed clause.
    pub fn parse(&self) -> Result<Query, ParseError> {
        let normalized = normalize(&self.query);
        let sections = extract_clauses(&normalized);
        debug!(query = %normalized, clauses = sections.len(), "parsing query");

        let mut query = Query {
            limit: Limit::Unlimited,
            ..Default::default()
        };

        if let Some(body) = sections.get(&Clause::Select) {
            query.select = clauses::parse_select(body);
        }

        let body = sections.get(&Clause::From).ok_or(ParseError::MissingFrom)?;
        query.from = clauses::parse_from(body).map_err(ParseError::in_clause(Clause::From))?;

        if let Some(body) = sections.get(&Clause::Where) {
            query.r#where = clauses::parse_where(body);
        }

        if let Some(body) = sections.get(&Clause::OrderBy) {
            query.order_by =
                clauses::parse_order_by(body).map_err(ParseError::in_clause(Clause::OrderBy))?;
        }

        if let Some(body) = sections.get(&Clause::Limit) {
            query.limit = clauses::parse_limit(body).map_err(ParseError::in_clause(Clause::Limit))?;
        }

        Ok(query)
    }
}

/// Parse a KubeSQL string into a [`Query`].
pub fn parse(sql: &str) -> Result<Query, ParseError> {
    Parser::new(sql).parse()
}

impl std::str::FromStr for Query {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
