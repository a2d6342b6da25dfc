//! Slices a normalized query into its clause bodies.
//!
//! Keyword positions are found with the word lexer, then the text between
//! consecutive clause keywords becomes that clause's body. A keyword only
//! opens a clause when it comes later in the canonical order
//! `SELECT, FROM, WHERE, ORDER BY, LIMIT` than the clause already open, so a
//! `from` inside a `WHERE` predicate, or a second `WHERE`, stays content.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::token::{LexItem, Lexer, Token};

/// The five clauses a KubeSQL query may carry, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Clause {
    /// `SELECT` projection list.
    Select,
    /// `FROM` resource.
    From,
    /// `WHERE` TSL filter.
    Where,
    /// `ORDER BY` sort list.
    OrderBy,
    /// `LIMIT` row bound.
    Limit,
}

impl Clause {
    /// All clauses in canonical order.
    pub const ALL: [Clause; 5] = [
        Clause::Select,
        Clause::From,
        Clause::Where,
        Clause::OrderBy,
        Clause::Limit,
    ];

    /// Keyword text as written in canonical queries.
    pub fn keyword(self) -> &'static str {
        match self {
            Clause::Select => "SELECT",
            Clause::From => "FROM",
            Clause::Where => "WHERE",
            Clause::OrderBy => "ORDER BY",
            Clause::Limit => "LIMIT",
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Clause bodies keyed by clause; absent clauses have no entry.
pub type Sections = BTreeMap<Clause, String>;

struct Boundary {
    clause: Clause,
    /// Offset of the first keyword byte.
    start: usize,
    /// Offset just past the keyword.
    body: usize,
}

/// Extract trimmed clause bodies from `query`.
///
/// Bodies keep the original case. A keyword followed directly by the next
/// clause keyword (or end of input) yields an empty body.
pub fn extract_clauses(query: &str) -> Sections {
    let items: Vec<LexItem> = Lexer::new(query).collect();
    let boundaries = find_boundaries(&items);

    let mut sections = Sections::new();
    let Some(first) = boundaries.first() else {
        debug!(query, "no clause keywords found");
        return sections;
    };

    let leading = query[..first.start].trim();
    if !leading.is_empty() {
        debug!(text = leading, "ignoring text before first clause");
    }

    for (i, b) in boundaries.iter().enumerate() {
        let end = boundaries.get(i + 1).map_or(query.len(), |next| next.start);
        let body = query[b.body..end].trim();
        debug!(clause = %b.clause, body, "extracted clause");
        sections.insert(b.clause, body.to_string());
    }
    sections
}

fn find_boundaries(items: &[LexItem]) -> Vec<Boundary> {
    let mut boundaries: Vec<Boundary> = Vec::new();
    let mut i = 0;

    while i < items.len() {
        let item = &items[i];
        let mut width = 1;
        let found = match item.kind {
            Token::Select if i == 0 => Some(Clause::Select),
            Token::From => Some(Clause::From),
            Token::Where => Some(Clause::Where),
            Token::Order if items.get(i + 1).is_some_and(|n| n.kind == Token::By) => {
                width = 2;
                Some(Clause::OrderBy)
            }
            Token::Limit => Some(Clause::Limit),
            _ => None,
        };

        if let Some(clause) = found {
            let opens = boundaries.last().map_or(true, |open| clause > open.clause);
            if opens {
                boundaries.push(Boundary {
                    clause,
                    start: item.span.start,
                    body: items[i + width - 1].span.end,
                });
                i += width;
                continue;
            }
        }
        i += 1;
    }
    boundaries
}
