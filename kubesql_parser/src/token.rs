use logos::Logos;

/// Position range of a token (byte offset).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
}

/// Word-level token kinds recognised by the KubeSQL clause lexer.
///
/// Only clause keywords are distinguished; everything else between two
/// whitespace runs is a [`Token::Word`]. Quoted spans are kept inside a
/// single word so that keywords inside string literals stay content.
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
#[logos(skip r"[ \t\n\r\f]+")]
pub enum Token {
    /// `SELECT` keyword.
    #[token("SELECT", ignore(ascii_case))]
    Select,
    /// `FROM` keyword.
    #[token("FROM", ignore(ascii_case))]
    From,
    /// `WHERE` keyword.
    #[token("WHERE", ignore(ascii_case))]
    Where,
    /// `ORDER` keyword (first half of `ORDER BY`).
    #[token("ORDER", ignore(ascii_case))]
    Order,
    /// `BY` keyword (second half of `ORDER BY`).
    #[token("BY", ignore(ascii_case))]
    By,
    /// `LIMIT` keyword.
    #[token("LIMIT", ignore(ascii_case))]
    Limit,
    /// Any other run of non-whitespace text, including quoted literals.
    #[regex(r#"([^ \t\n\r\f'"]|'[^']*'|"[^"]*")+"#)]
    Word,
}

/// Output of the lexer containing token and span.
#[derive(Debug, Clone, PartialEq)]
pub struct LexItem {
    /// Token kind.
    pub kind: Token,
    /// Text span.
    pub span: Span,
}

/// Lexer iterator over `LexItem`s.
///
/// A quote without a closing partner makes logos reject the rest of the
/// input. The rejected text up to the next whitespace becomes a plain word and
/// lexing restarts after it, so later keywords are still found.
pub struct Lexer<'input> {
    source: &'input str,
    /// Byte offset of `inner`'s input within `source`.
    offset: usize,
    inner: logos::Lexer<'input, Token>,
}

impl<'input> Lexer<'input> {
    /// Create new lexer from query text slice.
    pub fn new(source: &'input str) -> Self {
        Self {
            source,
            offset: 0,
            inner: Token::lexer(source),
        }
    }

    fn restart_at(&mut self, pos: usize) {
        self.offset = pos;
        self.inner = Token::lexer(&self.source[pos..]);
    }
}

impl<'input> Iterator for Lexer<'input> {
    type Item = LexItem;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let start = self.offset + self.inner.span().start;
        let (kind, end) = match result {
            Ok(kind) => (kind, self.offset + self.inner.span().end),
            Err(()) => {
                let rest = &self.source[start..];
                let first = rest.chars().next().map_or(0, char::len_utf8);
                let end = rest[first..]
                    .find(char::is_whitespace)
                    .map_or(self.source.len(), |i| start + first + i);
                self.restart_at(end);
                (Token::Word, end)
            }
        };
        Some(LexItem {
            kind,
            span: Span { start, end },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        Lexer::new(src).map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_ignore_case() {
        assert_eq!(
            kinds("select a From b wHeRe c order BY d limit 1"),
            vec![
                Token::Select,
                Token::Word,
                Token::From,
                Token::Word,
                Token::Where,
                Token::Word,
                Token::Order,
                Token::By,
                Token::Word,
                Token::Limit,
                Token::Word,
            ]
        );
    }

    #[test]
    fn keyword_prefix_is_a_word() {
        assert_eq!(kinds("fromage orderly bypass limits"), vec![Token::Word; 4]);
    }

    #[test]
    fn quoted_text_stays_in_one_word() {
        let src = "name='from x where' limit";
        let items: Vec<_> = Lexer::new(src).collect();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, Token::Word);
        assert_eq!(&src[items[0].span.start..items[0].span.end], "name='from x where'");
        assert_eq!(items[1].kind, Token::Limit);
    }

    fn words(src: &str) -> Vec<(Token, &str)> {
        Lexer::new(src)
            .map(|t| (t.kind, &src[t.span.start..t.span.end]))
            .collect()
    }

    #[test]
    fn unterminated_quote_is_text() {
        let items = words("it's");
        assert!(items.iter().all(|(kind, _)| *kind == Token::Word));
        let text: Vec<_> = items.iter().map(|(_, text)| *text).collect();
        assert_eq!(text.concat(), "it's");
    }

    #[test]
    fn keywords_after_unterminated_quote() {
        let items = words("note = it's ORDER BY a DESC LIMIT 5");
        let keywords: Vec<_> = items
            .iter()
            .filter(|(kind, _)| *kind != Token::Word)
            .map(|(kind, _)| *kind)
            .collect();
        assert_eq!(keywords, vec![Token::Order, Token::By, Token::Limit]);
        assert_eq!(items.last(), Some(&(Token::Word, "5")));
    }

    #[test]
    fn stray_quote_does_not_swallow_limit() {
        for src in ["name = 'O'Brien' LIMIT 5", "name = 'x\\'y' LIMIT 5", "a = \"b LIMIT 5"] {
            let items = words(src);
            let n = items.len();
            assert_eq!(items[n - 2], (Token::Limit, "LIMIT"), "input {src:?}");
            assert_eq!(items[n - 1], (Token::Word, "5"), "input {src:?}");
        }
    }
}
