//! String helpers shared by the clause extractor and the list parsers.

/// Collapse every whitespace run into a single space and trim both ends.
pub fn normalize(query: &str) -> String {
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split `s` on `delimiter`, ignoring delimiters nested inside parentheses.
///
/// Segments are returned untrimmed. A trailing delimiter does not produce an
/// empty final segment and an empty input yields no segments. Parenthesis
/// balance is not checked: a stray `)` drives the depth negative and
/// delimiters are then ignored until the depth climbs back to zero.
pub fn smart_split(s: &str, delimiter: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth: i32 = 0;
    let mut start = 0;

    for (idx, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c == delimiter && depth == 0 => {
                parts.push(&s[start..idx]);
                start = idx + c.len_utf8();
            }
            _ => {}
        }
    }

    if start < s.len() {
        parts.push(&s[start..]);
    }
    parts
}
