//! Clause segmentation for sentiment-variation analysis.
//!
//! Separators (all removed from the output):
//!   - `.`, `?` or `!` followed by whitespace
//!   - `;`, `:` or a dash followed by whitespace
//!   - `,` plus whitespace when a coordinating conjunction comes next
//!   - any whole word from [`CONJUNCTIONS`], case-insensitive
//!   - runs of line breaks
//!
//! Fragments are trimmed and empty ones dropped.

/// Words that always end a clause. They are consumed, never returned.
pub const CONJUNCTIONS: &[&str] = &[
    "and", "but", "or", "so", "for", "nor", "yet", "if", "when", "while", "because", "although",
    "though", "unless", "since",
];

/// Conjunctions that make a preceding comma a separator.
const COORDINATING: &[&str] = &["and", "but", "or", "so", "because"];

/// Split `text` into clauses, lazily and in order.
pub fn split(text: &str) -> Clauses<'_> {
    Clauses {
        text,
        pos: 0,
        start: 0,
        finished: false,
    }
}

/// Iterator over the clauses of a text. See [`split`].
#[derive(Debug, Clone)]
pub struct Clauses<'a> {
    text: &'a str,
    /// Scan position (byte offset)
    pos: usize,
    /// Start of the fragment being accumulated
    start: usize,
    finished: bool,
}

impl<'a> Iterator for Clauses<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while !self.finished {
            if self.pos >= self.text.len() {
                self.finished = true;
                let tail = self.text[self.start..].trim();
                return (!tail.is_empty()).then_some(tail);
            }

            if let Some(end) = separator_at(self.text, self.pos) {
                let fragment = self.text[self.start..self.pos].trim();
                self.start = end;
                self.pos = end;
                if !fragment.is_empty() {
                    return Some(fragment);
                }
            } else {
                self.pos += char_len_at(self.text, self.pos);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Clauses<'_> {}

fn char_len_at(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(1, char::len_utf8)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte offset just past the whitespace run starting at `pos`, if non-empty.
fn whitespace_run(text: &str, pos: usize) -> Option<usize> {
    let rest = &text[pos..];
    let trimmed = rest.trim_start();
    (trimmed.len() < rest.len()).then(|| pos + rest.len() - trimmed.len())
}

/// The whole word starting at `pos`, if `pos` sits on a word boundary.
fn word_at(text: &str, pos: usize) -> Option<&str> {
    let before_is_word = text[..pos].chars().next_back().is_some_and(is_word_char);
    if before_is_word {
        return None;
    }
    let rest = &text[pos..];
    let len = rest
        .char_indices()
        .find(|&(_, c)| !is_word_char(c))
        .map_or(rest.len(), |(i, _)| i);
    (len > 0).then(|| &rest[..len])
}

fn is_one_of(word: &str, set: &[&str]) -> bool {
    set.iter().any(|w| w.eq_ignore_ascii_case(word))
}

/// If a separator starts at `pos`, return the byte offset where it ends.
fn separator_at(text: &str, pos: usize) -> Option<usize> {
    let c = text[pos..].chars().next()?;
    let after = pos + c.len_utf8();

    match c {
        '.' | '?' | '!' | ';' | ':' | '-' | '\u{2013}' | '\u{2014}' => whitespace_run(text, after),
        ',' => {
            let end = whitespace_run(text, after)?;
            let next = word_at(text, end)?;
            is_one_of(next, COORDINATING).then_some(end)
        }
        '\n' | '\r' => {
            let rest = &text[pos..];
            let len = rest
                .find(|ch: char| ch != '\n' && ch != '\r')
                .unwrap_or(rest.len());
            Some(pos + len)
        }
        _ => {
            let word = word_at(text, pos)?;
            is_one_of(word, CONJUNCTIONS).then_some(pos + word.len())
        }
    }
}
