//! Valence/arousal/dominance lexicon.
//!
//! A lexicon is a delimited text table with a header row. Columns are found
//! by name, so extra columns and any column order are fine:
//!
//! ```text
//! term,valence,arousal,dominance
//! ecstatic,0.9,0.8,0.4
//! sad,-0.9,-0.3,-0.5
//! ```
//!
//! The header decides the delimiter: a comma anywhere in it means CSV,
//! otherwise fields are split on tabs/whitespace (the NRC `.txt` layout).

use std::{collections::HashMap, fs, path::Path};

use crate::error::LexiconLoadError;

/// One lexicon entry's affective coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vad {
    pub valence: f64,
    pub arousal: f64,
    pub dominance: f64,
}

impl Vad {
    pub const fn new(valence: f64, arousal: f64, dominance: f64) -> Self {
        Self {
            valence,
            arousal,
            dominance,
        }
    }
}

/// Read-only term → [`Vad`] lookup table.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: HashMap<String, Vad>,
}

impl Lexicon {
    /// Load a lexicon file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconLoadError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| LexiconLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lexicon = Self::parse(&source)?;
        tracing::info!(path = %path.display(), entries = lexicon.len(), "loaded VAD lexicon");
        Ok(lexicon)
    }

    /// Parse lexicon text. Terms are lowercased; a repeated term replaces the
    /// earlier entry (last write wins).
    pub fn parse(source: &str) -> Result<Self, LexiconLoadError> {
        let table = Table::parse(source)?;
        let term = table.column(&["term", "word"], "term")?;
        let valence = table.column(&["valence"], "valence")?;
        let arousal = table.column(&["arousal"], "arousal")?;
        let dominance = table.column(&["dominance"], "dominance")?;

        let mut entries = HashMap::new();
        let mut duplicates = 0usize;
        for row in table.rows() {
            let row = row?;
            let vad = Vad {
                valence: row.number(valence)?,
                arousal: row.number(arousal)?,
                dominance: row.number(dominance)?,
            };
            if entries.insert(row.text(term).to_lowercase(), vad).is_some() {
                duplicates += 1;
            }
        }

        if duplicates > 0 {
            tracing::debug!(duplicates, "lexicon terms overwritten by later rows");
        }
        Ok(Self { entries })
    }

    /// Build a lexicon from in-memory pairs, with the same lowercasing and
    /// last-write-wins rule as [`Lexicon::parse`].
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vad)>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(term, vad)| (term.as_ref().to_lowercase(), vad))
                .collect(),
        }
    }

    /// Look up an already-normalised (lowercase) term.
    pub fn get(&self, term: &str) -> Option<Vad> {
        self.entries.get(term).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Header-driven delimited table shared by the lexicon loaders.
pub(crate) struct Table<'a> {
    header: Vec<String>,
    delimiter: Delimiter,
    body: std::iter::Enumerate<std::str::Lines<'a>>,
}

#[derive(Clone, Copy)]
enum Delimiter {
    Comma,
    /// Terms may contain spaces (`a lot`), so only tabs separate fields
    Tab,
    Whitespace,
}

impl Delimiter {
    fn split(self, line: &str) -> Vec<&str> {
        match self {
            Delimiter::Comma => line.split(',').map(str::trim).collect(),
            Delimiter::Tab => line.split('\t').map(str::trim).collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        }
    }
}

impl<'a> Table<'a> {
    pub(crate) fn parse(source: &'a str) -> Result<Self, LexiconLoadError> {
        let mut body = source.lines().enumerate();
        let header_line = body
            .by_ref()
            .map(|(_, line)| line.trim_start_matches('\u{feff}'))
            .find(|line| !line.trim().is_empty())
            .ok_or(LexiconLoadError::Empty)?;

        let delimiter = if header_line.contains(',') {
            Delimiter::Comma
        } else if header_line.contains('\t') {
            Delimiter::Tab
        } else {
            Delimiter::Whitespace
        };
        let header = delimiter
            .split(header_line)
            .into_iter()
            .map(str::to_lowercase)
            .collect();

        Ok(Self {
            header,
            delimiter,
            body,
        })
    }

    /// Index of the first header matching any of `names`.
    pub(crate) fn column(
        &self,
        names: &[&str],
        column: &'static str,
    ) -> Result<Column, LexiconLoadError> {
        self.header
            .iter()
            .position(|h| names.contains(&h.as_str()))
            .map(|index| Column {
                index,
                name: column,
            })
            .ok_or(LexiconLoadError::MissingColumn { column })
    }

    /// Non-blank data rows. Every row must reach the header's width.
    pub(crate) fn rows(self) -> impl Iterator<Item = Result<Row<'a>, LexiconLoadError>> {
        let width = self.header.len();
        let delimiter = self.delimiter;
        self.body
            .filter(|(_, line)| !line.trim().is_empty())
            .map(move |(index, line)| {
                let fields = delimiter.split(line);
                if fields.len() < width {
                    return Err(LexiconLoadError::ShortRow {
                        line: index + 1,
                        expected: width,
                        found: fields.len(),
                    });
                }
                Ok(Row {
                    line: index + 1,
                    fields,
                })
            })
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Column {
    index: usize,
    name: &'static str,
}

pub(crate) struct Row<'a> {
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    pub(crate) fn text(&self, column: Column) -> &'a str {
        self.fields[column.index]
    }

    pub(crate) fn number(&self, column: Column) -> Result<f64, LexiconLoadError> {
        let raw = self.text(column);
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| LexiconLoadError::InvalidNumber {
                line: self.line,
                column: column.name.to_string(),
                value: raw.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_csv_and_lowercases_terms() {
        let lex = Lexicon::parse("term,valence,arousal,dominance\nHappy,0.9,0.5,0.4\n").unwrap();
        assert_eq!(lex.get("happy"), Some(Vad::new(0.9, 0.5, 0.4)));
        assert_eq!(lex.get("Happy"), None);
    }

    #[test]
    fn columns_found_by_name_in_any_order() {
        let src = "dominance,term,extra,arousal,valence\n0.1,calm,x,-0.6,0.5\n";
        let lex = Lexicon::parse(src).unwrap();
        assert_eq!(lex.get("calm"), Some(Vad::new(0.5, -0.6, 0.1)));
    }

    #[test]
    fn whitespace_delimited_with_word_alias() {
        let src = "word\tvalence\tarousal\tdominance\nangry\t-0.7\t0.8\t0.3\n\n";
        let lex = Lexicon::parse(src).unwrap();
        assert_eq!(lex.len(), 1);
        assert_eq!(lex.get("angry"), Some(Vad::new(-0.7, 0.8, 0.3)));
    }

    #[test]
    fn tab_separated_terms_may_contain_spaces() {
        let src = "term\tvalence\tarousal\tdominance\n\
                   a lot\t0.5\t0.3\t0.2\n\
                   happy\t0.9\t0.5\t0.4\n";
        let lex = Lexicon::parse(src).unwrap();
        assert_eq!(lex.len(), 2);
        assert_eq!(lex.get("a lot"), Some(Vad::new(0.5, 0.3, 0.2)));
        assert_eq!(lex.get("happy"), Some(Vad::new(0.9, 0.5, 0.4)));
    }

    #[test]
    fn space_separated_header_splits_on_any_whitespace() {
        let lex = Lexicon::parse("term valence arousal dominance
calm  0.5 -0.6   0.1
").unwrap();
        assert_eq!(lex.get("calm"), Some(Vad::new(0.5, -0.6, 0.1)));
    }

    #[test]
    fn duplicate_terms_last_write_wins() {
        let src = "term,valence,arousal,dominance\nsad,-0.9,0,0\nSAD,-0.2,0.1,0.1\n";
        let lex = Lexicon::parse(src).unwrap();
        assert_eq!(lex.len(), 1);
        assert_eq!(lex.get("sad"), Some(Vad::new(-0.2, 0.1, 0.1)));
    }

    #[test]
    fn non_numeric_field_fails_the_load() {
        let src = "term,valence,arousal,dominance\nok,0.1,0.2,0.3\nbad,high,0.2,0.3\n";
        match Lexicon::parse(src) {
            Err(LexiconLoadError::InvalidNumber { line, column, value }) => {
                assert_eq!(line, 3);
                assert_eq!(column, "valence");
                assert_eq!(value, "high");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_and_short_row_are_errors() {
        assert!(matches!(
            Lexicon::parse("term,valence,arousal\nx,1,1\n"),
            Err(LexiconLoadError::MissingColumn { column: "dominance" })
        ));
        assert!(matches!(
            Lexicon::parse("term,valence,arousal,dominance\nx,1,1\n"),
            Err(LexiconLoadError::ShortRow { line: 2, expected: 4, found: 3 })
        ));
        assert!(matches!(Lexicon::parse("\n\n"), Err(LexiconLoadError::Empty)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Lexicon::load("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, LexiconLoadError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
