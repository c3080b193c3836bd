//! Labeled value lookup.
//!
//! Two conventions are supported:
//! - row mode: a table row `Label  HomeVal  AwayVal` whose first column is the label,
//! - scan mode: a label phrase anywhere in the block, values taken from the numeric
//!   tokens that follow it.
//!
//! [`lookup`] tries row mode and falls back to scan mode. Missing values are 0.

use crate::tokenize::{columns, lines, number_cell, words};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    Exact,
    Prefix,
}

#[derive(Debug, Clone, Copy)]
pub struct Label<'a> {
    pub phrase: &'a str,
    pub mode: LabelMatch,
    /// Phrases that disqualify a candidate label, e.g. `"PPG"` must not pick up `"PPG L8"`.
    pub exclude: &'a [&'a str],
}

impl<'a> Label<'a> {
    pub const fn exact(phrase: &'a str) -> Self {
        Self {
            phrase,
            mode: LabelMatch::Exact,
            exclude: &[],
        }
    }

    pub const fn prefix(phrase: &'a str) -> Self {
        Self {
            phrase,
            mode: LabelMatch::Prefix,
            exclude: &[],
        }
    }

    pub const fn excluding(mut self, exclude: &'a [&'a str]) -> Self {
        self.exclude = exclude;
        self
    }

    fn matches_column(&self, column: &str) -> bool {
        let hit = match self.mode {
            LabelMatch::Exact => column == self.phrase,
            LabelMatch::Prefix => column.starts_with(self.phrase),
        };
        hit && !self.exclude.iter().any(|ex| column.contains(ex))
    }
}

/// Which columns of a matching row hold the values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnPick {
    /// Columns 1.. directly after the label.
    Leading,
    /// Counted from the end of the row: `FromEnd(3)` with N = 2 reads `len-3` and `len-2`.
    FromEnd(usize),
}

/// Row mode. Returns `None` when no row carries the label with at least one number in the
/// picked columns; otherwise the values, padded with 0.
pub fn row_values<const N: usize>(
    raw: &str,
    label: Label<'_>,
    pick: ColumnPick,
    min_columns: usize,
) -> Option<[f64; N]> {
    for line in lines(raw) {
        let cols = columns(line);
        if cols.len() < min_columns.max(2) {
            continue;
        }
        if !label.matches_column(cols[0]) {
            continue;
        }
        let start = match pick {
            ColumnPick::Leading => 1,
            ColumnPick::FromEnd(k) => match cols.len().checked_sub(k) {
                Some(s) if s >= 1 => s,
                _ => continue,
            },
        };

        let mut out = [0.0; N];
        let mut found = 0usize;
        for (slot, col) in out.iter_mut().zip(cols.iter().skip(start)) {
            if let Some(v) = number_cell(col) {
                *slot = v;
                found += 1;
            }
        }
        if found > 0 {
            return Some(out);
        }
    }
    None
}

/// Scan mode. Finds the first occurrence of the label's words in the block and collects
/// the next `N` numeric tokens, skipping anything that does not parse.
pub fn scan_values<const N: usize>(raw: &str, label: Label<'_>) -> Option<[f64; N]> {
    let tokens = words(raw);
    let phrase = words(label.phrase);
    if phrase.is_empty() || tokens.len() < phrase.len() {
        return None;
    }
    let excluded = exclusion_spans(&tokens, label.exclude);

    for start in 0..=(tokens.len() - phrase.len()) {
        if !phrase_at(&tokens, start, &phrase, label.mode) {
            continue;
        }
        let end = start + phrase.len();
        // An exclusion overlapping the phrase, or starting right after it, disqualifies.
        if excluded.iter().any(|(s, e)| start < *e && *s <= end) {
            continue;
        }

        let mut out = [0.0; N];
        let mut found = 0usize;
        for token in &tokens[end..] {
            if found == N {
                break;
            }
            if let Some(v) = number_cell(token) {
                out[found] = v;
                found += 1;
            }
        }
        if found > 0 {
            return Some(out);
        }
    }
    None
}

/// Row mode, then scan mode, then zeros.
pub fn lookup<const N: usize>(
    raw: &str,
    label: Label<'_>,
    pick: ColumnPick,
    min_columns: usize,
) -> [f64; N] {
    row_values::<N>(raw, label, pick, min_columns)
        .or_else(|| scan_values::<N>(raw, label))
        .unwrap_or([0.0; N])
}

fn phrase_at(tokens: &[&str], start: usize, phrase: &[&str], mode: LabelMatch) -> bool {
    let last = phrase.len() - 1;
    phrase.iter().enumerate().all(|(i, want)| {
        let tok = tokens[start + i];
        match mode {
            LabelMatch::Prefix if i == last => tok.starts_with(want),
            _ => tok == *want,
        }
    })
}

fn exclusion_spans(tokens: &[&str], exclude: &[&str]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    for ex in exclude {
        let ex_words = words(ex);
        if ex_words.is_empty() || tokens.len() < ex_words.len() {
            continue;
        }
        for start in 0..=(tokens.len() - ex_words.len()) {
            if phrase_at(tokens, start, &ex_words, LabelMatch::Exact) {
                spans.push((start, start + ex_words.len()));
            }
        }
    }
    spans
}
