//! Line, column and word splitting for pasted stat blocks.
//!
//! Everything here is infallible: empty input gives empty output.

/// Non-empty, trimmed lines in input order.
pub fn lines(raw: &str) -> Vec<&str> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Split a single line into columns separated by runs of two or more whitespace
/// characters. A tab is a column break on its own, so tab-separated pastes and
/// space-aligned pastes split the same way. Single spaces stay inside a column
/// ("PPG L8" is one column).
pub fn columns(line: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let bytes = line.as_bytes();
    let mut start: Option<usize> = None;
    let mut idx = 0usize;

    while idx < bytes.len() {
        let ch = bytes[idx];
        if ch == b'\t' || (is_space(ch) && bytes.get(idx + 1).is_some_and(|n| is_space(*n))) {
            if let Some(s) = start.take() {
                out.push(line[s..idx].trim());
            }
            while idx < bytes.len() && is_space(bytes[idx]) {
                idx += 1;
            }
            continue;
        }
        if start.is_none() && !is_space(ch) {
            start = Some(idx);
        }
        idx += 1;
    }
    if let Some(s) = start {
        out.push(line[s..].trim());
    }
    out.retain(|col| !col.is_empty());
    out
}

/// Whitespace-delimited words across the whole block (used for free-form label scans).
pub fn words(raw: &str) -> Vec<&str> {
    raw.split_whitespace().collect()
}

/// Parse a stat cell, ignoring a trailing `%`, a leading `+` and thousands separators.
/// Non-finite values count as not found.
pub fn number_cell(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() || s == "-" {
        return None;
    }
    let s = s.trim_end_matches('%').replace(',', "");
    let value = s.parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn is_space(b: u8) -> bool {
    b == b' ' || b == b'\t' || b == b'\r'
}
