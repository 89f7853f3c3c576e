//! Reflow: turns a subpage's raw monospace text into header, footer and content groups.
//!
//! # Steps
//! 1. Zero-length lines are dropped. Lines made only of spaces are kept.
//! 2. `column_width` is the longest remaining line, in characters.
//! 3. Every line is trimmed and framed: two columns of padding on each side,
//!    content left-aligned, total width `column_width + 4`.
//! 4. The line before the last becomes the footer. Both it and the last line
//!    leave the body.
//! 5. The rest is split into runs of non-blank lines. Blank lines only separate.
//! 6. The first run is the header.
//!
//! The whole transform is pure: same input, same output.

use thiserror::Error;

/// Columns of padding on each side of the content.
const FRAME: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("subpage has no non-empty lines")]
    EmptyContent,
}

/// Structured, width-normalized view of one subpage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Longest unpadded line. Every emitted line is `column_width + 4` wide.
    pub column_width: usize,
    pub header: Vec<String>,
    pub footer: Vec<String>,
    pub groups: Vec<Vec<String>>,
}

/// A single display row, in the order a frontend should draw them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    Header(&'a str),
    Content(&'a str),
    Separator,
    Footer(&'a str),
}

impl Layout {
    /// Header, then groups, then footer; consecutive blocks separated by one blank row.
    pub fn rows(&self) -> Vec<Row<'_>> {
        let mut blocks: Vec<Vec<Row<'_>>> = Vec::with_capacity(self.groups.len() + 2);

        if !self.header.is_empty() {
            blocks.push(self.header.iter().map(|l| Row::Header(l)).collect());
        }
        for group in &self.groups {
            blocks.push(group.iter().map(|l| Row::Content(l)).collect());
        }
        if !self.footer.is_empty() {
            blocks.push(self.footer.iter().map(|l| Row::Footer(l)).collect());
        }

        let mut rows = Vec::new();
        for (i, block) in blocks.into_iter().enumerate() {
            if i > 0 {
                rows.push(Row::Separator);
            }
            rows.extend(block);
        }
        rows
    }
}

/// Lays out one subpage. Fails only when every line is zero-length.
pub fn layout<S: AsRef<str>>(raw_text: &[S]) -> Result<Layout, LayoutError> {
    let kept: Vec<&str> = raw_text
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| !l.is_empty())
        .collect();

    let column_width = kept
        .iter()
        .map(|l| l.chars().count())
        .max()
        .ok_or(LayoutError::EmptyContent)?;

    let mut lines: Vec<String> = kept.iter().map(|l| frame(l, column_width)).collect();

    let footer: Vec<String> = if lines.len() >= 2 {
        lines.pop();
        lines.pop().into_iter().collect()
    } else {
        lines.clear();
        Vec::new()
    };

    let mut groups = split_groups(lines);
    let header = if groups.is_empty() {
        Vec::new()
    } else {
        groups.remove(0)
    };

    Ok(Layout {
        column_width,
        header,
        footer,
        groups,
    })
}

fn frame(line: &str, column_width: usize) -> String {
    let content = line.trim();
    let left = format!("{content:<width$}", width = column_width + FRAME);
    format!("{left:>width$}", width = column_width + 2 * FRAME)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn split_groups(lines: Vec<String>) -> Vec<Vec<String>> {
    let mut groups = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for line in lines {
        if is_blank(&line) {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
