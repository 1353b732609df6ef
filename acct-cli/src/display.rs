//! Console rendering: boxed banners and psql-style tables.
//!
//! Everything here returns a `String`; writing is left to the
//! [`Console`](crate::prompt::Console).

use acct_core::{Cell, FormatConfig, Sheet};

/// Layout of boxed console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Total width of a box, borders included.
    pub width: usize,
    /// Emit ANSI bold sequences.
    pub ansi: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            width: 92,
            ansi: false,
        }
    }
}

/// One line inside a boxed banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxLine {
    Title(String),
    Text(String),
    Separator,
}

impl BoxLine {
    pub fn title(text: impl Into<String>) -> Self {
        Self::Title(text.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

pub fn bold(
    text: &str,
    style: Style,
) -> String {
    if style.ansi {
        format!("\x1b[1m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

pub fn rule(style: Style) -> String {
    "-".repeat(style.width)
}

/// A centered, bordered block of lines.
pub fn boxed(
    lines: &[BoxLine],
    style: Style,
) -> String {
    let inner = style.width.saturating_sub(2);
    let mut out = rule(style);
    out.push('\n');
    for line in lines {
        let content = match line {
            BoxLine::Title(text) => bold(&center(text, inner), style),
            BoxLine::Text(text) => center(text, inner),
            BoxLine::Separator => "-".repeat(inner),
        };
        out.push('|');
        out.push_str(&content);
        out.push_str("|\n");
    }
    out.push_str(&rule(style));
    out.push('\n');
    out
}

fn center(
    text: &str,
    width: usize,
) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let left = (width - len) / 2;
    let right = width - len - left;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(right))
}

/// Renders a sheet as a psql-style table preceded by its name.
///
/// Text is left-aligned, numbers right-aligned.
pub fn table(
    sheet: &Sheet,
    format: &FormatConfig,
    style: Style,
) -> String {
    let rendered: Vec<Vec<(String, bool)>> = sheet
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| (format.display(cell), !matches!(cell, Cell::Text(_))))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = sheet.headers().iter().map(|h| h.chars().count()).collect();
    for row in &rendered {
        for (idx, (text, _)) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(idx) {
                *w = (*w).max(text.chars().count());
            }
        }
    }

    let border = |joint: char| {
        let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
        format!("{joint}{}{joint}", segments.join(&joint.to_string()))
    };

    let mut out = bold(sheet.name(), style);
    out.push('\n');
    out.push_str(&border('+'));
    out.push('\n');
    out.push_str(&table_row(
        sheet.headers().iter().map(|h| (h.clone(), false)),
        &widths,
    ));
    out.push_str(&format!(
        "|{}|\n",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    ));
    for row in rendered {
        out.push_str(&table_row(row.into_iter(), &widths));
    }
    out.push_str(&border('+'));
    out.push('\n');
    out
}

fn table_row(
    cells: impl Iterator<Item = (String, bool)>,
    widths: &[usize],
) -> String {
    let mut line = String::from("|");
    for ((text, numeric), width) in cells.zip(widths) {
        let pad = width.saturating_sub(text.chars().count());
        if numeric {
            line.push_str(&format!(" {}{} |", " ".repeat(pad), text));
        } else {
            line.push_str(&format!(" {}{} |", text, " ".repeat(pad)));
        }
    }
    line.push('\n');
    line
}
