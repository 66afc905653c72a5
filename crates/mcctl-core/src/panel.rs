//! Framed text panels used for every operator-facing status message.
//!
//! ```text
//!         ╔                           ╗
//! █═╦═════╣       Server Status       ║
//!   ║     ╚                           ╝
//!   ╠══│ Server is online.
//!   ╚══│ Number of players online: 0
//! ```

use std::fmt;

/// Minimum inner width of the title frame.
const MIN_TITLE_WIDTH: usize = 27;

/// A titled panel with a list of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    title: String,
    rows: Vec<String>,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    #[must_use]
    pub fn row(mut self, row: impl Into<String>) -> Self {
        self.rows.push(row.into());
        self
    }

    /// Append several rows.
    #[must_use]
    pub fn rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.extend(rows.into_iter().map(Into::into));
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title_len = self.title.chars().count();
        let width = MIN_TITLE_WIDTH.max(title_len + 4);
        let left = (width - title_len) / 2;
        let right = width - title_len - left;
        let blank = " ".repeat(width);

        writeln!(f, "        ╔{blank}╗")?;
        writeln!(
            f,
            "█═╦═════╣{}{}{}║",
            " ".repeat(left),
            self.title,
            " ".repeat(right)
        )?;
        write!(f, "  ║     ╚{blank}╝")?;

        let last = self.rows.len().saturating_sub(1);
        for (index, row) in self.rows.iter().enumerate() {
            let branch = if index == last { '╚' } else { '╠' };
            write!(f, "\n  {branch}══│ {row}")?;
        }
        Ok(())
    }
}
