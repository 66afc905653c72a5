//! Bounded ring buffer of recent server output.
//!
//! Every pushed line gets a sequence number that keeps increasing across
//! evictions and resets, so callers can ask for "lines that arrived after
//! I sent a command" without racing against eviction.

use std::collections::VecDeque;

/// One buffered line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailLine {
    pub seq: u64,
    pub text: String,
}

/// Fixed-capacity ring buffer with insertion-order eviction.
#[derive(Debug)]
pub struct LogTailBuffer {
    capacity: usize,
    lines: VecDeque<TailLine>,
    next_seq: u64,
}

impl LogTailBuffer {
    /// Create an empty buffer. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: VecDeque::with_capacity(capacity),
            next_seq: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sequence number the next pushed line will receive.
    pub const fn next_seq(&self) -> u64 {
        self.next_seq
    }

    /// Add a line, removing the oldest if at capacity. Returns its sequence number.
    pub fn push(&mut self, line: impl Into<String>) -> u64 {
        if self.lines.len() >= self.capacity {
            self.lines.pop_front();
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.lines.push_back(TailLine {
            seq,
            text: line.into(),
        });
        seq
    }

    /// Drop every buffered line. Sequence numbers keep counting.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Most recent line containing `needle`.
    pub fn find_first_containing(&self, needle: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .find(|line| line.text.contains(needle))
            .map(|line| line.text.as_str())
    }

    /// Most recent line containing `needle` with a sequence number of at least `since`.
    pub fn find_since(&self, since: u64, needle: &str) -> Option<&str> {
        self.lines
            .iter()
            .rev()
            .take_while(|line| line.seq >= since)
            .find(|line| line.text.contains(needle))
            .map(|line| line.text.as_str())
    }

    /// Buffered lines, oldest first.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.text.clone()).collect()
    }

    /// Render the buffer newest-first, split into pages.
    ///
    /// Each page is a run of whole lines joined by `\n` whose length in
    /// characters stays below `ceiling`. The first page holds the newest
    /// lines, so it equals the full rendering with the oldest lines dropped
    /// until it fits. A single line that alone reaches the ceiling gets a
    /// page to itself and is never cut.
    pub fn paginate(&self, ceiling: usize) -> Vec<String> {
        paginate_newest_first(self.lines.iter().rev().map(|line| line.text.as_str()), ceiling)
    }
}

fn paginate_newest_first<'a>(lines: impl Iterator<Item = &'a str>, ceiling: usize) -> Vec<String> {
    let mut pages = Vec::new();
    let mut page = String::new();
    let mut page_chars = 0usize;

    for line in lines {
        let line_chars = line.chars().count();
        let separator = usize::from(!page.is_empty());
        if !page.is_empty() && page_chars + separator + line_chars >= ceiling {
            pages.push(std::mem::take(&mut page));
            page_chars = 0;
        }
        if !page.is_empty() {
            page.push('\n');
            page_chars += 1;
        }
        page.push_str(line);
        page_chars += line_chars;
    }

    if !page.is_empty() {
        pages.push(page);
    }
    pages
}
