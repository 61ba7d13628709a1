//! Splitting a time range into backend-legal query windows.
//!
//! [`WindowPlanner`] is cheap to clone and every call to
//! [`WindowPlanner::windows`] starts a fresh pass over the same range.

use std::iter::FusedIterator;

use crate::error::{QueryError, Result};
use crate::types::{QueryWindow, TimeRange};

/// Widest window the query backend accepts by default, in seconds.
pub const DEFAULT_MAX_WINDOW_SECS: i64 = 60;

/// Plans the fixed-width windows covering a [`TimeRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlanner {
    range: TimeRange,
    max_width: i64,
}

impl WindowPlanner {
    /// Creates a planner for `range` with windows at most `max_width` seconds wide.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidRange`] if the range ends before it starts
    /// and [`QueryError::InvalidWindowWidth`] if `max_width` is not positive.
    pub fn new(range: TimeRange, max_width: i64) -> Result<Self> {
        if range.end < range.start {
            return Err(QueryError::InvalidRange {
                start: range.start,
                end: range.end,
            });
        }
        if max_width <= 0 {
            return Err(QueryError::InvalidWindowWidth(max_width));
        }
        Ok(Self { range, max_width })
    }

    /// Creates a planner from raw epoch-second bounds.
    pub fn from_bounds(start: i64, end: i64, max_width: i64) -> Result<Self> {
        Self::new(TimeRange::new(start, end)?, max_width)
    }

    /// The range being planned.
    #[must_use]
    pub const fn range(&self) -> TimeRange {
        self.range
    }

    /// The maximum window width in seconds.
    #[must_use]
    pub const fn max_width(&self) -> i64 {
        self.max_width
    }

    /// Number of windows the planner yields: `ceil(width / max_width)`.
    #[must_use]
    pub fn window_count(&self) -> usize {
        count_windows(self.range.start, self.range.end, self.max_width)
    }

    /// Returns a fresh iterator over the planned windows.
    #[must_use]
    pub const fn windows(&self) -> Windows {
        Windows {
            next_start: self.range.start,
            end: self.range.end,
            max_width: self.max_width,
        }
    }
}

impl IntoIterator for &WindowPlanner {
    type Item = QueryWindow;
    type IntoIter = Windows;

    fn into_iter(self) -> Self::IntoIter {
        self.windows()
    }
}

/// Lazy iterator over the windows of a [`WindowPlanner`].
#[derive(Debug, Clone)]
pub struct Windows {
    next_start: i64,
    end: i64,
    max_width: i64,
}

impl Iterator for Windows {
    type Item = QueryWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_start >= self.end {
            return None;
        }
        let start = self.next_start;
        let end = start.saturating_add(self.max_width).min(self.end);
        self.next_start = end;
        Some(QueryWindow::new(start, end))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = count_windows(self.next_start, self.end, self.max_width);
        (count, Some(count))
    }
}

// The span is measured unsigned so ranges wider than `i64::MAX` still count exactly.
fn count_windows(start: i64, end: i64, max_width: i64) -> usize {
    if end <= start {
        return 0;
    }
    let count = end.abs_diff(start).div_ceil(max_width.unsigned_abs());
    usize::try_from(count).unwrap_or(usize::MAX)
}

impl ExactSizeIterator for Windows {}

impl FusedIterator for Windows {}
