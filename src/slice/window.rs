use crate::foundation::core::RowRange;
use crate::foundation::error::{ScaleError, ScaleResult};

/// Outcome of [`RowWindow::populate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Populate {
    /// Rows were appended to the current window.
    Extended,
    /// The rows did not abut the window; it was restarted at the first new row.
    HoleReset,
}

/// Validity window of one plane: the rows `[start, start + height)` that were
/// written, of which a ring plane can hold only the newest `capacity`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RowWindow {
    start: i32,
    height: i32,
    capacity: i32,
    ring: bool,
}

impl RowWindow {
    /// Empty ring window holding at most `capacity` rows.
    pub(crate) fn ring(capacity: usize) -> Self {
        Self {
            start: 0,
            height: 0,
            capacity: capacity as i32,
            ring: true,
        }
    }

    /// Non-ring window covering exactly `[start, start + height)`.
    pub(crate) fn fixed(start: i32, height: i32) -> Self {
        Self {
            start,
            height,
            capacity: height,
            ring: false,
        }
    }

    pub(crate) fn start(&self) -> i32 {
        self.start
    }

    pub(crate) fn height(&self) -> i32 {
        self.height
    }

    /// One past the last written row.
    pub(crate) fn end(&self) -> i32 {
        self.start + self.height
    }

    /// Rows that can currently be read back.
    pub(crate) fn valid(&self) -> RowRange {
        let end = self.end();
        let start = if self.ring {
            self.start.max(end - self.capacity)
        } else {
            self.start
        };
        RowRange::new(start, end)
    }

    pub(crate) fn contains(&self, row: i32) -> bool {
        self.valid().contains(row)
    }

    /// Fail unless every row of `[first, last]` is readable.
    pub(crate) fn ensure(&self, first: i32, last: i32, what: &str) -> ScaleResult<()> {
        let valid = self.valid();
        if first > last || (valid.contains(first) && valid.contains(last)) {
            return Ok(());
        }
        Err(ScaleError::contract(format!(
            "{what}: rows {first}..={last} requested, only {}..{} available",
            valid.start, valid.end
        )))
    }

    /// Record `count` freshly written rows starting at `first`.
    pub(crate) fn populate(&mut self, first: i32, count: i32) -> ScaleResult<Populate> {
        let end = self.end();
        if first < end {
            return Err(ScaleError::contract(format!(
                "row {first} written again (window ends at {end})"
            )));
        }
        if first > end || self.height == 0 {
            self.start = first;
            self.height = count;
            return Ok(if first > end {
                Populate::HoleReset
            } else {
                Populate::Extended
            });
        }
        self.height += count;
        Ok(Populate::Extended)
    }

    /// Drop the window entirely; the next write starts a fresh one at `row`.
    pub(crate) fn reset(&mut self, row: i32) {
        self.start = row;
        self.height = 0;
    }

    /// Advance `start` by whole capacities while `up_to` lies two or more
    /// capacities past it. Returns the number of steps taken.
    pub(crate) fn rotate(&mut self, up_to: i32) -> u32 {
        if !self.ring || self.capacity == 0 {
            return 0;
        }
        let mut steps = 0;
        while up_to - self.start >= 2 * self.capacity && self.height >= self.capacity {
            self.start += self.capacity;
            self.height -= self.capacity;
            steps += 1;
        }
        steps
    }

    /// Physical slot of `row` in the backing storage.
    pub(crate) fn slot(&self, row: i32) -> usize {
        if self.ring {
            row.rem_euclid(self.capacity) as usize
        } else {
            (row - self.start) as usize
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slice/window.rs"]
mod tests;
