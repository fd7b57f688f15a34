use crate::foundation::error::{ScaleError, ScaleResult};
use crate::slice::window::{Populate, RowWindow};

/// Owned ring of lines for one plane, addressed by absolute row index.
///
/// Storage is a single `capacity * width` arena; row `r` lives in slot
/// `r mod capacity`. Reads are checked against the window so a stale slot is
/// never returned in place of the row that used to live there.
#[derive(Clone, Debug)]
pub(crate) struct LinePlane<T> {
    window: RowWindow,
    width: usize,
    lines: Vec<T>,
}

impl<T: Copy + Default> LinePlane<T> {
    pub(crate) fn new(width: usize, capacity: usize) -> Self {
        Self {
            window: RowWindow::ring(capacity),
            width,
            lines: vec![T::default(); width * capacity],
        }
    }

    pub(crate) fn window(&self) -> &RowWindow {
        &self.window
    }

    /// Readable row `row`.
    pub(crate) fn row(&self, row: i32) -> ScaleResult<&[T]> {
        if !self.window.contains(row) {
            let valid = self.window.valid();
            return Err(ScaleError::contract(format!(
                "line {row} is not buffered (window {}..{})",
                valid.start, valid.end
            )));
        }
        let at = self.window.slot(row) * self.width;
        Ok(&self.lines[at..at + self.width])
    }

    /// Readable rows `first..=last`, in order.
    pub(crate) fn rows(&self, first: i32, last: i32) -> ScaleResult<Vec<&[T]>> {
        (first..=last).map(|r| self.row(r)).collect()
    }

    /// Claim the slot for `row` and mark it written.
    ///
    /// Rows must arrive in ascending order; a gap restarts the window.
    pub(crate) fn write_row(&mut self, row: i32) -> ScaleResult<(Populate, &mut [T])> {
        let populate = self.window.populate(row, 1)?;
        let at = self.window.slot(row) * self.width;
        Ok((populate, &mut self.lines[at..at + self.width]))
    }

    pub(crate) fn rotate(&mut self, up_to: i32) -> u32 {
        self.window.rotate(up_to)
    }

    pub(crate) fn reset(&mut self, row: i32) {
        self.window.reset(row);
    }

    /// Drop all rows and zero the storage.
    pub(crate) fn clear(&mut self) {
        self.window.reset(0);
        self.lines.fill(T::default());
    }
}

/// Intermediate slice between the horizontal and vertical stages: one luma
/// ring and two chroma rings holding 15-bit samples.
#[derive(Clone, Debug)]
pub(crate) struct LineSlice {
    pub(crate) luma: LinePlane<i16>,
    pub(crate) chroma_u: LinePlane<i16>,
    pub(crate) chroma_v: LinePlane<i16>,
}

impl LineSlice {
    pub(crate) fn new(
        luma_width: usize,
        chroma_width: usize,
        luma_lines: usize,
        chroma_lines: usize,
    ) -> Self {
        Self {
            luma: LinePlane::new(luma_width, luma_lines),
            chroma_u: LinePlane::new(chroma_width, chroma_lines),
            chroma_v: LinePlane::new(chroma_width, chroma_lines),
        }
    }

    /// Rotate the luma ring towards `luma_row` and both chroma rings towards
    /// `chroma_row`. Returns the number of ring steps taken.
    pub(crate) fn rotate(&mut self, luma_row: i32, chroma_row: i32) -> u32 {
        let luma = self.luma.rotate(luma_row);
        let u = self.chroma_u.rotate(chroma_row);
        let v = self.chroma_v.rotate(chroma_row);
        debug_assert_eq!(u, v);
        luma + u
    }

    pub(crate) fn clear(&mut self) {
        self.luma.clear();
        self.chroma_u.clear();
        self.chroma_v.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/slice/plane.rs"]
mod tests;
