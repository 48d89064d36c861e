use std::collections::BTreeMap;

use crate::error::SheetError;
use crate::range::RangeSpec;
use crate::traits::SheetStore;

/// In-memory workbook, one grid of cells per tab. The reference
/// implementation of the mirror semantics and the fake adapter for tests.
#[derive(Debug, Default)]
pub struct MemoryWorkbook {
    tabs: BTreeMap<String, Vec<Vec<String>>>,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a tab's contents wholesale (fixtures, header rows).
    pub fn seed<R, C>(&mut self, sheet: &str, rows: R)
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = String>,
    {
        self.tabs.insert(
            sheet.to_string(),
            rows.into_iter().map(|r| r.into_iter().collect()).collect(),
        );
    }

    pub fn tab(&self, sheet: &str) -> &[Vec<String>] {
        self.tabs.get(sheet).map(Vec::as_slice).unwrap_or(&[])
    }
}

impl SheetStore for MemoryWorkbook {
    fn read_range(&self, range: &RangeSpec) -> Result<Vec<Vec<String>>, SheetError> {
        Ok(read_window(self.tab(&range.sheet), range))
    }

    fn append_row(&mut self, range: &RangeSpec, cells: &[String]) -> Result<(), SheetError> {
        let rows = self.tabs.entry(range.sheet.clone()).or_default();
        append(rows, range, cells);
        Ok(())
    }

    fn update_row_at(
        &mut self,
        range: &RangeSpec,
        position: u32,
        cells: &[String],
    ) -> Result<(), SheetError> {
        let rows = self.tabs.entry(range.sheet.clone()).or_default();
        write_row(rows, range, position as usize - 1, cells);
        Ok(())
    }

    fn clear_row_at(&mut self, range: &RangeSpec, position: u32) -> Result<(), SheetError> {
        let rows = self.tabs.entry(range.sheet.clone()).or_default();
        clear_row(rows, range, position as usize - 1);
        Ok(())
    }
}

// ============================================================================
// Grid operations shared by the in-memory and file-backed workbooks. Columns
// in the grid are absolute; the range picks the window.
// ============================================================================

fn window(range: &RangeSpec) -> (usize, usize) {
    (range.start_col as usize - 1, range.width())
}

fn row_cells(row: &[String], start: usize, width: usize) -> Vec<String> {
    let mut cells: Vec<String> = row.iter().skip(start).take(width).cloned().collect();
    while cells.last().is_some_and(|c| c.is_empty()) {
        cells.pop();
    }
    cells
}

/// Rows of the range's window, up to the last populated row. Cleared rows in
/// the middle stay as empty entries so positions keep their meaning.
pub(crate) fn read_window(rows: &[Vec<String>], range: &RangeSpec) -> Vec<Vec<String>> {
    let (start, width) = window(range);
    let first = range.start_row.map(|r| r as usize - 1).unwrap_or(0);
    let last = range
        .end_row
        .map(|r| (r as usize).min(rows.len()))
        .unwrap_or(rows.len());
    let mut out: Vec<Vec<String>> = rows
        .iter()
        .skip(first)
        .take(last.saturating_sub(first))
        .map(|row| row_cells(row, start, width))
        .collect();
    while out.last().is_some_and(|r| r.is_empty()) {
        out.pop();
    }
    out
}

pub(crate) fn write_row(rows: &mut Vec<Vec<String>>, range: &RangeSpec, index: usize, cells: &[String]) {
    let (start, width) = window(range);
    if rows.len() <= index {
        rows.resize_with(index + 1, Vec::new);
    }
    let row = &mut rows[index];
    if row.len() < start + width {
        row.resize(start + width, String::new());
    }
    for (i, slot) in row[start..start + width].iter_mut().enumerate() {
        *slot = cells.get(i).cloned().unwrap_or_default();
    }
}

pub(crate) fn clear_row(rows: &mut [Vec<String>], range: &RangeSpec, index: usize) {
    let (start, width) = window(range);
    if let Some(row) = rows.get_mut(index) {
        for slot in row.iter_mut().skip(start).take(width) {
            slot.clear();
        }
    }
}

/// Append after the last populated row of the window, reusing trailing
/// cleared rows first.
pub(crate) fn append(rows: &mut Vec<Vec<String>>, range: &RangeSpec, cells: &[String]) {
    let (start, width) = window(range);
    let last_populated = rows
        .iter()
        .rposition(|row| row.iter().skip(start).take(width).any(|c| !c.is_empty()));
    let index = last_populated.map(|i| i + 1).unwrap_or(0);
    write_row(rows, range, index, cells);
}
