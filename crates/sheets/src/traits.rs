use crate::error::SheetError;
use crate::range::RangeSpec;

/// The four primitives of the external mirror. Every operation is
/// independently failable and best-effort: callers on the mutation path
/// inspect and log the error instead of letting it cross into the primary
/// mutation's result.
///
/// Row positions are 1-based and include the header row at position 1.
/// Positions are only stable because deletes clear a row in place instead of
/// removing it; a caller must still re-locate before every write.
pub trait SheetStore {
    /// Read every populated row inside the range's column window. An empty
    /// or missing range yields an empty collection, not an error.
    fn read_range(&self, range: &RangeSpec) -> Result<Vec<Vec<String>>, SheetError>;

    /// Append one row after the last populated row of the range.
    fn append_row(&mut self, range: &RangeSpec, cells: &[String]) -> Result<(), SheetError>;

    /// Overwrite the full column span of the row at `position`. Values are
    /// written as user-entered content: numeric and date strings stay
    /// recognizable as such, so the mirror remains human-browsable.
    fn update_row_at(
        &mut self,
        range: &RangeSpec,
        position: u32,
        cells: &[String],
    ) -> Result<(), SheetError>;

    /// Blank the cell contents of the row at `position` without removing
    /// the row, preserving the positions of every later row.
    fn clear_row_at(&mut self, range: &RangeSpec, position: u32) -> Result<(), SheetError>;
}
