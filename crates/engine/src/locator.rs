use folha_core::{ColumnSchema, RecordId};
use folha_sheets::{RangeSpec, SheetError, SheetStore};

/// Find the 1-based row position of an identifier in a mirror table.
///
/// Reads only the identifier column and scans linearly. Not-found is a
/// normal outcome, not an error: the caller treats it as nothing to update
/// or delete. O(n) per call, a full-column read on every locate; acceptable
/// at hundreds of rows and a known scaling limit beyond that.
pub fn locate<S: SheetStore>(
    sheets: &S,
    schema: &ColumnSchema,
    id: RecordId,
) -> Result<Option<u32>, SheetError> {
    let range = RangeSpec::parse(&schema.id_range())?;
    let rows = sheets.read_range(&range)?;
    let target = id.to_string();
    Ok(rows
        .iter()
        .position(|row| row.first().is_some_and(|cell| cell.trim() == target))
        .map(|i| i as u32 + 1))
}
