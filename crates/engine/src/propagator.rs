//! Incremental primary → mirror push, one call per committed mutation.
//!
//! Every function here is best-effort by contract: the primary store has
//! already committed by the time propagation runs, so a mirror failure is
//! logged and swallowed rather than surfaced as a failed mutation. The
//! mirror may lag or miss a row until the next bulk reconciliation.
//!
//! Locate-then-write is not compare-and-swap: two concurrent updates to the
//! same identifier can interleave between the position read and the row
//! write. Accepted risk; every write is idempotent by identifier and bulk
//! reconciliation heals drift.

use folha_core::{RecordId, SheetRecord};
use folha_sheets::{RangeSpec, SheetError, SheetStore};

use crate::locator;

pub fn propagate_create<R: SheetRecord, S: SheetStore>(sheets: &mut S, record: &R) {
    if let Err(e) = try_create(sheets, record) {
        log::warn!(
            "mirror append failed for {} {}: {e}",
            R::ENTITY,
            record.id()
        );
    }
}

pub fn propagate_update<R: SheetRecord, S: SheetStore>(sheets: &mut S, record: &R) {
    if let Err(e) = try_update(sheets, record) {
        log::warn!(
            "mirror update failed for {} {}: {e}",
            R::ENTITY,
            record.id()
        );
    }
}

pub fn propagate_delete<R: SheetRecord, S: SheetStore>(sheets: &mut S, id: RecordId) {
    if let Err(e) = try_delete::<R, S>(sheets, id) {
        log::warn!("mirror clear failed for {} {id}: {e}", R::ENTITY);
    }
}

fn try_create<R: SheetRecord, S: SheetStore>(sheets: &mut S, record: &R) -> Result<(), SheetError> {
    let schema = R::schema();
    let range = RangeSpec::parse(&schema.full_range())?;
    sheets.append_row(&range, &record.project())
}

fn try_update<R: SheetRecord, S: SheetStore>(sheets: &mut S, record: &R) -> Result<(), SheetError> {
    let schema = R::schema();
    // Positions shift under concurrent edits; locate right before the write.
    let Some(position) = locator::locate(sheets, schema, record.id())? else {
        log::debug!(
            "mirror row for {} {} not found, nothing to update",
            R::ENTITY,
            record.id()
        );
        return Ok(());
    };
    let range = RangeSpec::parse(&schema.full_range())?;
    sheets.update_row_at(&range, position, &record.project())
}

fn try_delete<R: SheetRecord, S: SheetStore>(sheets: &mut S, id: RecordId) -> Result<(), SheetError> {
    let schema = R::schema();
    let Some(position) = locator::locate(sheets, schema, id)? else {
        log::debug!("mirror row for {} {id} not found, nothing to clear", R::ENTITY);
        return Ok(());
    };
    let range = RangeSpec::parse(&schema.full_range())?;
    // Clear in place: removing the row would shift every later position.
    sheets.clear_row_at(&range, position)
}
