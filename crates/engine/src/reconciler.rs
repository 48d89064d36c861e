//! Bulk mirror → primary reconciliation and the reverse reseed.
//!
//! Both directions are explicit operator actions, never run automatically,
//! and neither is safe to run concurrently with in-flight propagation on the
//! same entity: the delete-by-absence step can race an in-flight create.

use std::collections::BTreeSet;

use folha_core::SheetRecord;
use folha_sheets::{RangeSpec, SheetStore};
use folha_storage::{SqliteStorage, Storage};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Also delete every primary record whose identifier is absent from the
    /// mirror. Destructive and off by default: a row that merely failed to
    /// append (a swallowed propagation error) looks identical to a row an
    /// operator removed on purpose, and with this flag on it will be deleted
    /// from the primary store.
    pub delete_missing: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
    pub deleted: u64,
}

/// Full-table import: decode every mirror row and upsert it by identifier.
///
/// The read and decode pass completes before the primary store is touched,
/// so a transport failure aborts with no partial mutation. Individual rows
/// never abort the batch: decode is fail-soft and rows without an
/// identifier are skipped with a warning. Identifier cells that are not
/// valid ids get a fresh one minted (the row was typed into the mirror by
/// hand).
pub fn import<R: SheetRecord, S: SheetStore>(
    storage: &mut SqliteStorage,
    sheets: &S,
    options: ImportOptions,
) -> Result<ImportReport, EngineError> {
    let schema = R::schema();
    let range = RangeSpec::parse(&schema.full_range())?;
    let rows = sheets.read_range(&range)?;

    let mut decoded: Vec<R> = Vec::new();
    let mut skipped = 0u64;
    // Row 1 is the header.
    for (index, row) in rows.iter().enumerate().skip(1) {
        if row.first().map(String::as_str).unwrap_or("").trim().is_empty() {
            // Cleared rows are expected residue of in-place deletes; only a
            // populated row missing its identifier is worth a warning.
            if row.iter().any(|c| !c.trim().is_empty()) {
                skipped += 1;
                log::warn!(
                    "{} import: row {} has no identifier, skipped",
                    R::ENTITY,
                    index + 1
                );
            }
            continue;
        }
        decoded.push(R::from_cells(row));
    }

    let mut seen = BTreeSet::new();
    let mut inserted = 0u64;
    let mut updated = 0u64;
    for record in &decoded {
        let body = record.to_msgpack()?;
        if storage.upsert(R::ENTITY, record.id(), &body)? {
            inserted += 1;
        } else {
            updated += 1;
        }
        seen.insert(record.id());
    }

    let mut deleted = 0u64;
    if options.delete_missing {
        for id in storage.ids(R::ENTITY)? {
            if !seen.contains(&id) && storage.delete(R::ENTITY, id)? {
                deleted += 1;
            }
        }
    }

    let report = ImportReport {
        inserted,
        updated,
        skipped,
        deleted,
    };
    log::info!(
        "{} import: {inserted} inserted, {updated} updated, {skipped} skipped, {deleted} deleted",
        R::ENTITY
    );
    Ok(report)
}

/// Full primary → mirror rebuild: clear every data row in place, then append
/// one projected row per primary record. Row positions cannot be trusted
/// without the prior clear, so there is no cheaper bulk push. Unlike
/// propagation, errors here surface to the operator who asked for the
/// rebuild.
pub fn reseed<R: SheetRecord, S: SheetStore>(
    storage: &SqliteStorage,
    sheets: &mut S,
) -> Result<u64, EngineError> {
    let schema = R::schema();
    let range = RangeSpec::parse(&schema.full_range())?;
    let rows = sheets.read_range(&range)?;
    for position in 2..=rows.len() as u32 {
        sheets.clear_row_at(&range, position)?;
    }

    let mut count = 0u64;
    for raw in storage.find(R::ENTITY)? {
        let record = R::from_msgpack(&raw.body)?;
        sheets.append_row(&range, &record.project())?;
        count += 1;
    }
    log::info!("{} reseed: {count} rows written", R::ENTITY);
    Ok(count)
}
