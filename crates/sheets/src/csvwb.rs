use std::fs;
use std::path::PathBuf;

use crate::error::SheetError;
use crate::memory;
use crate::range::RangeSpec;
use crate::traits::SheetStore;

/// Explicit configuration for a file-backed workbook. Constructed by the
/// caller and injected, never read from ambient process state.
#[derive(Debug, Clone)]
pub struct WorkbookConfig {
    pub dir: PathBuf,
}

/// File-backed workbook: one CSV per tab under a directory, so the mirror
/// stays browsable with any spreadsheet tool. Each operation loads the tab,
/// applies the same grid semantics as `MemoryWorkbook`, and rewrites the
/// file.
#[derive(Debug)]
pub struct CsvWorkbook {
    dir: PathBuf,
}

impl CsvWorkbook {
    pub fn open(config: WorkbookConfig) -> Result<Self, SheetError> {
        fs::create_dir_all(&config.dir)?;
        Ok(Self { dir: config.dir })
    }

    fn tab_path(&self, sheet: &str) -> PathBuf {
        self.dir.join(format!("{sheet}.csv"))
    }

    fn load_tab(&self, sheet: &str) -> Result<Vec<Vec<String>>, SheetError> {
        let path = self.tab_path(sheet);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(rows)
    }

    fn save_tab(&self, sheet: &str, rows: &[Vec<String>]) -> Result<(), SheetError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_path(self.tab_path(sheet))?;
        for row in rows {
            // A cleared row persists as a single blank field so the line
            // (and every later row position) survives the rewrite.
            if row.is_empty() {
                writer.write_record([""])?;
            } else {
                writer.write_record(row)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl SheetStore for CsvWorkbook {
    fn read_range(&self, range: &RangeSpec) -> Result<Vec<Vec<String>>, SheetError> {
        let rows = self.load_tab(&range.sheet)?;
        Ok(memory::read_window(&rows, range))
    }

    fn append_row(&mut self, range: &RangeSpec, cells: &[String]) -> Result<(), SheetError> {
        let mut rows = self.load_tab(&range.sheet)?;
        memory::append(&mut rows, range, cells);
        self.save_tab(&range.sheet, &rows)
    }

    fn update_row_at(
        &mut self,
        range: &RangeSpec,
        position: u32,
        cells: &[String],
    ) -> Result<(), SheetError> {
        let mut rows = self.load_tab(&range.sheet)?;
        memory::write_row(&mut rows, range, position as usize - 1, cells);
        self.save_tab(&range.sheet, &rows)
    }

    fn clear_row_at(&mut self, range: &RangeSpec, position: u32) -> Result<(), SheetError> {
        let mut rows = self.load_tab(&range.sheet)?;
        memory::clear_row(&mut rows, range, position as usize - 1);
        self.save_tab(&range.sheet, &rows)
    }
}
