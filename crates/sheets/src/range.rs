use std::fmt;

use crate::error::SheetError;

/// A named range in A1 notation: `Sheet!A:M`, `Sheet!A:A`, `Sheet!A5:M5`.
/// Columns and rows are 1-based; an open range omits the rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeSpec {
    pub sheet: String,
    pub start_col: u32,
    pub start_row: Option<u32>,
    pub end_col: u32,
    pub end_row: Option<u32>,
}

impl RangeSpec {
    pub fn parse(s: &str) -> Result<Self, SheetError> {
        let bad = || SheetError::InvalidRange(s.to_string());
        let (sheet, cells) = s.split_once('!').ok_or_else(bad)?;
        if sheet.is_empty() || cells.is_empty() {
            return Err(bad());
        }
        let (start, end) = match cells.split_once(':') {
            Some((a, b)) => (a, b),
            None => (cells, cells),
        };
        let (start_col, start_row) = parse_cell_ref(start).ok_or_else(bad)?;
        let (end_col, end_row) = parse_cell_ref(end).ok_or_else(bad)?;
        if end_col < start_col {
            return Err(bad());
        }
        Ok(Self {
            sheet: sheet.to_string(),
            start_col,
            start_row,
            end_col,
            end_row,
        })
    }

    /// Number of columns in the window.
    pub fn width(&self) -> usize {
        (self.end_col - self.start_col + 1) as usize
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}!{}", self.sheet, column_letters(self.start_col))?;
        if let Some(r) = self.start_row {
            write!(f, "{r}")?;
        }
        write!(f, ":{}", column_letters(self.end_col))?;
        if let Some(r) = self.end_row {
            write!(f, "{r}")?;
        }
        Ok(())
    }
}

/// `A5` -> (1, Some(5)); `M` -> (13, None).
fn parse_cell_ref(s: &str) -> Option<(u32, Option<u32>)> {
    let letters_len = s.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    if letters_len == 0 {
        return None;
    }
    let (letters, digits) = s.split_at(letters_len);
    let col = letters_to_column(letters)?;
    let row = if digits.is_empty() {
        None
    } else {
        Some(digits.parse().ok().filter(|r| *r >= 1)?)
    };
    Some((col, row))
}

fn letters_to_column(letters: &str) -> Option<u32> {
    let mut col: u32 = 0;
    for c in letters.chars() {
        let v = (c.to_ascii_uppercase() as u32).checked_sub('A' as u32)?;
        if v >= 26 {
            return None;
        }
        col = col.checked_mul(26)?.checked_add(v + 1)?;
    }
    Some(col)
}

fn column_letters(mut col: u32) -> String {
    let mut out = Vec::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.push(b'A' + rem as u8);
        col = (col - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}
