use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

/// Fixed UTC-3 offset for every mirror-facing date, regardless of where the
/// host runs. The mirror is edited by people in that timezone; formatting in
/// host-local time shifts entries across midnight.
pub const MIRROR_TZ: FixedOffset = match FixedOffset::west_opt(3 * 3600) {
    Some(tz) => tz,
    None => panic!("UTC-3 is a valid fixed offset"),
};

/// Placeholder cells for the binary attachment column. The attachment itself
/// never crosses into the mirror; only presence does.
pub const ATTACHMENT_PRESENT: &str = "Com anexo";
pub const ATTACHMENT_ABSENT: &str = "Sem anexo";

pub fn encode_date(instant: DateTime<Utc>) -> String {
    instant.with_timezone(&MIRROR_TZ).format("%d/%m/%Y").to_string()
}

pub fn encode_datetime(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&MIRROR_TZ)
        .format("%d/%m/%Y %H:%M")
        .to_string()
}

pub fn encode_opt_date(instant: Option<DateTime<Utc>>) -> String {
    instant.map(encode_date).unwrap_or_default()
}

/// Decode a date cell. Accepts `DD/MM/YYYY` (the write-path format) and ISO
/// `YYYY-MM-DD` (older synced data), each with an optional ` HH:MM` suffix.
///
/// Date-only cells pin to 12:00 UTC so the calendar day survives a round
/// trip through any timezone. Cells with a time are read as wall-clock time
/// in the mirror timezone. Blank or unparseable cells are `None`; callers
/// supply their own default.
pub fn decode_date(cell: &str) -> Option<DateTime<Utc>> {
    let s = cell.trim();
    if s.is_empty() {
        return None;
    }
    let (date_part, time_part) = match s.split_once(' ') {
        Some((d, t)) => (d, Some(t)),
        None => (s, None),
    };
    let date = NaiveDate::parse_from_str(date_part, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y-%m-%d"))
        .ok()?;
    match time_part.and_then(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok()) {
        Some(time) => MIRROR_TZ
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|dt| dt.with_timezone(&Utc)),
        None => Some(Utc.from_utc_datetime(&date.and_hms_opt(12, 0, 0)?)),
    }
}

/// Money and quantities are written as plain decimals, never locale-formatted,
/// so they read back without ambiguity.
pub fn encode_number(n: f64) -> String {
    format!("{n}")
}

/// Coerce a numeric cell. Blank or non-numeric cells become 0.0 rather than
/// propagating NaN into the primary store.
pub fn decode_number(cell: &str) -> f64 {
    cell.trim().parse().unwrap_or(0.0)
}

pub fn encode_attachment(present: bool) -> String {
    if present { ATTACHMENT_PRESENT } else { ATTACHMENT_ABSENT }.to_string()
}

/// Read a cell from a mirror row, treating missing trailing cells as blank.
/// Rows written under an older schema version are shorter than the active
/// column list.
pub fn cell(cells: &[String], idx: usize) -> &str {
    cells.get(idx).map(String::as_str).unwrap_or("")
}

/// Text cell with a fallback for blanks.
pub fn text_or(cells: &[String], idx: usize, default: &str) -> String {
    let s = cell(cells, idx).trim();
    if s.is_empty() { default.to_string() } else { s.to_string() }
}
