use std::collections::HashSet;

use crate::catalog::tools::model::{CategoryRecord, TaxonomyExport};

/// Longest sheet name Excel accepts, in characters.
pub const MAX_SHEET_NAME_LEN: usize = 31;
/// Header row written at the top of every sheet.
pub const COLUMNS: [&str; 3] = ["ID", "name", "level"];

/// A single worksheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
}

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Represents all tables required to materialise the Excel workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

/// Projects every root group onto its own sheet, keeping group order.
pub fn build_workbook(export: &TaxonomyExport) -> WorkbookData {
    let mut sheet_names = SheetNameRegistry::default();

    let tables = export
        .groups
        .iter()
        .map(|group| SheetTable {
            sheet_name: sheet_names.assign(&group.name),
            columns: COLUMNS.iter().map(|column| column.to_string()).collect(),
            rows: group.records.iter().map(record_row).collect(),
        })
        .collect();

    WorkbookData { tables }
}

fn record_row(record: &CategoryRecord) -> Vec<Cell> {
    vec![
        Cell::Number(record.id as f64),
        Cell::Text(record.name.clone()),
        Cell::Number(f64::from(record.level())),
    ]
}

/// Hands out unique, Excel-safe sheet names. A name that collides with one
/// already issued gets a numeric suffix.
#[derive(Debug, Default)]
pub struct SheetNameRegistry {
    used: HashSet<String>,
}

impl SheetNameRegistry {
    pub fn assign(&mut self, raw: &str) -> String {
        let base = sanitize_sheet_name(raw);
        if self.claim(&base) {
            return base;
        }

        let mut counter = 1;
        loop {
            let suffix = format!("_{counter}");
            // `base` never starts with an apostrophe and the suffix closes the name.
            let prefix = truncate_chars(&base, MAX_SHEET_NAME_LEN - suffix.chars().count());
            let candidate = format!("{prefix}{suffix}");
            if self.claim(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn claim(&mut self, name: &str) -> bool {
        // Excel compares sheet names case-insensitively.
        self.used.insert(name.to_lowercase())
    }
}

/// Replaces characters Excel rejects and truncates to the sheet name limit.
pub fn sanitize_sheet_name(raw: &str) -> String {
    let invalid = [':', '\\', '/', '?', '*', '[', ']'];
    let sanitized: String = raw
        .chars()
        .map(|ch| {
            if invalid.contains(&ch) || ch.is_control() {
                '_'
            } else {
                ch
            }
        })
        .collect();

    // Excel rejects names that start or end with an apostrophe, so the edges
    // are stripped after truncation.
    let truncated = truncate_chars(sanitized.trim(), MAX_SHEET_NAME_LEN);
    let trimmed = truncated.trim_matches('\'');
    if trimmed.is_empty() {
        return "Sheet".to_string();
    }

    trimmed.to_string()
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
