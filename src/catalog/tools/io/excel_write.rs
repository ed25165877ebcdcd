use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

use crate::catalog::tools::error::Result;
use crate::catalog::tools::workbook::{Cell, WorkbookData};

/// Writes the provided workbook data to the given path, replacing any
/// existing file.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();
    let header_format = Format::new().set_bold();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(&table.sheet_name)?;

        for (col_idx, header) in table.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col_idx as u16, header, &header_format)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                match cell {
                    Cell::Number(value) => {
                        worksheet.write_number(row_num, col_idx as u16, *value)?;
                    }
                    Cell::Text(value) => {
                        worksheet.write_string(row_num, col_idx as u16, value)?;
                    }
                }
            }
        }
    }

    workbook_writer.save(path)?;
    Ok(())
}
