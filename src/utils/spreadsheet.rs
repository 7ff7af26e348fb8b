use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::api::report::ReportRow;

pub const SHEET_NAME: &str = "Attendance";
pub const REPORT_COLUMNS: [&str; 5] = [
    "Employee",
    "SubGroup",
    "Total Days",
    "Present Days",
    "Attendance %",
];

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Renders the report as an xlsx workbook with a single `Attendance` sheet.
pub fn report_workbook(rows: &[ReportRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    {
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (col, title) in REPORT_COLUMNS.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &header)?;
        }

        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            sheet.write_string(r, 0, row.employee.as_str())?;
            sheet.write_string(r, 1, row.sub_group.as_str())?;
            sheet.write_number(r, 2, row.total_days as f64)?;
            sheet.write_number(r, 3, row.present_days as f64)?;
            sheet.write_number(r, 4, row.attendance_percent)?;
        }
    }

    workbook.save_to_buffer()
}

/// Same table as CSV.
pub fn report_csv(rows: &[ReportRow]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(REPORT_COLUMNS)?;

    for row in rows {
        writer.write_record([
            row.employee.clone(),
            row.sub_group.clone(),
            row.total_days.to_string(),
            row.present_days.to_string(),
            row.attendance_percent.to_string(),
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}
