//! Excel出力
//!
//! シート「結果」に入力列と照合結果、シート「集計」に件数を書き出す。

use crate::batch::BatchReport;
use crate::error::Result;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook};
use std::path::Path;

const RESULT_SHEET: &str = "結果";
const SUMMARY_SHEET: &str = "集計";

pub fn write_excel(report: &BatchReport, output: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(RESULT_SHEET)?;

    for (col, header) in report.output_headers().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    for (index, row) in report.rows.iter().enumerate() {
        let excel_row = index as u32 + 1;
        for (col, value) in report.output_row(row).iter().enumerate() {
            worksheet.write_string(excel_row, col as u16, value)?;
        }
    }
    worksheet.autofit();

    let stats = &report.stats;
    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET)?;
    summary.write_string_with_format(0, 0, "項目", &header_format)?;
    summary.write_string_with_format(0, 1, "件数", &header_format)?;

    let lines = [
        ("総行数", stats.total_rows),
        ("ルール一致", stats.by_rule),
        ("類似度一致", stats.by_similarity),
        ("未解決", stats.unresolved),
        ("名称なし", stats.empty_rows),
    ];
    for (index, (label, count)) in lines.iter().enumerate() {
        let row = index as u32 + 1;
        summary.write_string(row, 0, *label)?;
        summary.write_number(row, 1, *count as f64)?;
    }
    summary.set_column_width(0, 14)?;

    workbook.save(output)?;
    Ok(())
}
