use crate::batch::BatchReport;
use crate::error::Result;
use std::path::Path;

/// CSV出力（入力の列 + resolved_name / match_source / match_score）
pub fn write_csv(report: &BatchReport, output: &Path, delimiter: u8) -> Result<()> {
    let mut writer = ::csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(output)?;

    writer.write_record(report.output_headers())?;
    for row in &report.rows {
        writer.write_record(report.output_row(row))?;
    }
    writer.flush()?;
    Ok(())
}
