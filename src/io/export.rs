//! CSV export for per-site report lines.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::report::MonthlyReport;

/// Column header for report CSV export.
const HEADER: &str = "nmi,revenue,daily_fees";

/// Exports a report's site lines to a CSV file at the given path.
///
/// Writes a header row followed by one row per site, in report order.
/// Produces deterministic output for identical reports.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_report_csv(report: &MonthlyReport, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_report_csv(report, buf)
}

/// Writes a report's site lines as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_report_csv(report: &MonthlyReport, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;
    for site in &report.site_revenues {
        wtr.write_record(&[
            site.nmi.clone(),
            format!("{:.4}", site.revenue),
            format!("{:.4}", site.daily_fees),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
