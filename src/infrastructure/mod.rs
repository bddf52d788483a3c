pub mod csv_writer;
pub mod file_sink;
pub mod table;
pub mod xlsx_writer;

use crate::domain::errors::DomainError;
use crate::domain::export::{ExportFormat, ExportRequest};

pub use file_sink::FileExportSink;

/// Renders the request in its own format.
pub fn render_table(request: &ExportRequest) -> Result<Vec<u8>, DomainError> {
    match request.format {
        ExportFormat::Csv => csv_writer::write_csv(request),
        ExportFormat::Xlsx => xlsx_writer::write_xlsx(request),
    }
}
