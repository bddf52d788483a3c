use crate::domain::errors::DomainError;
use crate::domain::export::ExportRequest;

use super::table;

impl From<csv::Error> for DomainError {
    fn from(e: csv::Error) -> Self {
        DomainError::Export(e.to_string())
    }
}

/// Header line followed by one record per row.
pub fn write_csv(request: &ExportRequest) -> Result<Vec<u8>, DomainError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table::headers(request.role))?;
    for row in &request.rows {
        let cells = table::cells(row, request.role);
        writer.write_record(cells.iter().map(|c| c.as_str()))?;
    }

    writer
        .into_inner()
        .map_err(|e| DomainError::Export(e.to_string()))
}
