use super::errors::DomainError;
use super::export::ExportRequest;
use super::order_form::OrderData;

/// Destination for exported order files (download, disk, ...).
pub trait ExportSink: Send + Sync {
    fn export(&self, request: &ExportRequest) -> Result<(), DomainError>;
}

impl<T: ExportSink + ?Sized> ExportSink for &T {
    fn export(&self, request: &ExportRequest) -> Result<(), DomainError> {
        (**self).export(request)
    }
}

/// Hooks the surrounding workflow installs on a confirmation session.
pub trait OrderCallbacks {
    fn on_save_as_draft(&mut self);
    fn on_submit_order(&mut self, order: OrderData);
    fn on_close(&mut self);
}
