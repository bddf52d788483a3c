use bigdecimal::BigDecimal;

use crate::domain::errors::DomainError;
use crate::domain::export::{ExportFormat, ExportRequest, ViewerRole};
use crate::domain::order_form::{FormEvent, OrderData, OrderFormState, SubmitOutcome};
use crate::domain::ports::{ExportSink, OrderCallbacks};
use crate::domain::pricing::PriceFigures;
use crate::domain::product::ProductItem;
use crate::domain::summary::OrderSummary;

/// One confirmation session: the caller's products and total, the viewer's
/// role, and the form the user is filling in.
pub struct OrderConfirmation<S> {
    products: Vec<ProductItem>,
    total_amount: BigDecimal,
    role: ViewerRole,
    form: OrderFormState,
    sink: S,
}

impl<S: ExportSink> OrderConfirmation<S> {
    pub fn new(
        products: Vec<ProductItem>,
        total_amount: BigDecimal,
        user_role: &str,
        sink: S,
    ) -> Self {
        Self {
            products,
            total_amount,
            role: ViewerRole::from_role(user_role),
            form: OrderFormState::new(OrderData::default()),
            sink,
        }
    }

    pub fn with_form(mut self, data: OrderData) -> Self {
        self.form = OrderFormState::new(data);
        self
    }

    pub fn products(&self) -> &[ProductItem] {
        &self.products
    }

    pub fn role(&self) -> ViewerRole {
        self.role
    }

    pub fn form(&self) -> &OrderFormState {
        &self.form
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::aggregate(&self.products, self.total_amount.clone())
    }

    pub fn line_figures(&self) -> Vec<PriceFigures> {
        self.products.iter().map(PriceFigures::of).collect()
    }

    pub fn apply(&mut self, event: FormEvent) {
        self.form.apply(event);
    }

    /// Snapshot of the lines under the current order name, ready to hand to
    /// a sink on another thread.
    pub fn export_request(&self, format: ExportFormat) -> ExportRequest {
        ExportRequest::new(&self.form.data().order_name, &self.products, format, self.role)
    }

    /// Exports the lines under the current order name. Form state and
    /// products are left untouched.
    pub fn export(&self, format: ExportFormat) -> Result<(), DomainError> {
        let request = self.export_request(format);
        log::debug!(
            "exporting '{}' as {} ({} rows)",
            request.title,
            format,
            request.rows.len()
        );
        self.sink.export(&request)
    }

    pub fn submit<C: OrderCallbacks + ?Sized>(&self, callbacks: &mut C) -> SubmitOutcome {
        self.form.submit(callbacks)
    }

    pub fn save_draft<C: OrderCallbacks + ?Sized>(&self, callbacks: &mut C) {
        self.form.save_draft(callbacks)
    }

    pub fn dismiss<C: OrderCallbacks + ?Sized>(&self, callbacks: &mut C) {
        self.form.dismiss(callbacks)
    }
}
