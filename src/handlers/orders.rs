use std::str::FromStr;

use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::application::confirmation::OrderConfirmation;
use crate::domain::export::{ExportFormat, ExportRequest, ViewerRole};
use crate::domain::order_form::{OrderData, SubmitOutcome};
use crate::domain::ports::{ExportSink, OrderCallbacks};
use crate::domain::pricing::{self, PriceFigures};
use crate::domain::product::{PriceBreakdown, ProductItem};
use crate::domain::summary::OrderSummary;
use crate::errors::AppError;
use crate::infrastructure::file_sink::file_stem;
use crate::infrastructure::table::format_money;
use crate::infrastructure::{render_table, FileExportSink};

// ── Request DTOs ─────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct PriceBreakdownRequest {
    pub quantity: u32,
    /// Decimal price as a string, e.g. "9.99"
    pub unit_price: String,
    pub supplier: String,
    #[serde(default)]
    pub stock: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductItemRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub supplier: String,
    pub quantity: u32,
    /// Decimal price as a string to avoid floating-point issues, e.g. "9.99"
    pub unit_price: String,
    #[serde(default)]
    pub price_breakdowns: Vec<PriceBreakdownRequest>,
    pub average_price: Option<String>,
    /// VAT-inclusive list price
    pub public_price: Option<String>,
    /// VAT rate in percent, e.g. "20"
    pub vat: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PreviewRequest {
    pub products: Vec<ProductItemRequest>,
    pub total_amount: String,
    #[serde(default)]
    pub user_role: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ExportBody {
    #[serde(default)]
    pub order_name: String,
    pub products: Vec<ProductItemRequest>,
    #[serde(default)]
    pub user_role: String,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    /// `csv` or `xlsx`. Defaults to `csv`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "csv".to_string()
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderDataRequest {
    #[serde(default)]
    pub order_name: String,
    /// `YYYY-MM-DD`; today when omitted
    pub expected_delivery_date: Option<String>,
    #[serde(default)]
    pub notes: String,
    /// `standard`, `urgent` or `scheduled`; `urgent` when omitted
    pub priority: Option<String>,
    /// One of the fixed payment options; "Invoice 30 days" when omitted
    pub payment_method: Option<String>,
    #[serde(default)]
    pub save_as_template: bool,
    #[serde(default)]
    pub notify_on_delivery: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmAction {
    Submit,
    Draft,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConfirmRequest {
    pub products: Vec<ProductItemRequest>,
    pub total_amount: String,
    #[serde(default)]
    pub user_role: String,
    #[serde(default)]
    pub order: OrderDataRequest,
    pub action: ConfirmAction,
    /// Also write an export file (`csv` or `xlsx`) unless the submit is blocked
    pub export_format: Option<String>,
}

// ── Response DTOs ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, ToSchema)]
pub struct SummaryResponse {
    pub product_count: usize,
    pub total_quantity: u64,
    pub unique_supplier_count: usize,
    pub total_amount: String,
    pub total_savings_vs_average: String,
    /// Absent when no product carries a public price
    pub average_discount_percent: Option<String>,
    pub lines_total: String,
    pub amount_delta: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BreakdownResponse {
    pub quantity: u32,
    pub unit_price: String,
    pub stock: u32,
    /// Only present for the `Admin` role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LineResponse {
    pub id: String,
    pub name: String,
    pub code: String,
    pub supplier: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
    pub savings_vs_average: String,
    pub gross_discount: Option<String>,
    pub gross_discount_percent: Option<String>,
    pub net_public_price: Option<String>,
    pub net_discount: Option<String>,
    pub net_discount_percent: Option<String>,
    pub best_tier_price: Option<String>,
    pub tier_savings: Option<String>,
    pub total_stock: u64,
    pub breakdowns: Vec<BreakdownResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PreviewResponse {
    pub summary: SummaryResponse,
    pub lines: Vec<LineResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValidateResponse {
    pub can_submit: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDataResponse {
    pub order_name: String,
    pub expected_delivery_date: String,
    pub notes: String,
    pub priority: String,
    pub payment_method: String,
    pub save_as_template: bool,
    pub notify_on_delivery: bool,
}

#[derive(Debug, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmOutcome {
    Submitted,
    Drafted,
    Blocked,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfirmResponse {
    pub outcome: ConfirmOutcome,
    pub closed: bool,
    pub order: Option<OrderDataResponse>,
    pub summary: SummaryResponse,
}

// ── Mapping ──────────────────────────────────────────────────────────────────

/// Decimals beyond these bounds are not money and would be expanded digit by
/// digit when formatted.
const MAX_DIGITS: u64 = 30;
const MAX_FRACTION_DIGITS: i64 = 18;
const MAX_INTEGER_DIGITS: i64 = 18;

fn parse_decimal(field: &str, raw: &str) -> Result<BigDecimal, AppError> {
    let value = BigDecimal::from_str(raw.trim())
        .map_err(|e| AppError::BadRequest(format!("Invalid {} '{}': {}", field, raw, e)))?;

    let (_, scale) = value.as_bigint_and_exponent();
    let digits = value.digits();
    let integer_digits = digits as i64 - scale;
    if digits > MAX_DIGITS || scale > MAX_FRACTION_DIGITS || integer_digits > MAX_INTEGER_DIGITS {
        return Err(AppError::BadRequest(format!(
            "{} '{}' is outside the supported range",
            field, raw
        )));
    }
    Ok(value)
}

fn parse_optional(field: &str, raw: Option<&str>) -> Result<Option<BigDecimal>, AppError> {
    raw.map(|r| parse_decimal(field, r)).transpose()
}

fn non_negative(field: &str, value: BigDecimal) -> Result<BigDecimal, AppError> {
    if value < BigDecimal::from(0) {
        return Err(AppError::BadRequest(format!("{} must not be negative", field)));
    }
    Ok(value)
}

impl TryFrom<PriceBreakdownRequest> for PriceBreakdown {
    type Error = AppError;

    fn try_from(req: PriceBreakdownRequest) -> Result<Self, Self::Error> {
        if req.quantity == 0 {
            return Err(AppError::BadRequest("tier quantity must be positive".to_string()));
        }
        Ok(PriceBreakdown {
            quantity: req.quantity,
            unit_price: non_negative(
                "tier unit_price",
                parse_decimal("tier unit_price", &req.unit_price)?,
            )?,
            supplier: req.supplier,
            stock: req.stock,
        })
    }
}

impl TryFrom<ProductItemRequest> for ProductItem {
    type Error = AppError;

    fn try_from(req: ProductItemRequest) -> Result<Self, Self::Error> {
        if req.quantity == 0 {
            return Err(AppError::BadRequest(format!(
                "quantity of product '{}' must be positive",
                req.id
            )));
        }
        let unit_price =
            non_negative("unit_price", parse_decimal("unit_price", &req.unit_price)?)?;

        let price_breakdowns = req
            .price_breakdowns
            .into_iter()
            .map(PriceBreakdown::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProductItem {
            average_price: parse_optional("average_price", req.average_price.as_deref())?,
            public_price: parse_optional("public_price", req.public_price.as_deref())?,
            vat: parse_optional("vat", req.vat.as_deref())?,
            id: req.id,
            name: req.name,
            code: req.code,
            supplier: req.supplier,
            quantity: req.quantity,
            unit_price,
            price_breakdowns,
        })
    }
}

fn parse_products(products: Vec<ProductItemRequest>) -> Result<Vec<ProductItem>, AppError> {
    products.into_iter().map(ProductItem::try_from).collect()
}

impl TryFrom<OrderDataRequest> for OrderData {
    type Error = AppError;

    fn try_from(req: OrderDataRequest) -> Result<Self, Self::Error> {
        let defaults = OrderData::default();
        Ok(OrderData {
            order_name: req.order_name,
            expected_delivery_date: req
                .expected_delivery_date
                .unwrap_or(defaults.expected_delivery_date),
            notes: req.notes,
            priority: match req.priority {
                Some(p) => p.parse()?,
                None => defaults.priority,
            },
            payment_method: match req.payment_method {
                Some(m) => m.parse()?,
                None => defaults.payment_method,
            },
            save_as_template: req.save_as_template,
            notify_on_delivery: req.notify_on_delivery,
        })
    }
}

impl From<&OrderSummary> for SummaryResponse {
    fn from(s: &OrderSummary) -> Self {
        Self {
            product_count: s.product_count,
            total_quantity: s.total_quantity,
            unique_supplier_count: s.unique_supplier_count,
            total_amount: format_money(&s.total_amount),
            total_savings_vs_average: format_money(&s.total_savings_vs_average),
            average_discount_percent: s.average_discount_percent.as_ref().map(format_money),
            lines_total: format_money(&s.lines_total),
            amount_delta: format_money(&s.amount_delta()),
        }
    }
}

impl From<&OrderData> for OrderDataResponse {
    fn from(d: &OrderData) -> Self {
        Self {
            order_name: d.order_name.clone(),
            expected_delivery_date: d.expected_delivery_date.clone(),
            notes: d.notes.clone(),
            priority: d.priority.to_string(),
            payment_method: d.payment_method.to_string(),
            save_as_template: d.save_as_template,
            notify_on_delivery: d.notify_on_delivery,
        }
    }
}

fn line_response(product: &ProductItem, role: ViewerRole) -> LineResponse {
    let figures = PriceFigures::of(product);
    let money = |v: Option<BigDecimal>| v.as_ref().map(format_money);

    LineResponse {
        id: product.id.clone(),
        name: product.name.clone(),
        code: product.code.clone(),
        supplier: product.supplier.clone(),
        quantity: product.quantity,
        unit_price: format_money(&product.unit_price),
        line_total: format_money(&figures.line_total),
        savings_vs_average: format_money(&figures.savings_vs_average),
        gross_discount: money(figures.gross_discount),
        gross_discount_percent: figures.gross_discount_percent.as_ref().map(format_money),
        net_public_price: money(figures.net_public_price),
        net_discount: money(figures.net_discount),
        net_discount_percent: figures.net_discount_percent.as_ref().map(format_money),
        best_tier_price: money(figures.best_tier_price),
        tier_savings: money(figures.tier_savings),
        total_stock: pricing::total_stock(product),
        breakdowns: product
            .price_breakdowns
            .iter()
            .map(|tier| BreakdownResponse {
                quantity: tier.quantity,
                unit_price: format_money(&tier.unit_price),
                stock: tier.stock,
                supplier: role.sees_suppliers().then(|| tier.supplier.clone()),
            })
            .collect(),
    }
}

/// Collects what the confirmation step hands back to the workflow.
#[derive(Debug, Default)]
struct ConfirmIntent {
    drafted: bool,
    submitted: Option<OrderData>,
    closed: bool,
}

impl OrderCallbacks for ConfirmIntent {
    fn on_save_as_draft(&mut self) {
        self.drafted = true;
    }

    fn on_submit_order(&mut self, order: OrderData) {
        self.submitted = Some(order);
    }

    fn on_close(&mut self) {
        self.closed = true;
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders/preview
///
/// Derives per-line price figures and the order summary. Supplier names in
/// price tiers are only returned to the `Admin` role.
#[utoipa::path(
    post,
    path = "/orders/preview",
    request_body = PreviewRequest,
    responses(
        (status = 200, description = "Figures computed", body = PreviewResponse),
        (status = 400, description = "Malformed product data"),
    ),
    tag = "orders"
)]
pub async fn preview_order(body: web::Json<PreviewRequest>) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let role = ViewerRole::from_role(&body.user_role);
    let total_amount = parse_decimal("total_amount", &body.total_amount)?;
    let products = parse_products(body.products)?;

    let summary = OrderSummary::aggregate(&products, total_amount);
    let lines = products.iter().map(|p| line_response(p, role)).collect();

    Ok(HttpResponse::Ok().json(PreviewResponse {
        summary: SummaryResponse::from(&summary),
        lines,
    }))
}

/// POST /orders/export
///
/// Renders the product lines as a CSV or XLSX download named after the order.
#[utoipa::path(
    post,
    path = "/orders/export",
    params(ExportParams),
    request_body = ExportBody,
    responses(
        (status = 200, description = "CSV or XLSX file as an attachment"),
        (status = 400, description = "Unknown format or malformed product data"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn export_order(
    query: web::Query<ExportParams>,
    body: web::Json<ExportBody>,
) -> Result<HttpResponse, AppError> {
    let format: ExportFormat = query.format.parse()?;
    let body = body.into_inner();
    let role = ViewerRole::from_role(&body.user_role);
    let products = parse_products(body.products)?;

    let request = ExportRequest::new(&body.order_name, &products, format, role);
    let filename = format!("{}.{}", file_stem(&request.title), format.extension());

    let bytes = web::block(move || render_table(&request))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes))
}

/// POST /orders/validate
///
/// Reports whether the captured order metadata may be submitted.
#[utoipa::path(
    post,
    path = "/orders/validate",
    request_body = OrderDataRequest,
    responses(
        (status = 200, description = "Validation result", body = ValidateResponse),
        (status = 400, description = "Unknown priority or payment method"),
    ),
    tag = "orders"
)]
pub async fn validate_order(body: web::Json<OrderDataRequest>) -> Result<HttpResponse, AppError> {
    let data = OrderData::try_from(body.into_inner())?;
    Ok(HttpResponse::Ok().json(ValidateResponse {
        can_submit: data.is_submittable(),
    }))
}

/// POST /orders/confirm
///
/// Runs the confirmation step: submits or saves a draft, then writes the
/// requested export file unless the submit was blocked. Nothing is stored;
/// the resulting order intent is returned to the caller.
#[utoipa::path(
    post,
    path = "/orders/confirm",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Confirmation outcome", body = ConfirmResponse),
        (status = 400, description = "Malformed request"),
        (status = 500, description = "Export could not be written"),
    ),
    tag = "orders"
)]
pub async fn confirm_order(
    sink: web::Data<FileExportSink>,
    body: web::Json<ConfirmRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let total_amount = parse_decimal("total_amount", &body.total_amount)?;
    let products = parse_products(body.products)?;
    let order = OrderData::try_from(body.order)?;
    let export_format = body
        .export_format
        .as_deref()
        .map(ExportFormat::from_str)
        .transpose()?;

    let session = OrderConfirmation::new(products, total_amount, &body.user_role, sink.get_ref())
        .with_form(order);

    let mut intent = ConfirmIntent::default();
    let outcome = match body.action {
        ConfirmAction::Submit => match session.submit(&mut intent) {
            SubmitOutcome::Submitted => ConfirmOutcome::Submitted,
            SubmitOutcome::Blocked => ConfirmOutcome::Blocked,
        },
        ConfirmAction::Draft => {
            session.save_draft(&mut intent);
            ConfirmOutcome::Drafted
        }
    };
    log::info!(
        "order '{}' confirmation outcome: {:?} (drafted={})",
        session.form().data().order_name,
        outcome,
        intent.drafted
    );

    if let Some(format) = export_format.filter(|_| outcome != ConfirmOutcome::Blocked) {
        let request = session.export_request(format);
        let sink = sink.clone();
        web::block(move || sink.export(&request))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))??;
    }

    Ok(HttpResponse::Ok().json(ConfirmResponse {
        outcome,
        closed: intent.closed,
        order: intent.submitted.as_ref().map(OrderDataResponse::from),
        summary: SummaryResponse::from(&session.summary()),
    }))
}

/// GET /health
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
