pub mod orders;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::preview_order,
        orders::export_order,
        orders::validate_order,
        orders::confirm_order,
    ),
    components(schemas(
        orders::PriceBreakdownRequest,
        orders::ProductItemRequest,
        orders::PreviewRequest,
        orders::ExportBody,
        orders::OrderDataRequest,
        orders::ConfirmAction,
        orders::ConfirmRequest,
        orders::SummaryResponse,
        orders::BreakdownResponse,
        orders::LineResponse,
        orders::PreviewResponse,
        orders::ValidateResponse,
        orders::OrderDataResponse,
        orders::ConfirmOutcome,
        orders::ConfirmResponse,
    )),
    tags((name = "orders", description = "Order confirmation: pricing preview, export and submit"))
)]
pub struct ApiDoc;
