//! Column layout shared by the tabular writers.

use bigdecimal::BigDecimal;

use crate::domain::export::{ExportRow, ViewerRole};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(String),
    Empty,
}

impl Cell {
    pub fn as_str(&self) -> &str {
        match self {
            Cell::Text(s) | Cell::Number(s) => s,
            Cell::Empty => "",
        }
    }
}

const BASE_HEADERS: [&str; 10] = [
    "Id",
    "Name",
    "Code",
    "Quantity",
    "Unit Price",
    "Average Price",
    "Public Price",
    "VAT %",
    "Best Tier Price",
    "Tiers",
];

const SUPPLIER_HEADER: &str = "Tier Suppliers";

pub fn headers(role: ViewerRole) -> Vec<&'static str> {
    let mut headers = BASE_HEADERS.to_vec();
    if role.sees_suppliers() {
        headers.push(SUPPLIER_HEADER);
    }
    headers
}

/// Money with two decimals, no currency symbol.
pub fn format_money(value: &BigDecimal) -> String {
    value.round(2).with_scale(2).to_string()
}

fn money(value: Option<&BigDecimal>) -> Cell {
    value.map_or(Cell::Empty, |v| Cell::Number(format_money(v)))
}

pub fn cells(row: &ExportRow, role: ViewerRole) -> Vec<Cell> {
    let tiers = row.price_breakdowns.as_deref().unwrap_or_default();
    let best = tiers.iter().map(|t| &t.unit_price).min();

    let tier_list = if tiers.is_empty() {
        Cell::Empty
    } else {
        Cell::Text(
            tiers
                .iter()
                .map(|t| format!("{} @ {}", t.quantity, format_money(&t.unit_price)))
                .collect::<Vec<_>>()
                .join("; "),
        )
    };

    let mut cells = vec![
        Cell::Text(row.id.clone()),
        Cell::Text(row.name.clone()),
        Cell::Text(row.code.clone()),
        Cell::Number(row.quantity.to_string()),
        money(Some(&row.unit_price)),
        money(row.average_price.as_ref()),
        money(row.public_price.as_ref()),
        row.vat
            .as_ref()
            .map_or(Cell::Empty, |v| Cell::Number(v.to_string())),
        money(best),
        tier_list,
    ];

    if role.sees_suppliers() {
        cells.push(if tiers.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(
                tiers
                    .iter()
                    .map(|t| t.supplier.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        });
    }

    cells
}
