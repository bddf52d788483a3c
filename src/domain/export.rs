use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;

use super::errors::DomainError;
use super::product::{PriceBreakdown, ProductItem};

pub const UNTITLED_ORDER: &str = "Untitled Order";

/// Who is looking at the order. Only controls which columns are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerRole {
    Admin,
    Restricted,
}

impl ViewerRole {
    /// Exact, case-sensitive match on `"Admin"`.
    pub fn from_role(role: &str) -> Self {
        if role == "Admin" {
            ViewerRole::Admin
        } else {
            ViewerRole::Restricted
        }
    }

    pub fn sees_suppliers(self) -> bool {
        matches!(self, ViewerRole::Admin)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "xlsx" => Ok(ExportFormat::Xlsx),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown export format '{}'. Use csv or xlsx",
                other
            ))),
        }
    }
}

/// Flat, unformatted row handed to a tabular writer.
///
/// Optional fields stay optional; the writer decides how absence looks.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    pub average_price: Option<BigDecimal>,
    pub price_breakdowns: Option<Vec<PriceBreakdown>>,
    pub public_price: Option<BigDecimal>,
    pub vat: Option<BigDecimal>,
}

impl From<&ProductItem> for ExportRow {
    fn from(p: &ProductItem) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            code: p.code.clone(),
            quantity: p.quantity,
            unit_price: p.unit_price.clone(),
            average_price: p.average_price.clone(),
            price_breakdowns: if p.price_breakdowns.is_empty() {
                None
            } else {
                Some(p.price_breakdowns.clone())
            },
            public_price: p.public_price.clone(),
            vat: p.vat.clone(),
        }
    }
}

/// Everything an export sink needs for one file.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub title: String,
    pub rows: Vec<ExportRow>,
    pub format: ExportFormat,
    pub role: ViewerRole,
}

impl ExportRequest {
    pub fn new(
        order_name: &str,
        products: &[ProductItem],
        format: ExportFormat,
        role: ViewerRole,
    ) -> Self {
        Self {
            title: export_title(order_name),
            rows: export_rows(products),
            format,
            role,
        }
    }
}

pub fn export_title(order_name: &str) -> String {
    let trimmed = order_name.trim();
    if trimmed.is_empty() {
        UNTITLED_ORDER.to_string()
    } else {
        trimmed.to_string()
    }
}

pub fn export_rows(products: &[ProductItem]) -> Vec<ExportRow> {
    products.iter().map(ExportRow::from).collect()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn only_exact_admin_sees_suppliers() {
        assert_eq!(ViewerRole::from_role("Admin"), ViewerRole::Admin);
        assert_eq!(ViewerRole::from_role("admin"), ViewerRole::Restricted);
        assert_eq!(ViewerRole::from_role("Buyer"), ViewerRole::Restricted);
        assert_eq!(ViewerRole::from_role(""), ViewerRole::Restricted);
        assert!(ViewerRole::Admin.sees_suppliers());
        assert!(!ViewerRole::Restricted.sees_suppliers());
    }

    #[test]
    fn blank_order_name_gets_default_title() {
        assert_eq!(export_title(""), UNTITLED_ORDER);
        assert_eq!(export_title("  \t"), UNTITLED_ORDER);
        assert_eq!(export_title(" PO-42 "), "PO-42");
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!(ExportFormat::from_str("CSV").unwrap(), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_str("xlsx").unwrap(), ExportFormat::Xlsx);
        assert!(matches!(
            ExportFormat::from_str("pdf"),
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_product_list_exports_no_rows() {
        assert!(export_rows(&[]).is_empty());
        let request = ExportRequest::new("", &[], ExportFormat::Csv, ViewerRole::Restricted);
        assert!(request.rows.is_empty());
        assert_eq!(request.title, UNTITLED_ORDER);
    }

    #[test]
    fn rows_preserve_presence_of_optional_fields() {
        let with_all = ProductItem::new("a", "Syringe 5ml", "Acme", 10, dec("0.12"))
            .with_code("SYR-5")
            .with_average_price(dec("0.15"))
            .with_public_price(dec("0.30"))
            .with_vat(dec("10"))
            .with_breakdowns(vec![PriceBreakdown {
                quantity: 100,
                unit_price: dec("0.10"),
                supplier: "Globex".to_string(),
                stock: 900,
            }]);
        let bare = ProductItem::new("b", "Gauze", "Acme", 1, dec("2"));

        let rows = export_rows(&[with_all, bare]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, "SYR-5");
        assert_eq!(rows[0].average_price, Some(dec("0.15")));
        assert_eq!(rows[0].public_price, Some(dec("0.30")));
        assert_eq!(rows[0].vat, Some(dec("10")));
        assert_eq!(rows[0].price_breakdowns.as_ref().map(Vec::len), Some(1));
        assert_eq!(rows[1].average_price, None);
        assert_eq!(rows[1].price_breakdowns, None);
        assert_eq!(rows[1].public_price, None);
        assert_eq!(rows[1].vat, None);
    }

    #[test]
    fn supplier_names_are_kept_for_the_writer_to_gate() {
        let product = ProductItem::new("a", "Mask", "Acme", 1, dec("1")).with_breakdowns(vec![
            PriceBreakdown {
                quantity: 1,
                unit_price: dec("1"),
                supplier: "Hidden Supplier".to_string(),
                stock: 3,
            },
        ]);

        let request =
            ExportRequest::new("PO", &[product], ExportFormat::Xlsx, ViewerRole::Restricted);

        let tiers = request.rows[0].price_breakdowns.as_ref().expect("tiers kept");
        assert_eq!(tiers[0].supplier, "Hidden Supplier");
        assert_eq!(request.role, ViewerRole::Restricted);
    }
}
