use std::collections::HashSet;

use bigdecimal::{BigDecimal, Zero};

use super::pricing;
use super::product::ProductItem;

/// Order-level statistics derived from the product lines.
///
/// Recomputed from scratch on every call; nothing here is stored. All sums and
/// counts are order-independent.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub product_count: usize,
    pub total_quantity: u64,
    pub unique_supplier_count: usize,
    /// Supplied by the caller, not recomputed from the lines.
    pub total_amount: BigDecimal,
    pub total_savings_vs_average: BigDecimal,
    /// Mean gross discount percent over lines that carry a public price.
    /// `None` when no line does.
    pub average_discount_percent: Option<BigDecimal>,
    pub lines_total: BigDecimal,
}

impl OrderSummary {
    pub fn aggregate(products: &[ProductItem], total_amount: BigDecimal) -> Self {
        let suppliers: HashSet<&str> = products.iter().map(|p| p.supplier.as_str()).collect();

        let total_quantity = products.iter().map(|p| u64::from(p.quantity)).sum();

        let total_savings_vs_average = products
            .iter()
            .map(pricing::savings_vs_average)
            .fold(BigDecimal::zero(), |acc, s| acc + s);

        let lines_total = products
            .iter()
            .map(pricing::line_total)
            .fold(BigDecimal::zero(), |acc, t| acc + t);

        let summary = Self {
            product_count: products.len(),
            total_quantity,
            unique_supplier_count: suppliers.len(),
            total_amount,
            total_savings_vs_average,
            average_discount_percent: average_discount_percent(products),
            lines_total,
        };

        if !summary.is_reconciled() {
            log::warn!(
                "order total {} differs from sum of line totals {}",
                summary.total_amount,
                summary.lines_total
            );
        }

        summary
    }

    /// `total_amount − lines_total`; non-zero when the caller applied
    /// order-level adjustments the lines don't show.
    pub fn amount_delta(&self) -> BigDecimal {
        &self.total_amount - &self.lines_total
    }

    pub fn is_reconciled(&self) -> bool {
        self.amount_delta().is_zero()
    }

    /// Only positive savings are worth showing.
    pub fn has_savings(&self) -> bool {
        self.total_savings_vs_average > BigDecimal::zero()
    }
}

fn average_discount_percent(products: &[ProductItem]) -> Option<BigDecimal> {
    let eligible: Vec<BigDecimal> = products
        .iter()
        .filter(|p| p.public_price.is_some())
        .map(|p| pricing::gross_discount_percent(p).unwrap_or_default())
        .collect();

    if eligible.is_empty() {
        return None;
    }

    let count = BigDecimal::from(eligible.len() as u64);
    let sum = eligible
        .into_iter()
        .fold(BigDecimal::zero(), |acc, pct| acc + pct);
    Some(sum / count)
}
