//! Per-line price figures.
//!
//! Every figure that depends on an optional reference price is returned as an
//! `Option`: `None` means "not applicable", which is different from a discount
//! of exactly zero. Every division is guarded; `BigDecimal` panics on a zero
//! divisor.

use bigdecimal::{BigDecimal, Zero};

use super::product::{PriceBreakdown, ProductItem};

fn hundred() -> BigDecimal {
    BigDecimal::from(100)
}

/// `part / whole × 100`, or `None` when `whole` is zero.
fn percent_of(part: &BigDecimal, whole: &BigDecimal) -> Option<BigDecimal> {
    if whole.is_zero() {
        return None;
    }
    Some(part / whole * hundred())
}

pub fn line_total(product: &ProductItem) -> BigDecimal {
    &product.unit_price * BigDecimal::from(product.quantity)
}

/// Signed: negative when the current price is worse than the historical
/// average. Zero when no average is known.
pub fn savings_vs_average(product: &ProductItem) -> BigDecimal {
    match &product.average_price {
        Some(average) => (average - &product.unit_price) * BigDecimal::from(product.quantity),
        None => BigDecimal::zero(),
    }
}

pub fn gross_discount(product: &ProductItem) -> Option<BigDecimal> {
    product
        .public_price
        .as_ref()
        .map(|public| public - &product.unit_price)
}

pub fn gross_discount_percent(product: &ProductItem) -> Option<BigDecimal> {
    let public = product.public_price.as_ref()?;
    let discount = gross_discount(product)?;
    percent_of(&discount, public)
}

/// Public price with VAT removed: `public / (1 + vat / 100)`.
///
/// Needs both the public price and the VAT rate.
pub fn net_public_price(product: &ProductItem) -> Option<BigDecimal> {
    let public = product.public_price.as_ref()?;
    let vat = product.vat.as_ref()?;
    let divisor = BigDecimal::from(1) + vat / hundred();
    if divisor.is_zero() {
        return None;
    }
    Some(public / &divisor)
}

pub fn net_discount(product: &ProductItem) -> Option<BigDecimal> {
    net_public_price(product).map(|net| net - &product.unit_price)
}

pub fn net_discount_percent(product: &ProductItem) -> Option<BigDecimal> {
    let net = net_public_price(product)?;
    let discount = &net - &product.unit_price;
    percent_of(&discount, &net)
}

/// Cheapest tier. On equal prices the earlier tier wins.
pub fn best_breakdown(product: &ProductItem) -> Option<&PriceBreakdown> {
    product
        .price_breakdowns
        .iter()
        .min_by(|a, b| a.unit_price.cmp(&b.unit_price))
}

pub fn total_stock(product: &ProductItem) -> u64 {
    product
        .price_breakdowns
        .iter()
        .map(|tier| u64::from(tier.stock))
        .sum()
}

/// What the line would save if bought at the best tier price instead of the
/// chosen price. Negative when the chosen price already beats every tier.
pub fn tier_savings(product: &ProductItem) -> Option<BigDecimal> {
    best_breakdown(product).map(|best| {
        (&product.unit_price - &best.unit_price) * BigDecimal::from(product.quantity)
    })
}

/// All derived figures for a single line.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceFigures {
    pub line_total: BigDecimal,
    pub savings_vs_average: BigDecimal,
    pub gross_discount: Option<BigDecimal>,
    pub gross_discount_percent: Option<BigDecimal>,
    pub net_public_price: Option<BigDecimal>,
    pub net_discount: Option<BigDecimal>,
    pub net_discount_percent: Option<BigDecimal>,
    pub best_tier_price: Option<BigDecimal>,
    pub tier_savings: Option<BigDecimal>,
}

impl PriceFigures {
    pub fn of(product: &ProductItem) -> Self {
        Self {
            line_total: line_total(product),
            savings_vs_average: savings_vs_average(product),
            gross_discount: gross_discount(product),
            gross_discount_percent: gross_discount_percent(product),
            net_public_price: net_public_price(product),
            net_discount: net_discount(product),
            net_discount_percent: net_discount_percent(product),
            best_tier_price: best_breakdown(product).map(|tier| tier.unit_price.clone()),
            tier_savings: tier_savings(product),
        }
    }
}
