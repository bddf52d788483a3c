use bigdecimal::BigDecimal;

/// One tier of a supplier's quantity-based price table.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBreakdown {
    pub quantity: u32,
    pub unit_price: BigDecimal,
    pub supplier: String,
    pub stock: u32,
}

/// A product line on the order being confirmed.
///
/// `unit_price` is the price actually charged for this line. The optional
/// reference prices are independent of each other: having a public price says
/// nothing about whether a VAT rate or an average price is known.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductItem {
    pub id: String,
    pub name: String,
    pub code: String,
    pub supplier: String,
    pub quantity: u32,
    pub unit_price: BigDecimal,
    /// Ordered by ascending unit price; tier 0 is the best offer.
    pub price_breakdowns: Vec<PriceBreakdown>,
    pub average_price: Option<BigDecimal>,
    /// VAT-inclusive list price.
    pub public_price: Option<BigDecimal>,
    /// VAT rate as a percentage (20 means 20%).
    pub vat: Option<BigDecimal>,
}

impl ProductItem {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        supplier: impl Into<String>,
        quantity: u32,
        unit_price: BigDecimal,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: String::new(),
            supplier: supplier.into(),
            quantity,
            unit_price,
            price_breakdowns: Vec::new(),
            average_price: None,
            public_price: None,
            vat: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_average_price(mut self, price: BigDecimal) -> Self {
        self.average_price = Some(price);
        self
    }

    pub fn with_public_price(mut self, price: BigDecimal) -> Self {
        self.public_price = Some(price);
        self
    }

    pub fn with_vat(mut self, vat: BigDecimal) -> Self {
        self.vat = Some(vat);
        self
    }

    pub fn with_breakdowns(mut self, breakdowns: Vec<PriceBreakdown>) -> Self {
        self.price_breakdowns = breakdowns;
        self
    }
}
