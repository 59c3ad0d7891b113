use crate::catalog::Catalog;
use crate::error::{BillingError, BillingResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Largest value a single line may reach. Keeps bill sums and tax far below `Decimal::MAX`.
pub const MAX_LINE_VALUE: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// A service selection as entered on the billing form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub category: String,
    pub service: String,
    pub quantity: u32,
    /// Replaces the catalog price when non-zero
    #[serde(default)]
    pub unit_price_override: Decimal,
    #[serde(default)]
    pub discount: Decimal,
}

impl LineItemRequest {
    pub fn new(category: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            service: service.into(),
            quantity: 1,
            unit_price_override: Decimal::ZERO,
            discount: Decimal::ZERO,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_unit_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price_override = unit_price;
        self
    }

    pub fn with_discount(mut self, discount: Decimal) -> Self {
        self.discount = discount;
        self
    }
}

/// One billed service occurrence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub category: String,
    pub service_name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub discount: Decimal,
    /// `quantity * unit_price - discount`, never negative
    pub total_price: Decimal,
}

impl LineItem {
    pub fn gross_amount(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }
}

/// Parse a quantity typed into a free-text field.
///
/// The leading integer part is used (`"2.7"` is 2). Text without a leading
/// integer, and zero, fall back to 1.
///
/// # Errors
///
/// Negative quantities are rejected.
pub fn parse_quantity(raw: &str) -> BillingResult<u32> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let leading: String = digits.chars().take_while(char::is_ascii_digit).collect();

    let value = match leading.parse::<u64>() {
        Ok(value) => value,
        Err(_) if leading.is_empty() => return Ok(1),
        Err(_) => return Err(BillingError::Validation(format!("quantity '{trimmed}' is too large"))),
    };

    if value == 0 {
        return Ok(1);
    }
    if negative {
        return Err(BillingError::Validation(format!(
            "quantity must be positive, got '{trimmed}'"
        )));
    }
    u32::try_from(value)
        .map_err(|_| BillingError::Validation(format!("quantity '{trimmed}' is too large")))
}

/// Price a catalog selection.
///
/// # Errors
///
/// Fails with a validation error when the category or service is missing or
/// unknown, when no price is available, when the line value exceeds
/// [`MAX_LINE_VALUE`], or when the discount is negative or exceeds the line value.
pub fn build_line_item(catalog: &Catalog, request: &LineItemRequest) -> BillingResult<LineItem> {
    let entry = catalog.lookup(&request.category, &request.service)?;

    if request.quantity == 0 {
        return Err(BillingError::Validation("quantity must be at least 1".to_string()));
    }
    if request.unit_price_override < Decimal::ZERO {
        return Err(BillingError::Validation("unit price must not be negative".to_string()));
    }
    if request.discount < Decimal::ZERO {
        return Err(BillingError::Validation("discount must not be negative".to_string()));
    }

    let unit_price = if request.unit_price_override.is_zero() {
        entry.unit_price
    } else {
        request.unit_price_override
    };
    if unit_price.is_zero() {
        return Err(BillingError::Validation(format!(
            "'{}' has no catalog price; enter the price manually",
            entry.name
        )));
    }

    let gross = Decimal::from(request.quantity)
        .checked_mul(unit_price)
        .filter(|gross| *gross <= MAX_LINE_VALUE)
        .ok_or_else(|| {
            BillingError::Validation(format!(
                "line value for '{}' out of range (maximum {MAX_LINE_VALUE})",
                entry.name
            ))
        })?;
    if request.discount > gross {
        return Err(BillingError::Validation(format!(
            "discount {} exceeds line value {}",
            request.discount, gross
        )));
    }

    let item = LineItem {
        category: entry.category.clone(),
        service_name: entry.name.clone(),
        quantity: request.quantity,
        unit_price,
        discount: request.discount,
        total_price: gross - request.discount,
    };
    tracing::debug!(
        category = %item.category,
        service = %item.service_name,
        quantity = item.quantity,
        total_price = %item.total_price,
        "Built line item"
    );
    Ok(item)
}
