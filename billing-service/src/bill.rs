use crate::error::{BillingError, BillingResult};
use crate::line_item::LineItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Flat 18% GST applied to every bill
pub const STANDARD_TAX_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 2);

/// Aggregated bill for one transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub items: Vec<LineItem>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl Bill {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_discount(&self) -> Decimal {
        self.items.iter().map(|item| item.discount).sum()
    }
}

/// Sum line items and apply the standard tax rate. An empty slice yields a zero bill.
///
/// Items built by [`crate::build_line_item`] are bounded by
/// [`crate::MAX_LINE_VALUE`]; use [`try_aggregate_bill_with_rate`] for items
/// assembled by hand.
pub fn aggregate_bill(items: &[LineItem]) -> Bill {
    aggregate_bill_with_rate(items, STANDARD_TAX_RATE)
}

/// Sum line items and apply `tax_rate`
pub fn aggregate_bill_with_rate(items: &[LineItem], tax_rate: Decimal) -> Bill {
    let subtotal: Decimal = items.iter().map(|item| item.total_price).sum();
    let tax = subtotal * tax_rate;
    Bill {
        items: items.to_vec(),
        subtotal,
        tax_rate,
        tax,
        total: subtotal + tax,
    }
}

/// Like [`aggregate_bill_with_rate`], failing instead of overflowing
///
/// # Errors
///
/// A validation error when the subtotal, tax or total exceed the `Decimal` range.
pub fn try_aggregate_bill_with_rate(items: &[LineItem], tax_rate: Decimal) -> BillingResult<Bill> {
    let out_of_range = || BillingError::Validation("bill total out of range".to_string());
    let subtotal = items
        .iter()
        .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.total_price))
        .ok_or_else(out_of_range)?;
    let tax = subtotal.checked_mul(tax_rate).ok_or_else(out_of_range)?;
    let total = subtotal.checked_add(tax).ok_or_else(out_of_range)?;
    Ok(Bill {
        items: items.to_vec(),
        subtotal,
        tax_rate,
        tax,
        total,
    })
}
