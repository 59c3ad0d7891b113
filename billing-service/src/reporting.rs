use crate::bill::Bill;
use crate::payment::PaymentRecord;
use insurance_service::CoverageSplit;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt::Write;

/// Per-category totals of a bill
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub item_count: usize,
    pub gross: Decimal,
    pub discount: Decimal,
    pub net: Decimal,
}

/// Summary of a bill grouped by catalog category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BillReport {
    pub by_category: Vec<CategorySummary>,
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl BillReport {
    /// Categories appear in the order they first occur on the bill
    pub fn from_bill(bill: &Bill) -> Self {
        let mut by_category: Vec<CategorySummary> = Vec::new();
        for item in &bill.items {
            if !by_category.iter().any(|s| s.category == item.category) {
                by_category.push(CategorySummary {
                    category: item.category.clone(),
                    item_count: 0,
                    gross: Decimal::ZERO,
                    discount: Decimal::ZERO,
                    net: Decimal::ZERO,
                });
            }
            let Some(summary) = by_category.iter_mut().find(|s| s.category == item.category) else {
                continue;
            };
            summary.item_count += 1;
            summary.gross += item.gross_amount();
            summary.discount += item.discount;
            summary.net += item.total_price;
        }

        Self {
            by_category,
            subtotal: bill.subtotal,
            total_discount: bill.total_discount(),
            tax: bill.tax,
            total: bill.total,
        }
    }
}

fn money(symbol: &str, amount: Decimal) -> String {
    format!("{symbol}{:.2}", amount)
}

/// Plain-text receipt for the counter printer.
///
/// Coverage and payment sections are printed only when given.
pub fn render_receipt(
    bill: &Bill,
    coverage: Option<&CoverageSplit>,
    payment: Option<&PaymentRecord>,
    currency_symbol: &str,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<40} {:>5} {:>12}", "Service", "Qty", "Amount");
    for item in &bill.items {
        let _ = writeln!(
            out,
            "{:<40} {:>5} {:>12}",
            item.service_name,
            item.quantity,
            money(currency_symbol, item.total_price)
        );
        if !item.discount.is_zero() {
            let _ = writeln!(out, "{:<46} -{}", "  discount", money(currency_symbol, item.discount));
        }
    }
    let _ = writeln!(out, "{}", "-".repeat(59));
    let _ = writeln!(out, "{:<46} {:>12}", "Subtotal", money(currency_symbol, bill.subtotal));
    let tax_label = format!("GST ({}%)", (bill.tax_rate * Decimal::ONE_HUNDRED).normalize());
    let _ = writeln!(out, "{:<46} {:>12}", tax_label, money(currency_symbol, bill.tax));
    let _ = writeln!(out, "{:<46} {:>12}", "Total", money(currency_symbol, bill.total));

    if let Some(split) = coverage {
        let _ = writeln!(out, "{:<46} {:>12}", "Insurance covered", money(currency_symbol, split.covered));
        let _ = writeln!(
            out,
            "{:<46} {:>12}",
            "Patient payable",
            money(currency_symbol, split.patient_amount)
        );
    }

    if let Some(record) = payment {
        let _ = writeln!(out, "Paid by {}", record.method);
        if let Some(reference) = &record.reference {
            let _ = writeln!(out, "  reference {reference}");
        }
        if !record.change_due.is_zero() {
            let _ = writeln!(out, "{:<46} {:>12}", "Change", money(currency_symbol, record.change_due));
        }
        for (month, amount) in record.installments.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:<46} {:>12}",
                format!("  installment {}", month + 1),
                money(currency_symbol, *amount)
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bill::aggregate_bill;
    use crate::catalog::Catalog;
    use crate::line_item::{build_line_item, LineItemRequest};
    use crate::payment::{reconcile_payment, PaymentForm};
    use insurance_service::resolve_coverage;
    use rust_decimal_macros::dec;

    fn sample_bill() -> Bill {
        let catalog = Catalog::standard();
        let items: Vec<_> = [
            LineItemRequest::new("Diagnostics", "X-Ray"),
            LineItemRequest::new("Consultation", "General Consultation"),
            LineItemRequest::new("Diagnostics", "ECG").with_discount(dec!(100)),
        ]
        .iter()
        .map(|r| build_line_item(&catalog, r).unwrap())
        .collect();
        aggregate_bill(&items)
    }

    #[test]
    fn test_report_groups_by_category() {
        let report = BillReport::from_bill(&sample_bill());
        assert_eq!(report.by_category.len(), 2);

        let diagnostics = &report.by_category[0];
        assert_eq!(diagnostics.category, "Diagnostics");
        assert_eq!(diagnostics.item_count, 2);
        assert_eq!(diagnostics.gross, dec!(1400));
        assert_eq!(diagnostics.discount, dec!(100));
        assert_eq!(diagnostics.net, dec!(1300));

        assert_eq!(report.subtotal, dec!(1800));
        assert_eq!(report.total_discount, dec!(100));
        let net: Decimal = report.by_category.iter().map(|s| s.net).sum();
        assert_eq!(net, report.subtotal);
    }

    #[test]
    fn test_receipt_contents() {
        let bill = sample_bill();
        let split = resolve_coverage(bill.total, "CGHS");
        let payment =
            reconcile_payment(split.patient_amount, &PaymentForm::Cash { tendered: dec!(200) }).unwrap();

        let receipt = render_receipt(&bill, Some(&split), Some(&payment), "₹");
        assert!(receipt.contains("X-Ray"));
        assert!(receipt.contains("GST (18%)"));
        assert!(receipt.contains("₹2124.00"));
        assert!(receipt.contains("Patient payable"));
        assert!(receipt.contains("Paid by Cash"));
        assert!(receipt.contains("Change"));
    }

    #[test]
    fn test_receipt_without_payment() {
        let receipt = render_receipt(&sample_bill(), None, None, "Rs ");
        assert!(receipt.contains("Rs 1800.00"));
        assert!(!receipt.contains("Paid by"));
    }
}
