#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use billing_service::*;
use insurance_service::resolve_coverage;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn counter_requests() -> Vec<LineItemRequest> {
    vec![
        LineItemRequest::new("Consultation", "Specialist Consultation"),
        LineItemRequest::new("Diagnostics", "Complete Blood Count").with_quantity(2),
        LineItemRequest::new("Pharmacy", "IV Fluids")
            .with_quantity(3)
            .with_unit_price(dec!(120.50)),
    ]
}

#[test]
fn test_general_consultation_twice() {
    let request = LineItemRequest::new("Consultation", "General Consultation").with_quantity(2);
    let item = build_line_item(&Catalog::standard(), &request).unwrap();
    assert_eq!(item.total_price, dec!(1000));
}

#[test]
fn test_unknown_test_is_validation_error() {
    let request = LineItemRequest::new("Diagnostics", "Unknown Test");
    let err = build_line_item(&Catalog::standard(), &request).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_generate_bill_totals() {
    let service = BillingService::standard();
    let bill = service.generate_bill(&counter_requests()).unwrap();

    assert_eq!(bill.items.len(), 3);
    assert_eq!(bill.subtotal, dec!(2161.50));
    assert_eq!(bill.tax, dec!(389.07));
    assert_eq!(bill.total, dec!(2550.57));
}

#[test]
fn test_invalid_item_fails_whole_bill() {
    let service = BillingService::standard();
    let mut requests = counter_requests();
    requests.push(LineItemRequest::new("Pharmacy", "Medicines"));
    assert!(service.generate_bill(&requests).is_err());
}

#[test]
fn test_coverage_examples() {
    let cashless = resolve_coverage(dec!(1000), "Cashless");
    assert_eq!(cashless.covered, dec!(1000));
    assert_eq!(cashless.patient_amount, dec!(0));

    let cghs = resolve_coverage(dec!(1000), "CGHS");
    assert_eq!(cghs.covered, dec!(950));
    assert_eq!(cghs.patient_amount, dec!(50));
}

#[test]
fn test_cash_examples() {
    let short = reconcile_payment(dec!(1000), &PaymentForm::Cash { tendered: dec!(800) });
    assert!(matches!(short, Err(BillingError::InsufficientAmount { .. })));

    let record = reconcile_payment(dec!(1000), &PaymentForm::Cash { tendered: dec!(1200) }).unwrap();
    assert_eq!(record.change_due, dec!(200));
}

#[tokio::test]
async fn test_settle_with_cghs_and_cash() {
    let gateway = Arc::new(RecordingPaymentGateway::new());
    let service = BillingService::new(Catalog::standard(), BillingPolicy::default(), gateway.clone());

    let bill = service
        .generate_bill(&[LineItemRequest::new("Diagnostics", "CT Scan")])
        .unwrap();
    assert_eq!(bill.total, dec!(5900));

    let settlement = service
        .settle(&bill, Some("CGHS"), &PaymentForm::Cash { tendered: dec!(500) })
        .await
        .unwrap();
    assert_eq!(settlement.coverage.covered, dec!(5605));
    assert_eq!(settlement.payment.patient_amount_due, dec!(295));
    assert_eq!(settlement.payment.change_due, dec!(205));

    let receipt = settlement.receipt.unwrap();
    assert_eq!(receipt.amount, dec!(295));
    assert_eq!(gateway.receipt(settlement.transaction_id), Some(receipt));
}

#[tokio::test]
async fn test_settle_cashless_skips_gateway() {
    let gateway = Arc::new(RecordingPaymentGateway::new());
    let service = BillingService::new(Catalog::standard(), BillingPolicy::default(), gateway.clone());
    let bill = service
        .generate_bill(&[LineItemRequest::new("Room Charges", "ICU (per day)").with_quantity(3)])
        .unwrap();

    let settlement = service
        .settle(
            &bill,
            Some("Cashless"),
            &PaymentForm::InsuranceDirect {
                policy_number: "STAR-55-1029".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(settlement.coverage.patient_amount, dec!(0));
    assert!(settlement.receipt.is_none());
    assert_eq!(gateway.processed_count(), 0);
}

#[tokio::test]
async fn test_settle_installments_with_configured_plans() {
    let policy = BillingPolicy {
        installment_plans: vec![4],
        ..BillingPolicy::default()
    };
    let service = BillingService::new(
        Catalog::standard(),
        policy,
        Arc::new(RecordingPaymentGateway::new()),
    );
    let bill = service
        .generate_bill(&[LineItemRequest::new("Procedures", "Minor Surgery")])
        .unwrap();

    let rejected = service
        .settle(&bill, None, &PaymentForm::Installment { months: 3 })
        .await;
    assert!(rejected.unwrap_err().is_validation());

    let settlement = service
        .settle(&bill, None, &PaymentForm::Installment { months: 4 })
        .await
        .unwrap();
    assert_eq!(settlement.payment.installments, vec![dec!(1475); 4]);
}

#[tokio::test]
async fn test_declined_payment_surfaces_gateway_error() {
    let service = BillingService::new(
        Catalog::standard(),
        BillingPolicy::default(),
        Arc::new(RecordingPaymentGateway::declining()),
    );
    let bill = service.generate_bill(&counter_requests()).unwrap();
    let err = service
        .settle(
            &bill,
            None,
            &PaymentForm::Upi {
                upi_id: "ravi@okaxis".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::Gateway(_)));
}

#[tokio::test]
async fn test_settle_empty_bill_rejected() {
    let service = BillingService::standard();
    let empty = aggregate_bill(&[]);
    assert!(service
        .settle(&empty, None, &PaymentForm::Cash { tendered: dec!(0) })
        .await
        .is_err());
}

fn any_line_item() -> impl Strategy<Value = LineItem> {
    let catalog = Catalog::standard();
    let priced: Vec<CatalogEntry> = catalog
        .entries()
        .filter(|e| !e.requires_manual_price())
        .cloned()
        .collect();
    (prop::sample::select(priced), 1u32..50, 0u32..100).prop_map(move |(entry, quantity, pct)| {
        let gross = Decimal::from(quantity) * entry.unit_price;
        let discount = gross * Decimal::new(i64::from(pct), 2);
        let request = LineItemRequest::new(entry.category.clone(), entry.name.clone())
            .with_quantity(quantity)
            .with_discount(discount);
        build_line_item(&catalog, &request).unwrap()
    })
}

proptest! {
    #[test]
    fn prop_total_is_subtotal_plus_eighteen_percent(items in prop::collection::vec(any_line_item(), 1..12)) {
        let bill = aggregate_bill(&items);
        prop_assert_eq!(bill.total, bill.subtotal * dec!(1.18));
        prop_assert_eq!(bill.subtotal, items.iter().map(|i| i.total_price).sum::<Decimal>());
    }

    #[test]
    fn prop_installments_sum_to_rounded_due(cents in 0i64..10_000_000, months in prop::sample::select(vec![2u32, 3, 6, 12])) {
        let due = Decimal::new(cents, 2);
        let record = reconcile_payment(due, &PaymentForm::Installment { months }).unwrap();
        prop_assert_eq!(record.installments.len(), months as usize);
        prop_assert_eq!(record.installments.iter().copied().sum::<Decimal>(), due);
        prop_assert!(record.installments.iter().all(|p| *p >= Decimal::ZERO));
    }

    #[test]
    fn prop_cash_change_is_exact(due_cents in 0i64..1_000_000, extra_cents in 0i64..1_000_000) {
        let due = Decimal::new(due_cents, 2);
        let tendered = due + Decimal::new(extra_cents, 2);
        let record = reconcile_payment(due, &PaymentForm::Cash { tendered }).unwrap();
        prop_assert_eq!(record.change_due + due, tendered);
    }
}
