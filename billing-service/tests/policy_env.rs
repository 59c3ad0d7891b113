#![allow(clippy::unwrap_used)]

//! Environment overrides for the billing policy. Kept in its own test binary
//! because `BILLING__*` variables are process-wide.

use billing_service::BillingPolicy;
use rust_decimal_macros::dec;
use std::io::Write;

#[test]
fn test_environment_overrides_policy() {
    std::env::set_var("BILLING__TAX_RATE", "0.12");
    std::env::set_var("BILLING__MAX_QUANTITY", "20");

    let policy = BillingPolicy::load(None).unwrap();
    assert_eq!(policy.tax_rate, dec!(0.12));
    assert_eq!(policy.max_quantity, 20);
    assert_eq!(policy.installment_plans, vec![2, 3, 6, 12]);

    // Environment wins over the file
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "tax_rate: \"0.05\"\ncurrency_symbol: \"Rs \"").unwrap();
    let policy = BillingPolicy::load(Some(file.path())).unwrap();
    assert_eq!(policy.tax_rate, dec!(0.12));
    assert_eq!(policy.currency_symbol, "Rs ");

    // An override that breaks validation is rejected
    std::env::set_var("BILLING__MAX_QUANTITY", "0");
    assert!(BillingPolicy::load(None).is_err());

    std::env::remove_var("BILLING__TAX_RATE");
    std::env::remove_var("BILLING__MAX_QUANTITY");
}
