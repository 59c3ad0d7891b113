use crate::error::{BillingError, BillingResult};
use logger_redacted::mask_card_number;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Installment plans offered at the billing counter, in months
pub const STANDARD_INSTALLMENT_PLANS: &[u32] = &[2, 3, 6, 12];

/// Longest installment plan that can be offered
pub const MAX_INSTALLMENT_MONTHS: u32 = 120;

/// Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    DebitCard,
    Upi,
    NetBanking,
    Cheque,
    InsuranceDirect,
    Installment,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Upi => "UPI",
            Self::NetBanking => "Net Banking",
            Self::Cheque => "Cheque",
            Self::InsuranceDirect => "Insurance Direct",
            Self::Installment => "Installment",
        };
        f.write_str(s)
    }
}

/// Card fields; no Luhn or expiry checks are performed
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetails {
    pub card_number: String,
    pub holder_name: String,
    pub cvv: String,
    #[serde(default)]
    pub expiry: Option<String>,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardDetails")
            .field("card_number", &mask_card_number(&self.card_number))
            .field("holder_name", &self.holder_name)
            .field("cvv", &"***")
            .field("expiry", &self.expiry)
            .finish()
    }
}

/// Method-specific payment form. Each variant carries only the fields its method requires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum PaymentForm {
    Cash { tendered: Decimal },
    CreditCard(CardDetails),
    DebitCard(CardDetails),
    Upi { upi_id: String },
    NetBanking { bank_name: String },
    Cheque { cheque_number: String, bank_name: String },
    InsuranceDirect { policy_number: String },
    Installment { months: u32 },
}

impl PaymentForm {
    pub fn method(&self) -> PaymentMethod {
        match self {
            Self::Cash { .. } => PaymentMethod::Cash,
            Self::CreditCard(_) => PaymentMethod::CreditCard,
            Self::DebitCard(_) => PaymentMethod::DebitCard,
            Self::Upi { .. } => PaymentMethod::Upi,
            Self::NetBanking { .. } => PaymentMethod::NetBanking,
            Self::Cheque { .. } => PaymentMethod::Cheque,
            Self::InsuranceDirect { .. } => PaymentMethod::InsuranceDirect,
            Self::Installment { .. } => PaymentMethod::Installment,
        }
    }
}

/// Outcome of reconciling a payment form against the amount due
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub method: PaymentMethod,
    pub amount_tendered: Decimal,
    pub patient_amount_due: Decimal,
    /// Only non-zero for cash
    pub change_due: Decimal,
    pub installment_count: u32,
    /// Per-installment amounts; empty unless paying in installments
    pub installments: Vec<Decimal>,
    /// Masked identifier of the instrument used, safe to log and print
    pub reference: Option<String>,
}

impl PaymentRecord {
    fn settled_in_full(method: PaymentMethod, due: Decimal, reference: Option<String>) -> Self {
        Self {
            method,
            amount_tendered: due,
            patient_amount_due: due,
            change_due: Decimal::ZERO,
            installment_count: 1,
            installments: Vec::new(),
            reference,
        }
    }
}

fn require(value: &str, field: &'static str) -> BillingResult<()> {
    if value.trim().is_empty() {
        return Err(BillingError::MissingField(field));
    }
    Ok(())
}

/// Split `amount_due` into `months` installments.
///
/// The amount is rounded to paise first. Every installment is the monthly share
/// truncated to paise and the final one absorbs the remainder, so the parts sum
/// exactly to the rounded amount. `months` of zero yields no installments.
pub fn split_installments(amount_due: Decimal, months: u32) -> Vec<Decimal> {
    if months == 0 {
        return Vec::new();
    }
    let due = amount_due.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let share = (due / Decimal::from(months)).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let last = due - share * Decimal::from(months - 1);

    let mut parts = vec![share; (months - 1) as usize];
    parts.push(last);
    parts
}

/// Reconcile a payment against the amount due using the standard installment plans.
///
/// # Errors
///
/// `InsufficientAmount` when cash tendered is below the amount due, a
/// validation error when a required field is missing, the amount due is
/// negative, or the installment plan is not offered.
pub fn reconcile_payment(amount_due: Decimal, form: &PaymentForm) -> BillingResult<PaymentRecord> {
    reconcile_payment_with_plans(amount_due, form, STANDARD_INSTALLMENT_PLANS)
}

/// Like [`reconcile_payment`] with a configured set of installment plans
///
/// # Errors
///
/// See [`reconcile_payment`].
pub fn reconcile_payment_with_plans(
    amount_due: Decimal,
    form: &PaymentForm,
    installment_plans: &[u32],
) -> BillingResult<PaymentRecord> {
    if amount_due < Decimal::ZERO {
        return Err(BillingError::Validation(format!(
            "amount due must not be negative, got {amount_due}"
        )));
    }
    let method = form.method();

    let record = match form {
        PaymentForm::Cash { tendered } => {
            if *tendered < amount_due {
                return Err(BillingError::InsufficientAmount {
                    tendered: *tendered,
                    due: amount_due,
                });
            }
            PaymentRecord {
                method,
                amount_tendered: *tendered,
                patient_amount_due: amount_due,
                change_due: *tendered - amount_due,
                installment_count: 1,
                installments: Vec::new(),
                reference: None,
            }
        }
        PaymentForm::CreditCard(card) | PaymentForm::DebitCard(card) => {
            require(&card.card_number, "card number")?;
            require(&card.holder_name, "card holder name")?;
            require(&card.cvv, "CVV")?;
            PaymentRecord::settled_in_full(method, amount_due, Some(mask_card_number(&card.card_number)))
        }
        PaymentForm::Upi { upi_id } => {
            require(upi_id, "UPI ID")?;
            PaymentRecord::settled_in_full(method, amount_due, Some(logger_redacted::redact(upi_id.trim())))
        }
        PaymentForm::NetBanking { bank_name } => {
            require(bank_name, "bank name")?;
            PaymentRecord::settled_in_full(method, amount_due, Some(bank_name.trim().to_string()))
        }
        PaymentForm::Cheque {
            cheque_number,
            bank_name,
        } => {
            require(cheque_number, "cheque number")?;
            require(bank_name, "bank name")?;
            PaymentRecord::settled_in_full(
                method,
                amount_due,
                Some(format!("{} / {}", bank_name.trim(), cheque_number.trim())),
            )
        }
        PaymentForm::InsuranceDirect { policy_number } => {
            require(policy_number, "policy number")?;
            PaymentRecord::settled_in_full(method, amount_due, Some(policy_number.trim().to_string()))
        }
        PaymentForm::Installment { months } => {
            if *months > MAX_INSTALLMENT_MONTHS || !installment_plans.contains(months) {
                return Err(BillingError::Validation(format!(
                    "{months}-month installment plan is not offered"
                )));
            }
            let installments = split_installments(amount_due, *months);
            PaymentRecord {
                method,
                amount_tendered: Decimal::ZERO,
                patient_amount_due: amount_due,
                change_due: Decimal::ZERO,
                installment_count: *months,
                installments,
                reference: Some(format!("{months} monthly installments")),
            }
        }
    };

    tracing::debug!(
        method = %record.method,
        amount_due = %record.patient_amount_due,
        change_due = %record.change_due,
        installments = record.installment_count,
        "Reconciled payment"
    );
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn card() -> CardDetails {
        CardDetails {
            card_number: "4111 1111 1111 1111".to_string(),
            holder_name: "Asha Verma".to_string(),
            cvv: "123".to_string(),
            expiry: Some("12/27".to_string()),
        }
    }

    #[test]
    fn test_cash_insufficient() {
        let err = reconcile_payment(dec!(1000), &PaymentForm::Cash { tendered: dec!(800) }).unwrap_err();
        assert!(matches!(err, BillingError::InsufficientAmount { .. }));
    }

    #[test]
    fn test_cash_change() {
        let record = reconcile_payment(dec!(1000), &PaymentForm::Cash { tendered: dec!(1200) }).unwrap();
        assert_eq!(record.change_due, dec!(200));
        assert_eq!(record.amount_tendered, dec!(1200));
        assert_eq!(record.method, PaymentMethod::Cash);
    }

    #[test]
    fn test_cash_exact() {
        let record = reconcile_payment(dec!(1000), &PaymentForm::Cash { tendered: dec!(1000) }).unwrap();
        assert_eq!(record.change_due, dec!(0));
    }

    #[test]
    fn test_card_requires_fields() {
        for field in ["number", "holder", "cvv"] {
            let mut details = card();
            match field {
                "number" => details.card_number.clear(),
                "holder" => details.holder_name = "  ".to_string(),
                _ => details.cvv.clear(),
            }
            let err = reconcile_payment(dec!(500), &PaymentForm::CreditCard(details)).unwrap_err();
            assert!(err.is_validation(), "{field} should be required");
        }
    }

    #[test]
    fn test_card_reference_is_masked() {
        let record = reconcile_payment(dec!(500), &PaymentForm::DebitCard(card())).unwrap();
        assert_eq!(record.method, PaymentMethod::DebitCard);
        assert_eq!(record.reference.as_deref(), Some("****-****-****-1111"));
        assert_eq!(record.change_due, dec!(0));
        assert!(!format!("{:?}", card()).contains("4111 1111"));
    }

    #[test]
    fn test_upi_requires_id() {
        let err = reconcile_payment(dec!(500), &PaymentForm::Upi { upi_id: String::new() }).unwrap_err();
        assert!(matches!(err, BillingError::MissingField("UPI ID")));

        let record = reconcile_payment(
            dec!(500),
            &PaymentForm::Upi {
                upi_id: "asha@okhdfc".to_string(),
            },
        )
        .unwrap();
        assert!(!record.reference.unwrap().contains("asha"));
    }

    #[test]
    fn test_cheque_and_net_banking_require_fields() {
        let cheque = PaymentForm::Cheque {
            cheque_number: "004512".to_string(),
            bank_name: String::new(),
        };
        assert!(reconcile_payment(dec!(500), &cheque).is_err());

        let net_banking = PaymentForm::NetBanking {
            bank_name: "State Bank of India".to_string(),
        };
        assert!(reconcile_payment(dec!(500), &net_banking).is_ok());

        let insurance = PaymentForm::InsuranceDirect {
            policy_number: " ".to_string(),
        };
        assert!(reconcile_payment(dec!(500), &insurance).is_err());
    }

    #[test]
    fn test_installments_even_split() {
        let record = reconcile_payment(dec!(1200), &PaymentForm::Installment { months: 3 }).unwrap();
        assert_eq!(record.installment_count, 3);
        assert_eq!(record.installments, vec![dec!(400), dec!(400), dec!(400)]);
    }

    #[test]
    fn test_installments_last_absorbs_remainder() {
        let parts = split_installments(dec!(1000), 3);
        assert_eq!(parts, vec![dec!(333.33), dec!(333.33), dec!(333.34)]);

        let parts = split_installments(dec!(1180.005), 12);
        assert_eq!(parts.iter().copied().sum::<Decimal>(), dec!(1180.01));
    }

    #[test]
    fn test_installment_plan_must_be_offered() {
        let err = reconcile_payment(dec!(1000), &PaymentForm::Installment { months: 5 }).unwrap_err();
        assert!(err.is_validation());
        assert!(reconcile_payment_with_plans(dec!(1000), &PaymentForm::Installment { months: 5 }, &[5]).is_ok());

        let huge = PaymentForm::Installment { months: 4_000_000_000 };
        assert!(reconcile_payment_with_plans(dec!(1000), &huge, &[4_000_000_000]).is_err());
    }

    #[test]
    fn test_negative_due_rejected() {
        assert!(reconcile_payment(dec!(-1), &PaymentForm::Cash { tendered: dec!(0) }).is_err());
    }

    #[test]
    fn test_form_deserializes_from_tagged_json() {
        let form: PaymentForm =
            serde_json::from_str(r#"{"method":"cash","tendered":"1500"}"#).unwrap();
        assert_eq!(form, PaymentForm::Cash { tendered: dec!(1500) });

        let form: PaymentForm = serde_json::from_str(
            r#"{"method":"credit_card","card_number":"4111111111111111","holder_name":"A","cvv":"999"}"#,
        )
        .unwrap();
        assert_eq!(form.method(), PaymentMethod::CreditCard);
    }
}
