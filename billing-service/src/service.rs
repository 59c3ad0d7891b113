use crate::bill::{try_aggregate_bill_with_rate, Bill};
use crate::catalog::Catalog;
use crate::config::BillingPolicy;
use crate::error::{BillingError, BillingResult};
use crate::gateway::{PaymentGateway, PaymentReceipt, RecordingPaymentGateway};
use crate::line_item::{build_line_item, LineItem, LineItemRequest};
use crate::payment::{reconcile_payment_with_plans, PaymentForm, PaymentRecord};
use error_common::{log_error, ErrorContext};
use insurance_service::{resolve_coverage, CoverageSplit};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Everything produced while settling one bill at the counter
#[derive(Debug, Clone, Serialize)]
pub struct Settlement {
    pub transaction_id: Uuid,
    pub bill: Bill,
    pub coverage: CoverageSplit,
    pub payment: PaymentRecord,
    /// `None` when the patient owed nothing and no payment was submitted
    pub receipt: Option<PaymentReceipt>,
}

/// Billing service: prices services, totals bills and settles them
pub struct BillingService {
    catalog: Catalog,
    policy: BillingPolicy,
    gateway: Arc<dyn PaymentGateway>,
}

impl BillingService {
    /// Create a new billing service
    pub fn new(catalog: Catalog, policy: BillingPolicy, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            catalog,
            policy,
            gateway,
        }
    }

    /// Standard catalog and policy with a local recording gateway
    pub fn standard() -> Self {
        Self::new(
            Catalog::standard(),
            BillingPolicy::default(),
            Arc::new(RecordingPaymentGateway::new()),
        )
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> &BillingPolicy {
        &self.policy
    }

    /// Price a single selection, enforcing the policy's quantity ceiling
    pub fn price_item(&self, request: &LineItemRequest) -> BillingResult<LineItem> {
        let result = if request.quantity > self.policy.max_quantity {
            Err(BillingError::Validation(format!(
                "quantity {} exceeds the maximum of {}",
                request.quantity, self.policy.max_quantity
            )))
        } else {
            build_line_item(&self.catalog, request)
        };

        if let Err(e) = &result {
            let context = ErrorContext::new()
                .with_operation("price_item")
                .add_context("category", request.category.as_str())
                .add_context("service", request.service.as_str());
            log_error(&context, e);
        }
        result
    }

    /// Price every selection and total the bill. A bill needs at least one item.
    pub fn generate_bill(&self, requests: &[LineItemRequest]) -> BillingResult<Bill> {
        if requests.is_empty() {
            let err = BillingError::Validation("a bill needs at least one service".to_string());
            log_error(&ErrorContext::new().with_operation("generate_bill"), &err);
            return Err(err);
        }
        let items = requests
            .iter()
            .map(|request| self.price_item(request))
            .collect::<BillingResult<Vec<_>>>()?;

        let bill = try_aggregate_bill_with_rate(&items, self.policy.tax_rate).map_err(|e| {
            log_error(&ErrorContext::new().with_operation("generate_bill"), &e);
            e
        })?;
        info!(
            items = bill.items.len(),
            subtotal = %bill.subtotal,
            tax = %bill.tax,
            total = %bill.total,
            "Bill generated"
        );
        Ok(bill)
    }

    /// Insurer and patient shares of a bill. `None` means the patient pays everything.
    pub fn split_coverage(&self, bill: &Bill, plan_id: Option<&str>) -> CoverageSplit {
        match plan_id {
            Some(plan_id) => resolve_coverage(bill.total, plan_id),
            None => CoverageSplit {
                total: bill.total,
                covered: Decimal::ZERO,
                patient_amount: bill.total,
            },
        }
    }

    /// Split a free-standing amount, e.g. an estimate typed at the counter
    ///
    /// # Errors
    ///
    /// A validation error for negative amounts; the resolver itself does not check signs.
    pub fn split_amount(&self, total: Decimal, plan_id: &str) -> BillingResult<CoverageSplit> {
        if total < Decimal::ZERO {
            let err = BillingError::Validation(format!("amount must not be negative, got {total}"));
            log_error(
                &ErrorContext::new()
                    .with_operation("split_amount")
                    .add_context("plan_id", plan_id),
                &err,
            );
            return Err(err);
        }
        Ok(resolve_coverage(total, plan_id))
    }

    /// Reconcile a payment form against an amount using the configured installment plans
    pub fn reconcile(
        &self,
        amount_due: Decimal,
        form: &PaymentForm,
    ) -> BillingResult<PaymentRecord> {
        reconcile_payment_with_plans(amount_due, form, &self.policy.installment_plans)
    }

    /// Split coverage, reconcile the patient's payment and submit it to the gateway
    pub async fn settle(
        &self,
        bill: &Bill,
        plan_id: Option<&str>,
        form: &PaymentForm,
    ) -> BillingResult<Settlement> {
        let transaction_id = Uuid::new_v4();
        let context = ErrorContext::new()
            .with_transaction_id(transaction_id)
            .with_operation("settle");

        match self.settle_inner(transaction_id, bill, plan_id, form).await {
            Ok(settlement) => {
                info!(
                    transaction_id = %transaction_id,
                    method = %settlement.payment.method,
                    total = %settlement.coverage.total,
                    covered = %settlement.coverage.covered,
                    patient_amount = %settlement.coverage.patient_amount,
                    "Bill settled"
                );
                Ok(settlement)
            }
            Err(e) => {
                log_error(&context, &e);
                Err(e)
            }
        }
    }

    async fn settle_inner(
        &self,
        transaction_id: Uuid,
        bill: &Bill,
        plan_id: Option<&str>,
        form: &PaymentForm,
    ) -> BillingResult<Settlement> {
        if bill.is_empty() {
            return Err(BillingError::Validation("cannot settle an empty bill".to_string()));
        }
        let coverage = self.split_coverage(bill, plan_id);
        let payment = self.reconcile(coverage.patient_amount, form)?;

        let receipt = if payment.patient_amount_due.is_zero() {
            None
        } else {
            Some(self.gateway.submit_payment(transaction_id, &payment).await?)
        };

        Ok(Settlement {
            transaction_id,
            bill: bill.clone(),
            coverage,
            payment,
            receipt,
        })
    }
}

impl Default for BillingService {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantity_ceiling() {
        let service = BillingService::standard();
        let request = LineItemRequest::new("Procedures", "Injection").with_quantity(1001);
        assert!(service.price_item(&request).unwrap_err().is_validation());
    }

    #[test]
    fn test_empty_bill_rejected() {
        let service = BillingService::standard();
        assert!(service.generate_bill(&[]).is_err());
    }

    #[test]
    fn test_policy_tax_rate_applied() {
        let policy = BillingPolicy {
            tax_rate: dec!(0.05),
            ..BillingPolicy::default()
        };
        let service = BillingService::new(
            Catalog::standard(),
            policy,
            Arc::new(RecordingPaymentGateway::new()),
        );
        let bill = service
            .generate_bill(&[LineItemRequest::new("Diagnostics", "X-Ray")])
            .unwrap();
        assert_eq!(bill.total, dec!(840));
    }

    #[test]
    fn test_split_amount_rejects_negative_total() {
        let service = BillingService::standard();
        let err = service.split_amount(dec!(-1000), "CGHS").unwrap_err();
        assert!(err.is_validation());

        let split = service.split_amount(dec!(1000), "CGHS").unwrap();
        assert_eq!(split.covered, dec!(950));
        assert_eq!(split.patient_amount, dec!(50));
        assert_eq!(service.split_amount(dec!(0), "ECHS").unwrap().covered, dec!(0));
    }

    #[test]
    fn test_generate_bill_rejects_out_of_range_line() {
        let service = BillingService::standard();
        let request = LineItemRequest::new("Diagnostics", "X-Ray")
            .with_quantity(3)
            .with_unit_price(dec!(39614081257132168796771975168));
        assert!(service.generate_bill(&[request]).unwrap_err().is_validation());
    }

    #[test]
    fn test_no_plan_means_patient_pays_all() {
        let service = BillingService::standard();
        let bill = service
            .generate_bill(&[LineItemRequest::new("Diagnostics", "ECG")])
            .unwrap();
        let split = service.split_coverage(&bill, None);
        assert_eq!(split.covered, dec!(0));
        assert_eq!(split.patient_amount, dec!(708));
    }
}
