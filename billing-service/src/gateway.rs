use crate::error::{BillingError, BillingResult};
use crate::payment::{PaymentMethod, PaymentRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Confirmation returned by a payment processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    pub transaction_id: Uuid,
    pub reference: String,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub processed_at: DateTime<Utc>,
}

/// External processor that actually moves funds for a reconciled payment
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn submit_payment(
        &self,
        transaction_id: Uuid,
        record: &PaymentRecord,
    ) -> BillingResult<PaymentReceipt>;
}

/// Gateway that approves every payment locally and keeps the receipts
#[derive(Default)]
pub struct RecordingPaymentGateway {
    receipts: Arc<DashMap<Uuid, PaymentReceipt>>,
    declining: bool,
}

impl RecordingPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that declines every payment
    pub fn declining() -> Self {
        Self {
            receipts: Arc::new(DashMap::new()),
            declining: true,
        }
    }

    pub fn receipt(&self, transaction_id: Uuid) -> Option<PaymentReceipt> {
        self.receipts.get(&transaction_id).map(|entry| entry.value().clone())
    }

    pub fn processed_count(&self) -> usize {
        self.receipts.len()
    }
}

#[async_trait]
impl PaymentGateway for RecordingPaymentGateway {
    async fn submit_payment(
        &self,
        transaction_id: Uuid,
        record: &PaymentRecord,
    ) -> BillingResult<PaymentReceipt> {
        if self.declining {
            return Err(BillingError::Gateway(format!(
                "{} payment declined for transaction {transaction_id}",
                record.method
            )));
        }
        if self.receipts.contains_key(&transaction_id) {
            return Err(BillingError::Gateway(format!(
                "transaction {transaction_id} was already processed"
            )));
        }

        let short: String = transaction_id.simple().to_string().chars().take(10).collect();
        let receipt = PaymentReceipt {
            transaction_id,
            reference: format!("PAY-{}", short.to_uppercase()),
            method: record.method,
            amount: record.patient_amount_due,
            processed_at: Utc::now(),
        };
        self.receipts.insert(transaction_id, receipt.clone());
        Ok(receipt)
    }
}
