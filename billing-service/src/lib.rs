//! Billing Service for hospital billing counters
//!
//! Provides:
//! - The service catalog and line-item pricing with discounts
//! - Bill aggregation with GST
//! - Insurance coverage split via `insurance-service`
//! - Payment reconciliation for cash, cards, UPI, net banking, cheques,
//!   direct insurance settlement and installment plans
//! - The [`PaymentGateway`] seam and counter receipts
//!
//! All amounts are [`rust_decimal::Decimal`] rupees. The computations in
//! [`line_item`], [`bill`] and [`payment`] are pure; only
//! [`BillingService::settle`] talks to a gateway.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing))]

pub mod bill;
pub mod catalog;
pub mod config;
pub mod error;
pub mod gateway;
pub mod line_item;
pub mod payment;
pub mod reporting;
pub mod service;

pub use bill::*;
pub use catalog::*;
pub use config::*;
pub use error::*;
pub use gateway::*;
pub use line_item::*;
pub use payment::*;
pub use reporting::*;
pub use service::*;
