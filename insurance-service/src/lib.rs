//! Insurance Service for hospital billing
//!
//! Provides:
//! - The fixed coverage table and the coverage resolver that splits a bill
//!   total into the insurer's share and the patient's share
//! - Claim and cashless request records behind the [`ClaimRepository`] trait
//! - The [`ClaimGateway`] seam towards insurers and TPAs
//!
//! Coverage is a pure lookup; there is no adjudication workflow.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::indexing_slicing))]

pub mod coverage;
pub mod error;
pub mod gateway;
pub mod models;
pub mod repository;
pub mod service;

pub use coverage::*;
pub use error::*;
pub use gateway::*;
pub use models::*;
pub use repository::*;
pub use service::*;
