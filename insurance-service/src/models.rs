use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Share of a bill an insurance plan pays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "fraction", rename_all = "lowercase")]
pub enum CoverageRate {
    /// Plan pays the whole bill (cashless admissions)
    Full,
    /// Plan pays a fixed fraction between 0 and 1
    Fraction(Decimal),
    /// Unknown or self-pay; the patient pays everything
    None,
}

impl CoverageRate {
    /// Effective fraction in `0..=1`
    pub fn fraction(&self) -> Decimal {
        match self {
            Self::Full => Decimal::ONE,
            Self::Fraction(f) => *f,
            Self::None => Decimal::ZERO,
        }
    }

    pub fn covers_anything(&self) -> bool {
        self.fraction() > Decimal::ZERO
    }
}

/// A plan identifier with its fixed coverage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveragePlan {
    pub plan_id: String,
    pub coverage: CoverageRate,
}

/// Result of splitting a bill total between insurer and patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageSplit {
    pub total: Decimal,
    pub covered: Decimal,
    pub patient_amount: Decimal,
}

/// Provider type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    Government,
    Private,
    Tpa,
}

/// Insurance provider or third-party administrator accepted at the hospital
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceProvider {
    pub name: String,
    pub provider_type: ProviderType,
    pub coverage: CoverageRate,
}

/// Claim status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

impl ClaimStatus {
    /// Only pending claims may be decided; decisions are final.
    pub fn can_transition_to(self, next: ClaimStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Approved) | (Self::Pending, Self::Rejected)
        )
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Insurance claim record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: Uuid,
    pub claim_number: String,
    pub patient_name: String,
    pub plan_id: String,
    pub bill_reference: Option<Uuid>,
    pub bill_total: Decimal,
    pub claimed_amount: Decimal,
    pub patient_amount: Decimal,
    pub status: ClaimStatus,
    pub submitted_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
    pub remarks: Option<String>,
}

/// Input for a new claim
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub patient_name: String,
    pub plan_id: String,
    pub bill_total: Decimal,
    pub bill_reference: Option<Uuid>,
}

/// Cashless request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CashlessStatus {
    Pending,
    Approved,
    Rejected,
}

/// Pre-admission cashless request record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashlessRequest {
    pub id: Uuid,
    pub patient_name: String,
    pub plan_id: String,
    pub estimated_amount: Decimal,
    /// Amount the plan's fixed coverage would pay on the estimate
    pub eligible_amount: Decimal,
    pub status: CashlessStatus,
    pub requested_at: DateTime<Utc>,
}

/// Acknowledgement returned by a claim gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimAcknowledgement {
    pub claim_id: Uuid,
    pub reference: String,
    pub received_at: DateTime<Utc>,
}
