use crate::coverage::{coverage_for, resolve_coverage};
use crate::error::{InsuranceError, InsuranceResult};
use crate::gateway::ClaimGateway;
use crate::models::*;
use crate::repository::{claim_number_for, ClaimRepository};
use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Insurance service: claim and cashless records on top of the coverage table
pub struct InsuranceService {
    repository: Arc<dyn ClaimRepository>,
    gateway: Arc<dyn ClaimGateway>,
}

impl InsuranceService {
    /// Create a new insurance service
    pub fn new(repository: Arc<dyn ClaimRepository>, gateway: Arc<dyn ClaimGateway>) -> Self {
        Self { repository, gateway }
    }

    /// Coverage configured for a plan identifier
    pub fn plan_for(&self, plan_id: &str) -> CoveragePlan {
        CoveragePlan {
            plan_id: plan_id.trim().to_string(),
            coverage: coverage_for(plan_id),
        }
    }

    /// Record a claim for the insured share of a bill and forward it to the gateway.
    ///
    /// The claim is stored only after the gateway acknowledged it.
    pub async fn submit_claim(&self, request: ClaimRequest) -> InsuranceResult<Claim> {
        if request.patient_name.trim().is_empty() {
            return Err(InsuranceError::Validation("patient name is required".to_string()));
        }
        if request.bill_total <= Decimal::ZERO {
            return Err(InsuranceError::Validation(
                "bill total must be greater than zero".to_string(),
            ));
        }
        let plan = self.plan_for(&request.plan_id);
        if !plan.coverage.covers_anything() {
            warn!(plan_id = %plan.plan_id, "Claim rejected for plan without coverage");
            return Err(InsuranceError::Validation(format!(
                "plan '{}' does not cover hospital bills",
                plan.plan_id
            )));
        }

        let split = resolve_coverage(request.bill_total, &plan.plan_id);
        let id = Uuid::new_v4();
        let claim = Claim {
            id,
            claim_number: claim_number_for(id),
            patient_name: request.patient_name.trim().to_string(),
            plan_id: plan.plan_id,
            bill_reference: request.bill_reference,
            bill_total: split.total,
            claimed_amount: split.covered,
            patient_amount: split.patient_amount,
            status: ClaimStatus::Pending,
            submitted_at: Utc::now(),
            decided_at: None,
            remarks: None,
        };

        let ack = self.gateway.submit_claim(&claim).await?;
        self.repository.insert_claim(claim.clone()).await?;

        info!(
            claim_number = %claim.claim_number,
            plan_id = %claim.plan_id,
            claimed_amount = %claim.claimed_amount,
            gateway_reference = %ack.reference,
            "Claim submitted"
        );
        Ok(claim)
    }

    /// Decide a pending claim
    pub async fn update_claim_status(
        &self,
        claim_id: Uuid,
        status: ClaimStatus,
        remarks: Option<String>,
    ) -> InsuranceResult<Claim> {
        let mut claim = self
            .repository
            .get_claim(claim_id)
            .await?
            .ok_or(InsuranceError::ClaimNotFound(claim_id))?;

        if !claim.status.can_transition_to(status) {
            return Err(InsuranceError::InvalidTransition {
                from: claim.status,
                to: status,
            });
        }

        claim.status = status;
        claim.decided_at = Some(Utc::now());
        claim.remarks = remarks;
        self.repository.update_claim(claim.clone()).await?;

        info!(claim_number = %claim.claim_number, status = %status, "Claim status updated");
        Ok(claim)
    }

    pub async fn get_claim(&self, claim_id: Uuid) -> InsuranceResult<Claim> {
        self.repository
            .get_claim(claim_id)
            .await?
            .ok_or(InsuranceError::ClaimNotFound(claim_id))
    }

    pub async fn list_claims(&self, status: Option<ClaimStatus>) -> InsuranceResult<Vec<Claim>> {
        self.repository.list_claims(status).await
    }

    /// Record a cashless request with the amount the plan would cover on the estimate
    pub async fn request_cashless(
        &self,
        patient_name: &str,
        plan_id: &str,
        estimated_amount: Decimal,
    ) -> InsuranceResult<CashlessRequest> {
        if patient_name.trim().is_empty() {
            return Err(InsuranceError::Validation("patient name is required".to_string()));
        }
        if estimated_amount <= Decimal::ZERO {
            return Err(InsuranceError::Validation(
                "estimated amount must be greater than zero".to_string(),
            ));
        }
        let plan = self.plan_for(plan_id);
        if !plan.coverage.covers_anything() {
            return Err(InsuranceError::Validation(format!(
                "plan '{}' is not eligible for cashless treatment",
                plan.plan_id
            )));
        }

        let request = CashlessRequest {
            id: Uuid::new_v4(),
            patient_name: patient_name.trim().to_string(),
            eligible_amount: resolve_coverage(estimated_amount, &plan.plan_id).covered,
            plan_id: plan.plan_id,
            estimated_amount,
            status: CashlessStatus::Pending,
            requested_at: Utc::now(),
        };
        self.repository.insert_cashless(request.clone()).await?;

        info!(plan_id = %request.plan_id, eligible_amount = %request.eligible_amount, "Cashless request recorded");
        Ok(request)
    }

    pub async fn list_cashless_requests(&self) -> InsuranceResult<Vec<CashlessRequest>> {
        self.repository.list_cashless().await
    }

    pub async fn providers(&self) -> InsuranceResult<Vec<InsuranceProvider>> {
        self.repository.list_providers().await
    }
}
