use crate::coverage::coverage_for;
use crate::error::InsuranceResult;
use crate::models::*;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

/// Storage for claim, cashless request and provider records
#[async_trait]
pub trait ClaimRepository: Send + Sync {
    async fn insert_claim(&self, claim: Claim) -> InsuranceResult<()>;

    async fn get_claim(&self, id: Uuid) -> InsuranceResult<Option<Claim>>;

    /// Replace an existing claim
    async fn update_claim(&self, claim: Claim) -> InsuranceResult<()>;

    /// Claims ordered by submission time; `None` lists every status
    async fn list_claims(&self, status: Option<ClaimStatus>) -> InsuranceResult<Vec<Claim>>;

    async fn insert_cashless(&self, request: CashlessRequest) -> InsuranceResult<()>;

    async fn list_cashless(&self) -> InsuranceResult<Vec<CashlessRequest>>;

    async fn list_providers(&self) -> InsuranceResult<Vec<InsuranceProvider>>;
}

/// In-memory repository for tests, demos and the CLI
pub struct InMemoryClaimRepository {
    claims: Arc<DashMap<Uuid, Claim>>,
    cashless: Arc<DashMap<Uuid, CashlessRequest>>,
    providers: Vec<InsuranceProvider>,
}

impl InMemoryClaimRepository {
    /// Empty claim and cashless stores with the standard provider list
    pub fn new() -> Self {
        Self {
            claims: Arc::new(DashMap::new()),
            cashless: Arc::new(DashMap::new()),
            providers: standard_providers(),
        }
    }

    /// Repository pre-populated with a few sample records
    pub fn seeded() -> Self {
        let repo = Self::new();
        let now = Utc::now();

        let samples = [
            ("Ramesh Kumar", "CGHS", Decimal::new(45_000, 0), ClaimStatus::Pending, 2),
            ("Priya Sharma", "Star Health", Decimal::new(125_000, 0), ClaimStatus::Approved, 10),
            ("Mohammed Iqbal", "ICICI Lombard", Decimal::new(32_500, 0), ClaimStatus::Rejected, 20),
        ];
        for (patient, plan, total, status, days_ago) in samples {
            let covered = total * coverage_for(plan).fraction();
            let id = Uuid::new_v4();
            let submitted_at = now - Duration::days(days_ago);
            repo.claims.insert(
                id,
                Claim {
                    id,
                    claim_number: claim_number_for(id),
                    patient_name: patient.to_string(),
                    plan_id: plan.to_string(),
                    bill_reference: None,
                    bill_total: total,
                    claimed_amount: covered,
                    patient_amount: total - covered,
                    status,
                    submitted_at,
                    decided_at: (status != ClaimStatus::Pending).then(|| submitted_at + Duration::days(3)),
                    remarks: (status == ClaimStatus::Rejected)
                        .then(|| "Pre-existing condition exclusion".to_string()),
                },
            );
        }

        let id = Uuid::new_v4();
        let estimate = Decimal::new(80_000, 0);
        repo.cashless.insert(
            id,
            CashlessRequest {
                id,
                patient_name: "Anita Desai".to_string(),
                plan_id: "ECHS".to_string(),
                estimated_amount: estimate,
                eligible_amount: estimate * coverage_for("ECHS").fraction(),
                status: CashlessStatus::Pending,
                requested_at: now - Duration::days(1),
            },
        );

        repo
    }
}

impl Default for InMemoryClaimRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// Human readable claim number derived from the claim id
pub fn claim_number_for(id: Uuid) -> String {
    let simple = id.simple().to_string().to_uppercase();
    format!("CLM-{}", simple.get(..8).unwrap_or(&simple))
}

fn standard_providers() -> Vec<InsuranceProvider> {
    [
        ("CGHS", ProviderType::Government),
        ("ECHS", ProviderType::Government),
        ("Railways", ProviderType::Government),
        ("TPA Health", ProviderType::Tpa),
        ("Star Health", ProviderType::Private),
        ("ICICI Lombard", ProviderType::Private),
    ]
    .into_iter()
    .map(|(name, provider_type)| InsuranceProvider {
        name: name.to_string(),
        provider_type,
        coverage: coverage_for(name),
    })
    .collect()
}

#[async_trait]
impl ClaimRepository for InMemoryClaimRepository {
    async fn insert_claim(&self, claim: Claim) -> InsuranceResult<()> {
        self.claims.insert(claim.id, claim);
        Ok(())
    }

    async fn get_claim(&self, id: Uuid) -> InsuranceResult<Option<Claim>> {
        Ok(self.claims.get(&id).map(|entry| entry.value().clone()))
    }

    async fn update_claim(&self, claim: Claim) -> InsuranceResult<()> {
        match self.claims.get_mut(&claim.id) {
            Some(mut entry) => {
                *entry = claim;
                Ok(())
            }
            None => Err(crate::error::InsuranceError::ClaimNotFound(claim.id)),
        }
    }

    async fn list_claims(&self, status: Option<ClaimStatus>) -> InsuranceResult<Vec<Claim>> {
        let mut claims: Vec<Claim> = self
            .claims
            .iter()
            .filter(|entry| status.map_or(true, |s| entry.value().status == s))
            .map(|entry| entry.value().clone())
            .collect();
        claims.sort_by(|a, b| {
            a.submitted_at
                .cmp(&b.submitted_at)
                .then_with(|| a.claim_number.cmp(&b.claim_number))
        });
        Ok(claims)
    }

    async fn insert_cashless(&self, request: CashlessRequest) -> InsuranceResult<()> {
        self.cashless.insert(request.id, request);
        Ok(())
    }

    async fn list_cashless(&self) -> InsuranceResult<Vec<CashlessRequest>> {
        let mut requests: Vec<CashlessRequest> =
            self.cashless.iter().map(|entry| entry.value().clone()).collect();
        requests.sort_by(|a, b| a.requested_at.cmp(&b.requested_at));
        Ok(requests)
    }

    async fn list_providers(&self) -> InsuranceResult<Vec<InsuranceProvider>> {
        Ok(self.providers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seeded_repository_has_sample_records() {
        let repo = InMemoryClaimRepository::seeded();
        let claims = repo.list_claims(None).await.unwrap();
        assert_eq!(claims.len(), 3);
        // oldest first
        assert_eq!(claims[0].patient_name, "Mohammed Iqbal");

        let pending = repo.list_claims(Some(ClaimStatus::Pending)).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert!(pending[0].decided_at.is_none());

        assert_eq!(repo.list_cashless().await.unwrap().len(), 1);
        assert_eq!(repo.list_providers().await.unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_update_missing_claim_fails() {
        let repo = InMemoryClaimRepository::new();
        let mut claim = InMemoryClaimRepository::seeded()
            .list_claims(None)
            .await
            .unwrap()
            .remove(0);
        claim.status = ClaimStatus::Approved;
        assert!(repo.update_claim(claim).await.is_err());
    }

    #[test]
    fn test_claim_number_format() {
        let number = claim_number_for(Uuid::new_v4());
        assert!(number.starts_with("CLM-"));
        assert_eq!(number.len(), 12);
    }
}
