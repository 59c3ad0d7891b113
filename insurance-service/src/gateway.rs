use crate::error::{InsuranceError, InsuranceResult};
use crate::models::{Claim, ClaimAcknowledgement};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// External insurer / TPA endpoint that receives claims
#[async_trait]
pub trait ClaimGateway: Send + Sync {
    async fn submit_claim(&self, claim: &Claim) -> InsuranceResult<ClaimAcknowledgement>;
}

/// Gateway that acknowledges every claim locally and remembers what it received
#[derive(Default)]
pub struct RecordingClaimGateway {
    received: Arc<DashMap<Uuid, ClaimAcknowledgement>>,
    unavailable: bool,
}

impl RecordingClaimGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that rejects every submission, for exercising failure paths
    pub fn unavailable() -> Self {
        Self {
            received: Arc::new(DashMap::new()),
            unavailable: true,
        }
    }

    pub fn received_count(&self) -> usize {
        self.received.len()
    }

    pub fn acknowledgement(&self, claim_id: Uuid) -> Option<ClaimAcknowledgement> {
        self.received.get(&claim_id).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl ClaimGateway for RecordingClaimGateway {
    async fn submit_claim(&self, claim: &Claim) -> InsuranceResult<ClaimAcknowledgement> {
        if self.unavailable {
            return Err(InsuranceError::Gateway(format!(
                "claim gateway unavailable for {}",
                claim.claim_number
            )));
        }
        let ack = ClaimAcknowledgement {
            claim_id: claim.id,
            reference: format!("ACK-{}", claim.claim_number),
            received_at: Utc::now(),
        };
        self.received.insert(claim.id, ack.clone());
        Ok(ack)
    }
}
