use crate::bill::STANDARD_TAX_RATE;
use crate::payment::{MAX_INSTALLMENT_MONTHS, STANDARD_INSTALLMENT_PLANS};
use config_engine::{ConfigEngine, ConfigError, ConfigValidator};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix for billing policy overrides, e.g. `BILLING__TAX_RATE=0.12`
pub const POLICY_ENV_PREFIX: &str = "BILLING";

/// Counter policy applied by [`crate::BillingService`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingPolicy {
    pub tax_rate: Decimal,
    /// Installment plans offered, in months
    pub installment_plans: Vec<u32>,
    pub max_quantity: u32,
    pub currency_symbol: String,
}

impl Default for BillingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: STANDARD_TAX_RATE,
            installment_plans: STANDARD_INSTALLMENT_PLANS.to_vec(),
            max_quantity: 1000,
            currency_symbol: "₹".to_string(),
        }
    }
}

impl BillingPolicy {
    /// Load the policy from defaults, an optional file and `BILLING__*` variables
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or the merged policy is invalid.
    pub fn load(path: Option<&Path>) -> config_engine::Result<Self> {
        let mut engine = ConfigEngine::new().with_defaults(&Self::default())?;
        if let Some(path) = path {
            engine = engine.add_file(path);
        }
        engine.with_env_prefix(POLICY_ENV_PREFIX).load_validated()
    }
}

impl ConfigValidator for BillingPolicy {
    fn validate(&self) -> config_engine::Result<()> {
        if self.tax_rate < Decimal::ZERO || self.tax_rate >= Decimal::ONE {
            return Err(ConfigError::ValidationError(format!(
                "tax_rate must be within [0, 1), got {}",
                self.tax_rate
            )));
        }
        if self.installment_plans.is_empty() {
            return Err(ConfigError::ValidationError(
                "installment_plans must not be empty".to_string(),
            ));
        }
        if self.installment_plans.contains(&0) {
            return Err(ConfigError::ValidationError(
                "installment plans must be at least one month".to_string(),
            ));
        }
        if let Some(months) = self.installment_plans.iter().find(|m| **m > MAX_INSTALLMENT_MONTHS) {
            return Err(ConfigError::ValidationError(format!(
                "installment plan of {months} months exceeds the maximum of {MAX_INSTALLMENT_MONTHS}"
            )));
        }
        if self.max_quantity == 0 {
            return Err(ConfigError::ValidationError("max_quantity must be positive".to_string()));
        }
        Ok(())
    }
}
