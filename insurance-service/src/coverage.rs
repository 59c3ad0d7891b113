use crate::models::{CoveragePlan, CoverageRate, CoverageSplit};
use rust_decimal::Decimal;

/// Plan identifier that marks a fully covered cashless admission
pub const CASHLESS_PLAN_ID: &str = "Cashless";

/// Fixed plan table. Fractions are not negotiable at runtime.
const PLAN_TABLE: &[(&str, i64)] = &[
    ("CGHS", 95),
    ("ECHS", 90),
    ("Railways", 85),
    ("TPA Health", 80),
    ("Star Health", 80),
    ("ICICI Lombard", 80),
];

/// Look up the coverage for a plan identifier. Unknown identifiers cover nothing.
pub fn coverage_for(plan_id: &str) -> CoverageRate {
    let plan_id = plan_id.trim();
    if plan_id == CASHLESS_PLAN_ID {
        return CoverageRate::Full;
    }
    PLAN_TABLE
        .iter()
        .find(|(id, _)| *id == plan_id)
        .map_or(CoverageRate::None, |(_, percent)| {
            CoverageRate::Fraction(Decimal::new(*percent, 2))
        })
}

/// Split `total` into the insurer's share and the patient's share.
///
/// `covered + patient_amount == total` holds exactly.
pub fn resolve_coverage(total: Decimal, plan_id: &str) -> CoverageSplit {
    let covered = match coverage_for(plan_id) {
        CoverageRate::Full => total,
        CoverageRate::None => Decimal::ZERO,
        CoverageRate::Fraction(fraction) => total * fraction,
    };
    let split = CoverageSplit {
        total,
        covered,
        patient_amount: total - covered,
    };
    tracing::debug!(
        plan_id,
        total = %split.total,
        covered = %split.covered,
        patient_amount = %split.patient_amount,
        "Resolved coverage"
    );
    split
}

/// Every plan with a non-zero coverage, cashless first
pub fn standard_plans() -> Vec<CoveragePlan> {
    std::iter::once(CoveragePlan {
        plan_id: CASHLESS_PLAN_ID.to_string(),
        coverage: CoverageRate::Full,
    })
    .chain(PLAN_TABLE.iter().map(|(id, _)| CoveragePlan {
        plan_id: (*id).to_string(),
        coverage: coverage_for(id),
    }))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cashless_covers_everything() {
        let split = resolve_coverage(dec!(1000), "Cashless");
        assert_eq!(split.covered, dec!(1000));
        assert_eq!(split.patient_amount, dec!(0));
    }

    #[test]
    fn test_cghs_fraction() {
        let split = resolve_coverage(dec!(1000), "CGHS");
        assert_eq!(split.covered, dec!(950));
        assert_eq!(split.patient_amount, dec!(50));
    }

    #[test]
    fn test_reference_fractions() {
        assert_eq!(coverage_for("ECHS").fraction(), dec!(0.90));
        assert_eq!(coverage_for("Railways").fraction(), dec!(0.85));
        assert_eq!(coverage_for("TPA Health").fraction(), dec!(0.80));
        assert_eq!(coverage_for("Star Health").fraction(), dec!(0.80));
        assert_eq!(coverage_for("ICICI Lombard").fraction(), dec!(0.80));
    }

    #[test]
    fn test_unknown_plan_pays_nothing() {
        let split = resolve_coverage(dec!(1234.50), "Self Pay");
        assert_eq!(split.covered, dec!(0));
        assert_eq!(split.patient_amount, dec!(1234.50));
        assert_eq!(coverage_for(""), CoverageRate::None);
    }

    #[test]
    fn test_plan_id_is_trimmed_but_case_sensitive() {
        assert_eq!(coverage_for("  CGHS "), coverage_for("CGHS"));
        assert_eq!(coverage_for("cghs"), CoverageRate::None);
    }

    #[test]
    fn test_standard_plans_lists_cashless_first() {
        let plans = standard_plans();
        assert_eq!(plans.len(), 7);
        assert_eq!(plans[0].coverage, CoverageRate::Full);
        assert!(plans.iter().all(|p| p.coverage.covers_anything()));
    }
}
