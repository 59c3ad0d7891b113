use anyhow::{Context, Result};
use billing_service::{render_receipt, BillReport, BillingService, LineItemRequest, PaymentForm};
use insurance_service::{
    standard_plans, ClaimStatus, CoverageRate, InMemoryClaimRepository,
    InsuranceService, RecordingClaimGateway,
};
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;

/// Renders command output either as text or as pretty JSON
pub struct Output {
    pub json: bool,
    pub currency: String,
}

impl Output {
    fn emit(&self, value: serde_json::Value, text: impl FnOnce() -> String) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            print!("{}", text());
        }
        Ok(())
    }

    fn money(&self, amount: Decimal) -> String {
        format!("{}{:.2}", self.currency, amount)
    }
}

pub fn catalog(service: &BillingService, out: &Output, category: Option<&str>) -> Result<()> {
    let entries: Vec<_> = service
        .catalog()
        .entries()
        .filter(|e| category.map_or(true, |c| e.category == c))
        .collect();
    if let Some(category) = category {
        if entries.is_empty() {
            anyhow::bail!("unknown category '{category}'");
        }
    }

    out.emit(json!(entries), || {
        let mut text = String::new();
        let mut current = "";
        for entry in &entries {
            if entry.category != current {
                current = entry.category.as_str();
                text.push_str(&format!("{current}\n"));
            }
            let price = if entry.requires_manual_price() {
                "manual".to_string()
            } else {
                out.money(entry.unit_price)
            };
            text.push_str(&format!("  {:<40} {:>12}\n", entry.name, price));
        }
        text
    })
}

pub fn bill(service: &BillingService, out: &Output, items: &[LineItemRequest], report: bool) -> Result<()> {
    let bill = service.generate_bill(items)?;
    let summary = report.then(|| BillReport::from_bill(&bill));

    out.emit(json!({ "bill": bill, "report": summary }), || {
        let mut text = render_receipt(&bill, None, None, &out.currency);
        if let Some(summary) = &summary {
            text.push('\n');
            for category in &summary.by_category {
                text.push_str(&format!(
                    "{:<30} {:>3} items {:>12}\n",
                    category.category,
                    category.item_count,
                    out.money(category.net)
                ));
            }
        }
        text
    })
}

pub fn coverage(
    service: &BillingService,
    out: &Output,
    total: Option<Decimal>,
    plan: Option<&str>,
) -> Result<()> {
    match (total, plan) {
        (Some(total), Some(plan)) => {
            let split = service.split_amount(total, plan)?;
            out.emit(json!(split), || {
                format!(
                    "Total     {}\nCovered   {}\nPatient   {}\n",
                    out.money(split.total),
                    out.money(split.covered),
                    out.money(split.patient_amount)
                )
            })
        }
        (None, None) => {
            let plans = standard_plans();
            out.emit(json!(plans), || {
                plans
                    .iter()
                    .map(|p| {
                        let share = match p.coverage {
                            CoverageRate::Full => "100%".to_string(),
                            CoverageRate::Fraction(f) => format!("{}%", (f * Decimal::ONE_HUNDRED).normalize()),
                            CoverageRate::None => "0%".to_string(),
                        };
                        format!("{:<20} {:>5}\n", p.plan_id, share)
                    })
                    .collect()
            })
        }
        _ => anyhow::bail!("--total and --plan must be given together"),
    }
}

pub fn pay(service: &BillingService, out: &Output, due: Decimal, form: &PaymentForm) -> Result<()> {
    let record = service.reconcile(due, form)?;
    logger_redacted::redacted_info!(
        "Payment reconciled by {} ({})",
        record.method,
        record.reference.as_deref().unwrap_or("-")
    );

    out.emit(json!(record), || {
        let mut text = format!("Method    {}\nDue       {}\n", record.method, out.money(record.patient_amount_due));
        if !record.change_due.is_zero() {
            text.push_str(&format!("Change    {}\n", out.money(record.change_due)));
        }
        for (i, amount) in record.installments.iter().enumerate() {
            text.push_str(&format!("Month {:<4}{}\n", i + 1, out.money(*amount)));
        }
        text
    })
}

pub async fn settle(
    service: &BillingService,
    out: &Output,
    items: &[LineItemRequest],
    plan: Option<&str>,
    form: &PaymentForm,
) -> Result<()> {
    let bill = service.generate_bill(items)?;
    let settlement = service
        .settle(&bill, plan, form)
        .await
        .context("settlement failed")?;

    out.emit(json!(settlement), || {
        let mut text = render_receipt(
            &settlement.bill,
            Some(&settlement.coverage),
            Some(&settlement.payment),
            &out.currency,
        );
        if let Some(receipt) = &settlement.receipt {
            text.push_str(&format!("Receipt {}\n", receipt.reference));
        }
        text
    })
}

fn insurance() -> InsuranceService {
    InsuranceService::new(
        Arc::new(InMemoryClaimRepository::seeded()),
        Arc::new(RecordingClaimGateway::new()),
    )
}

pub async fn claims(out: &Output, status: Option<ClaimStatus>) -> Result<()> {
    let claims = insurance().list_claims(status).await?;
    out.emit(json!(claims), || {
        claims
            .iter()
            .map(|c| {
                format!(
                    "{}  {:<20} {:<14} {:>12}  {}\n",
                    c.claim_number,
                    c.patient_name,
                    c.plan_id,
                    out.money(c.claimed_amount),
                    c.status
                )
            })
            .collect()
    })
}

pub async fn providers(out: &Output) -> Result<()> {
    let providers = insurance().providers().await?;
    out.emit(json!(providers), || {
        providers
            .iter()
            .map(|p| format!("{:<25} {:?}\n", p.name, p.provider_type))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn text_output() -> Output {
        Output {
            json: false,
            currency: "₹".to_string(),
        }
    }

    #[test]
    fn test_coverage_rejects_negative_total() {
        let service = BillingService::standard();
        assert!(coverage(&service, &text_output(), Some(dec!(-1000)), Some("CGHS")).is_err());
        assert!(coverage(&service, &text_output(), Some(dec!(1000)), Some("CGHS")).is_ok());
    }

    #[test]
    fn test_coverage_requires_total_and_plan_together() {
        let service = BillingService::standard();
        assert!(coverage(&service, &text_output(), Some(dec!(1000)), None).is_err());
    }
}
