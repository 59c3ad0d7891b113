use billing_service::{parse_quantity, LineItemRequest, PaymentForm};
use clap::{Parser, Subcommand, ValueEnum};
use insurance_service::ClaimStatus;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(name = "billing")]
#[command(about = "Hospital billing counter: price services, split coverage, reconcile payments")]
pub struct Cli {
    /// Billing policy file (yaml, toml or json)
    #[arg(long, global = true, env = "BILLING_CONFIG")]
    pub config: Option<PathBuf>,

    /// JSON list of catalog entries replacing the standard price list
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List catalog services and prices
    Catalog {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
    },
    /// Price services and total the bill
    Bill {
        /// Category:Service[:quantity[:unit price[:discount]]]
        #[arg(long = "item", required = true, value_parser = parse_item)]
        items: Vec<LineItemRequest>,
        /// Add per-category totals
        #[arg(long)]
        report: bool,
    },
    /// Split an amount between insurer and patient; lists plans without --plan
    Coverage {
        #[arg(long)]
        total: Option<Decimal>,
        #[arg(long)]
        plan: Option<String>,
    },
    /// Reconcile a payment form against an amount due
    Pay {
        #[arg(long)]
        due: Decimal,
        /// Payment form as JSON, e.g. '{"method":"cash","tendered":"1200"}'
        #[arg(long, value_parser = parse_form)]
        form: PaymentForm,
    },
    /// Bill, split coverage and settle the patient's share in one step
    Settle {
        #[arg(long = "item", required = true, value_parser = parse_item)]
        items: Vec<LineItemRequest>,
        #[arg(long)]
        plan: Option<String>,
        #[arg(long, value_parser = parse_form)]
        form: PaymentForm,
    },
    /// List insurance claims
    Claims {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },
    /// List insurance providers
    Providers,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusArg {
    Pending,
    Approved,
    Rejected,
}

impl From<StatusArg> for ClaimStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Pending => ClaimStatus::Pending,
            StatusArg::Approved => ClaimStatus::Approved,
            StatusArg::Rejected => ClaimStatus::Rejected,
        }
    }
}

fn parse_amount(raw: &str, field: &str) -> Result<Decimal, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(Decimal::ZERO);
    }
    Decimal::from_str(raw).map_err(|e| format!("invalid {field} '{raw}': {e}"))
}

/// Parse `Category:Service[:quantity[:unit price[:discount]]]`
pub fn parse_item(raw: &str) -> Result<LineItemRequest, String> {
    let mut parts = raw.split(':');
    let category = parts.next().unwrap_or_default();
    let service = parts
        .next()
        .ok_or_else(|| format!("expected Category:Service, got '{raw}'"))?;

    let mut request = LineItemRequest::new(category.trim(), service.trim());
    if let Some(quantity) = parts.next() {
        request.quantity = parse_quantity(quantity).map_err(|e| e.to_string())?;
    }
    if let Some(price) = parts.next() {
        request.unit_price_override = parse_amount(price, "unit price")?;
    }
    if let Some(discount) = parts.next() {
        request.discount = parse_amount(discount, "discount")?;
    }
    if parts.next().is_some() {
        return Err(format!("too many fields in '{raw}'"));
    }
    Ok(request)
}

pub fn parse_form(raw: &str) -> Result<PaymentForm, String> {
    serde_json::from_str(raw).map_err(|e| format!("invalid payment form: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_item_defaults() {
        let item = parse_item("Diagnostics:X-Ray").unwrap();
        assert_eq!(item, LineItemRequest::new("Diagnostics", "X-Ray"));
    }

    #[test]
    fn test_parse_item_all_fields() {
        let item = parse_item("Pharmacy:Medicines:3:45.50:10").unwrap();
        assert_eq!(item.quantity, 3);
        assert_eq!(item.unit_price_override, dec!(45.50));
        assert_eq!(item.discount, dec!(10));
    }

    #[test]
    fn test_parse_item_free_text_quantity() {
        assert_eq!(parse_item("Procedures:Dressing:two").unwrap().quantity, 1);
        assert!(parse_item("Procedures:Dressing:-2").is_err());
        assert!(parse_item("Procedures").is_err());
        assert!(parse_item("Procedures:Dressing:1:0:0:9").is_err());
    }

    #[test]
    fn test_settle_arguments() {
        let cli = Cli::try_parse_from([
            "billing",
            "settle",
            "--item",
            "Consultation:General Consultation:2",
            "--plan",
            "CGHS",
            "--form",
            r#"{"method":"cash","tendered":"200"}"#,
        ])
        .unwrap();
        match cli.command {
            Command::Settle { items, plan, form } => {
                assert_eq!(items.len(), 1);
                assert_eq!(plan.as_deref(), Some("CGHS"));
                assert_eq!(form, PaymentForm::Cash { tendered: dec!(200) });
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
