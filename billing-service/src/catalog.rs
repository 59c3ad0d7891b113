use crate::error::{BillingError, BillingResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One priced service in the hospital price list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub category: String,
    pub name: String,
    /// Zero means the price is entered manually at billing time
    pub unit_price: Decimal,
}

impl CatalogEntry {
    pub fn new(category: &str, name: &str, unit_price: Decimal) -> Self {
        Self {
            category: category.to_string(),
            name: name.to_string(),
            unit_price,
        }
    }

    pub fn requires_manual_price(&self) -> bool {
        self.unit_price.is_zero()
    }
}

/// Static price list keyed by category and service name.
///
/// Categories and services keep their insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    categories: Vec<(String, Vec<CatalogEntry>)>,
}

const STANDARD_PRICES: &[(&str, &[(&str, i64)])] = &[
    (
        "Consultation",
        &[
            ("General Consultation", 500),
            ("Specialist Consultation", 1000),
            ("Emergency Consultation", 1500),
            ("Follow-up Visit", 300),
        ],
    ),
    (
        "Diagnostics",
        &[
            ("Complete Blood Count", 400),
            ("X-Ray", 800),
            ("ECG", 600),
            ("Ultrasound", 1500),
            ("CT Scan", 5000),
            ("MRI", 8000),
        ],
    ),
    (
        "Procedures",
        &[
            ("Dressing", 200),
            ("Injection", 100),
            ("Minor Surgery", 5000),
            ("Physiotherapy Session", 700),
        ],
    ),
    (
        "Room Charges",
        &[
            ("General Ward (per day)", 1500),
            ("Semi-Private Room (per day)", 3000),
            ("Private Room (per day)", 5000),
            ("ICU (per day)", 10000),
        ],
    ),
    (
        "Pharmacy",
        &[("Medicines", 0), ("Surgical Consumables", 0), ("IV Fluids", 0)],
    ),
];

impl Catalog {
    /// The hospital's standard price list
    pub fn standard() -> Self {
        let categories = STANDARD_PRICES
            .iter()
            .map(|(category, services)| {
                let entries = services
                    .iter()
                    .map(|(name, price)| CatalogEntry::new(category, name, Decimal::from(*price)))
                    .collect();
                ((*category).to_string(), entries)
            })
            .collect();
        Self { categories }
    }

    /// Build a catalog from loose entries, grouping them by category
    ///
    /// # Errors
    ///
    /// Rejects blank names, negative prices and duplicate names within a category.
    pub fn from_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> BillingResult<Self> {
        let mut categories: Vec<(String, Vec<CatalogEntry>)> = Vec::new();

        for entry in entries {
            if entry.category.trim().is_empty() {
                return Err(BillingError::MissingField("category"));
            }
            if entry.name.trim().is_empty() {
                return Err(BillingError::MissingField("service name"));
            }
            if entry.unit_price < Decimal::ZERO {
                return Err(BillingError::Validation(format!(
                    "unit price for '{}' must not be negative",
                    entry.name
                )));
            }

            match categories.iter_mut().find(|(name, _)| *name == entry.category) {
                Some((_, services)) => {
                    if services.iter().any(|s| s.name == entry.name) {
                        return Err(BillingError::Validation(format!(
                            "duplicate service '{}' in category '{}'",
                            entry.name, entry.category
                        )));
                    }
                    services.push(entry);
                }
                None => categories.push((entry.category.clone(), vec![entry])),
            }
        }

        Ok(Self { categories })
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|(name, _)| name.as_str())
    }

    /// Services of a category, `None` when the category does not exist
    pub fn services(&self, category: &str) -> Option<&[CatalogEntry]> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, services)| services.as_slice())
    }

    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.categories.iter().flat_map(|(_, services)| services.iter())
    }

    /// Find a service under a category
    ///
    /// # Errors
    ///
    /// `MissingField` for blank input, `UnknownCatalogEntry` when either part is unknown.
    pub fn lookup(&self, category: &str, service: &str) -> BillingResult<&CatalogEntry> {
        let category = category.trim();
        let service = service.trim();
        if category.is_empty() {
            return Err(BillingError::MissingField("category"));
        }
        if service.is_empty() {
            return Err(BillingError::MissingField("service"));
        }

        self.services(category)
            .and_then(|services| services.iter().find(|s| s.name == service))
            .ok_or_else(|| BillingError::UnknownCatalogEntry {
                category: category.to_string(),
                service: service.to_string(),
            })
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
