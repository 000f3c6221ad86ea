//! Selector metadata for the data-entry grid: the values a field may take and the
//! fields whose current value filters that list.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::TableId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selector {
    pub dependencies: Vec<String>,
    pub items: Vec<String>,
}

/// Field name to selector, in display order.
pub type Selectors = IndexMap<String, Selector>;

const LOCATIONS: &[&str] = &[
    "New York",
    "Los Angeles",
    "Chicago",
    "Houston",
    "Miami",
    "Seattle",
    "Boston",
    "Atlanta",
];
const PRODUCTS: &[&str] = &["Product A", "Product B", "Product C", "Product D", "Product E"];
const VESSELS: &[&str] = &[
    "Vessel Alpha",
    "Vessel Beta",
    "Vessel Gamma",
    "Vessel Delta",
    "Vessel Epsilon",
];
const PORTS: &[&str] = &["Port A", "Port B", "Port C", "Port D", "Port E"];
const INCOTERMS: &[&str] = &["FOB", "CIF"];
const OPPORTUNITIES: &[&str] = &["Standard", "Premium", "Express", "Economy"];

/// One selector rule: field, fields it depends on, candidate values.
type Rule = (&'static str, &'static [&'static str], &'static [&'static str]);

const LOCATION_PRODUCT: &[Rule] = &[
    ("location", &[], LOCATIONS),
    ("product", &["location"], PRODUCTS),
];

const TRADE: &[Rule] = &[
    ("product", &[], PRODUCTS),
    ("incoterm", &[], INCOTERMS),
    ("cifDestinationOrFobOrigin", &["incoterm"], PORTS),
    ("opportunity", &[], OPPORTUNITIES),
];

const VESSEL: &[Rule] = &[("vessel", &[], VESSELS)];

fn rules(table: TableId) -> &'static [Rule] {
    match table {
        TableId::DomesticDemandForecast
        | TableId::ProductionPlan
        | TableId::StockCapacities
        | TableId::InitialStock => LOCATION_PRODUCT,
        TableId::ImportOpportunities | TableId::InternationalDemandForecast => TRADE,
        TableId::LogisticsCosts => VESSEL,
    }
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Selectors of `table`. Pure: the same table always yields the same mapping.
pub fn generate(table: TableId) -> Selectors {
    rules(table)
        .iter()
        .map(|(field, dependencies, items)| {
            (
                field.to_string(),
                Selector {
                    dependencies: to_owned(dependencies),
                    items: to_owned(items),
                },
            )
        })
        .collect()
}

/// Like [`generate`] for a raw identifier; unknown identifiers get no selectors.
pub fn generate_for(table_id: &str) -> Selectors {
    table_id.parse().map(generate).unwrap_or_default()
}
