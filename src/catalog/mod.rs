//! Static registry of the known input tables and their row schemas.

use std::fmt::Display;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{DatasetError, Value};

pub mod catalog;
pub mod rows;
pub mod table_definition;

pub use rows::{
    DomesticDemandForecastRow, ImportOpportunitiesRow, InitialStockRow,
    InternationalDemandForecastRow, LogisticsCostsRow, ProductionPlanRow, StockCapacitiesRow,
    TableRows,
};

/// Identifier of one kind of planning input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableId {
    DomesticDemandForecast,
    ImportOpportunities,
    InternationalDemandForecast,
    ProductionPlan,
    StockCapacities,
    InitialStock,
    LogisticsCosts,
}

impl TableId {
    pub const ALL: [TableId; 7] = [
        TableId::DomesticDemandForecast,
        TableId::ImportOpportunities,
        TableId::InternationalDemandForecast,
        TableId::ProductionPlan,
        TableId::StockCapacities,
        TableId::InitialStock,
        TableId::LogisticsCosts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableId::DomesticDemandForecast => "domesticDemandForecast",
            TableId::ImportOpportunities => "importOpportunities",
            TableId::InternationalDemandForecast => "internationalDemandForecast",
            TableId::ProductionPlan => "productionPlan",
            TableId::StockCapacities => "stockCapacities",
            TableId::InitialStock => "initialStock",
            TableId::LogisticsCosts => "logisticsCosts",
        }
    }
}

impl FromStr for TableId {
    type Err = DatasetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        TableId::ALL
            .iter()
            .find(|id| id.as_str() == value)
            .copied()
            .ok_or_else(|| DatasetError::InvalidIdentifier(value.to_string()))
    }
}

impl Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Number,
    String,
    Boolean,
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Number => f.write_str("number"),
            FieldType::String => f.write_str("string"),
            FieldType::Boolean => f.write_str("boolean"),
        }
    }
}

/// Type and constraints of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
}

/// Schema and display metadata of one input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    pub id: TableId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub table_type: String,
    pub short_description: String,
    pub required: Vec<String>,
    pub properties: IndexMap<String, FieldSchema>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    tables: Vec<TableDefinition>,
}
