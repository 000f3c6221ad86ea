use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::TableId;
use crate::value_conv::{row_from_json, row_to_json};
use crate::{DatasetError, DatasetResult, Row, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomesticDemandForecastRow {
    pub period: u32,
    pub location: String,
    pub product: String,
    pub volume: f64,
    pub price: f64,
    pub min_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOpportunitiesRow {
    pub period: u32,
    pub product: String,
    pub volume: f64,
    pub incoterm: String,
    pub cif_destination_or_fob_origin: String,
    pub price: f64,
    pub opportunity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternationalDemandForecastRow {
    pub period: u32,
    pub product: String,
    pub volume: f64,
    pub incoterm: String,
    pub cif_destination_or_fob_origin: String,
    pub price: f64,
    pub opportunity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductionPlanRow {
    pub period: u32,
    pub location: String,
    pub product: String,
    pub flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockCapacitiesRow {
    pub period: u32,
    pub location: String,
    pub product: String,
    pub min_volume: f64,
    pub capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialStockRow {
    pub location: String,
    pub product: String,
    pub min_volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticsCostsRow {
    pub vessel: String,
    pub start_date: String,
    pub daily_cost: f64,
    pub daily_fixed_costs: f64,
}

/// Rows of one table, typed by table kind. Serializes as `{"tableId": .., "rows": [..]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tableId", content = "rows", rename_all = "camelCase")]
pub enum TableRows {
    DomesticDemandForecast(Vec<DomesticDemandForecastRow>),
    ImportOpportunities(Vec<ImportOpportunitiesRow>),
    InternationalDemandForecast(Vec<InternationalDemandForecastRow>),
    ProductionPlan(Vec<ProductionPlanRow>),
    StockCapacities(Vec<StockCapacitiesRow>),
    InitialStock(Vec<InitialStockRow>),
    LogisticsCosts(Vec<LogisticsCostsRow>),
}

fn decode<T: DeserializeOwned>(rows: &[Row]) -> DatasetResult<Vec<T>> {
    rows.iter()
        .enumerate()
        .map(|(idx, row)| {
            serde_json::from_value(row_to_json(row))
                .map_err(|err| DatasetError::Validation(vec![format!("rows[{}]: {}", idx, err)]))
        })
        .collect()
}

/// Whole floats go back out as integers, the way the CSV importer reads them.
fn integral(cell: Value) -> Value {
    match &cell {
        Value::Number(num) if num.is_f64() => match num.as_f64() {
            Some(float) if float.fract() == 0.0 && float.abs() <= 9_007_199_254_740_991.0 => {
                Value::from(float as i64)
            }
            _ => cell,
        },
        _ => cell,
    }
}

fn encode<T: Serialize>(rows: &[T]) -> Vec<Row> {
    rows.iter()
        .filter_map(|row| serde_json::to_value(row).ok())
        .filter_map(|json| row_from_json(&json).ok())
        .map(|row| row.into_iter().map(|(field, cell)| (field, integral(cell))).collect())
        .collect()
}

impl TableRows {
    /// Decode loosely typed rows into the variant of `table`. Fails on the first row
    /// that misses a field or carries a value of the wrong type.
    pub fn from_rows(table: TableId, rows: &[Row]) -> DatasetResult<Self> {
        Ok(match table {
            TableId::DomesticDemandForecast => TableRows::DomesticDemandForecast(decode(rows)?),
            TableId::ImportOpportunities => TableRows::ImportOpportunities(decode(rows)?),
            TableId::InternationalDemandForecast => {
                TableRows::InternationalDemandForecast(decode(rows)?)
            }
            TableId::ProductionPlan => TableRows::ProductionPlan(decode(rows)?),
            TableId::StockCapacities => TableRows::StockCapacities(decode(rows)?),
            TableId::InitialStock => TableRows::InitialStock(decode(rows)?),
            TableId::LogisticsCosts => TableRows::LogisticsCosts(decode(rows)?),
        })
    }

    pub fn to_rows(&self) -> Vec<Row> {
        match self {
            TableRows::DomesticDemandForecast(rows) => encode(rows),
            TableRows::ImportOpportunities(rows) => encode(rows),
            TableRows::InternationalDemandForecast(rows) => encode(rows),
            TableRows::ProductionPlan(rows) => encode(rows),
            TableRows::StockCapacities(rows) => encode(rows),
            TableRows::InitialStock(rows) => encode(rows),
            TableRows::LogisticsCosts(rows) => encode(rows),
        }
    }

    pub fn table_id(&self) -> TableId {
        match self {
            TableRows::DomesticDemandForecast(_) => TableId::DomesticDemandForecast,
            TableRows::ImportOpportunities(_) => TableId::ImportOpportunities,
            TableRows::InternationalDemandForecast(_) => TableId::InternationalDemandForecast,
            TableRows::ProductionPlan(_) => TableId::ProductionPlan,
            TableRows::StockCapacities(_) => TableId::StockCapacities,
            TableRows::InitialStock(_) => TableId::InitialStock,
            TableRows::LogisticsCosts(_) => TableId::LogisticsCosts,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            TableRows::DomesticDemandForecast(rows) => rows.len(),
            TableRows::ImportOpportunities(rows) => rows.len(),
            TableRows::InternationalDemandForecast(rows) => rows.len(),
            TableRows::ProductionPlan(rows) => rows.len(),
            TableRows::StockCapacities(rows) => rows.len(),
            TableRows::InitialStock(rows) => rows.len(),
            TableRows::LogisticsCosts(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
