use crate::catalog::{
    DomesticDemandForecastRow, ImportOpportunitiesRow, InitialStockRow,
    InternationalDemandForecastRow, LogisticsCostsRow, ProductionPlanRow, StockCapacitiesRow,
    TableId, TableRows,
};

/// Fixed sample a datalake sync writes for `table`. Two rows per table, each valid
/// against the table's schema.
pub fn datalake_rows(table: TableId) -> TableRows {
    match table {
        TableId::DomesticDemandForecast => TableRows::DomesticDemandForecast(vec![
            DomesticDemandForecastRow {
                period: 1,
                location: String::from("Madrid"),
                product: String::from("Gasoline"),
                volume: 1200.0,
                price: 1.45,
                min_volume: 600.0,
            },
            DomesticDemandForecastRow {
                period: 2,
                location: String::from("Barcelona"),
                product: String::from("Diesel"),
                volume: 1800.0,
                price: 1.32,
                min_volume: 750.0,
            },
        ]),
        TableId::InternationalDemandForecast => TableRows::InternationalDemandForecast(vec![
            InternationalDemandForecastRow {
                period: 1,
                product: String::from("Gasoline"),
                volume: 2500.0,
                incoterm: String::from("CIF"),
                cif_destination_or_fob_origin: String::from("France"),
                price: 1.55,
                opportunity: String::from("French Market"),
            },
            InternationalDemandForecastRow {
                period: 2,
                product: String::from("Diesel"),
                volume: 3200.0,
                incoterm: String::from("FOB"),
                cif_destination_or_fob_origin: String::from("Italy"),
                price: 1.42,
                opportunity: String::from("Italian Distribution"),
            },
        ]),
        TableId::ImportOpportunities => TableRows::ImportOpportunities(vec![
            ImportOpportunitiesRow {
                period: 1,
                product: String::from("Crude Oil"),
                volume: 5000.0,
                incoterm: String::from("CIF"),
                cif_destination_or_fob_origin: String::from("Barcelona"),
                price: 85.5,
                opportunity: String::from("Algeria Import"),
            },
            ImportOpportunitiesRow {
                period: 2,
                product: String::from("Refined Oil"),
                volume: 3000.0,
                incoterm: String::from("FOB"),
                cif_destination_or_fob_origin: String::from("Morocco"),
                price: 92.3,
                opportunity: String::from("Morocco Refinery"),
            },
        ]),
        TableId::ProductionPlan => TableRows::ProductionPlan(vec![
            ProductionPlanRow {
                period: 1,
                location: String::from("Cartagena"),
                product: String::from("Gasoline"),
                flow: 4200.0,
            },
            ProductionPlanRow {
                period: 2,
                location: String::from("Bilbao"),
                product: String::from("Diesel"),
                flow: 3600.0,
            },
        ]),
        TableId::StockCapacities => TableRows::StockCapacities(vec![
            StockCapacitiesRow {
                period: 1,
                location: String::from("Tank Farm 1"),
                product: String::from("Gasoline"),
                min_volume: 500.0,
                capacity: 5000.0,
            },
            StockCapacitiesRow {
                period: 2,
                location: String::from("Tank Farm 2"),
                product: String::from("Diesel"),
                min_volume: 800.0,
                capacity: 8000.0,
            },
        ]),
        TableId::InitialStock => TableRows::InitialStock(vec![
            InitialStockRow {
                location: String::from("Tank Farm 1"),
                product: String::from("Gasoline"),
                min_volume: 1000.0,
            },
            InitialStockRow {
                location: String::from("Tank Farm 2"),
                product: String::from("Diesel"),
                min_volume: 1500.0,
            },
        ]),
        TableId::LogisticsCosts => TableRows::LogisticsCosts(vec![
            LogisticsCostsRow {
                vessel: String::from("Tanker Alpha"),
                start_date: String::from("2025-01-15"),
                daily_cost: 25000.0,
                daily_fixed_costs: 5000.0,
            },
            LogisticsCostsRow {
                vessel: String::from("Tanker Beta"),
                start_date: String::from("2025-02-01"),
                daily_cost: 28000.0,
                daily_fixed_costs: 5500.0,
            },
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TableDefinition;

    #[test]
    fn test_samples_match_their_tables() {
        for table in TableId::ALL {
            let sample = datalake_rows(table);
            assert_eq!(sample.table_id(), table);
            assert_eq!(sample.len(), 2);

            let definition = TableDefinition::standard(table);
            for row in sample.to_rows() {
                assert!(definition.check_row(&row).is_empty(), "{}: {:?}", table, row);
            }
        }
    }
}
