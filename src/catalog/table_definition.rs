use indexmap::IndexMap;

use super::{FieldSchema, FieldType, TableDefinition, TableId};
use crate::validation::validate_required_fields;
use crate::{Row, Value, ValueKind};

impl FieldSchema {
    pub fn new(field_type: FieldType) -> Self {
        FieldSchema {
            field_type,
            title: None,
            description: None,
            minimum: None,
            maximum: None,
            allowed: None,
            decimal_places: None,
        }
    }

    pub fn number(title: &str, description: &str) -> Self {
        FieldSchema::new(FieldType::Number).titled(title, description)
    }

    pub fn string(title: &str, description: &str) -> Self {
        FieldSchema::new(FieldType::String).titled(title, description)
    }

    pub fn titled(mut self, title: &str, description: &str) -> Self {
        self.title = Some(title.to_string());
        self.description = Some(description.to_string());
        self
    }

    pub fn minimum(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn maximum(mut self, maximum: f64) -> Self {
        self.maximum = Some(maximum);
        self
    }

    pub fn one_of(mut self, allowed: Vec<Value>) -> Self {
        self.allowed = Some(allowed);
        self
    }

    pub fn decimal_places(mut self, places: u32) -> Self {
        self.decimal_places = Some(places);
        self
    }

    /// Check a single non-null cell against this field. Returns one message per
    /// violated constraint.
    pub fn check(&self, field: &str, value: &Value) -> Vec<String> {
        let mut problems = Vec::new();

        let kind_matches = matches!(
            (self.field_type, value.get_kind()),
            (FieldType::Number, ValueKind::Number)
                | (FieldType::String, ValueKind::String)
                | (FieldType::Boolean, ValueKind::Bool)
        );
        if !kind_matches {
            problems.push(format!(
                "field '{}' expected {}, got '{}'",
                field, self.field_type, value
            ));
            return problems;
        }

        if let Some(num) = value.as_f64() {
            if let Some(minimum) = self.minimum {
                if num < minimum {
                    problems.push(format!("field '{}' is below minimum {}", field, minimum));
                }
            }
            if let Some(maximum) = self.maximum {
                if num > maximum {
                    problems.push(format!("field '{}' is above maximum {}", field, maximum));
                }
            }
            if let Some(places) = self.decimal_places {
                if decimals(value) > places as usize {
                    problems.push(format!(
                        "field '{}' has more than {} decimal places",
                        field, places
                    ));
                }
            }
        }

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(value) {
                let listed: Vec<String> = allowed.iter().map(|v| v.to_string()).collect();
                problems.push(format!(
                    "field '{}' must be one of: {}",
                    field,
                    listed.join(", ")
                ));
            }
        }

        problems
    }
}

fn decimals(value: &Value) -> usize {
    let repr = value.to_string();
    match repr.split_once('.') {
        Some((_, fraction)) => fraction
            .split(|c| c == 'e' || c == 'E')
            .next()
            .map(str::len)
            .unwrap_or(0),
        None => 0,
    }
}

impl TableDefinition {
    pub fn new(
        id: TableId,
        title: &str,
        short_description: &str,
        required: &[&str],
        properties: Vec<(&str, FieldSchema)>,
    ) -> Self {
        TableDefinition {
            id,
            title: title.to_string(),
            kind: String::from("input"),
            table_type: String::from("grid"),
            short_description: short_description.to_string(),
            required: required.iter().map(|field| field.to_string()).collect(),
            properties: properties
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect::<IndexMap<_, _>>(),
        }
    }

    /// Definition of `id` as served by the planning tool.
    pub fn standard(id: TableId) -> Self {
        let period = || FieldSchema::number("Period", "Period index starting at 1").minimum(1.0);
        let location = || FieldSchema::string("Location", "Location name");
        let product = || FieldSchema::string("Product", "Product name");
        let volume = || FieldSchema::number("Volume", "Volume amount").minimum(0.0);
        let price = || FieldSchema::number("Price", "Price per unit").minimum(0.0);
        let min_volume = || FieldSchema::number("Min Volume", "Minimum volume").minimum(0.0);
        let incoterm = || {
            FieldSchema::string("Incoterm", "International commercial term")
                .one_of(vec![Value::from("FOB"), Value::from("CIF")])
        };
        let cif_or_fob = || {
            FieldSchema::string(
                "CIF Destination or FOB Origin",
                "Destination or origin location",
            )
        };
        let opportunity = || FieldSchema::string("Opportunity", "Opportunity type");

        match id {
            TableId::DomesticDemandForecast => TableDefinition::new(
                id,
                "Domestic Demand Forecast",
                "Domestic demand forecast data",
                &["period", "location", "product", "volume", "price", "minVolume"],
                vec![
                    ("period", period()),
                    ("location", location()),
                    ("product", product()),
                    ("volume", volume()),
                    ("price", price()),
                    ("minVolume", min_volume()),
                ],
            ),
            TableId::ImportOpportunities | TableId::InternationalDemandForecast => {
                let (title, description) = if id == TableId::ImportOpportunities {
                    ("Import Opportunities", "Import opportunities data")
                } else {
                    (
                        "International Demand Forecast",
                        "International demand forecast data",
                    )
                };
                TableDefinition::new(
                    id,
                    title,
                    description,
                    &[
                        "period",
                        "product",
                        "volume",
                        "incoterm",
                        "cifDestinationOrFobOrigin",
                        "price",
                        "opportunity",
                    ],
                    vec![
                        ("period", period()),
                        ("product", product()),
                        ("volume", volume()),
                        ("incoterm", incoterm()),
                        ("cifDestinationOrFobOrigin", cif_or_fob()),
                        ("price", price()),
                        ("opportunity", opportunity()),
                    ],
                )
            }
            TableId::ProductionPlan => TableDefinition::new(
                id,
                "Production Plan",
                "Production plan data",
                &["period", "location", "product", "flow"],
                vec![
                    ("period", period()),
                    ("location", location()),
                    ("product", product()),
                    ("flow", FieldSchema::number("Flow", "Flow amount").minimum(0.0)),
                ],
            ),
            TableId::StockCapacities => TableDefinition::new(
                id,
                "Stock Capacities",
                "Stock capacities (usable)",
                &["period", "location", "product", "minVolume", "capacity"],
                vec![
                    ("period", period()),
                    ("location", location()),
                    ("product", product()),
                    ("minVolume", min_volume()),
                    (
                        "capacity",
                        FieldSchema::number("Capacity", "Maximum capacity").minimum(0.0),
                    ),
                ],
            ),
            TableId::InitialStock => TableDefinition::new(
                id,
                "Initial Stock",
                "Initial stock (usable)",
                &["location", "product", "minVolume"],
                vec![
                    ("location", location()),
                    ("product", product()),
                    ("minVolume", min_volume()),
                ],
            ),
            TableId::LogisticsCosts => TableDefinition::new(
                id,
                "Logistics Costs",
                "Logistics costs data",
                &["vessel", "startDate", "dailyCost", "dailyFixedCosts"],
                vec![
                    ("vessel", FieldSchema::string("Vessel", "Vessel name")),
                    (
                        "startDate",
                        FieldSchema::string("Start Date", "Logistics cost start date (YYYY-MM-DD)"),
                    ),
                    (
                        "dailyCost",
                        FieldSchema::number("Daily Cost", "Daily cost amount").minimum(0.0),
                    ),
                    (
                        "dailyFixedCosts",
                        FieldSchema::number("Daily Fixed Costs", "Daily fixed costs amount")
                            .minimum(0.0),
                    ),
                ],
            ),
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.properties.contains_key(field)
    }

    /// Advisory check of one row against this table's schema. Required fields must be
    /// present and non-null; present cells must match their field schema; fields the
    /// table does not declare are reported too.
    pub fn check_row(&self, row: &Row) -> Vec<String> {
        let mut problems = validate_required_fields(row, &self.required).errors;

        for (field, value) in row {
            match self.properties.get(field) {
                Some(schema) => {
                    if !value.is_null() {
                        problems.extend(schema.check(field, value));
                    }
                }
                None => problems.push(format!("unknown field '{}'", field)),
            }
        }

        problems
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: Vec<(&str, Value)>) -> Row {
        cells
            .into_iter()
            .map(|(field, value)| (field.to_string(), value))
            .collect()
    }

    #[test]
    fn test_conforming_row_has_no_problems() {
        let table = TableDefinition::standard(TableId::DomesticDemandForecast);
        let good = row(vec![
            ("period", Value::from(1)),
            ("location", Value::from("Madrid")),
            ("product", Value::from("Gasoline")),
            ("volume", Value::from(1200)),
            ("price", Value::from(1.45)),
            ("minVolume", Value::from(600)),
        ]);
        assert!(table.check_row(&good).is_empty());
    }

    #[test]
    fn test_row_problems_are_all_reported() {
        let table = TableDefinition::standard(TableId::InitialStock);
        let bad = row(vec![
            ("location", Value::Null),
            ("product", Value::from(7)),
            ("minVolume", Value::from(-1)),
            ("periodId", Value::from(1)),
        ]);
        let problems = table.check_row(&bad);
        assert_eq!(
            problems,
            vec![
                "Missing required field: location".to_string(),
                "field 'product' expected string, got '7'".to_string(),
                "field 'minVolume' is below minimum 0".to_string(),
                "unknown field 'periodId'".to_string(),
            ]
        );
    }

    #[test]
    fn test_enum_and_precision_constraints() {
        let schema = FieldSchema::number("Price", "Price per unit")
            .decimal_places(2)
            .maximum(100.0);
        assert!(schema.check("price", &Value::from(1.25)).is_empty());
        assert_eq!(schema.check("price", &Value::from(1.255)).len(), 1);
        assert_eq!(schema.check("price", &Value::from(100.125)).len(), 2);

        let incoterm = TableDefinition::standard(TableId::ImportOpportunities);
        let schema = &incoterm.properties["incoterm"];
        assert!(schema.check("incoterm", &Value::from("CIF")).is_empty());
        assert_eq!(
            schema.check("incoterm", &Value::from("DAP")),
            vec!["field 'incoterm' must be one of: FOB, CIF".to_string()]
        );
    }

    #[test]
    fn test_definition_serializes_like_the_listing() {
        let table = TableDefinition::standard(TableId::ProductionPlan);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["id"], "productionPlan");
        assert_eq!(json["type"], "input");
        assert_eq!(json["tableType"], "grid");
        assert_eq!(json["shortDescription"], "Production plan data");
        assert_eq!(json["properties"]["period"]["type"], "number");
        assert_eq!(json["properties"]["period"]["minimum"], 1.0);
        assert!(json["properties"]["location"].get("minimum").is_none());
    }
}
