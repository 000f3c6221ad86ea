use crate::{Row, Value};

impl TryFrom<serde_json::Value> for Value {
    type Error = serde_json::Value;

    /// Arrays and objects are not cell values; they are handed back unchanged.
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(num) => Ok(Value::Number(num)),
            serde_json::Value::String(st) => Ok(Value::String(st)),
            other => Err(other),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(num) => serde_json::Value::Number(num),
            Value::String(st) => serde_json::Value::String(st),
        }
    }
}

/// Convert a JSON object into a [`Row`], keeping key order. The error names the first
/// field that does not hold a scalar.
pub fn row_from_json(value: &serde_json::Value) -> Result<Row, String> {
    let object = match value {
        serde_json::Value::Object(map) => map,
        _ => return Err(String::from("row must be an object")),
    };

    let mut row = Row::with_capacity(object.len());
    for (field, cell) in object {
        match Value::try_from(cell.clone()) {
            Ok(cell) => {
                row.insert(field.clone(), cell);
            }
            Err(_) => return Err(format!("field '{}' must be a scalar value", field)),
        }
    }
    Ok(row)
}

pub fn row_to_json(row: &Row) -> serde_json::Value {
    serde_json::Value::Object(
        row.iter()
            .map(|(field, cell)| (field.clone(), serde_json::Value::from(cell.clone())))
            .collect(),
    )
}
