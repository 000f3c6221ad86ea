use crate::{DatasetError, DatasetResult};

/// Pull the CSV text out of an upload request. Two encodings are accepted: a JSON
/// object carrying the text in `csvData`, or the raw text as `text/csv` or `text/plain`.
pub fn extract_csv(content_type: &str, body: &str) -> DatasetResult<String> {
    let content_type = content_type.to_ascii_lowercase();

    if content_type.contains("application/json") {
        let json: serde_json::Value = serde_json::from_str(body)
            .map_err(|_| DatasetError::BadRequest(String::from("Invalid JSON body")))?;
        return match json.get("csvData") {
            None | Some(serde_json::Value::Null) => Err(missing_field()),
            Some(serde_json::Value::String(csv)) if csv.is_empty() => Err(missing_field()),
            Some(serde_json::Value::String(csv)) => Ok(csv.clone()),
            Some(_) => Err(DatasetError::BadRequest(String::from("Invalid CSV data"))),
        };
    }

    if content_type.contains("text/csv") || content_type.contains("text/plain") {
        if body.trim().is_empty() {
            return Err(DatasetError::BadRequest(String::from("Empty CSV data")));
        }
        return Ok(body.to_string());
    }

    Err(DatasetError::BadRequest(String::from(
        "Content-Type must be application/json (with csvData field) or text/csv",
    )))
}

fn missing_field() -> DatasetError {
    DatasetError::BadRequest(String::from("Missing csvData field in request body"))
}
