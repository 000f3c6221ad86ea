use super::{CsvImport, ImportStatus, EMPTY_INPUT, MAX_SAMPLE_ERRORS, TOO_MANY_ERRORS};
use crate::{Row, Value};

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Header names: plain comma split, trimmed, with all double quotes removed.
pub fn parse_header(line: &str) -> Vec<String> {
    line.split(',')
        .map(|name| name.trim().replace('"', ""))
        .collect()
}

/// Quote-aware split of one data line. Quote characters toggle the quoted state and
/// are not part of any token.
pub fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => tokens.push(std::mem::take(&mut current)),
            other => current.push(other),
        }
    }

    tokens.push(current);
    tokens
}

fn parse_number(token: &str) -> Option<Value> {
    if let Ok(int) = token.parse::<i64>() {
        return Some(Value::from(int));
    }

    let float = token.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 && float.abs() <= MAX_SAFE_INTEGER {
        Some(Value::from(float as i64))
    } else {
        Some(Value::from(float))
    }
}

/// Infer the cell type of one token: null, then boolean, then number, else string.
pub fn convert_value(token: &str) -> Value {
    let token = token.trim();

    if token.is_empty() || token.eq_ignore_ascii_case("null") {
        return Value::Null;
    }
    if token.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if token.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }
    if let Some(number) = parse_number(token) {
        return number;
    }

    let unquoted = token
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(token);
    Value::from(unquoted)
}

/// Parse CSV text into rows keyed by the header names.
///
/// Blank lines are ignored. A data line whose token count differs from the header is
/// reported as `Row N: ...` and skipped, where N counts non-blank lines from the
/// header as 1. When the
/// skipped lines make up half or more of the data lines the whole import is aborted.
pub fn parse(raw: &str) -> CsvImport {
    let lines: Vec<(usize, &str)> = raw
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .collect();

    let (header_line, data) = match lines.split_first() {
        Some(((_, header_line), data)) => (*header_line, data),
        None => {
            return CsvImport {
                rows: Vec::new(),
                errors: vec![String::from(EMPTY_INPUT)],
                data_lines: 0,
                status: ImportStatus::Empty,
            }
        }
    };

    let headers = parse_header(header_line);
    let data_lines = data.len();
    let mut rows: Vec<Row> = Vec::with_capacity(data_lines);
    let mut errors: Vec<String> = Vec::new();

    for (line_no, line) in data {
        let tokens = split_line(line);
        if tokens.len() != headers.len() {
            errors.push(format!(
                "Row {}: Expected {} columns, got {}",
                line_no,
                headers.len(),
                tokens.len()
            ));
            continue;
        }

        let row: Row = headers
            .iter()
            .zip(tokens.iter())
            .map(|(header, token)| (header.clone(), convert_value(token)))
            .collect();
        rows.push(row);
    }

    if !errors.is_empty() && errors.len() * 2 >= data_lines {
        let mut summary = Vec::with_capacity(MAX_SAMPLE_ERRORS + 1);
        summary.push(String::from(TOO_MANY_ERRORS));
        summary.extend(errors.into_iter().take(MAX_SAMPLE_ERRORS));
        return CsvImport {
            rows: Vec::new(),
            errors: summary,
            data_lines,
            status: ImportStatus::Aborted,
        };
    }

    CsvImport {
        rows,
        errors,
        data_lines,
        status: ImportStatus::Complete,
    }
}


#[cfg(test)]
mod private_tests_parser;
