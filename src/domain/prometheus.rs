// Prometheus query response model and normalization into chart points
use crate::domain::telemetry::DataPoint;
use serde::Deserialize;
use std::collections::HashMap;

/// Body of `/api/v1/query_range`. Every level is optional so partial bodies
/// still deserialize and simply normalize to no points.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "errorType")]
    pub error_type: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<QueryData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryData {
    #[serde(default)]
    pub result: Option<Vec<SeriesResult>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeriesResult {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    #[serde(default)]
    pub values: Vec<SamplePair>,
}

/// `[unix_seconds, "value"]`
#[derive(Debug, Clone, Deserialize)]
pub struct SamplePair(pub f64, pub String);

impl QueryResponse {
    pub fn first_series(&self) -> Option<&SeriesResult> {
        self.data.as_ref()?.result.as_ref()?.first()
    }

    /// Prometheus reports failures in-band with `status: "error"`.
    pub fn failure(&self) -> Option<String> {
        if self.status.as_deref() != Some("error") {
            return None;
        }
        let kind = self.error_type.as_deref().unwrap_or("unknown");
        let message = self.error.as_deref().unwrap_or("no error message");
        Some(format!("{}: {}", kind, message))
    }
}

/// Flatten the first series of a range response into ordered data points.
pub fn normalize(response: &QueryResponse) -> Vec<DataPoint> {
    let Some(series) = response.first_series() else {
        return Vec::new();
    };

    series
        .values
        .iter()
        .map(|SamplePair(timestamp, value)| DataPoint::new(*timestamp, parse_sample_value(value)))
        .collect()
}

/// Parse a sample value the way a JavaScript `Number()` cast does, plus the
/// `+Inf`/`-Inf` spellings Prometheus uses.
pub fn parse_sample_value(raw: &str) -> f64 {
    let trimmed = raw.trim();
    match trimmed {
        "" => return 0.0,
        "Infinity" | "+Infinity" | "+Inf" => return f64::INFINITY,
        "-Infinity" | "-Inf" => return f64::NEG_INFINITY,
        _ => {}
    }

    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }

    // f64::from_str also takes "inf", "nan" and friends in any case
    let is_decimal = trimmed
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !is_decimal {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Unsigned `0x`, `0o` and `0b` integer literals.
fn parse_radix_literal(s: &str) -> Option<f64> {
    let prefix = s.get(..2)?.to_ascii_lowercase();
    let radix = match prefix.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };

    let digits = &s[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(f64::NAN);
    }
    Some(u128::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64))
}
