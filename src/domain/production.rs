use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: u64,
    pub name: String,
}

/// A production record with its property embedded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Production {
    pub id: u64,
    pub safra: String,
    pub production_area: f64,
    pub cultivated_area: Option<f64>,
    pub date: DateTime<Utc>,
    pub crop: String,
    pub property_id: u64,
    pub property: Property,
}

/// Validated input for a new production. The property is referenced by name
/// and resolved by the repository as part of the insert.
#[derive(Debug, Clone)]
pub struct NewProduction {
    pub safra: String,
    pub production_area: f64,
    pub cultivated_area: Option<f64>,
    pub date: DateTime<Utc>,
    pub crop: String,
    pub property_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct ProductionChanges {
    pub safra: Option<String>,
    pub production_area: Option<f64>,
    pub cultivated_area: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub crop: Option<String>,
    pub property_name: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduction {
    pub safra: Option<String>,
    pub production_area: Option<f64>,
    pub cultivated_area: Option<f64>,
    pub date: Option<String>,
    pub property_name: Option<String>,
    pub crop: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduction {
    pub safra: Option<String>,
    pub production_area: Option<f64>,
    pub cultivated_area: Option<f64>,
    pub date: Option<String>,
    pub property_name: Option<String>,
    pub crop: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductionMessage {
    pub message: String,
    pub production: Production,
}

/// Accepts an RFC 3339 timestamp, a naive `YYYY-MM-DDTHH:MM:SS` (read as UTC)
/// or a plain `YYYY-MM-DD` date (midnight UTC).
pub fn parse_production_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
