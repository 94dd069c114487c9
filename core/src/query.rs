use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Relative or explicit date-range selector for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Period {
    #[serde(rename = "today")]
    Today,
    /// The last seven days.
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "lastmonth")]
    LastMonth,
    #[serde(rename = "all")]
    All,
    /// Explicit bounds supplied via `from`/`to`.
    #[serde(rename = "range")]
    Range,
}

/// Parameters accepted by list reads.
///
/// `page` and `offset` are alternative skip strategies; an explicit `offset`
/// wins over a derived `page * limit`. Sort entries may carry a leading `-`
/// for descending order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FindMany {
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Vec<String>,
    /// Reference fields to resolve into their documents.
    #[serde(default)]
    pub populate: Vec<String>,
    pub offset: Option<u64>,
    pub limit: Option<i64>,
    pub page: Option<u64>,
    pub period: Option<Period>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Parameters accepted by single-item reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct FindOne {
    pub search: Option<String>,
    #[serde(default)]
    pub populate: Vec<String>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_period_wire_names() {
        for (wire, period) in [
            ("today", Period::Today),
            ("7", Period::Seven),
            ("lastmonth", Period::LastMonth),
            ("all", Period::All),
            ("range", Period::Range),
        ] {
            let parsed: Period = serde_json::from_str(&format!("\"{}\"", wire)).unwrap();
            assert_eq!(parsed, period);
            assert_eq!(serde_json::to_string(&period).unwrap(), format!("\"{}\"", wire));
        }
    }

    #[test]
    fn test_find_many_defaults() {
        let params: FindMany = serde_json::from_str("{}").unwrap();
        assert!(params.sort.is_empty());
        assert!(params.populate.is_empty());
        assert!(params.limit.is_none());
        assert!(params.period.is_none());
    }
}
