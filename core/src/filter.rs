use chrono::{DateTime, Utc};
use rusqlite::ToSql;
use serde_json::Value;

/// Structured query over a collection, compiled to SQL against the JSON
/// document and the store-managed meta columns.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone)]
enum Clause {
    Id(String),
    FieldEq(String, Value),
    AnyContains(Vec<String>, String),
    CreatedFrom(DateTime<Utc>),
    CreatedTo(DateTime<Utc>),
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match a document by its id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.clauses.push(Clause::Id(id.into()));
        self
    }

    /// Match documents whose `field` equals `value`.
    pub fn field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.clauses.push(Clause::FieldEq(field.into(), value.into()));
        self
    }

    /// Match documents where any of `fields` contains `needle`,
    /// case-insensitively.
    pub fn contains_any(mut self, fields: &[&str], needle: impl Into<String>) -> Self {
        self.clauses.push(Clause::AnyContains(
            fields.iter().map(|f| (*f).to_string()).collect(),
            needle.into(),
        ));
        self
    }

    /// Constrain creation time to `[from, to]`, either bound optional.
    /// An inverted range (`from > to`) matches nothing.
    pub fn created_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        if let Some(from) = from {
            self.clauses.push(Clause::CreatedFrom(from));
        }
        if let Some(to) = to {
            self.clauses.push(Clause::CreatedTo(to));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Append `AND ...` conditions for every clause, pushing parameters in
    /// positional order.
    pub(crate) fn push_sql(&self, sql: &mut String, params: &mut Vec<Box<dyn ToSql>>) {
        for clause in &self.clauses {
            match clause {
                Clause::Id(id) => {
                    sql.push_str(" AND id = ?");
                    params.push(Box::new(id.clone()));
                }
                Clause::FieldEq(field, value) => {
                    let Some(path) = json_path(field) else { continue };
                    sql.push_str(&format!(" AND json_extract(data, '{}') = ?", path));
                    params.push(value_param(value));
                }
                Clause::AnyContains(fields, needle) => {
                    let paths: Vec<String> = fields.iter().filter_map(|f| json_path(f)).collect();
                    if paths.is_empty() {
                        continue;
                    }
                    let pieces: Vec<String> = paths
                        .iter()
                        .map(|p| format!("json_extract(data, '{}') LIKE ?", p))
                        .collect();
                    sql.push_str(&format!(" AND ({})", pieces.join(" OR ")));
                    for _ in &paths {
                        params.push(Box::new(format!("%{}%", needle)));
                    }
                }
                Clause::CreatedFrom(from) => {
                    sql.push_str(" AND created_at >= ?");
                    params.push(Box::new(from.timestamp_millis()));
                }
                Clause::CreatedTo(to) => {
                    sql.push_str(" AND created_at <= ?");
                    params.push(Box::new(to.timestamp_millis()));
                }
            }
        }
    }
}

/// JSON path for a field name, or `None` if the name is not a plain
/// identifier. Paths are interpolated into SQL, so anything else is refused.
pub(crate) fn json_path(field: &str) -> Option<String> {
    if !field.is_empty()
        && field
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        Some(format!("$.{}", field))
    } else {
        None
    }
}

fn value_param(value: &Value) -> Box<dyn ToSql> {
    match value {
        Value::String(s) => Box::new(s.clone()),
        Value::Number(n) if n.is_i64() => Box::new(n.as_i64().unwrap_or_default()),
        Value::Number(n) => Box::new(n.as_f64().unwrap_or_default()),
        Value::Bool(b) => Box::new(*b),
        Value::Null => Box::new(rusqlite::types::Null),
        other => Box::new(other.to_string()),
    }
}
