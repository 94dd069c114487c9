use std::marker::PhantomData;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, ToSql};
use serde_json::{json, Value};

use crate::entity::{Doc, Entity};
use crate::error::{StoreError, StoreResult};
use crate::filter::{json_path, Filter};
use crate::pagination::{PageRequest, Paginated, SortKey};
use crate::query::FindMany;
use crate::schema;

/// Open or create a document store at the specified path
pub fn open_store(path: &Path) -> StoreResult<Store> {
    let conn = Connection::open(path)?;
    schema::migrate(&conn)?;
    Ok(Store { conn })
}

/// A document store over a single SQLite connection. Typed access goes
/// through [`Store::collection`].
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn collection<T: Entity>(&self) -> Collection<'_, T> {
        Collection {
            conn: &self.conn,
            _entity: PhantomData,
        }
    }
}

/// Typed repository over one collection of documents.
pub struct Collection<'a, T> {
    conn: &'a Connection,
    _entity: PhantomData<T>,
}

/// A row as fetched, document body still raw JSON so references can be
/// populated before deserialization.
struct RawDoc {
    id: String,
    data: Value,
    created_at: i64,
    updated_at: i64,
}

impl<'a, T: Entity> Collection<'a, T> {
    /// Validate required fields and persist a new document.
    pub fn create(&self, data: T) -> StoreResult<Doc<T>> {
        let value = serde_json::to_value(&data)?;
        validate_required::<T>(&value)?;

        let doc = self.new_instance(data);
        self.conn.execute(
            "INSERT INTO documents (collection, id, data, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                T::COLLECTION,
                doc.id,
                serde_json::to_string(&value)?,
                doc.created_at.timestamp_millis(),
                doc.updated_at.timestamp_millis(),
            ],
        )?;

        Ok(doc)
    }

    /// Construct a document in memory without persisting it. Id and
    /// timestamps are assigned as `create` would.
    pub fn new_instance(&self, data: T) -> Doc<T> {
        let now = millis_to_datetime(Utc::now().timestamp_millis());
        Doc {
            id: ulid::Ulid::new().to_string(),
            created_at: now,
            updated_at: now,
            data,
        }
    }

    /// First match for the filter, or `None`. Zero results is not an error.
    pub fn find_one(&self, filter: &Filter, populate: &[String]) -> StoreResult<Option<Doc<T>>> {
        let (mut sql, mut params) = self.select_base();
        filter.push_sql(&mut sql, &mut params);
        sql.push_str(" LIMIT 1");

        let mut raws = self.fetch_raw(&sql, &params)?;
        match raws.pop() {
            Some(raw) => Ok(Some(self.into_doc(raw, populate)?)),
            None => Ok(None),
        }
    }

    /// All matches for the filter, creation time descending. Unbounded;
    /// callers wanting a bounded page use `find_many_with_pagination`.
    pub fn find(&self, filter: &Filter, populate: &[String]) -> StoreResult<Vec<Doc<T>>> {
        let (mut sql, mut params) = self.select_base();
        filter.push_sql(&mut sql, &mut params);
        sql.push_str(" ORDER BY created_at DESC, id ASC");

        self.fetch_raw(&sql, &params)?
            .into_iter()
            .map(|raw| self.into_doc(raw, populate))
            .collect()
    }

    /// Look up a document by id. A malformed id is an error, distinct from
    /// a well-formed id that matches nothing.
    pub fn find_by_id(&self, id: &str, populate: &[String]) -> StoreResult<Option<Doc<T>>> {
        validate_id(id)?;
        self.find_one(&Filter::new().id(id), populate)
    }

    /// Shallow-merge `patch` into the first match and bump its update time.
    /// Does not create a document when nothing matches.
    pub fn find_one_and_update(&self, filter: &Filter, patch: &Value) -> StoreResult<Option<Doc<T>>> {
        let Some(existing) = self.find_one(filter, &[])? else {
            return Ok(None);
        };

        let mut value = serde_json::to_value(&existing.data)?;
        if let (Some(doc), Some(patch)) = (value.as_object_mut(), patch.as_object()) {
            for (key, val) in patch {
                doc.insert(key.clone(), val.clone());
            }
        }

        let updated_at = millis_to_datetime(Utc::now().timestamp_millis());
        self.conn.execute(
            "UPDATE documents SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
            rusqlite::params![
                serde_json::to_string(&value)?,
                updated_at.timestamp_millis(),
                T::COLLECTION,
                existing.id,
            ],
        )?;

        Ok(Some(Doc {
            id: existing.id,
            created_at: existing.created_at,
            updated_at,
            data: serde_json::from_value(value)?,
        }))
    }

    /// Replace the first match with `data`, or create a new document when
    /// nothing matches. Id and creation time survive an update.
    pub fn upsert(&self, filter: &Filter, data: T) -> StoreResult<Doc<T>> {
        let value = serde_json::to_value(&data)?;
        validate_required::<T>(&value)?;

        match self.find_one(filter, &[])? {
            None => self.create(data),
            Some(existing) => {
                let updated_at = millis_to_datetime(Utc::now().timestamp_millis());
                self.conn.execute(
                    "UPDATE documents SET data = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
                    rusqlite::params![
                        serde_json::to_string(&value)?,
                        updated_at.timestamp_millis(),
                        T::COLLECTION,
                        existing.id,
                    ],
                )?;
                Ok(Doc {
                    id: existing.id,
                    created_at: existing.created_at,
                    updated_at,
                    data,
                })
            }
        }
    }

    /// Delete the first match and return its prior state.
    pub fn find_one_and_delete(&self, filter: &Filter) -> StoreResult<Option<Doc<T>>> {
        let Some(existing) = self.find_one(filter, &[])? else {
            return Ok(None);
        };
        self.conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            rusqlite::params![T::COLLECTION, existing.id],
        )?;
        Ok(Some(existing))
    }

    pub fn count(&self, filter: &Filter) -> StoreResult<u64> {
        let mut sql = String::from("SELECT COUNT(*) FROM documents WHERE collection = ?");
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(T::COLLECTION.to_string())];
        filter.push_sql(&mut sql, &mut params);

        let params_refs: Vec<&dyn ToSql> = params.iter().map(|b| b.as_ref()).collect();
        let count: i64 = self
            .conn
            .query_row(&sql, params_refs.as_slice(), |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }

    /// Distinct values of one field among the matches. Order is unspecified.
    /// Store-managed fields work too; timestamps come back as epoch millis.
    pub fn distinct(&self, field: &str, filter: &Filter) -> StoreResult<Vec<Value>> {
        let Some(expr) = field_expr(field) else {
            return Ok(Vec::new());
        };

        let mut sql = format!(
            "SELECT DISTINCT {} FROM documents WHERE collection = ?",
            expr
        );
        let mut params: Vec<Box<dyn ToSql>> = vec![Box::new(T::COLLECTION.to_string())];
        filter.push_sql(&mut sql, &mut params);

        let params_refs: Vec<&dyn ToSql> = params.iter().map(|b| b.as_ref()).collect();
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), |row| {
            row.get::<_, rusqlite::types::Value>(0)
        })?;

        let mut values = Vec::new();
        for row in rows {
            values.push(sql_value_to_json(row?));
        }
        Ok(values)
    }

    /// Execute a list query: merge search and date bounds into the filter,
    /// count the matches, fetch one sorted page, derive the paging metadata.
    ///
    /// Count and fetch are two statements with no isolation between them;
    /// under concurrent writes the total can drift from the fetched page.
    pub fn find_many_with_pagination(
        &self,
        filter: &Filter,
        params: &FindMany,
    ) -> StoreResult<Paginated<Doc<T>>> {
        let request = PageRequest::resolve(params, Utc::now())?;

        let mut merged = filter.clone();
        if let Some(search) = params.search.as_deref() {
            let search = search.trim();
            if !search.is_empty() {
                merged = merged.contains_any(T::SEARCHABLE, search);
            }
        }
        if let Some(range) = request.range {
            merged = merged.created_between(range.from, range.to);
        }

        let total_docs = self.count(&merged)?;

        let (mut sql, mut sql_params) = self.select_base();
        merged.push_sql(&mut sql, &mut sql_params);
        sql.push_str(&order_by(&request.sort));
        sql.push_str(" LIMIT ? OFFSET ?");
        // Clamp before the i64 bind; a wrapped-negative OFFSET would skip nothing
        sql_params.push(Box::new(request.limit.min(i64::MAX as u64) as i64));
        sql_params.push(Box::new(request.skip.min(i64::MAX as u64) as i64));

        let docs = self
            .fetch_raw(&sql, &sql_params)?
            .into_iter()
            .map(|raw| self.into_doc(raw, &params.populate))
            .collect::<StoreResult<Vec<_>>>()?;

        Ok(Paginated::from_parts(docs, total_docs, request.limit, request.skip))
    }

    fn select_base(&self) -> (String, Vec<Box<dyn ToSql>>) {
        (
            String::from(
                "SELECT id, data, created_at, updated_at FROM documents WHERE collection = ?",
            ),
            vec![Box::new(T::COLLECTION.to_string()) as Box<dyn ToSql>],
        )
    }

    fn fetch_raw(&self, sql: &str, params: &[Box<dyn ToSql>]) -> StoreResult<Vec<RawDoc>> {
        let params_refs: Vec<&dyn ToSql> = params.iter().map(|b| b.as_ref()).collect();
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params_refs.as_slice(), |row| {
            let raw_json: String = row.get(1)?;
            let data: Value = serde_json::from_str(&raw_json).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    1,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            Ok(RawDoc {
                id: row.get(0)?,
                data,
                created_at: row.get(2)?,
                updated_at: row.get(3)?,
            })
        })?;

        let mut raws = Vec::new();
        for raw in rows {
            raws.push(raw?);
        }
        Ok(raws)
    }

    fn into_doc(&self, mut raw: RawDoc, populate: &[String]) -> StoreResult<Doc<T>> {
        self.populate_into(&mut raw.data, populate)?;
        Ok(Doc {
            id: raw.id,
            created_at: millis_to_datetime(raw.created_at),
            updated_at: millis_to_datetime(raw.updated_at),
            data: serde_json::from_value(raw.data)?,
        })
    }

    /// Resolve requested reference fields into their documents. Names not
    /// declared in `T::REFERENCES` and dangling ids are left as bare ids.
    fn populate_into(&self, data: &mut Value, populate: &[String]) -> StoreResult<()> {
        if populate.is_empty() {
            return Ok(());
        }
        for (field, target) in T::REFERENCES {
            if !populate.iter().any(|name| name == field) {
                continue;
            }
            let Some(Value::String(ref_id)) = data.get(*field).cloned() else {
                continue;
            };
            if let Some(resolved) = fetch_raw_by_id(self.conn, target, &ref_id)? {
                if let Some(doc) = data.as_object_mut() {
                    doc.insert(
                        (*field).to_string(),
                        json!({
                            "id": resolved.id,
                            "created_at": millis_to_datetime(resolved.created_at).to_rfc3339(),
                            "updated_at": millis_to_datetime(resolved.updated_at).to_rfc3339(),
                            "data": resolved.data,
                        }),
                    );
                }
            }
        }
        Ok(())
    }
}

/// Check that `id` is a well-formed document id.
pub fn validate_id(id: &str) -> StoreResult<()> {
    match ulid::Ulid::from_string(id) {
        Ok(_) => Ok(()),
        Err(_) => Err(StoreError::InvalidId(id.to_string())),
    }
}

fn fetch_raw_by_id(
    conn: &Connection,
    collection: &str,
    id: &str,
) -> StoreResult<Option<RawDoc>> {
    let mut stmt = conn.prepare(
        "SELECT id, data, created_at, updated_at FROM documents WHERE collection = ?1 AND id = ?2",
    )?;
    let row = stmt.query_row(rusqlite::params![collection, id], |row| {
        let raw_json: String = row.get(1)?;
        let data: Value = serde_json::from_str(&raw_json).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;
        Ok(RawDoc {
            id: row.get(0)?,
            data,
            created_at: row.get(2)?,
            updated_at: row.get(3)?,
        })
    });

    match row {
        Ok(raw) => Ok(Some(raw)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn order_by(sort: &[SortKey]) -> String {
    let mut terms: Vec<String> = sort.iter().filter_map(order_expr).collect();
    // Stable tiebreaker keeps pages deterministic.
    terms.push("id ASC".to_string());
    format!(" ORDER BY {}", terms.join(", "))
}

fn order_expr(key: &SortKey) -> Option<String> {
    let column = field_expr(&key.field)?;
    let direction = if key.descending { "DESC" } else { "ASC" };
    Some(format!("{} {}", column, direction))
}

/// SQL expression selecting a field: store-managed fields map to their
/// columns, everything else is extracted from the document body.
fn field_expr(field: &str) -> Option<String> {
    match field {
        "created_at" | "createdAt" => Some("created_at".to_string()),
        "updated_at" | "updatedAt" => Some("updated_at".to_string()),
        "id" | "_id" => Some("id".to_string()),
        other => Some(format!("json_extract(data, '{}')", json_path(other)?)),
    }
}

fn validate_required<T: Entity>(value: &Value) -> StoreResult<()> {
    let mut offending = Vec::new();
    for field in T::REQUIRED {
        let present = match value.get(*field) {
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Null) | None => false,
            Some(_) => true,
        };
        if !present {
            offending.push((*field).to_string());
        }
    }
    if offending.is_empty() {
        Ok(())
    } else {
        Err(StoreError::Validation { fields: offending })
    }
}

fn millis_to_datetime(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn sql_value_to_json(value: rusqlite::types::Value) -> Value {
    match value {
        rusqlite::types::Value::Null => Value::Null,
        rusqlite::types::Value::Integer(i) => json!(i),
        rusqlite::types::Value::Real(f) => json!(f),
        rusqlite::types::Value::Text(s) => Value::String(s),
        rusqlite::types::Value::Blob(_) => Value::Null,
    }
}
