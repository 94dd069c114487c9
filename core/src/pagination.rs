use chrono::{DateTime, Duration, Months, NaiveTime, Utc};
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::query::{FindMany, Period};

/// Limit applied when a list query does not name one.
pub const DEFAULT_LIMIT: u64 = 10;

/// One page of results plus the derived paging metadata.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Paginated<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub offset: u64,
    pub page: u64,
    /// 1-based ordinal of the first doc on this page within the whole
    /// result set; 0 when the result set is empty.
    pub paging_counter: u64,
    pub total_pages: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub prev_page: Option<u64>,
    pub next_page: Option<u64>,
}

impl<T> Paginated<T> {
    /// Derive the paging metadata from a fetched page.
    ///
    /// Requires `limit > 0`; `resolve` guarantees that for every request.
    pub fn from_parts(docs: Vec<T>, total_docs: u64, limit: u64, skip: u64) -> Self {
        let limit = limit.max(1);
        let total_pages = total_docs.div_ceil(limit);
        // Saturating arithmetic: a skip near u64::MAX must not wrap
        let page = (skip / limit).saturating_add(1);
        let has_prev_page = page > 1;
        let has_next_page = page < total_pages;

        Paginated {
            docs,
            total_docs,
            limit,
            offset: skip,
            page,
            paging_counter: if total_docs > 0 { skip.saturating_add(1) } else { 0 },
            total_pages,
            has_prev_page,
            has_next_page,
            prev_page: has_prev_page.then(|| page - 1),
            next_page: has_next_page.then(|| page.saturating_add(1)),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            offset: self.offset,
            page: self.page,
            paging_counter: self.paging_counter,
            total_pages: self.total_pages,
            has_prev_page: self.has_prev_page,
            has_next_page: self.has_next_page,
            prev_page: self.prev_page,
            next_page: self.next_page,
        }
    }
}

/// One normalized sort criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub descending: bool,
}

/// Inclusive creation-time bounds merged into a list query's filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// A list query with every parameter resolved: the shape the store executes.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    pub limit: u64,
    pub skip: u64,
    pub sort: Vec<SortKey>,
    pub range: Option<DateRange>,
}

impl PageRequest {
    /// Normalize raw query parameters.
    ///
    /// Limit defaults to [`DEFAULT_LIMIT`] and must be positive. An explicit
    /// offset wins over a page number; `page < 1` clamps to a skip of 0.
    /// Unspecified sort falls back to creation time descending so pages stay
    /// stable across requests.
    pub fn resolve(params: &FindMany, now: DateTime<Utc>) -> StoreResult<Self> {
        let limit = match params.limit {
            None => DEFAULT_LIMIT,
            Some(limit) if limit >= 1 => limit as u64,
            Some(limit) => {
                return Err(StoreError::InvalidPagination(format!(
                    "limit must be a positive integer, got {}",
                    limit
                )))
            }
        };

        let skip = match (params.offset, params.page) {
            (Some(offset), _) => offset,
            (None, Some(page)) => page.saturating_sub(1).saturating_mul(limit),
            (None, None) => 0,
        };

        let mut sort = parse_sort(&params.sort);
        if sort.is_empty() {
            sort.push(SortKey {
                field: "created_at".to_string(),
                descending: true,
            });
        }

        Ok(PageRequest {
            limit,
            skip,
            sort,
            range: resolve_period(params.period, params.from, params.to, now),
        })
    }
}

/// Parse sort entries into `(field, direction)` pairs. Each entry may hold
/// a comma-separated list; a leading `-` marks descending order.
pub fn parse_sort(entries: &[String]) -> Vec<SortKey> {
    entries
        .iter()
        .flat_map(|entry| entry.split(','))
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "-")
        .map(|part| match part.strip_prefix('-') {
            Some(field) => SortKey {
                field: field.to_string(),
                descending: true,
            },
            None => SortKey {
                field: part.to_string(),
                descending: false,
            },
        })
        .collect()
}

/// Resolve a period selector into creation-time bounds relative to `now`.
///
/// Relative windows end at `now`; `range` passes the explicit bounds through
/// verbatim; `all` or no period means no date filter.
pub fn resolve_period(
    period: Option<Period>,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateRange> {
    match period {
        None | Some(Period::All) => None,
        Some(Period::Today) => {
            let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
            Some(DateRange {
                from: Some(start),
                to: Some(now),
            })
        }
        Some(Period::Seven) => Some(DateRange {
            from: Some(now - Duration::days(7)),
            to: Some(now),
        }),
        Some(Period::LastMonth) => Some(DateRange {
            from: Some(now.checked_sub_months(Months::new(1)).unwrap_or(now)),
            to: Some(now),
        }),
        Some(Period::Range) => Some(DateRange { from, to }),
    }
}
