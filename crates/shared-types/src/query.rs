//! Search, filter and paginate over FIR records.
//!
//! The same [`FirQuery`] drives the server's list endpoint and the portal's
//! management screen. Any type implementing [`QueryRecord`] can be queried.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::common::{normalize_page_size, DEFAULT_PAGE_SIZE};
use crate::error::AppError;
use crate::fir::{parse_date, Fir, FirCategory, FirResponse, FirStatus};

/// Query-string sentinel selecting records with no assignee.
pub const UNASSIGNED: &str = "unassigned";

/// The fields the list pipeline looks at.
pub trait QueryRecord {
    fn id_text(&self) -> Cow<'_, str>;
    fn title_text(&self) -> &str;
    fn location_text(&self) -> &str;
    fn reporter_text(&self) -> &str;
    fn record_status(&self) -> FirStatus;
    fn record_category(&self) -> FirCategory;
    fn record_date(&self) -> Option<NaiveDate>;
    fn record_assignee(&self) -> Option<&str>;
}

impl QueryRecord for Fir {
    fn id_text(&self) -> Cow<'_, str> {
        Cow::Owned(self.id.to_string())
    }
    fn title_text(&self) -> &str {
        &self.title
    }
    fn location_text(&self) -> &str {
        &self.location.label
    }
    fn reporter_text(&self) -> &str {
        &self.reporter().name
    }
    fn record_status(&self) -> FirStatus {
        self.status()
    }
    fn record_category(&self) -> FirCategory {
        self.category
    }
    fn record_date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
    fn record_assignee(&self) -> Option<&str> {
        self.assigned_officer()
    }
}

impl QueryRecord for FirResponse {
    fn id_text(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.id)
    }
    fn title_text(&self) -> &str {
        &self.title
    }
    fn location_text(&self) -> &str {
        &self.location
    }
    fn reporter_text(&self) -> &str {
        &self.reporter.name
    }
    fn record_status(&self) -> FirStatus {
        self.status
    }
    fn record_category(&self) -> FirCategory {
        self.category
    }
    fn record_date(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
    fn record_assignee(&self) -> Option<&str> {
        self.assigned_officer.as_deref()
    }
}

/// Officer filter: a named officer, or the unassigned sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssigneeFilter {
    Unassigned,
    Officer(String),
}

impl AssigneeFilter {
    /// Blank means "any officer" and yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            None
        } else if s.eq_ignore_ascii_case(UNASSIGNED) {
            Some(AssigneeFilter::Unassigned)
        } else {
            Some(AssigneeFilter::Officer(s.to_string()))
        }
    }

    pub fn as_param(&self) -> &str {
        match self {
            AssigneeFilter::Unassigned => UNASSIGNED,
            AssigneeFilter::Officer(name) => name,
        }
    }

    fn matches(&self, assignee: Option<&str>) -> bool {
        match (self, assignee) {
            (AssigneeFilter::Unassigned, None) => true,
            (AssigneeFilter::Officer(want), Some(have)) => want == have,
            _ => false,
        }
    }
}

/// Equality filters. Absent means "all".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FirFilters {
    pub status: Option<FirStatus>,
    pub category: Option<FirCategory>,
    pub date: Option<NaiveDate>,
    pub officer: Option<AssigneeFilter>,
}

impl FirFilters {
    pub fn matches<R: QueryRecord>(&self, record: &R) -> bool {
        self.status.is_none_or(|s| record.record_status() == s)
            && self.category.is_none_or(|c| record.record_category() == c)
            && self.date.is_none_or(|d| record.record_date() == Some(d))
            && self
                .officer
                .as_ref()
                .is_none_or(|o| o.matches(record.record_assignee()))
    }
}

/// One page of query results. `total` counts every match, not just this page.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryAction {
    SetSearch(String),
    SetStatus(Option<FirStatus>),
    SetCategory(Option<FirCategory>),
    SetDate(Option<NaiveDate>),
    SetOfficer(Option<AssigneeFilter>),
    ResetFilters,
    SetPage(usize),
    SetPageSize(usize),
}

/// Search text, filters and the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirQuery {
    pub search: String,
    pub filters: FirFilters,
    pub page: usize,
    pub page_size: usize,
}

impl Default for FirQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            filters: FirFilters::default(),
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FirQuery {
    /// Case-insensitive substring match on id, title, location and reporter.
    pub fn matches_search<R: QueryRecord>(&self, record: &R) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let hit = |s: &str| s.to_lowercase().contains(&needle);
        hit(&record.id_text())
            || hit(record.title_text())
            || hit(record.location_text())
            || hit(record.reporter_text())
    }

    pub fn matches<R: QueryRecord>(&self, record: &R) -> bool {
        self.matches_search(record) && self.filters.matches(record)
    }

    /// Search, then filter, then slice out the current page. Input order is kept.
    pub fn apply<R: QueryRecord + Clone>(&self, records: &[R]) -> QueryPage<R> {
        let page_size = self.page_size.max(1);
        let matched: Vec<&R> = records.iter().filter(|r| self.matches(*r)).collect();
        let total = matched.len();
        let items = matched
            .into_iter()
            .skip(self.page.saturating_mul(page_size))
            .take(page_size)
            .cloned()
            .collect();
        QueryPage {
            items,
            total,
            page: self.page,
            page_size,
        }
    }

    /// Apply an action. Anything that changes what matches, or how many rows
    /// a page holds, sends the view back to the first page.
    pub fn dispatch(&mut self, action: QueryAction) {
        match action {
            QueryAction::SetSearch(s) => {
                self.search = s;
                self.page = 0;
            }
            QueryAction::SetStatus(s) => {
                self.filters.status = s;
                self.page = 0;
            }
            QueryAction::SetCategory(c) => {
                self.filters.category = c;
                self.page = 0;
            }
            QueryAction::SetDate(d) => {
                self.filters.date = d;
                self.page = 0;
            }
            QueryAction::SetOfficer(o) => {
                self.filters.officer = o;
                self.page = 0;
            }
            QueryAction::ResetFilters => {
                self.search.clear();
                self.filters = FirFilters::default();
                self.page = 0;
            }
            QueryAction::SetPage(p) => self.page = p,
            QueryAction::SetPageSize(n) => {
                self.page_size = n.max(1);
                self.page = 0;
            }
        }
    }

    pub fn to_params(&self) -> FirSearchParams {
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_string());
        FirSearchParams {
            q: non_empty(&self.search),
            status: self.filters.status.map(|s| s.as_str().to_string()),
            category: self.filters.category.map(|c| c.as_str().to_string()),
            date: self.filters.date.map(|d| d.format("%Y-%m-%d").to_string()),
            officer: self.filters.officer.as_ref().map(|o| o.as_param().to_string()),
            page: Some(self.page),
            page_size: Some(self.page_size),
        }
    }
}

/// Query parameters for `GET /api/fir`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
pub struct FirSearchParams {
    /// Free-text search over id, title, location and reporter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Incident date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Officer name, or `unassigned`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub officer: Option<String>,
    /// Zero-based page index.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

impl FirSearchParams {
    /// Parse into a query. Unknown status/category or a malformed date is a 400.
    pub fn into_query(self, default_page_size: usize) -> Result<FirQuery, AppError> {
        let blank = |s: &Option<String>| s.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

        let status = match blank(&self.status) {
            Some(s) => Some(
                FirStatus::parse(&s).ok_or_else(|| AppError::bad_request(format!("Invalid status: {s}")))?,
            ),
            None => None,
        };
        let category = match blank(&self.category) {
            Some(c) => Some(
                FirCategory::parse(&c)
                    .ok_or_else(|| AppError::bad_request(format!("Invalid category: {c}")))?,
            ),
            None => None,
        };
        let date = match blank(&self.date) {
            Some(d) => Some(parse_date(&d).ok_or_else(|| AppError::bad_request(format!("Invalid date: {d}")))?),
            None => None,
        };
        let officer = self.officer.as_deref().and_then(AssigneeFilter::parse);

        Ok(FirQuery {
            search: self.q.unwrap_or_default(),
            filters: FirFilters {
                status,
                category,
                date,
                officer,
            },
            page: self.page.unwrap_or(0),
            page_size: normalize_page_size(self.page_size.or(Some(default_page_size))),
        })
    }
}
