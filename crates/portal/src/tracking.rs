use shared_types::{AppError, FirResponse};

use crate::backend::RecordBackend;

/// Case-insensitive match on id, title or category. A blank query matches
/// everything.
pub fn tracking_matches(record: &FirResponse, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    record.id.to_lowercase().contains(&query)
        || record.title.to_lowercase().contains(&query)
        || record.category.as_str().to_lowercase().contains(&query)
}

/// The citizen's status-tracking view: their own FIRs, a search box and
/// one expanded record.
pub struct StatusTracker<B> {
    backend: B,
    records: Vec<FirResponse>,
    search: String,
    expanded: Option<String>,
    banner: Option<String>,
}

impl<B: RecordBackend> StatusTracker<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            records: Vec::new(),
            search: String::new(),
            expanded: None,
            banner: None,
        }
    }

    /// Open the view on one record, as when following a receipt link.
    pub fn focused_on(backend: B, id: impl Into<String>) -> Self {
        let id = id.into();
        let mut tracker = Self::new(backend);
        tracker.search = id.clone();
        tracker.expanded = Some(id);
        tracker
    }

    /// Reload the caller's records. On failure the previous list stays.
    pub async fn load(&mut self) -> Result<(), AppError> {
        match self.backend.list_my_records().await {
            Ok(records) => {
                self.records = records;
                self.banner = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn query(&self) -> &str {
        &self.search
    }

    /// Records matching the current search, in filing order.
    pub fn visible(&self) -> Vec<&FirResponse> {
        self.records
            .iter()
            .filter(|r| tracking_matches(r, &self.search))
            .collect()
    }

    /// Expand `id`, or collapse it when it is already expanded.
    pub fn toggle(&mut self, id: &str) {
        if self.expanded.as_deref() == Some(id) {
            self.expanded = None;
        } else {
            self.expanded = Some(id.to_string());
        }
    }

    pub fn expanded(&self) -> Option<&FirResponse> {
        let id = self.expanded.as_deref()?;
        self.records.iter().find(|r| r.id == id)
    }

    /// Fetch one record fresh and expand it. The cached row is updated too.
    pub async fn open(&mut self, id: &str) -> Result<FirResponse, AppError> {
        match self.backend.get_my_record(id).await {
            Ok(record) => {
                match self.records.iter_mut().find(|r| r.id == record.id) {
                    Some(row) => *row = record.clone(),
                    None => self.records.push(record.clone()),
                }
                self.expanded = Some(record.id.clone());
                Ok(record)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    fn fail(&mut self, err: AppError) -> AppError {
        tracing::warn!(error = %err, "Status tracking request failed");
        self.banner = Some(err.message.clone());
        err
    }
}
