use shared_types::{
    AppError, FirQuery, FirResponse, FirStatus, Officer, Paginated, PaginationMeta, QueryAction,
};

use crate::backend::RecordBackend;

/// The responder's record list: a [`FirQuery`] kept in step with the
/// backend, plus inline status and assignee edits. Every successful edit
/// reloads the page under the current query.
pub struct RecordManager<B> {
    backend: B,
    query: FirQuery,
    page: Paginated<FirResponse>,
    officers: Vec<Officer>,
    banner: Option<String>,
}

impl<B: RecordBackend> RecordManager<B> {
    pub fn new(backend: B) -> Self {
        let query = FirQuery::default();
        let page = Paginated::new(Vec::new(), query.page, query.page_size, 0);
        Self {
            backend,
            query,
            page,
            officers: Vec::new(),
            banner: None,
        }
    }

    pub fn query(&self) -> &FirQuery {
        &self.query
    }

    pub fn records(&self) -> &[FirResponse] {
        &self.page.data
    }

    pub fn meta(&self) -> &PaginationMeta {
        &self.page.meta
    }

    pub fn officers(&self) -> &[Officer] {
        &self.officers
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn dismiss_banner(&mut self) {
        self.banner = None;
    }

    /// Re-run the current query. On failure the previous page stays.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        match self.backend.list_records(&self.query.to_params()).await {
            Ok(page) => {
                self.page = page;
                self.banner = None;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Apply a search, filter or paging change and reload.
    pub async fn apply(&mut self, action: QueryAction) -> Result<(), AppError> {
        self.query.dispatch(action);
        self.refresh().await
    }

    pub async fn load_officers(&mut self) -> Result<(), AppError> {
        match self.backend.list_officers().await {
            Ok(officers) => {
                self.officers = officers;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    pub async fn update_status(
        &mut self,
        id: &str,
        status: FirStatus,
        comment: Option<String>,
    ) -> Result<FirResponse, AppError> {
        match self.backend.update_status(id, status, comment).await {
            Ok(updated) => {
                self.reload_after_edit(&updated).await;
                Ok(updated)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// `None` unassigns.
    pub async fn assign(
        &mut self,
        id: &str,
        officer: Option<String>,
    ) -> Result<FirResponse, AppError> {
        match self.backend.assign_officer(id, officer).await {
            Ok(updated) => {
                self.reload_after_edit(&updated).await;
                Ok(updated)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Re-run the current query so the page and totals still reflect the
    /// filters. If that fails, the edited row is patched in place instead.
    async fn reload_after_edit(&mut self, updated: &FirResponse) {
        if self.refresh().await.is_err() {
            self.replace(updated);
        }
    }

    fn replace(&mut self, updated: &FirResponse) {
        if let Some(row) = self.page.data.iter_mut().find(|r| r.id == updated.id) {
            *row = updated.clone();
        }
    }

    fn fail(&mut self, err: AppError) -> AppError {
        tracing::warn!(error = %err, "Record list operation failed");
        self.banner = Some(err.message.clone());
        err
    }
}
