use chrono::Utc;
use server::repo::fir::{self as fir_repo, FirStore};
use shared_types::{
    AppError, FirDraft, FirId, FirReceipt, FirResponse, FirSearchParams, FirStatus, Officer,
    Paginated, PortalSettings, DEFAULT_PAGE_SIZE,
};
use std::time::Duration;

/// In-process [`RecordBackend`](crate::RecordBackend) with a simulated
/// commit delay. Useful offline and in tests.
#[derive(Clone)]
pub struct LocalBackend {
    firs: FirStore,
    filed_by: String,
    submit_delay: Duration,
    page_size: usize,
    officers: Vec<String>,
}

impl LocalBackend {
    /// Records are filed under `filed_by`.
    pub fn new(firs: FirStore, filed_by: impl Into<String>) -> Self {
        Self {
            firs,
            filed_by: filed_by.into(),
            submit_delay: Duration::ZERO,
            page_size: DEFAULT_PAGE_SIZE,
            officers: Vec::new(),
        }
    }

    /// Commit delay from the `[portal]` config section.
    pub fn from_settings(firs: FirStore, filed_by: impl Into<String>, settings: &PortalSettings) -> Self {
        Self::new(firs, filed_by).with_submit_delay(Duration::from_millis(settings.submit_delay_ms))
    }

    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = delay;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_officers(mut self, officers: Vec<String>) -> Self {
        self.officers = officers;
        self
    }

    pub fn store(&self) -> &FirStore {
        &self.firs
    }
}

fn parse_id(id: &str) -> Result<FirId, AppError> {
    id.parse()
}

impl crate::RecordBackend for LocalBackend {
    async fn create_record(&self, draft: FirDraft) -> Result<FirReceipt, AppError> {
        if !self.submit_delay.is_zero() {
            tokio::time::sleep(self.submit_delay).await;
        }
        let fir = fir_repo::create(&self.firs, draft, &self.filed_by, Utc::now()).await?;
        tracing::info!(fir_id = %fir.id, "FIR stored locally");
        Ok(FirReceipt::from(&FirResponse::from(&fir)))
    }

    async fn list_records(
        &self,
        params: &FirSearchParams,
    ) -> Result<Paginated<FirResponse>, AppError> {
        let query = params.clone().into_query(self.page_size)?;
        let page = fir_repo::search(&self.firs, &query).await;
        let items = page.items.iter().map(FirResponse::from).collect();
        Ok(Paginated::new(items, page.page, page.page_size, page.total))
    }

    async fn get_record(&self, id: &str) -> Result<FirResponse, AppError> {
        let fir_id = parse_id(id)?;
        fir_repo::find_by_id(&self.firs, fir_id)
            .await
            .map(|f| FirResponse::from(&f))
            .ok_or_else(|| AppError::not_found(format!("FIR {fir_id} not found")))
    }

    async fn list_my_records(&self) -> Result<Vec<FirResponse>, AppError> {
        let records = fir_repo::list_by_reporter(&self.firs, &self.filed_by).await;
        Ok(records.iter().map(FirResponse::from).collect())
    }

    async fn get_my_record(&self, id: &str) -> Result<FirResponse, AppError> {
        let fir_id = parse_id(id)?;
        fir_repo::find_by_id(&self.firs, fir_id)
            .await
            .filter(|f| f.filed_by == self.filed_by)
            .map(|f| FirResponse::from(&f))
            .ok_or_else(|| AppError::not_found(format!("FIR {fir_id} not found")))
    }

    async fn update_status(
        &self,
        id: &str,
        status: FirStatus,
        comment: Option<String>,
    ) -> Result<FirResponse, AppError> {
        let fir = fir_repo::update_status(&self.firs, parse_id(id)?, status, comment, Utc::now())
            .await?;
        Ok(FirResponse::from(&fir))
    }

    async fn assign_officer(
        &self,
        id: &str,
        officer: Option<String>,
    ) -> Result<FirResponse, AppError> {
        let fir = fir_repo::assign(&self.firs, parse_id(id)?, officer).await?;
        Ok(FirResponse::from(&fir))
    }

    async fn list_officers(&self) -> Result<Vec<Officer>, AppError> {
        Ok((1u32..)
            .zip(self.officers.iter())
            .map(|(id, name)| Officer {
                id,
                name: name.clone(),
            })
            .collect())
    }
}
