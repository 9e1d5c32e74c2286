use shared_types::{
    AppError, AssignOfficerRequest, FirDraft, FirReceipt, FirResponse, FirSearchParams, FirStatus,
    Officer, Paginated, UpdateFirStatusRequest,
};

use crate::api::ApiClient;
use crate::backend::RecordBackend;

/// [`RecordBackend`] over the server's REST API.
#[derive(Clone)]
pub struct HttpBackend {
    api: ApiClient,
}

impl HttpBackend {
    /// `api` must carry the signed-in user's token.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

fn record_path(id: &str) -> String {
    format!("/api/fir/{}", urlencoding::encode(id.trim()))
}

fn own_record_path(id: &str) -> String {
    format!("/api/fir/citizen/{}", urlencoding::encode(id.trim()))
}

impl RecordBackend for HttpBackend {
    async fn create_record(&self, draft: FirDraft) -> Result<FirReceipt, AppError> {
        let created: FirResponse = self.api.post("/api/fir", &draft).await?;
        tracing::info!(fir_id = %created.id, "FIR submitted");
        Ok(FirReceipt::from(&created))
    }

    async fn list_records(
        &self,
        params: &FirSearchParams,
    ) -> Result<Paginated<FirResponse>, AppError> {
        self.api.get_query("/api/fir", params).await
    }

    async fn get_record(&self, id: &str) -> Result<FirResponse, AppError> {
        self.api.get(&record_path(id)).await
    }

    async fn list_my_records(&self) -> Result<Vec<FirResponse>, AppError> {
        self.api.get("/api/fir/citizen").await
    }

    async fn get_my_record(&self, id: &str) -> Result<FirResponse, AppError> {
        self.api.get(&own_record_path(id)).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: FirStatus,
        comment: Option<String>,
    ) -> Result<FirResponse, AppError> {
        let body = UpdateFirStatusRequest {
            status: status.as_str().to_string(),
            comment,
        };
        self.api
            .patch(&format!("{}/status", record_path(id)), &body)
            .await
    }

    async fn assign_officer(
        &self,
        id: &str,
        officer: Option<String>,
    ) -> Result<FirResponse, AppError> {
        self.api
            .patch(
                &format!("{}/assign", record_path(id)),
                &AssignOfficerRequest { officer },
            )
            .await
    }

    async fn list_officers(&self) -> Result<Vec<Officer>, AppError> {
        self.api.get("/api/officers").await
    }
}
