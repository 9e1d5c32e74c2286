use shared_types::{
    AppError, FirDraft, FirReceipt, FirResponse, FirSearchParams, FirStatus, Officer, Paginated,
};

/// Where FIRs are committed and read back.
///
/// Every call is a single attempt; a failure leaves the backend unchanged.
#[allow(async_fn_in_trait)]
pub trait RecordBackend: Send + Sync {
    /// File a new FIR and return its receipt.
    async fn create_record(&self, draft: FirDraft) -> Result<FirReceipt, AppError>;

    /// Search, filter and paginate.
    async fn list_records(
        &self,
        params: &FirSearchParams,
    ) -> Result<Paginated<FirResponse>, AppError>;

    async fn get_record(&self, id: &str) -> Result<FirResponse, AppError>;

    /// FIRs filed by the signed-in citizen, in filing order.
    async fn list_my_records(&self) -> Result<Vec<FirResponse>, AppError>;

    /// One of the caller's own FIRs. Someone else's record is not found.
    async fn get_my_record(&self, id: &str) -> Result<FirResponse, AppError>;

    async fn update_status(
        &self,
        id: &str,
        status: FirStatus,
        comment: Option<String>,
    ) -> Result<FirResponse, AppError>;

    /// `None` unassigns.
    async fn assign_officer(
        &self,
        id: &str,
        officer: Option<String>,
    ) -> Result<FirResponse, AppError>;

    /// Officers offered in the assignment picker.
    async fn list_officers(&self) -> Result<Vec<Officer>, AppError>;
}
