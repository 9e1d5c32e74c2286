use chrono::{DateTime, Utc};
use shared_types::wizard::{FormValues, SubmitPhase, WizardEvent, WizardState};
use shared_types::{AppError, AppErrorKind, AuthUser, FirReceipt};

use crate::backend::RecordBackend;
use crate::geocode::GeocodingProvider;

/// Banner shown when the commit fails for reasons the filer cannot fix.
pub const SUBMIT_FAILED: &str = "Failed to submit FIR. Please try again.";

/// The filing wizard wired to a record backend and a geocoder.
///
/// All state changes go through [`WizardState::dispatch`]; this type only
/// adds the asynchronous steps (geocoding, commit) around it.
pub struct SubmissionFlow<B> {
    backend: B,
    wizard: WizardState,
    receipt: Option<FirReceipt>,
}

impl<B: RecordBackend> SubmissionFlow<B> {
    /// Fresh form, pre-filled from the signed-in user.
    pub fn new(backend: B, user: &AuthUser, now: DateTime<Utc>) -> Self {
        Self::with_values(backend, FormValues::for_user(user), now)
    }

    pub fn with_values(backend: B, values: FormValues, now: DateTime<Utc>) -> Self {
        Self {
            backend,
            wizard: WizardState::new(values, now.date_naive()),
            receipt: None,
        }
    }

    pub fn wizard(&self) -> &WizardState {
        &self.wizard
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set after a successful commit.
    pub fn receipt(&self) -> Option<&FirReceipt> {
        self.receipt.as_ref()
    }

    pub fn dispatch(&mut self, event: WizardEvent) -> bool {
        self.wizard.dispatch(event)
    }

    /// Resolve a typed address and drop the pin there.
    pub async fn search_address<G: GeocodingProvider>(&mut self, geocoder: &G, address: &str) -> bool {
        let event = match geocoder.forward_geocode(address).await {
            Ok(hit) => WizardEvent::LocationResolved {
                latitude: hit.latitude,
                longitude: hit.longitude,
                address: hit.address,
            },
            Err(message) => WizardEvent::LocationFailed { message },
        };
        self.wizard.dispatch(event)
    }

    /// Place the pin at a map click and fill in its address.
    pub async fn pick_point<G: GeocodingProvider>(
        &mut self,
        geocoder: &G,
        latitude: f64,
        longitude: f64,
    ) -> bool {
        let event = match geocoder.reverse_geocode(latitude, longitude).await {
            Ok(address) => WizardEvent::LocationResolved {
                latitude,
                longitude,
                address,
            },
            Err(message) => WizardEvent::LocationFailed { message },
        };
        self.wizard.dispatch(event)
    }

    /// Confirm the prompt and commit the draft. Returns the receipt on
    /// success; on failure the form is left as it was with a banner.
    pub async fn confirm_and_submit(&mut self) -> Option<FirReceipt> {
        if !self.wizard.dispatch(WizardEvent::ConfirmSubmit) {
            return None;
        }

        let draft = match self.wizard.draft() {
            Ok(d) => d,
            Err(errors) => {
                tracing::warn!(fields = errors.len(), "Draft failed validation at commit");
                self.wizard.dispatch(WizardEvent::SubmitFailed {
                    message: "Please correct the highlighted fields.".to_string(),
                });
                return None;
            }
        };

        match self.backend.create_record(draft).await {
            Ok(receipt) => {
                self.wizard.dispatch(WizardEvent::SubmitSucceeded {
                    id: receipt.id.clone(),
                });
                self.receipt = Some(receipt.clone());
                Some(receipt)
            }
            Err(e) => {
                tracing::error!(error = %e, "FIR submission failed");
                self.wizard.dispatch(WizardEvent::SubmitFailed {
                    message: failure_message(&e),
                });
                None
            }
        }
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.wizard.phase(), SubmitPhase::Submitted { .. })
    }
}

/// Errors the filer can act on keep their message; the rest get the
/// generic banner.
fn failure_message(err: &AppError) -> String {
    match err.kind {
        AppErrorKind::ValidationError
        | AppErrorKind::BadRequest
        | AppErrorKind::Unauthorized
        | AppErrorKind::Forbidden => err.message.clone(),
        _ => SUBMIT_FAILED.to_string(),
    }
}
