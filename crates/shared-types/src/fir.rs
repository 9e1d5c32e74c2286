use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AppError;
use crate::wizard::{Field, FormValues};

// ── Identifiers ─────────────────────────────────────────────────────

/// FIR identifier, displayed as `FIR` followed by five zero-padded digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FirId(u32);

impl FirId {
    pub const PREFIX: &'static str = "FIR";

    pub fn from_sequence(seq: u32) -> Self {
        Self(seq)
    }

    pub fn sequence(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for FirId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:05}", Self::PREFIX, self.0)
    }
}

impl FromStr for FirId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| AppError::bad_request(format!("Invalid FIR id: {s}")))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AppError::bad_request(format!("Invalid FIR id: {s}")));
        }
        digits
            .parse()
            .map(FirId)
            .map_err(|_| AppError::bad_request(format!("Invalid FIR id: {s}")))
    }
}

impl TryFrom<String> for FirId {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FirId> for String {
    fn from(id: FirId) -> Self {
        id.to_string()
    }
}

// ── Categories ──────────────────────────────────────────────────────

/// Fixed set of complaint categories offered by the filing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum FirCategory {
    Theft,
    Assault,
    Burglary,
    Fraud,
    Cybercrime,
    #[serde(rename = "Property Damage")]
    PropertyDamage,
    #[serde(rename = "Public Nuisance")]
    PublicNuisance,
    #[serde(rename = "Traffic Violation")]
    TrafficViolation,
    #[serde(rename = "Missing Person")]
    MissingPerson,
    Others,
}

impl FirCategory {
    pub const ALL: [FirCategory; 10] = [
        FirCategory::Theft,
        FirCategory::Assault,
        FirCategory::Burglary,
        FirCategory::Fraud,
        FirCategory::Cybercrime,
        FirCategory::PropertyDamage,
        FirCategory::PublicNuisance,
        FirCategory::TrafficViolation,
        FirCategory::MissingPerson,
        FirCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FirCategory::Theft => "Theft",
            FirCategory::Assault => "Assault",
            FirCategory::Burglary => "Burglary",
            FirCategory::Fraud => "Fraud",
            FirCategory::Cybercrime => "Cybercrime",
            FirCategory::PropertyDamage => "Property Damage",
            FirCategory::PublicNuisance => "Public Nuisance",
            FirCategory::TrafficViolation => "Traffic Violation",
            FirCategory::MissingPerson => "Missing Person",
            FirCategory::Others => "Others",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for FirCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Status ──────────────────────────────────────────────────────────

/// Lifecycle status of an FIR.
///
/// `UnderReview` and `Assigned` are the intermediate states citizens see in
/// the tracking view; responders usually move records straight from
/// `Pending` to `UnderInvestigation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum FirStatus {
    Pending,
    #[serde(rename = "Under Review")]
    UnderReview,
    Assigned,
    #[serde(rename = "Under Investigation")]
    UnderInvestigation,
    Resolved,
    Closed,
}

impl FirStatus {
    pub const ALL: [FirStatus; 6] = [
        FirStatus::Pending,
        FirStatus::UnderReview,
        FirStatus::Assigned,
        FirStatus::UnderInvestigation,
        FirStatus::Resolved,
        FirStatus::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FirStatus::Pending => "Pending",
            FirStatus::UnderReview => "Under Review",
            FirStatus::Assigned => "Assigned",
            FirStatus::UnderInvestigation => "Under Investigation",
            FirStatus::Resolved => "Resolved",
            FirStatus::Closed => "Closed",
        }
    }

    /// Accepts display names in any case, and snake_case spellings.
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().replace('_', " ");
        Self::ALL
            .into_iter()
            .find(|st| st.as_str().eq_ignore_ascii_case(&normalized))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, FirStatus::Resolved | FirStatus::Closed)
    }

    /// The usual next states. Advisory only: `Fir::set_status` accepts any
    /// status, so a responder can reopen a resolved case.
    pub fn suggested_transitions(&self) -> &'static [FirStatus] {
        match self {
            FirStatus::Pending => &[
                FirStatus::UnderReview,
                FirStatus::Assigned,
                FirStatus::UnderInvestigation,
                FirStatus::Closed,
            ],
            FirStatus::UnderReview => &[
                FirStatus::Assigned,
                FirStatus::UnderInvestigation,
                FirStatus::Closed,
            ],
            FirStatus::Assigned => &[FirStatus::UnderInvestigation, FirStatus::Closed],
            FirStatus::UnderInvestigation => &[FirStatus::Resolved, FirStatus::Closed],
            FirStatus::Resolved | FirStatus::Closed => &[],
        }
    }

    pub fn is_suggested_transition(&self, to: FirStatus) -> bool {
        self.suggested_transitions().contains(&to)
    }
}

impl fmt::Display for FirStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Value types ─────────────────────────────────────────────────────

/// A map position. Both halves are always present together.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, AppError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AppError::bad_request(format!("Latitude out of range: {latitude}")));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::bad_request(format!("Longitude out of range: {longitude}")));
        }
        Ok(Self { latitude, longitude })
    }

    /// Build from two optional halves: both or neither.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<Self>, AppError> {
        match (latitude, longitude) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            (None, None) => Ok(None),
            _ => Err(AppError::bad_request(
                "Latitude and longitude must be provided together",
            )),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Where the incident happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Location {
    pub label: String,
    pub coordinates: Option<Coordinates>,
}

/// The citizen who filed the report. Captured once at filing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Reporter {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

/// Descriptor of an attached evidence file. Contents are handled elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EvidenceFile {
    pub name: String,
    pub size: u64,
}

/// One line of the status timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusEntry {
    pub timestamp: DateTime<Utc>,
    pub status: FirStatus,
    pub comment: String,
}

// ── Record ──────────────────────────────────────────────────────────

/// A First Information Report.
///
/// Status, assignee, reporter and history are private: the history is
/// append-only and its last entry always carries the current status.
#[derive(Debug, Clone, PartialEq)]
pub struct Fir {
    pub id: FirId,
    pub title: String,
    pub category: FirCategory,
    pub description: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub location: Location,
    pub evidence_files: Vec<EvidenceFile>,
    pub witnesses: Option<String>,
    pub additional_info: Option<String>,
    pub filed_by: String,
    pub filed_at: DateTime<Utc>,
    reporter: Reporter,
    status: FirStatus,
    assigned_officer: Option<String>,
    history: Vec<StatusEntry>,
}

/// Comment attached to the first history entry of every record.
pub const FILED_COMMENT: &str = "FIR submitted successfully";

impl Fir {
    /// Create a record in `Pending` with its first history entry.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: FirId,
        title: String,
        category: FirCategory,
        description: String,
        date: NaiveDate,
        time: NaiveTime,
        location: Location,
        reporter: Reporter,
        filed_by: String,
        filed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            category,
            description,
            date,
            time,
            location,
            evidence_files: Vec::new(),
            witnesses: None,
            additional_info: None,
            filed_by,
            filed_at,
            reporter,
            status: FirStatus::Pending,
            assigned_officer: None,
            history: vec![StatusEntry {
                timestamp: filed_at,
                status: FirStatus::Pending,
                comment: FILED_COMMENT.to_string(),
            }],
        }
    }

    pub fn status(&self) -> FirStatus {
        self.status
    }

    pub fn assigned_officer(&self) -> Option<&str> {
        self.assigned_officer.as_deref()
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn history(&self) -> &[StatusEntry] {
        &self.history
    }

    /// Overwrite the status and append one history entry. Any transition is
    /// accepted, including reopening a terminal record.
    pub fn set_status(&mut self, status: FirStatus, comment: Option<String>, at: DateTime<Utc>) {
        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| format!("Status updated to {status}"));
        self.status = status;
        self.history.push(StatusEntry {
            timestamp: at,
            status,
            comment,
        });
    }

    /// Append a comment to the timeline without changing the status.
    pub fn add_note(&mut self, comment: String, at: DateTime<Utc>) {
        self.history.push(StatusEntry {
            timestamp: at,
            status: self.status,
            comment,
        });
    }

    /// Overwrite the assignee. `None` (or a blank name) unassigns.
    pub fn assign(&mut self, officer: Option<String>) {
        self.assigned_officer = officer
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty());
    }
}

// ── API types ───────────────────────────────────────────────────────

/// API response shape for an FIR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FirResponse {
    pub id: String,
    pub title: String,
    pub category: FirCategory,
    pub description: String,
    pub date: String,
    pub time: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub status: FirStatus,
    pub assigned_officer: Option<String>,
    pub reporter: Reporter,
    #[serde(default)]
    pub evidence_files: Vec<EvidenceFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub witnesses: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub filed_at: String,
    pub status_history: Vec<StatusEntry>,
}

impl From<&Fir> for FirResponse {
    fn from(f: &Fir) -> Self {
        Self {
            id: f.id.to_string(),
            title: f.title.clone(),
            category: f.category,
            description: f.description.clone(),
            date: f.date.format("%Y-%m-%d").to_string(),
            time: f.time.format("%H:%M").to_string(),
            location: f.location.label.clone(),
            latitude: f.location.coordinates.map(|c| c.latitude()),
            longitude: f.location.coordinates.map(|c| c.longitude()),
            status: f.status,
            assigned_officer: f.assigned_officer.clone(),
            reporter: f.reporter.clone(),
            evidence_files: f.evidence_files.clone(),
            witnesses: f.witnesses.clone(),
            additional_info: f.additional_info.clone(),
            filed_at: f.filed_at.to_rfc3339(),
            status_history: f.history.clone(),
        }
    }
}

/// Confirmation handed back after a successful submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FirReceipt {
    pub id: String,
    pub status: FirStatus,
    pub filed_at: String,
}

impl From<&FirResponse> for FirReceipt {
    fn from(r: &FirResponse) -> Self {
        Self {
            id: r.id.clone(),
            status: r.status,
            filed_at: r.filed_at.clone(),
        }
    }
}

/// Request to file a new FIR: the wizard's collected values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FirDraft {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub category: String,
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub witnesses: String,
    #[serde(default)]
    pub additional_info: String,
    #[serde(default)]
    pub evidence_files: Vec<EvidenceFile>,
}

impl FirDraft {
    /// Run every filing rule against the draft. Field names in the error
    /// map match the wizard's field keys.
    pub fn check(&self, today: NaiveDate) -> Result<(), AppError> {
        let values = FormValues::from(self.clone());
        let errors = crate::wizard::validate_all(&values, today);
        if errors.is_empty() {
            return Ok(());
        }
        let field_errors = errors
            .into_iter()
            .map(|(field, msg)| (field.key().to_string(), msg))
            .collect();
        Err(AppError::validation("Validation failed", field_errors))
    }

    /// Validate and turn the draft into a new `Pending` record.
    pub fn into_fir(
        self,
        id: FirId,
        filed_by: &str,
        filed_at: DateTime<Utc>,
    ) -> Result<Fir, AppError> {
        self.check(filed_at.date_naive())?;

        let date = parse_date(&self.date)
            .ok_or_else(|| field_error(Field::Date, "Date is required"))?;
        let time = parse_time(&self.time)
            .ok_or_else(|| field_error(Field::Time, "Approximate time is required"))?;
        let category = FirCategory::parse(&self.category)
            .ok_or_else(|| field_error(Field::Category, "Category is required"))?;
        let coordinates = Coordinates::from_parts(self.latitude, self.longitude)?;

        let reporter = Reporter {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            email: self.email.trim().to_string(),
            address: self.address.trim().to_string(),
        };
        let location = Location {
            label: self.location.trim().to_string(),
            coordinates,
        };

        let mut fir = Fir::new(
            id,
            self.title.trim().to_string(),
            category,
            self.description.trim().to_string(),
            date,
            time,
            location,
            reporter,
            filed_by.to_string(),
            filed_at,
        );
        fir.evidence_files = self.evidence_files;
        fir.witnesses = non_blank(self.witnesses);
        fir.additional_info = non_blank(self.additional_info);
        Ok(fir)
    }
}

fn field_error(field: Field, message: &str) -> AppError {
    let mut fields = std::collections::HashMap::new();
    fields.insert(field.key().to_string(), message.to_string());
    AppError::validation("Validation failed", fields)
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a form date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Parse a form time (`HH:MM`, seconds tolerated).
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

/// Request to change an FIR's status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateFirStatusRequest {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Request to (un)assign an officer. `null` is the unassign sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AssignOfficerRequest {
    #[serde(default)]
    pub officer: Option<String>,
}

/// Request to append a note to an FIR's timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AddNoteRequest {
    pub comment: String,
}
