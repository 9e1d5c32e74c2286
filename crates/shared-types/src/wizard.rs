//! The FIR filing wizard.
//!
//! Five linear steps collect personal, incident, location and evidence data
//! and end on a read-only review. All state lives in [`WizardState`] and
//! changes only through [`WizardState::dispatch`]; the caller supplies the
//! clock through the events that need one, so the reducer stays pure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::ValidateEmail;

use crate::categorize;
use crate::fir::{parse_date, parse_time, EvidenceFile, FirCategory, FirDraft};
use crate::models::AuthUser;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MIN_CHARS: usize = 50;
pub const PHONE_DIGITS: usize = 10;

// ── Steps and fields ────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    PersonalDetails,
    IncidentDetails,
    Location,
    Evidence,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 5] = [
        WizardStep::PersonalDetails,
        WizardStep::IncidentDetails,
        WizardStep::Location,
        WizardStep::Evidence,
        WizardStep::Review,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            WizardStep::PersonalDetails => "Personal Details",
            WizardStep::IncidentDetails => "Incident Details",
            WizardStep::Location => "Location",
            WizardStep::Evidence => "Evidence",
            WizardStep::Review => "Review & Submit",
        }
    }

    /// Fields introduced by this step.
    pub fn fields(&self) -> &'static [Field] {
        match self {
            WizardStep::PersonalDetails => &[Field::Name, Field::Phone, Field::Email, Field::Address],
            WizardStep::IncidentDetails => &[
                Field::Title,
                Field::Description,
                Field::Date,
                Field::Time,
                Field::Category,
            ],
            WizardStep::Location => &[Field::Location, Field::Latitude, Field::Longitude],
            WizardStep::Evidence => &[Field::Witnesses, Field::AdditionalInfo],
            WizardStep::Review => &[],
        }
    }

    /// Fields of this step and every step before it.
    pub fn cumulative_fields(&self) -> impl Iterator<Item = Field> {
        let upto = self.index();
        Self::ALL
            .into_iter()
            .take(upto + 1)
            .flat_map(|s| s.fields().iter().copied())
    }

    fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    fn prev(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Phone,
    Email,
    Address,
    Title,
    Description,
    Date,
    Time,
    Category,
    Location,
    Latitude,
    Longitude,
    Witnesses,
    AdditionalInfo,
}

impl Field {
    /// Wire/form key, also used in `AppError::field_errors`.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Email => "email",
            Field::Address => "address",
            Field::Title => "title",
            Field::Description => "description",
            Field::Date => "date",
            Field::Time => "time",
            Field::Category => "category",
            Field::Location => "location",
            Field::Latitude => "latitude",
            Field::Longitude => "longitude",
            Field::Witnesses => "witnesses",
            Field::AdditionalInfo => "additional_info",
        }
    }

    pub fn step(&self) -> WizardStep {
        WizardStep::ALL
            .into_iter()
            .find(|s| s.fields().contains(self))
            .unwrap_or(WizardStep::Review)
    }
}

// ── Form values ─────────────────────────────────────────────────────

/// Raw form input. Everything is kept as typed so that navigating away and
/// back redisplays exactly what was entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormValues {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub category: String,
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub witnesses: String,
    pub additional_info: String,
    pub evidence_files: Vec<EvidenceFile>,
}

impl FormValues {
    /// Start a form pre-filled with the signed-in user's name and email.
    pub fn for_user(user: &AuthUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Phone => &self.phone,
            Field::Email => &self.email,
            Field::Address => &self.address,
            Field::Title => &self.title,
            Field::Description => &self.description,
            Field::Date => &self.date,
            Field::Time => &self.time,
            Field::Category => &self.category,
            Field::Location => &self.location,
            Field::Latitude => &self.latitude,
            Field::Longitude => &self.longitude,
            Field::Witnesses => &self.witnesses,
            Field::AdditionalInfo => &self.additional_info,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Phone => &mut self.phone,
            Field::Email => &mut self.email,
            Field::Address => &mut self.address,
            Field::Title => &mut self.title,
            Field::Description => &mut self.description,
            Field::Date => &mut self.date,
            Field::Time => &mut self.time,
            Field::Category => &mut self.category,
            Field::Location => &mut self.location,
            Field::Latitude => &mut self.latitude,
            Field::Longitude => &mut self.longitude,
            Field::Witnesses => &mut self.witnesses,
            Field::AdditionalInfo => &mut self.additional_info,
        };
        *slot = value;
    }

    pub fn to_draft(&self) -> FirDraft {
        FirDraft {
            name: self.name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            latitude: self.latitude.trim().parse().ok(),
            longitude: self.longitude.trim().parse().ok(),
            witnesses: self.witnesses.clone(),
            additional_info: self.additional_info.clone(),
            evidence_files: self.evidence_files.clone(),
        }
    }
}

impl From<FirDraft> for FormValues {
    fn from(d: FirDraft) -> Self {
        Self {
            name: d.name,
            phone: d.phone,
            email: d.email,
            address: d.address,
            title: d.title,
            description: d.description,
            date: d.date,
            time: d.time,
            category: d.category,
            location: d.location,
            latitude: d.latitude.map(|v| v.to_string()).unwrap_or_default(),
            longitude: d.longitude.map(|v| v.to_string()).unwrap_or_default(),
            witnesses: d.witnesses,
            additional_info: d.additional_info,
            evidence_files: d.evidence_files,
        }
    }
}

// ── Validation ──────────────────────────────────────────────────────

/// Check one field. Returns the message to show, or `None` when valid.
pub fn validate_field(field: Field, values: &FormValues, today: NaiveDate) -> Option<String> {
    let raw = values.get(field).trim();
    let msg = |m: &str| Some(m.to_string());
    match field {
        Field::Name if raw.is_empty() => msg("Name is required"),
        Field::Phone if raw.is_empty() => msg("Phone number is required"),
        Field::Phone
            if raw.len() != PHONE_DIGITS || !raw.bytes().all(|b| b.is_ascii_digit()) =>
        {
            msg("Phone number must be 10 digits")
        }
        Field::Email if raw.is_empty() => msg("Email is required"),
        Field::Email if !raw.validate_email() => msg("Enter a valid email"),
        Field::Address if raw.is_empty() => msg("Address is required"),
        Field::Title if raw.is_empty() => msg("Title is required"),
        Field::Title if raw.chars().count() > TITLE_MAX_CHARS => {
            msg("Title must be less than 100 characters")
        }
        Field::Description if raw.is_empty() => msg("Description is required"),
        Field::Description if raw.chars().count() < DESCRIPTION_MIN_CHARS => {
            msg("Please provide more details (at least 50 characters)")
        }
        Field::Date if raw.is_empty() => msg("Date is required"),
        Field::Date => match parse_date(raw) {
            None => msg("Enter a valid date"),
            Some(d) if d > today => msg("Date cannot be in the future"),
            Some(_) => None,
        },
        Field::Time if raw.is_empty() => msg("Approximate time is required"),
        Field::Time if parse_time(raw).is_none() => msg("Enter a valid time"),
        Field::Category if raw.is_empty() => msg("Category is required"),
        Field::Category if FirCategory::parse(raw).is_none() => {
            msg("Select a category from the list")
        }
        Field::Location if raw.is_empty() => msg("Location is required"),
        Field::Latitude | Field::Longitude if raw.is_empty() => {
            msg("Please select a location on the map")
        }
        Field::Latitude => coordinate_error(raw, 90.0, "Invalid latitude"),
        Field::Longitude => coordinate_error(raw, 180.0, "Invalid longitude"),
        _ => None,
    }
}

fn coordinate_error(raw: &str, bound: f64, message: &str) -> Option<String> {
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.abs() <= bound => None,
        _ => Some(message.to_string()),
    }
}

/// Validate the cumulative schema of `step` (its fields plus all earlier ones).
pub fn validate_step(values: &FormValues, step: WizardStep, today: NaiveDate) -> BTreeMap<Field, String> {
    step.cumulative_fields()
        .filter_map(|f| validate_field(f, values, today).map(|m| (f, m)))
        .collect()
}

/// Validate every field of the form.
pub fn validate_all(values: &FormValues, today: NaiveDate) -> BTreeMap<Field, String> {
    validate_step(values, WizardStep::Review, today)
}

// ── Reducer ─────────────────────────────────────────────────────────

/// Where the submission stands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SubmitPhase {
    Editing,
    Submitting,
    Submitted { id: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    SetField(Field, String),
    /// A map click or address search resolved to a position.
    LocationResolved {
        latitude: f64,
        longitude: f64,
        address: String,
    },
    /// Geocoding failed; shown as the banner.
    LocationFailed { message: String },
    AddEvidence(EvidenceFile),
    RemoveEvidence(usize),
    Next { now: DateTime<Utc> },
    Back,
    /// Open the confirmation prompt on the review step.
    RequestSubmit,
    CancelSubmit,
    /// The user confirmed; the caller now commits the draft.
    ConfirmSubmit,
    SubmitSucceeded { id: String },
    SubmitFailed { message: String },
    DismissBanner,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    step: WizardStep,
    values: FormValues,
    touched: BTreeSet<Field>,
    errors: BTreeMap<Field, String>,
    suggestions: Vec<FirCategory>,
    review_timestamp: Option<DateTime<Utc>>,
    confirming: bool,
    phase: SubmitPhase,
    banner: Option<String>,
    today: NaiveDate,
}

impl WizardState {
    pub fn new(values: FormValues, today: NaiveDate) -> Self {
        Self {
            step: WizardStep::PersonalDetails,
            values,
            touched: BTreeSet::new(),
            errors: BTreeMap::new(),
            suggestions: Vec::new(),
            review_timestamp: None,
            confirming: false,
            phase: SubmitPhase::Editing,
            banner: None,
            today,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn touched(&self) -> &BTreeSet<Field> {
        &self.touched
    }

    pub fn suggestions(&self) -> &[FirCategory] {
        &self.suggestions
    }

    /// Submission time shown on the review step. Refreshed every time the
    /// review step becomes active.
    pub fn review_timestamp(&self) -> Option<DateTime<Utc>> {
        self.review_timestamp
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn phase(&self) -> &SubmitPhase {
        &self.phase
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Errors for fields the user has touched.
    pub fn visible_errors(&self) -> BTreeMap<Field, &str> {
        self.errors
            .iter()
            .filter(|(f, _)| self.touched.contains(f))
            .map(|(f, m)| (*f, m.as_str()))
            .collect()
    }

    pub fn error(&self, field: Field) -> Option<&str> {
        if self.touched.contains(&field) {
            self.errors.get(&field).map(String::as_str)
        } else {
            None
        }
    }

    /// The collected values as a create request, once every step validates.
    pub fn draft(&self) -> Result<FirDraft, BTreeMap<Field, String>> {
        let errors = validate_all(&self.values, self.today);
        if errors.is_empty() {
            Ok(self.values.to_draft())
        } else {
            Err(errors)
        }
    }

    fn editable(&self) -> bool {
        self.phase == SubmitPhase::Editing && !self.confirming
    }

    /// Apply one event. Returns `false` when the event was refused or does
    /// not apply in the current state; the state is then unchanged, except
    /// that a refused `Next` surfaces its field errors.
    pub fn dispatch(&mut self, event: WizardEvent) -> bool {
        match event {
            WizardEvent::SetField(field, value) => {
                if !self.editable() || self.step == WizardStep::Review {
                    return false;
                }
                self.values.set(field, value);
                if field == Field::Description {
                    if let Some(s) = categorize::suggestions_for(&self.values.description) {
                        self.suggestions = s;
                    }
                }
                self.revalidate(field);
                true
            }
            WizardEvent::LocationResolved {
                latitude,
                longitude,
                address,
            } => {
                if !self.editable() || self.step == WizardStep::Review {
                    return false;
                }
                self.values.location = address;
                self.values.latitude = latitude.to_string();
                self.values.longitude = longitude.to_string();
                for f in [Field::Location, Field::Latitude, Field::Longitude] {
                    self.revalidate(f);
                }
                self.banner = None;
                true
            }
            WizardEvent::LocationFailed { message } => {
                self.banner = Some(message);
                true
            }
            WizardEvent::AddEvidence(file) => {
                if !self.editable() || self.step == WizardStep::Review {
                    return false;
                }
                self.values.evidence_files.push(file);
                true
            }
            WizardEvent::RemoveEvidence(index) => {
                if !self.editable() || index >= self.values.evidence_files.len() {
                    return false;
                }
                self.values.evidence_files.remove(index);
                true
            }
            WizardEvent::Next { now } => self.next(now),
            WizardEvent::Back => {
                if !self.editable() {
                    return false;
                }
                match self.step.prev() {
                    Some(prev) => {
                        self.step = prev;
                        true
                    }
                    None => false,
                }
            }
            WizardEvent::RequestSubmit => {
                if self.step != WizardStep::Review || !self.editable() {
                    return false;
                }
                self.confirming = true;
                true
            }
            WizardEvent::CancelSubmit => {
                if !self.confirming {
                    return false;
                }
                self.confirming = false;
                true
            }
            WizardEvent::ConfirmSubmit => {
                if !self.confirming || self.phase != SubmitPhase::Editing {
                    return false;
                }
                self.confirming = false;
                self.banner = None;
                self.phase = SubmitPhase::Submitting;
                true
            }
            WizardEvent::SubmitSucceeded { id } => {
                if self.phase != SubmitPhase::Submitting {
                    return false;
                }
                self.phase = SubmitPhase::Submitted { id };
                true
            }
            WizardEvent::SubmitFailed { message } => {
                if self.phase != SubmitPhase::Submitting {
                    return false;
                }
                self.phase = SubmitPhase::Editing;
                self.banner = Some(message);
                true
            }
            WizardEvent::DismissBanner => self.banner.take().is_some(),
        }
    }

    fn next(&mut self, now: DateTime<Utc>) -> bool {
        if !self.editable() {
            return false;
        }
        let Some(next) = self.step.next() else {
            return false;
        };
        self.today = now.date_naive();
        let fields: Vec<Field> = self.step.cumulative_fields().collect();
        self.touched.extend(fields.iter().copied());
        self.errors = validate_step(&self.values, self.step, self.today);
        if fields.iter().any(|f| self.errors.contains_key(f)) {
            return false;
        }

        self.step = next;
        if next == WizardStep::Review {
            self.review_timestamp = Some(now);
        }
        true
    }

    fn revalidate(&mut self, field: Field) {
        match validate_field(field, &self.values, self.today) {
            Some(msg) => {
                self.errors.insert(field, msg);
            }
            None => {
                self.errors.remove(&field);
            }
        }
    }
}
