use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use shared_types::{
    AppError, Coordinates, Fir, FirCategory, FirDraft, FirId, FirQuery, FirStatus, Location,
    QueryPage, Reporter,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory FIR table. Cloning shares the same table.
#[derive(Clone, Default)]
pub struct FirStore {
    inner: Arc<RwLock<FirTable>>,
}

struct FirTable {
    /// Next id to hand out. Only ever grows, so ids are never reused.
    next_seq: u32,
    records: Vec<Fir>,
}

impl Default for FirTable {
    fn default() -> Self {
        Self {
            next_seq: 1,
            records: Vec::new(),
        }
    }
}

impl FirTable {
    fn get_mut(&mut self, id: FirId) -> Result<&mut Fir, AppError> {
        self.records
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| not_found(id))
    }
}

fn not_found(id: FirId) -> AppError {
    AppError::not_found(format!("FIR {id} not found"))
}

/// Validate a draft and store it as a new `Pending` record.
pub async fn create(
    store: &FirStore,
    draft: FirDraft,
    filed_by: &str,
    filed_at: DateTime<Utc>,
) -> Result<Fir, AppError> {
    let mut table = store.inner.write().await;
    let id = FirId::from_sequence(table.next_seq);
    let fir = draft.into_fir(id, filed_by, filed_at)?;
    table.next_seq += 1;
    table.records.push(fir.clone());
    Ok(fir)
}

/// Store an already-built record, keeping the id sequence ahead of it.
pub async fn insert(store: &FirStore, fir: Fir) -> Result<(), AppError> {
    let mut table = store.inner.write().await;
    if table.records.iter().any(|f| f.id == fir.id) {
        return Err(AppError::conflict(format!("FIR {} already exists", fir.id)));
    }
    table.next_seq = table.next_seq.max(fir.id.sequence() + 1);
    table.records.push(fir);
    Ok(())
}

pub async fn find_by_id(store: &FirStore, id: FirId) -> Option<Fir> {
    let table = store.inner.read().await;
    table.records.iter().find(|f| f.id == id).cloned()
}

/// Every record, in filing order.
pub async fn list_all(store: &FirStore) -> Vec<Fir> {
    store.inner.read().await.records.clone()
}

/// Records filed by one citizen, in filing order.
pub async fn list_by_reporter(store: &FirStore, user_id: &str) -> Vec<Fir> {
    let table = store.inner.read().await;
    table
        .records
        .iter()
        .filter(|f| f.filed_by == user_id)
        .cloned()
        .collect()
}

pub async fn search(store: &FirStore, query: &FirQuery) -> QueryPage<Fir> {
    let table = store.inner.read().await;
    query.apply(&table.records)
}

pub async fn count(store: &FirStore) -> usize {
    store.inner.read().await.records.len()
}

/// Overwrite the status and append one history entry.
pub async fn update_status(
    store: &FirStore,
    id: FirId,
    status: FirStatus,
    comment: Option<String>,
    at: DateTime<Utc>,
) -> Result<Fir, AppError> {
    let mut table = store.inner.write().await;
    let fir = table.get_mut(id)?;
    fir.set_status(status, comment, at);
    Ok(fir.clone())
}

/// Overwrite the assignee; `None` unassigns.
pub async fn assign(store: &FirStore, id: FirId, officer: Option<String>) -> Result<Fir, AppError> {
    let mut table = store.inner.write().await;
    let fir = table.get_mut(id)?;
    fir.assign(officer);
    Ok(fir.clone())
}

pub async fn add_note(
    store: &FirStore,
    id: FirId,
    comment: String,
    at: DateTime<Utc>,
) -> Result<Fir, AppError> {
    let mut table = store.inner.write().await;
    let fir = table.get_mut(id)?;
    fir.add_note(comment, at);
    Ok(fir.clone())
}

// ── Demo data ───────────────────────────────────────────────────────

/// User id the sample records are filed under.
pub const DEMO_FILER: &str = "demo";

struct Sample {
    seq: u32,
    title: &'static str,
    date: (i32, u32, u32),
    time: (u32, u32),
    status: FirStatus,
    category: FirCategory,
    location: &'static str,
    reporter: (&'static str, &'static str),
    officer: Option<&'static str>,
    description: &'static str,
    coordinates: Option<(f64, f64)>,
}

const SAMPLES: &[Sample] = &[
    Sample {
        seq: 123,
        title: "Theft of Mobile Phone",
        date: (2023, 5, 10),
        time: (14, 30),
        status: FirStatus::UnderInvestigation,
        category: FirCategory::Theft,
        location: "Central Park",
        reporter: ("John Doe", "1234567890"),
        officer: Some("Officer Smith"),
        description: "My iPhone 13 was stolen while I was sitting on a bench in Central Park.",
        coordinates: Some((40.785091, -73.968285)),
    },
    Sample {
        seq: 124,
        title: "Vehicle Damage in Parking Lot",
        date: (2023, 5, 11),
        time: (9, 15),
        status: FirStatus::Pending,
        category: FirCategory::PropertyDamage,
        location: "Mall Parking",
        reporter: ("Alice Johnson", "9876543210"),
        officer: None,
        description: "Found my car with a large scratch on the driver side door when I returned from shopping.",
        coordinates: Some((40.758896, -73.985130)),
    },
    Sample {
        seq: 125,
        title: "Cybercrime Fraud Attempt",
        date: (2023, 5, 12),
        time: (11, 45),
        status: FirStatus::Pending,
        category: FirCategory::Cybercrime,
        location: "Online",
        reporter: ("Robert Brown", "5551234567"),
        officer: None,
        description: "Received phishing emails attempting to steal my banking credentials.",
        coordinates: None,
    },
    Sample {
        seq: 126,
        title: "Assault at Nightclub",
        date: (2023, 5, 9),
        time: (23, 20),
        status: FirStatus::UnderInvestigation,
        category: FirCategory::Assault,
        location: "Downtown Nightclub",
        reporter: ("Michael Wilson", "3334445555"),
        officer: Some("Officer Johnson"),
        description: "Was attacked by an unknown person while leaving the nightclub.",
        coordinates: Some((40.749401, -73.991305)),
    },
    Sample {
        seq: 127,
        title: "Noise Complaint from Neighbors",
        date: (2023, 5, 13),
        time: (1, 30),
        status: FirStatus::Resolved,
        category: FirCategory::PublicNuisance,
        location: "Residential Area",
        reporter: ("Emily Davis", "7778889999"),
        officer: Some("Officer Garcia"),
        description: "Neighbors playing extremely loud music late at night, making it impossible to sleep.",
        coordinates: Some((40.762901, -73.931205)),
    },
];

/// Build the sample records, filed at `now`.
pub fn demo_records(now: DateTime<Utc>) -> Vec<Fir> {
    SAMPLES
        .iter()
        .filter_map(|s| {
            let date = NaiveDate::from_ymd_opt(s.date.0, s.date.1, s.date.2)?;
            let time = NaiveTime::from_hms_opt(s.time.0, s.time.1, 0)?;
            let coordinates = s
                .coordinates
                .and_then(|(lat, lng)| Coordinates::new(lat, lng).ok());
            let (name, phone) = s.reporter;
            let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
            let mut fir = Fir::new(
                FirId::from_sequence(s.seq),
                s.title.to_string(),
                s.category,
                s.description.to_string(),
                date,
                time,
                Location {
                    label: s.location.to_string(),
                    coordinates,
                },
                Reporter {
                    name: name.to_string(),
                    phone: phone.to_string(),
                    email,
                    address: s.location.to_string(),
                },
                DEMO_FILER.to_string(),
                now,
            );
            if s.status != FirStatus::Pending {
                fir.set_status(s.status, None, now);
            }
            fir.assign(s.officer.map(str::to_string));
            Some(fir)
        })
        .collect()
}

/// Load the sample records. Records already present are skipped.
pub async fn seed_demo(store: &FirStore, now: DateTime<Utc>) -> usize {
    let mut seeded = 0;
    for fir in demo_records(now) {
        if insert(store, fir).await.is_ok() {
            seeded += 1;
        }
    }
    seeded
}
