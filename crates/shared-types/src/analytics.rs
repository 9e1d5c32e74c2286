//! Aggregate figures for the responder analytics view.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fir::{Fir, FirCategory, FirStatus};
use crate::query::QueryRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusCount {
    pub status: FirStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CategoryCount {
    pub category: FirCategory,
    pub count: usize,
}

/// Open records per officer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct OfficerWorkload {
    pub officer: String,
    pub open_cases: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FirStatistics {
    pub total: usize,
    pub open: usize,
    pub unassigned: usize,
    /// Share of records that are resolved or closed, `0.0..=1.0`.
    pub resolution_rate: f64,
    pub by_status: Vec<StatusCount>,
    pub by_category: Vec<CategoryCount>,
    pub officer_workload: Vec<OfficerWorkload>,
}

impl FirStatistics {
    pub fn from_records<R: QueryRecord>(records: &[R]) -> Self {
        let total = records.len();
        let count_status =
            |s: FirStatus| records.iter().filter(|r| r.record_status() == s).count();

        let by_status: Vec<StatusCount> = FirStatus::ALL
            .into_iter()
            .map(|status| StatusCount {
                status,
                count: count_status(status),
            })
            .collect();
        let by_category = FirCategory::ALL
            .into_iter()
            .map(|category| CategoryCount {
                category,
                count: records
                    .iter()
                    .filter(|r| r.record_category() == category)
                    .count(),
            })
            .collect();

        let closed: usize = by_status
            .iter()
            .filter(|c| c.status.is_terminal())
            .map(|c| c.count)
            .sum();
        let resolution_rate = if total == 0 {
            0.0
        } else {
            closed as f64 / total as f64
        };

        let mut workload: BTreeMap<&str, usize> = BTreeMap::new();
        for r in records.iter().filter(|r| !r.record_status().is_terminal()) {
            if let Some(officer) = r.record_assignee() {
                *workload.entry(officer).or_default() += 1;
            }
        }

        Self {
            total,
            open: total - closed,
            unassigned: records.iter().filter(|r| r.record_assignee().is_none()).count(),
            resolution_rate,
            by_status,
            by_category,
            officer_workload: workload
                .into_iter()
                .map(|(officer, open_cases)| OfficerWorkload {
                    officer: officer.to_string(),
                    open_cases,
                })
                .collect(),
        }
    }
}

/// One incident on the crime heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HeatmapPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub category: FirCategory,
}

/// Points for every record with a map position.
pub fn heatmap_points(records: &[Fir]) -> Vec<HeatmapPoint> {
    records
        .iter()
        .filter_map(|f| {
            f.location.coordinates.map(|c| HeatmapPoint {
                latitude: c.latitude(),
                longitude: c.longitude(),
                category: f.category,
            })
        })
        .collect()
}
