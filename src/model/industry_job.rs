//! Industry job models: normalized sync rows and listing summaries.

use chrono::NaiveDateTime;

use entity::sea_orm_active_enums::JobStatus;

/// A remote industry job row after validation, ready for persistence.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedIndustryJob {
    pub job_id: i64,
    pub blueprint_id: i64,
    pub activity: i32,
    pub installer_id: i64,
    pub location_id: i64,
    pub runs: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub status: JobStatus,
}

/// Industry activities jobs run against a blueprint.
///
/// Remote jobs carry a numeric activity id; ids outside this set are kept
/// raw and displayed by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobActivity {
    Manufacturing,
    ResearchingTimeEfficiency,
    ResearchingMaterialEfficiency,
    Copying,
    Invention,
    Reaction,
}

impl JobActivity {
    pub fn of(activity_id: i32) -> Option<Self> {
        match activity_id {
            1 => Some(JobActivity::Manufacturing),
            3 => Some(JobActivity::ResearchingTimeEfficiency),
            4 => Some(JobActivity::ResearchingMaterialEfficiency),
            5 => Some(JobActivity::Copying),
            8 => Some(JobActivity::Invention),
            9 => Some(JobActivity::Reaction),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobActivity::Manufacturing => "Manufacturing",
            JobActivity::ResearchingTimeEfficiency => "Researching Time Efficiency",
            JobActivity::ResearchingMaterialEfficiency => "Researching Material Efficiency",
            JobActivity::Copying => "Copying",
            JobActivity::Invention => "Invention",
            JobActivity::Reaction => "Reaction",
        }
    }

    /// Display text for a raw activity id.
    pub fn display(activity_id: i32) -> String {
        match Self::of(activity_id) {
            Some(activity) => activity.label().to_string(),
            None => format!("Activity #{}", activity_id),
        }
    }
}

/// One row of a user-facing industry job listing.
#[derive(Debug, Clone, PartialEq)]
pub struct IndustryJobSummary {
    pub job_id: i64,
    pub blueprint_type_name: String,
    pub owner_name: String,
    pub activity: String,
    pub installer_name: Option<String>,
    pub runs: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub status: JobStatus,
}
