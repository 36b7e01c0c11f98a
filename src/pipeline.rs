//! Tracker list views over `this_week ++ next_up`, and the note entries
//! callers append when they change a job outside the checklist.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};

use crate::error::ParseError;
use crate::models::{JobEntry, JobStatus};
use crate::store::{ALL_ROLES, JobStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PipelineStatusFilter {
    #[default]
    All,
    Applied,
    Interview,
    Offer,
    Target,
    NotInterested,
}

impl PipelineStatusFilter {
    pub const ALL: [PipelineStatusFilter; 6] = [
        PipelineStatusFilter::All,
        PipelineStatusFilter::Applied,
        PipelineStatusFilter::Interview,
        PipelineStatusFilter::Offer,
        PipelineStatusFilter::Target,
        PipelineStatusFilter::NotInterested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStatusFilter::All => "All",
            PipelineStatusFilter::Applied => "Applied",
            PipelineStatusFilter::Interview => "Interview",
            PipelineStatusFilter::Offer => "Offer",
            PipelineStatusFilter::Target => "Target",
            PipelineStatusFilter::NotInterested => "Not Interested",
        }
    }

    pub fn matches(&self, status: JobStatus) -> bool {
        match self {
            PipelineStatusFilter::All => true,
            PipelineStatusFilter::Applied => status == JobStatus::Applied,
            PipelineStatusFilter::Interview => status.is_interviewing(),
            PipelineStatusFilter::Offer => status.is_offer(),
            PipelineStatusFilter::Target => status == JobStatus::Target,
            PipelineStatusFilter::NotInterested => status == JobStatus::NotInterested,
        }
    }
}

impl fmt::Display for PipelineStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PipelineStatusFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        if normalized == "interviewing" {
            return Ok(PipelineStatusFilter::Interview);
        }
        PipelineStatusFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().to_lowercase() == normalized)
            .ok_or_else(|| ParseError::UnknownOption {
                kind: "status filter",
                value: s.to_string(),
            })
    }
}

/// Role filter semantics. "All Roles" matches everything; a couple of
/// filter names also match the job-title words people actually use.
pub fn matches_role_filter(job: &JobEntry, filter: &str) -> bool {
    if filter == ALL_ROLES {
        return true;
    }

    let filter = filter.to_lowercase();
    let role = job.role.to_lowercase();

    role.contains(&filter)
        || job.tags.iter().any(|tag| tag.to_lowercase() == filter)
        || (filter == "product design" && role.contains("designer"))
        || (filter == "engineering" && (role.contains("engineer") || role.contains("developer")))
}

pub fn matches_search(job: &JobEntry, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    query.is_empty()
        || job.role.to_lowercase().contains(&query)
        || job.company.to_lowercase().contains(&query)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineQuery {
    pub status: PipelineStatusFilter,
    pub role_filter: String,
    pub search: String,
}

impl Default for PipelineQuery {
    fn default() -> Self {
        Self {
            status: PipelineStatusFilter::All,
            role_filter: ALL_ROLES.to_string(),
            search: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub applied: usize,
    pub interviewing: usize,
    pub offers: usize,
    pub saved: usize,
}

impl PipelineQuery {
    pub fn is_filtering(&self) -> bool {
        self.status != PipelineStatusFilter::All
            || !self.search.trim().is_empty()
            || self.role_filter != ALL_ROLES
    }

    fn in_context(&self, job: &JobEntry, role_filter: &str) -> bool {
        matches_search(job, &self.search) && matches_role_filter(job, role_filter)
    }

    pub fn apply<'a>(&self, store: &'a JobStore) -> Vec<&'a JobEntry> {
        store
            .all_tracked()
            .filter(|job| self.in_context(job, &self.role_filter) && self.status.matches(job.status))
            .collect()
    }

    /// Counts follow search and role filter but ignore the status filter.
    pub fn counts(&self, store: &JobStore) -> StatusCounts {
        store
            .all_tracked()
            .filter(|job| self.in_context(job, &self.role_filter))
            .fold(StatusCounts::default(), |mut counts, job| {
                if job.status == JobStatus::Applied {
                    counts.applied += 1;
                }
                if job.status.is_interviewing() {
                    counts.interviewing += 1;
                }
                if job.status.is_offer() {
                    counts.offers += 1;
                }
                if job.status == JobStatus::Target {
                    counts.saved += 1;
                }
                counts
            })
    }

    /// How many jobs each role filter would show with the current search and status.
    pub fn role_filter_counts(&self, store: &JobStore) -> Vec<(String, usize)> {
        store
            .filters()
            .iter()
            .map(|filter| {
                let count = store
                    .all_tracked()
                    .filter(|job| self.in_context(job, filter) && self.status.matches(job.status))
                    .count();
                (filter.clone(), count)
            })
            .collect()
    }
}

/// Timestamp label used in note entries, e.g. "3/14/2026, 9:05:00 AM".
pub fn timestamp_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

pub fn date_label<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: fmt::Display,
{
    at.format("%-m/%-d/%Y").to_string()
}

fn append_entry(previous: &str, entry: &str) -> String {
    [previous.trim(), entry]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Notes after a manual status change, with optional reason and note lines.
pub fn status_change_note(
    previous: &str,
    from: JobStatus,
    to: JobStatus,
    reason: Option<&str>,
    note: Option<&str>,
    at: &str,
) -> String {
    let mut lines = vec![format!("[{at}] Status: {from} -> {to}")];
    if let Some(reason) = reason.map(str::trim).filter(|r| !r.is_empty()) {
        lines.push(format!("Reason: {reason}"));
    }
    if let Some(note) = note.map(str::trim).filter(|n| !n.is_empty()) {
        lines.push(format!("Note: {note}"));
    }
    append_entry(previous, &lines.join("\n"))
}

/// Notes after a free-standing note; `None` when the note is blank.
pub fn plain_note(previous: &str, note: &str, at: &str) -> Option<String> {
    let note = note.trim();
    if note.is_empty() {
        return None;
    }
    Some(append_entry(previous, &format!("[{at}] Note: {note}")))
}

/// Notes after an outreach message went out. A blank draft leaves them as-is.
pub fn outreach_sent_note(previous: &str, draft: &str, on: &str) -> String {
    let draft = draft.trim();
    if draft.is_empty() {
        return previous.to_string();
    }
    let marker = format!("[Outreach sent • {on}]");
    let notes = append_entry(previous, &marker);
    append_entry(&notes, draft)
}
