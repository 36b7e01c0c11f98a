use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Where a tracked application currently sits in the pipeline.
///
/// `Interview` and `Interviewing` come from different generations of data
/// and compare equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum JobStatus {
    Target,
    Applied,
    Interview,
    Interviewing,
    #[serde(rename = "Offer Received")]
    OfferReceived,
    #[serde(rename = "Offer Signed")]
    OfferSigned,
    Rejected,
    #[serde(rename = "Not Interested")]
    NotInterested,
}

impl JobStatus {
    pub const ALL: [JobStatus; 8] = [
        JobStatus::Target,
        JobStatus::Applied,
        JobStatus::Interview,
        JobStatus::Interviewing,
        JobStatus::OfferReceived,
        JobStatus::OfferSigned,
        JobStatus::Rejected,
        JobStatus::NotInterested,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Target => "Target",
            JobStatus::Applied => "Applied",
            JobStatus::Interview => "Interview",
            JobStatus::Interviewing => "Interviewing",
            JobStatus::OfferReceived => "Offer Received",
            JobStatus::OfferSigned => "Offer Signed",
            JobStatus::Rejected => "Rejected",
            JobStatus::NotInterested => "Not Interested",
        }
    }

    pub fn is_interviewing(&self) -> bool {
        matches!(self, JobStatus::Interview | JobStatus::Interviewing)
    }

    pub fn is_offer(&self) -> bool {
        matches!(self, JobStatus::OfferReceived | JobStatus::OfferSigned)
    }

    // Collapses the interview synonyms so comparisons can match on one value.
    fn canonical(&self) -> JobStatus {
        match self {
            JobStatus::Interview => JobStatus::Interviewing,
            other => *other,
        }
    }
}

impl PartialEq for JobStatus {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(&self.canonical()) == std::mem::discriminant(&other.canonical())
    }
}

impl Eq for JobStatus {}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str().to_lowercase() == normalized)
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// A tracked job application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEntry {
    pub id: String,
    pub company: String,
    pub role: String,
    pub location: String,
    pub status: JobStatus,
    /// Free-text label for what to do next. Empty means nothing is pending.
    #[serde(default)]
    pub next_action: String,
    /// Free-text due label ("Tomorrow, 2:00 PM"); never parsed.
    #[serde(default)]
    pub next_action_date: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_overdue: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub saved_from_recommended: bool,
    /// Status the tracked entry had before it last moved to `Target`; an unsave restores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl JobEntry {
    pub fn new(
        id: impl Into<String>,
        company: impl Into<String>,
        role: impl Into<String>,
        location: impl Into<String>,
        status: JobStatus,
    ) -> Self {
        Self {
            id: id.into(),
            company: company.into(),
            role: role.into(),
            location: location.into(),
            status,
            next_action: String::new(),
            next_action_date: String::new(),
            is_overdue: false,
            notes: String::new(),
            saved_from_recommended: false,
            previous_status: None,
            tags: Vec::new(),
            match_score: None,
            salary: None,
            logo: None,
            color: None,
        }
    }

    pub fn with_next_action(mut self, action: impl Into<String>, date: impl Into<String>) -> Self {
        self.next_action = action.into();
        self.next_action_date = date.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_match(mut self, score: impl Into<String>) -> Self {
        self.match_score = Some(score.into());
        self
    }

    pub fn has_pending_action(&self) -> bool {
        !self.next_action.is_empty()
    }

    pub fn has_tag(&self, expected: &str) -> bool {
        self.tags.iter().any(|tag| tag.eq_ignore_ascii_case(expected))
    }

    /// "Role at Company", the subtitle used by checklist rows.
    pub fn headline(&self) -> String {
        format!("{} at {}", self.role, self.company)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionItemKind {
    /// Derived from a tracked job's pending action.
    Action,
    /// Fallback suggestion with no job behind it.
    Generic,
}

/// One row of the weekly checklist. Derived, never canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyActionItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub kind: ActionItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<JobEntry>,
}

impl WeeklyActionItem {
    pub fn from_job(job: &JobEntry) -> Self {
        Self {
            id: job.id.clone(),
            title: job.next_action.clone(),
            subtitle: job.headline(),
            kind: ActionItemKind::Action,
            job: Some(job.clone()),
        }
    }

    pub fn generic(id: &str, title: &str, subtitle: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            kind: ActionItemKind::Generic,
            job: None,
        }
    }

    /// Identity for the completed set: the same job with a new action is a new item.
    pub fn key(&self) -> String {
        format!("{}:{}", self.id, self.title)
    }
}

/// A confirm/deny question shown before a transition is committed.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionDecisionPrompt {
    pub action: WeeklyActionItem,
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub deny_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Confirm,
    Deny,
}

impl FromStr for Decision {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "confirm" | "yes" | "y" => Ok(Decision::Confirm),
            "deny" | "no" | "n" => Ok(Decision::Deny),
            _ => Err(ParseError::UnknownDecision(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interview_synonyms_compare_equal() {
        assert_eq!(JobStatus::Interview, JobStatus::Interviewing);
        assert_ne!(JobStatus::Interview, JobStatus::Applied);
        assert_ne!(JobStatus::OfferReceived, JobStatus::OfferSigned);
    }

    #[test]
    fn status_parses_display_and_cli_spellings() {
        assert_eq!("Offer Signed".parse::<JobStatus>().unwrap(), JobStatus::OfferSigned);
        assert!(matches!(
            "not-interested".parse::<JobStatus>().unwrap(),
            JobStatus::NotInterested
        ));
        assert!(matches!("interviewing".parse::<JobStatus>().unwrap(), JobStatus::Interviewing));
        assert_eq!(
            "hired".parse::<JobStatus>().unwrap_err(),
            ParseError::UnknownStatus("hired".into())
        );
    }

    #[test]
    fn job_entry_serializes_with_camel_case_keys() {
        let mut job = JobEntry::new("3", "Airbnb", "Design Lead", "San Francisco", JobStatus::Target)
            .with_next_action("Submit Application", "Overdue")
            .with_match("96%");
        job.is_overdue = true;

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["status"], "Target");
        assert_eq!(json["nextAction"], "Submit Application");
        assert_eq!(json["isOverdue"], true);
        assert_eq!(json["match"], "96%");
        assert!(json.get("notes").is_none());
        assert!(json.get("savedFromRecommended").is_none());
    }

    #[test]
    fn job_entry_reads_legacy_shape() {
        let json = r#"{
            "id": "5",
            "company": "Spotify",
            "role": "Product Designer",
            "location": "New York",
            "status": "Offer Received",
            "nextAction": "Sign Offer Letter",
            "nextActionDate": "Reviewing"
        }"#;
        let job: JobEntry = serde_json::from_str(json).unwrap();
        assert!(job.status.is_offer());
        assert!(!job.saved_from_recommended);
        assert!(job.tags.is_empty());
    }

    #[test]
    fn action_item_key_tracks_title() {
        let job = JobEntry::new("2", "Stripe", "Staff Product Designer", "Remote", JobStatus::Applied)
            .with_next_action("Follow up email", "Due in 2 days");
        let item = WeeklyActionItem::from_job(&job);
        assert_eq!(item.key(), "2:Follow up email");
        assert_eq!(item.subtitle, "Staff Product Designer at Stripe");
    }

    #[test]
    fn decision_parses_short_forms() {
        assert_eq!("y".parse::<Decision>().unwrap(), Decision::Confirm);
        assert_eq!("Deny".parse::<Decision>().unwrap(), Decision::Deny);
        assert!("maybe".parse::<Decision>().is_err());
    }
}
