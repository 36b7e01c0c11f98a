//! Saved filter presets for re-scanning the recommended pool, and the
//! filtering/sorting a scan applies.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::models::JobEntry;

static RE_ENTRY_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(intern|entry|junior|jr|associate)\b").expect("entry level pattern"));
static RE_LEAD_LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(principal|staff|lead|director|head|vp|chief|manager)\b").expect("lead level pattern")
});
static RE_SENIOR_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(senior|sr)\b").expect("senior level pattern"));

static RE_ANNUAL_K: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{2,3})\s*k").expect("annual salary pattern"));
static RE_HOURLY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$?\s*(\d{2,3})(?:\s*-\s*\$?\s*(\d{2,3}))?\s*/\s*hr").expect("hourly rate pattern")
});
static RE_DOLLARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$?\s*(\d{5,6})(\s*/\s*hr)?").expect("dollar amount pattern"));

fn parse_option<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    name: fn(&T) -> &'static str,
    alias: fn(&T) -> &'static str,
) -> Result<T, ParseError> {
    let wanted = value.trim().to_lowercase();
    all.iter()
        .copied()
        .find(|option| name(option).to_lowercase() == wanted || alias(option) == wanted)
        .ok_or_else(|| ParseError::UnknownOption {
            kind,
            value: value.to_string(),
        })
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenFilter {
    #[default]
    #[serde(rename = "All Matches")]
    AllMatches,
    Remote,
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Product Design")]
    ProductDesign,
}

impl ScreenFilter {
    pub const ALL: [ScreenFilter; 4] = [
        ScreenFilter::AllMatches,
        ScreenFilter::Remote,
        ScreenFilter::FullTime,
        ScreenFilter::ProductDesign,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenFilter::AllMatches => "All Matches",
            ScreenFilter::Remote => "Remote",
            ScreenFilter::FullTime => "Full-time",
            ScreenFilter::ProductDesign => "Product Design",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            ScreenFilter::AllMatches => "all",
            ScreenFilter::Remote => "remote",
            ScreenFilter::FullTime => "full-time",
            ScreenFilter::ProductDesign => "product-design",
        }
    }

    pub fn matches(&self, job: &JobEntry) -> bool {
        match self {
            ScreenFilter::AllMatches => true,
            ScreenFilter::Remote => {
                job.location.to_lowercase().contains("remote") || job.has_tag("remote")
            }
            ScreenFilter::FullTime => job.has_tag("full-time"),
            ScreenFilter::ProductDesign => {
                let role = job.role.to_lowercase();
                role.contains("product") || role.contains("design")
            }
        }
    }
}

impl FromStr for ScreenFilter {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option("screen filter", s, &Self::ALL, Self::as_str, Self::alias)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    #[default]
    MatchDesc,
    MatchAsc,
    #[serde(rename = "roleAZ")]
    RoleAz,
    #[serde(rename = "companyAZ")]
    CompanyAz,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::MatchDesc,
        SortOption::MatchAsc,
        SortOption::RoleAz,
        SortOption::CompanyAz,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOption::MatchDesc => "matchDesc",
            SortOption::MatchAsc => "matchAsc",
            SortOption::RoleAz => "roleAZ",
            SortOption::CompanyAz => "companyAZ",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            SortOption::MatchDesc => "match-desc",
            SortOption::MatchAsc => "match-asc",
            SortOption::RoleAz => "role",
            SortOption::CompanyAz => "company",
        }
    }

    fn compare(&self, a: &JobEntry, b: &JobEntry) -> Ordering {
        match self {
            SortOption::MatchDesc => match_score(b).cmp(&match_score(a)),
            SortOption::MatchAsc => match_score(a).cmp(&match_score(b)),
            SortOption::RoleAz => a.role.to_lowercase().cmp(&b.role.to_lowercase()),
            SortOption::CompanyAz => a.company.to_lowercase().cmp(&b.company.to_lowercase()),
        }
    }
}

impl FromStr for SortOption {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option("sort option", s, &Self::ALL, Self::as_str, Self::alias)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalaryRange {
    #[default]
    Any,
    #[serde(rename = "<$80k")]
    Under80k,
    #[serde(rename = "$100k+")]
    From100k,
    #[serde(rename = "$150k+")]
    From150k,
    #[serde(rename = "$180k+")]
    From180k,
}

impl SalaryRange {
    pub const ALL: [SalaryRange; 5] = [
        SalaryRange::Any,
        SalaryRange::Under80k,
        SalaryRange::From100k,
        SalaryRange::From150k,
        SalaryRange::From180k,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SalaryRange::Any => "Any",
            SalaryRange::Under80k => "<$80k",
            SalaryRange::From100k => "$100k+",
            SalaryRange::From150k => "$150k+",
            SalaryRange::From180k => "$180k+",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            SalaryRange::Any => "any",
            SalaryRange::Under80k => "under-80k",
            SalaryRange::From100k => "100k",
            SalaryRange::From150k => "150k",
            SalaryRange::From180k => "180k",
        }
    }

    /// `salary_in_k` of 0 means "unknown"; it only passes `Any`.
    pub fn accepts(&self, salary_in_k: u32) -> bool {
        match self {
            SalaryRange::Any => true,
            SalaryRange::Under80k => salary_in_k > 0 && salary_in_k < 80,
            SalaryRange::From100k => salary_in_k >= 100,
            SalaryRange::From150k => salary_in_k >= 150,
            SalaryRange::From180k => salary_in_k >= 180,
        }
    }
}

impl FromStr for SalaryRange {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option("salary range", s, &Self::ALL, Self::as_str, Self::alias)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    Any,
    Entry,
    Mid,
    Senior,
    #[serde(rename = "Lead+")]
    LeadPlus,
}

impl ExperienceLevel {
    pub const ALL: [ExperienceLevel; 5] = [
        ExperienceLevel::Any,
        ExperienceLevel::Entry,
        ExperienceLevel::Mid,
        ExperienceLevel::Senior,
        ExperienceLevel::LeadPlus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Any => "Any",
            ExperienceLevel::Entry => "Entry",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::LeadPlus => "Lead+",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            ExperienceLevel::LeadPlus => "lead",
            _ => "",
        }
    }

    /// Guess a role's seniority from its title.
    pub fn infer(role: &str) -> ExperienceLevel {
        let role = role.to_lowercase();

        if RE_ENTRY_LEVEL.is_match(&role) {
            ExperienceLevel::Entry
        } else if RE_LEAD_LEVEL.is_match(&role) {
            ExperienceLevel::LeadPlus
        } else if RE_SENIOR_LEVEL.is_match(&role) {
            ExperienceLevel::Senior
        } else {
            ExperienceLevel::Mid
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_option("experience level", s, &Self::ALL, Self::as_str, Self::alias)
    }
}

impl fmt::Display for ScreenFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a caller submits when saving the current filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPresetInput {
    pub screen_filter: ScreenFilter,
    pub sort_by: SortOption,
    pub remote_only: bool,
    pub full_time_only: bool,
    pub hybrid_only: bool,
    pub location_query: String,
    pub salary_range: SalaryRange,
    pub experience_level: ExperienceLevel,
    pub name: String,
}

/// A stored preset. `label` is derived from the filters, never typed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedScanPreset {
    pub screen_filter: ScreenFilter,
    pub sort_by: SortOption,
    pub remote_only: bool,
    pub full_time_only: bool,
    pub hybrid_only: bool,
    pub location_query: String,
    #[serde(default)]
    pub salary_range: SalaryRange,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    pub name: String,
    pub label: String,
}

impl RecommendedScanPreset {
    pub fn from_input(input: ScanPresetInput) -> Self {
        let location_query = input.location_query.trim().to_string();
        let label = derive_label(&input);
        let name = match input.name.trim() {
            "" => label.clone(),
            name => name.to_string(),
        };

        Self {
            screen_filter: input.screen_filter,
            sort_by: input.sort_by,
            remote_only: input.remote_only,
            full_time_only: input.full_time_only,
            hybrid_only: input.hybrid_only,
            location_query,
            salary_range: input.salary_range,
            experience_level: input.experience_level,
            name,
            label,
        }
    }

    /// "Name • Label", or just the name when the two coincide.
    pub fn descriptor(&self) -> String {
        if self.name == self.label {
            self.name.clone()
        } else {
            format!("{} • {}", self.name, self.label)
        }
    }
}

fn derive_label(input: &ScanPresetInput) -> String {
    let mut parts: Vec<String> = Vec::new();
    if input.remote_only {
        parts.push("Remote".into());
    }
    if input.full_time_only {
        parts.push("Full-time".into());
    }
    if input.hybrid_only {
        parts.push("Hybrid".into());
    }
    let location = input.location_query.trim();
    if !location.is_empty() {
        parts.push(location.to_string());
    }
    if input.salary_range != SalaryRange::Any {
        parts.push(input.salary_range.as_str().to_string());
    }
    if input.experience_level != ExperienceLevel::Any {
        parts.push(format!("{} level", input.experience_level.as_str()));
    }

    if parts.is_empty() {
        input.screen_filter.as_str().to_string()
    } else {
        parts.join(" • ")
    }
}

/// Filters and ordering applied to the recommended pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanCriteria {
    pub screen_filter: ScreenFilter,
    pub sort_by: SortOption,
    pub remote_only: bool,
    pub full_time_only: bool,
    pub hybrid_only: bool,
    pub location_query: String,
    pub salary_range: SalaryRange,
    pub experience_level: ExperienceLevel,
    pub search: String,
}

impl From<&RecommendedScanPreset> for ScanCriteria {
    fn from(preset: &RecommendedScanPreset) -> Self {
        Self {
            screen_filter: preset.screen_filter,
            sort_by: preset.sort_by,
            remote_only: preset.remote_only,
            full_time_only: preset.full_time_only,
            hybrid_only: preset.hybrid_only,
            location_query: preset.location_query.clone(),
            salary_range: preset.salary_range,
            experience_level: preset.experience_level,
            search: String::new(),
        }
    }
}

impl ScanCriteria {
    pub fn matches(&self, job: &JobEntry) -> bool {
        let query = self.search.trim().to_lowercase();
        let location_query = self.location_query.trim().to_lowercase();
        let location = job.location.to_lowercase();

        let matches_search = query.is_empty()
            || job.role.to_lowercase().contains(&query)
            || job.company.to_lowercase().contains(&query)
            || location.contains(&query);
        let matches_remote = !self.remote_only || location.contains("remote") || job.has_tag("remote");
        let matches_full_time = !self.full_time_only || job.has_tag("full-time");
        let matches_hybrid = !self.hybrid_only || job.has_tag("hybrid");
        let matches_salary = self.salary_range.accepts(salary_in_k(job));
        let matches_level = self.experience_level == ExperienceLevel::Any
            || ExperienceLevel::infer(&job.role) == self.experience_level;
        let matches_location = location_query.is_empty()
            || location.contains(&location_query)
            || (location_query.contains("remote") && job.has_tag("remote"));

        matches_search
            && matches_remote
            && matches_full_time
            && matches_hybrid
            && matches_salary
            && matches_level
            && matches_location
            && self.screen_filter.matches(job)
    }

    pub fn apply(&self, jobs: &[JobEntry]) -> Vec<JobEntry> {
        let mut selected: Vec<JobEntry> = jobs.iter().filter(|job| self.matches(job)).cloned().collect();
        selected.sort_by(|a, b| self.sort_by.compare(a, b));
        selected
    }
}

/// Numeric part of a "96%" match label; 0 when absent.
pub fn match_score(job: &JobEntry) -> u32 {
    job.match_score
        .as_deref()
        .map(|label| label.chars().filter(char::is_ascii_digit).collect::<String>())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

/// Best-effort annual salary in thousands, read from `salary` and tags.
/// Hourly figures are annualized at 2,080 hours. Returns 0 when nothing parses.
pub fn salary_in_k(job: &JobEntry) -> u32 {
    let mut source = job.salary.clone().unwrap_or_default();
    for tag in &job.tags {
        source.push(' ');
        source.push_str(tag);
    }
    parse_salary_in_k(&source).unwrap_or(0)
}

fn parse_salary_in_k(source: &str) -> Option<u32> {
    let best_annual = RE_ANNUAL_K
        .captures_iter(source)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max();
    if best_annual.is_some() {
        return best_annual;
    }

    if let Some(caps) = RE_HOURLY.captures(source) {
        let low: u32 = caps[1].parse().ok()?;
        let high = caps
            .get(2)
            .and_then(|m| m.as_str().parse::<u32>().ok())
            .unwrap_or(low);
        return Some((f64::from(low.max(high)) * 2.08).round() as u32);
    }

    RE_DOLLARS
        .captures_iter(source)
        .filter(|caps| caps.get(2).is_none())
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
        .map(|amount| (f64::from(amount) / 1000.0).round() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;

    fn recommended(id: &str, company: &str, role: &str, location: &str, score: &str, tags: &[&str]) -> JobEntry {
        JobEntry::new(id, company, role, location, JobStatus::Target)
            .with_next_action("Apply", "Today")
            .with_match(score)
            .with_tags(tags.iter().copied())
    }

    fn pool() -> Vec<JobEntry> {
        vec![
            recommended("j1", "Stellar AI", "Senior Product Designer", "San Francisco, CA", "96%", &["Remote", "Full-time", "$160k - $210k"]),
            recommended("j2", "FinFlow", "Lead UX Researcher", "New York, NY", "92%", &["Hybrid", "Full-time", "$145k - $185k"]),
            recommended("j3", "Nexus Systems", "Staff Product Manager", "Austin, TX", "88%", &["Remote", "Full-time", "$180k+"]),
            recommended("j4", "Loomly", "Interaction Designer", "Remote", "85%", &["Remote", "Contract", "$90 - $120 / hr"]),
        ]
    }

    #[test]
    fn label_joins_active_filters() {
        let preset = RecommendedScanPreset::from_input(ScanPresetInput {
            screen_filter: ScreenFilter::Remote,
            remote_only: true,
            full_time_only: true,
            location_query: "Austin, TX".into(),
            name: "Texas Remote Focus".into(),
            ..Default::default()
        });

        assert_eq!(preset.label, "Remote • Full-time • Austin, TX");
        assert_eq!(preset.name, "Texas Remote Focus");
        assert_eq!(preset.descriptor(), "Texas Remote Focus • Remote • Full-time • Austin, TX");
    }

    #[test]
    fn blank_name_falls_back_to_label() {
        let preset = RecommendedScanPreset::from_input(ScanPresetInput {
            hybrid_only: true,
            sort_by: SortOption::MatchAsc,
            name: "   ".into(),
            ..Default::default()
        });
        assert_eq!(preset.label, "Hybrid");
        assert_eq!(preset.name, "Hybrid");
        assert_eq!(preset.descriptor(), "Hybrid");
    }

    #[test]
    fn label_without_filters_uses_screen_filter() {
        let preset = RecommendedScanPreset::from_input(ScanPresetInput {
            screen_filter: ScreenFilter::ProductDesign,
            ..Default::default()
        });
        assert_eq!(preset.label, "Product Design");
    }

    #[test]
    fn label_includes_salary_and_level() {
        let preset = RecommendedScanPreset::from_input(ScanPresetInput {
            salary_range: SalaryRange::From150k,
            experience_level: ExperienceLevel::Senior,
            ..Default::default()
        });
        assert_eq!(preset.label, "$150k+ • Senior level");
    }

    #[test]
    fn preset_serializes_with_wire_names() {
        let preset = RecommendedScanPreset::from_input(ScanPresetInput {
            screen_filter: ScreenFilter::AllMatches,
            sort_by: SortOption::RoleAz,
            salary_range: SalaryRange::Under80k,
            experience_level: ExperienceLevel::LeadPlus,
            ..Default::default()
        });
        let json = serde_json::to_value(&preset).unwrap();
        assert_eq!(json["screenFilter"], "All Matches");
        assert_eq!(json["sortBy"], "roleAZ");
        assert_eq!(json["salaryRange"], "<$80k");
        assert_eq!(json["experienceLevel"], "Lead+");
    }

    #[test]
    fn parses_cli_spellings() {
        assert_eq!("remote".parse::<ScreenFilter>().unwrap(), ScreenFilter::Remote);
        assert_eq!("Full-time".parse::<ScreenFilter>().unwrap(), ScreenFilter::FullTime);
        assert_eq!("company".parse::<SortOption>().unwrap(), SortOption::CompanyAz);
        assert_eq!("150k".parse::<SalaryRange>().unwrap(), SalaryRange::From150k);
        assert_eq!("lead".parse::<ExperienceLevel>().unwrap(), ExperienceLevel::LeadPlus);
        assert!("sideways".parse::<SortOption>().is_err());
    }

    #[test]
    fn salary_parsing_covers_annual_and_hourly() {
        let jobs = pool();
        assert_eq!(salary_in_k(&jobs[0]), 210);
        assert_eq!(salary_in_k(&jobs[2]), 180);
        assert_eq!(salary_in_k(&jobs[3]), 250);

        let mut plain = JobEntry::new("x", "Acme", "Engineer", "Remote", JobStatus::Target);
        plain.salary = Some("$95,000".into());
        assert_eq!(salary_in_k(&plain), 0);
        plain.salary = Some("$95000 base".into());
        assert_eq!(salary_in_k(&plain), 95);
    }

    #[test]
    fn salary_and_level_patterns_compile() {
        for re in [&RE_ENTRY_LEVEL, &RE_LEAD_LEVEL, &RE_SENIOR_LEVEL, &RE_ANNUAL_K, &RE_HOURLY, &RE_DOLLARS] {
            LazyLock::force(re);
        }
        assert!(RE_HOURLY.is_match("$90 - $120 / hr"));
        assert!(!RE_SENIOR_LEVEL.is_match("sre"));
    }

    #[test]
    fn infers_experience_from_role() {
        assert_eq!(ExperienceLevel::infer("Junior Developer"), ExperienceLevel::Entry);
        assert_eq!(ExperienceLevel::infer("Staff Product Manager"), ExperienceLevel::LeadPlus);
        assert_eq!(ExperienceLevel::infer("Senior Product Designer"), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::infer("Interaction Designer"), ExperienceLevel::Mid);
    }

    #[test]
    fn criteria_filters_then_sorts() {
        let criteria = ScanCriteria {
            remote_only: true,
            full_time_only: true,
            sort_by: SortOption::MatchAsc,
            ..Default::default()
        };
        let ids: Vec<String> = criteria.apply(&pool()).into_iter().map(|job| job.id).collect();
        assert_eq!(ids, vec!["j3", "j1"]);
    }

    #[test]
    fn criteria_from_preset_uses_location_and_screen_filter() {
        let preset = RecommendedScanPreset::from_input(ScanPresetInput {
            screen_filter: ScreenFilter::Remote,
            location_query: "austin".into(),
            ..Default::default()
        });
        let ids: Vec<String> = ScanCriteria::from(&preset)
            .apply(&pool())
            .into_iter()
            .map(|job| job.id)
            .collect();
        assert_eq!(ids, vec!["j3"]);
    }

    #[test]
    fn default_sort_is_best_match_first() {
        let ids: Vec<String> = ScanCriteria::default()
            .apply(&pool())
            .into_iter()
            .map(|job| job.id)
            .collect();
        assert_eq!(ids, vec!["j1", "j2", "j3", "j4"]);
    }

    #[test]
    fn salary_floor_excludes_unknown_salaries() {
        let criteria = ScanCriteria {
            salary_range: SalaryRange::From180k,
            ..Default::default()
        };
        let ids: Vec<String> = criteria.apply(&pool()).into_iter().map(|job| job.id).collect();
        assert_eq!(ids, vec!["j1", "j2", "j3", "j4"]);

        let under = ScanCriteria {
            salary_range: SalaryRange::Under80k,
            ..Default::default()
        };
        assert!(under.apply(&pool()).is_empty());
    }
}
