//! Keyword classification of free-text "next action" labels.
//!
//! Everything here is a pure function of its input. The same answers drive
//! both row labels and status transitions, so the two must never disagree.

use std::fmt;

use crate::models::{JobEntry, WeeklyActionItem};

/// Semantic category of a pending action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Submit,
    ThankYou,
    FollowUp,
    Interview,
    Offer,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Submit => "submit",
            ActionType::ThankYou => "thankyou",
            ActionType::FollowUp => "followup",
            ActionType::Interview => "interview",
            ActionType::Offer => "offer",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const THANK_YOU_PATTERNS: [&str; 6] = [
    "send thank you",
    "send thank-you",
    "thank you note",
    "thank-you note",
    "thankyou",
    "thanks",
];

const FOLLOW_UP_KEYWORDS: [&str; 7] = [
    "follow",
    "response",
    "reply",
    "check-in",
    "outreach",
    "recruiter",
    "coffee chat",
];

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| text.contains(needle))
}

fn is_submit(text: &str) -> bool {
    contains_any(text, &["submit application", "apply"])
}

fn is_follow_up(text: &str) -> bool {
    contains_any(text, &FOLLOW_UP_KEYWORDS)
}

fn is_interview(text: &str) -> bool {
    contains_any(text, &["interview", "screen"])
}

fn is_offer(text: &str) -> bool {
    contains_any(text, &["offer", "sign"])
}

fn is_profile_work(text: &str) -> bool {
    contains_any(text, &["portfolio", "linkedin"])
}

// Order matters: thank-you must be checked before the follow-up family.
const RULES: [(fn(&str) -> bool, ActionType); 5] = [
    (is_submit, ActionType::Submit),
    (thank_you_matches, ActionType::ThankYou),
    (is_follow_up, ActionType::FollowUp),
    (is_interview, ActionType::Interview),
    (is_offer, ActionType::Offer),
];

fn thank_you_matches(normalized: &str) -> bool {
    contains_any(normalized, &THANK_YOU_PATTERNS)
}

/// Classify a next-action label. `None` means a plain checkbox.
pub fn tracked_action_type(text: &str) -> Option<ActionType> {
    let normalized = normalize(text);
    RULES
        .iter()
        .find(|(predicate, _)| predicate(&normalized))
        .map(|(_, category)| *category)
}

pub fn is_coffee_chat(text: &str) -> bool {
    normalize(text).contains("coffee chat")
}

/// True for labels that mean "an outreach email should be drafted".
pub fn is_outreach_action(text: &str) -> bool {
    let normalized = normalize(text);
    contains_any(
        &normalized,
        &[
            "follow up email",
            "follow-up email",
            "follow up / test",
            "follow-up / test",
        ],
    ) || (normalized.contains("follow") && normalized.contains("email"))
        || normalized.contains("test")
}

/// Templated follow-up message for a tracked job.
pub fn build_outreach_draft(job: &JobEntry) -> String {
    [
        format!("Hi {} team,", job.company),
        String::new(),
        format!(
            "Quick follow-up on my application for the {} role.",
            job.role
        ),
        "I remain very interested and would love to continue the process.".to_string(),
        String::new(),
        "If helpful, I can also share a short work sample aligned to this role.".to_string(),
        String::new(),
        "Thank you for your time,".to_string(),
        "[Your Name]".to_string(),
    ]
    .join("\n")
}

/// Screens an action can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    ApplyPack,
    JobTracker,
    OutreachCenter,
    InterviewPrep,
    LinkedInKit,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::ApplyPack => "ApplyPack",
            Screen::JobTracker => "JobTracker",
            Screen::OutreachCenter => "OutreachCenter",
            Screen::InterviewPrep => "InterviewPrep",
            Screen::LinkedInKit => "LinkedInKit",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TargetParams {
    pub job: Option<JobEntry>,
    pub open_add_job_modal: bool,
}

/// Where "open this action" navigates.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionTarget {
    pub screen: Screen,
    pub params: TargetParams,
}

impl ActionTarget {
    fn bare(screen: Screen) -> Self {
        Self {
            screen,
            params: TargetParams::default(),
        }
    }

    fn with_job(screen: Screen, job: Option<&JobEntry>) -> Self {
        Self {
            screen,
            params: TargetParams {
                job: job.cloned(),
                open_add_job_modal: false,
            },
        }
    }
}

/// Resolve the navigation target for opening an action.
///
/// Uses the same keyword families as [`tracked_action_type`] but evaluates
/// them on its own: opening and completing an action are allowed to diverge.
pub fn resolve_action_target(item: &WeeklyActionItem) -> ActionTarget {
    let title = normalize(&item.title);
    let job = item.job.as_ref();

    if is_submit(&title) {
        return match job {
            Some(job) => ActionTarget::with_job(Screen::ApplyPack, Some(job)),
            None => ActionTarget {
                screen: Screen::JobTracker,
                params: TargetParams {
                    job: None,
                    open_add_job_modal: true,
                },
            },
        };
    }

    if thank_you_matches(&title) || is_follow_up(&title) {
        return ActionTarget::with_job(Screen::OutreachCenter, job);
    }

    if is_interview(&title) {
        return ActionTarget::with_job(Screen::InterviewPrep, job);
    }

    if is_offer(&title) {
        return ActionTarget::with_job(Screen::ApplyPack, job);
    }

    if is_profile_work(&title) {
        return ActionTarget::bare(Screen::LinkedInKit);
    }

    ActionTarget::bare(Screen::JobTracker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStatus;

    #[test]
    fn classifies_each_family() {
        assert_eq!(tracked_action_type("Submit Application"), Some(ActionType::Submit));
        assert_eq!(tracked_action_type("Apply"), Some(ActionType::Submit));
        assert_eq!(tracked_action_type("Follow up email"), Some(ActionType::FollowUp));
        assert_eq!(tracked_action_type("Check response"), Some(ActionType::FollowUp));
        assert_eq!(tracked_action_type("Technical Screen"), Some(ActionType::Interview));
        assert_eq!(tracked_action_type("Interview Prep"), Some(ActionType::Interview));
        assert_eq!(tracked_action_type("Sign Offer Letter"), Some(ActionType::Offer));
        assert_eq!(tracked_action_type("Update resume"), None);
        assert_eq!(tracked_action_type(""), None);
    }

    #[test]
    fn thank_you_wins_over_follow_up() {
        assert_eq!(tracked_action_type("send thank you note"), Some(ActionType::ThankYou));
        assert_eq!(tracked_action_type("Send thank-you note"), Some(ActionType::ThankYou));
        assert_eq!(
            tracked_action_type("Follow up with thanks"),
            Some(ActionType::ThankYou)
        );
    }

    #[test]
    fn coffee_chat_follow_up_is_follow_up_variant() {
        let text = "schedule a coffee chat follow up";
        assert_eq!(tracked_action_type(text), Some(ActionType::FollowUp));
        assert!(is_coffee_chat(text));
        assert_eq!(
            tracked_action_type("Coffee Chat w/ Recruiter"),
            Some(ActionType::FollowUp)
        );
    }

    #[test]
    fn submit_precedes_everything() {
        assert_eq!(
            tracked_action_type("Apply and follow up with recruiter"),
            Some(ActionType::Submit)
        );
    }

    #[test]
    fn classification_ignores_case_and_padding() {
        assert_eq!(
            tracked_action_type("  SEND SECOND FOLLOW-UP "),
            tracked_action_type("send second follow-up")
        );
    }

    fn item_for(title: &str) -> WeeklyActionItem {
        let job = JobEntry::new("4", "Netflix", "Senior Product Designer", "Los Gatos", JobStatus::Target)
            .with_next_action(title, "Fri, Oct 24");
        WeeklyActionItem::from_job(&job)
    }

    #[test]
    fn targets_follow_keyword_families() {
        assert_eq!(resolve_action_target(&item_for("Submit Application")).screen, Screen::ApplyPack);
        assert_eq!(
            resolve_action_target(&item_for("Coffee Chat w/ Recruiter")).screen,
            Screen::OutreachCenter
        );
        assert_eq!(
            resolve_action_target(&item_for("Send Thank You")).screen,
            Screen::OutreachCenter
        );
        assert_eq!(resolve_action_target(&item_for("Technical Screen")).screen, Screen::InterviewPrep);
        assert_eq!(resolve_action_target(&item_for("Sign Offer Letter")).screen, Screen::ApplyPack);
        assert_eq!(resolve_action_target(&item_for("Water plants")).screen, Screen::JobTracker);

        let target = resolve_action_target(&item_for("Follow up email"));
        assert_eq!(target.params.job.map(|job| job.id), Some("4".to_string()));
    }

    #[test]
    fn generic_targets_have_no_job() {
        let submit = WeeklyActionItem::generic("a0", "Apply to 3 roles", "");
        let target = resolve_action_target(&submit);
        assert_eq!(target.screen, Screen::JobTracker);
        assert!(target.params.open_add_job_modal);

        let portfolio = WeeklyActionItem::generic("a3", "Portfolio Maintenance", "");
        assert_eq!(resolve_action_target(&portfolio).screen, Screen::LinkedInKit);
    }

    #[test]
    fn outreach_detection() {
        assert!(is_outreach_action("Follow up email"));
        assert!(is_outreach_action("Send follow-up to hiring manager via email"));
        assert!(!is_outreach_action("Coffee Chat w/ Recruiter"));
    }

    #[test]
    fn outreach_draft_names_company_and_role() {
        let job = JobEntry::new("2", "Stripe", "Staff Product Designer", "Remote", JobStatus::Applied);
        let draft = build_outreach_draft(&job);
        assert!(draft.starts_with("Hi Stripe team,"));
        assert!(draft.contains("for the Staff Product Designer role."));
        assert!(draft.ends_with("[Your Name]"));
    }
}
