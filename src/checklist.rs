//! The weekly task checklist: a bounded list of pending actions drawn from
//! `next_up`, the confirm/deny prompts that gate status transitions, and the
//! client-side record of what the user has ticked off.
//!
//! The completed set belongs to the checklist, not the store. Un-completing
//! an item only restores it to the list; it never reverts a transition.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classify::{self, ActionTarget, ActionType};
use crate::models::{ActionDecisionPrompt, ActionItemKind, Decision, JobStatus, WeeklyActionItem};
use crate::store::JobStore;

pub const DEFAULT_LIMIT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistOptions {
    pub limit: usize,
    pub include_fallback: bool,
}

impl Default for ChecklistOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            include_fallback: true,
        }
    }
}

/// Shown when no tracked job has a pending action.
pub fn fallback_actions() -> Vec<WeeklyActionItem> {
    vec![
        WeeklyActionItem::generic(
            "a1",
            "Boost Outreach Volume",
            "Aim for 5 more cold emails to improve top-of-funnel.",
        ),
        WeeklyActionItem::generic(
            "a2",
            "Interview Follow-up",
            "Follow up with TechCorp regarding your interview.",
        ),
        WeeklyActionItem::generic(
            "a3",
            "Portfolio Maintenance",
            "Update portfolio link on LinkedIn profile.",
        ),
    ]
}

/// The part of a checklist worth keeping between sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistState {
    pub completed: Vec<WeeklyActionItem>,
    /// Pending actions as of the last refresh, used to spot outside edits.
    pub snapshot: Vec<WeeklyActionItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Marked done straight away; nothing to ask.
    Completed,
    /// A decision is now pending; the store is untouched until it is resolved.
    Prompted(ActionDecisionPrompt),
    /// Nothing could be committed, so the item stays open.
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The store was updated and the item marked completed.
    Committed,
    /// Valid terminal outcome with no transition (e.g. "Not yet" on a submission).
    Dismissed,
    /// The item had no job to act on.
    Ignored,
}

/// What a resolved decision does to the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Transition {
    status: Option<JobStatus>,
    next_action: &'static str,
    due: &'static str,
}

const fn to(status: JobStatus, next_action: &'static str, due: &'static str) -> Transition {
    Transition {
        status: Some(status),
        next_action,
        due,
    }
}

const fn action_only(next_action: &'static str, due: &'static str) -> Transition {
    Transition {
        status: None,
        next_action,
        due,
    }
}

fn transition_for(category: Option<ActionType>, coffee_chat: bool, decision: Decision) -> Option<Transition> {
    use Decision::{Confirm, Deny};

    match (category, decision) {
        (Some(ActionType::Submit), Confirm) => Some(to(JobStatus::Applied, "Follow up", "in 3 days")),
        (Some(ActionType::Submit), Deny) => None,
        (Some(ActionType::FollowUp), Confirm) if coffee_chat => {
            Some(to(JobStatus::Interviewing, "Send thank-you note", "Tomorrow"))
        }
        (Some(ActionType::FollowUp), Deny) if coffee_chat => {
            Some(action_only("Reschedule coffee chat", "in 2 days"))
        }
        (Some(ActionType::FollowUp), Confirm) => {
            Some(to(JobStatus::Interviewing, "Interview Prep", "This week"))
        }
        (Some(ActionType::FollowUp), Deny) => Some(action_only("Send second follow-up", "in 3 days")),
        (Some(ActionType::ThankYou), Confirm) => Some(action_only("Check response", "in 2 days")),
        (Some(ActionType::ThankYou), Deny) => None,
        (Some(ActionType::Interview), Confirm) => {
            Some(to(JobStatus::Interviewing, "Send Thank You", "Tomorrow"))
        }
        (Some(ActionType::Interview), Deny) => {
            Some(to(JobStatus::Rejected, "Keep pipeline warm", "This week"))
        }
        (Some(ActionType::Offer), Confirm) => {
            Some(to(JobStatus::OfferSigned, "Prepare for onboarding", "Next Week"))
        }
        (Some(ActionType::Offer), Deny) => Some(to(JobStatus::Rejected, "Continue search", "This week")),
        (None, Confirm) => Some(action_only("", "")),
        (None, Deny) => None,
    }
}

/// Build the confirm/deny question for an item, if it warrants one.
///
/// Generic items and items whose action isn't classifiable get `None`.
pub fn build_decision_prompt(item: &WeeklyActionItem) -> Option<ActionDecisionPrompt> {
    if item.kind != ActionItemKind::Action {
        return None;
    }
    let job = item.job.as_ref()?;
    let category = classify::tracked_action_type(&item.title)?;

    let (title, message, confirm, deny) = match category {
        ActionType::Submit => (
            "Confirm Submission",
            format!(
                "Did you submit your application for {} at {}?",
                job.role, job.company
            ),
            "Yes, submitted",
            "Not yet",
        ),
        ActionType::FollowUp if classify::is_coffee_chat(&item.title) => (
            "Coffee Chat Completed?",
            format!("Did you complete the coffee chat for {}?", job.company),
            "Yes, completed",
            "Not yet",
        ),
        ActionType::FollowUp => (
            "Did They Respond?",
            format!("Record the follow-up result for {}.", job.company),
            "Yes, responded",
            "No response yet",
        ),
        ActionType::ThankYou => (
            "Thank-you Sent?",
            format!("Did you send the thank-you note to {}?", job.company),
            "Yes, sent",
            "Not yet",
        ),
        ActionType::Interview => (
            "Interview Outcome",
            format!("Did {} move you to the next step?", job.company),
            "Yes, next step",
            "No, not selected",
        ),
        ActionType::Offer => (
            "Offer Decision",
            format!("Was the offer from {} accepted?", job.company),
            "Accepted",
            "Rejected",
        ),
    };

    Some(ActionDecisionPrompt {
        action: item.clone(),
        title: title.to_string(),
        message,
        confirm_label: confirm.to_string(),
        deny_label: deny.to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct TaskChecklist {
    options: ChecklistOptions,
    completed: Vec<WeeklyActionItem>,
    snapshot: Vec<WeeklyActionItem>,
    decision_prompt: Option<ActionDecisionPrompt>,
}

impl TaskChecklist {
    pub fn new(options: ChecklistOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn from_state(options: ChecklistOptions, state: ChecklistState) -> Self {
        Self {
            options,
            completed: state.completed,
            snapshot: state.snapshot,
            decision_prompt: None,
        }
    }

    pub fn state(&self) -> ChecklistState {
        ChecklistState {
            completed: self.completed.clone(),
            snapshot: self.snapshot.clone(),
        }
    }

    pub fn options(&self) -> ChecklistOptions {
        self.options
    }

    /// Pending job actions from `next_up`, capped at the configured limit.
    pub fn next_actions(&self, store: &JobStore) -> Vec<WeeklyActionItem> {
        store
            .next_up()
            .iter()
            .filter(|job| job.has_pending_action())
            .take(self.options.limit)
            .map(WeeklyActionItem::from_job)
            .collect()
    }

    /// Job actions, or the generic fallback list when there are none.
    pub fn display_actions(&self, store: &JobStore) -> Vec<WeeklyActionItem> {
        let next = self.next_actions(store);
        if !next.is_empty() || !self.options.include_fallback {
            next
        } else {
            fallback_actions()
        }
    }

    /// Displayed items not yet ticked off.
    pub fn active_actions(&self, store: &JobStore) -> Vec<WeeklyActionItem> {
        self.display_actions(store)
            .into_iter()
            .filter(|item| !self.is_completed(item))
            .collect()
    }

    pub fn completed_actions(&self) -> &[WeeklyActionItem] {
        &self.completed
    }

    pub fn is_completed(&self, item: &WeeklyActionItem) -> bool {
        let key = item.key();
        self.completed.iter().any(|done| done.key() == key)
    }

    pub fn decision_prompt(&self) -> Option<&ActionDecisionPrompt> {
        self.decision_prompt.as_ref()
    }

    pub fn dismiss_prompt(&mut self) {
        self.decision_prompt = None;
    }

    /// Recompute pending actions and mark any classifiable action that
    /// changed or vanished since the last refresh as completed.
    ///
    /// This catches edits made elsewhere (e.g. a status change from the
    /// tracker detail view). The first refresh only records the snapshot.
    /// Returns the items newly marked completed.
    pub fn refresh(&mut self, store: &JobStore) -> Vec<WeeklyActionItem> {
        let current = self.next_actions(store);
        if self.snapshot.is_empty() {
            self.snapshot = current;
            return Vec::new();
        }

        let finished: Vec<WeeklyActionItem> = self
            .snapshot
            .iter()
            .filter(|previous| previous.job.is_some())
            .filter(|previous| classify::tracked_action_type(&previous.title).is_some())
            .filter(|previous| {
                let now = current
                    .iter()
                    .find(|item| item.job.is_some() && item.id == previous.id);
                match now {
                    None => true,
                    Some(item) if classify::tracked_action_type(&item.title).is_none() => true,
                    Some(item) => normalize(&item.title) != normalize(&previous.title),
                }
            })
            .cloned()
            .collect();

        let mut added = Vec::new();
        for item in finished {
            if self.mark_action_completed(&item) {
                debug!(job_id = %item.id, action = %item.title, "detected completion made elsewhere");
                added.push(item);
            }
        }

        self.snapshot = current;
        added
    }

    /// The user ticked an item's checkbox.
    pub fn handle_check_action(&mut self, store: &mut JobStore, item: &WeeklyActionItem) -> CheckOutcome {
        if item.kind == ActionItemKind::Generic {
            self.mark_action_completed(item);
            return CheckOutcome::Completed;
        }

        match build_decision_prompt(item) {
            Some(prompt) => {
                debug!(job_id = %item.id, prompt = %prompt.title, "awaiting decision");
                self.decision_prompt = Some(prompt.clone());
                CheckOutcome::Prompted(prompt)
            }
            None => match self.apply_action_decision(store, item, Decision::Confirm) {
                DecisionOutcome::Committed => CheckOutcome::Completed,
                DecisionOutcome::Dismissed | DecisionOutcome::Ignored => CheckOutcome::Skipped,
            },
        }
    }

    /// Resolve a decision and commit the resulting transition to the store.
    pub fn apply_action_decision(
        &mut self,
        store: &mut JobStore,
        item: &WeeklyActionItem,
        decision: Decision,
    ) -> DecisionOutcome {
        self.decision_prompt = None;

        if item.kind == ActionItemKind::Generic {
            if decision == Decision::Confirm {
                self.mark_action_completed(item);
                return DecisionOutcome::Committed;
            }
            return DecisionOutcome::Dismissed;
        }

        let Some(job) = item.job.as_ref() else {
            return DecisionOutcome::Ignored;
        };

        let category = classify::tracked_action_type(&item.title);
        let coffee_chat = classify::is_coffee_chat(&item.title);
        let Some(transition) = transition_for(category, coffee_chat, decision) else {
            debug!(job_id = %job.id, ?decision, "decision left job unchanged");
            return DecisionOutcome::Dismissed;
        };

        if let Some(status) = transition.status {
            store.update_job_status(&job.id, status);
        }
        store.update_job_action(&job.id, transition.next_action, transition.due);
        self.mark_action_completed(item);

        info!(
            job_id = %job.id,
            category = category.map(|c| c.as_str()).unwrap_or("none"),
            ?decision,
            next_action = transition.next_action,
            "committed action decision"
        );
        DecisionOutcome::Committed
    }

    /// Open the item's screen. Navigation only; no state changes.
    pub fn handle_plan_action_press<F>(&self, item: &WeeklyActionItem, navigate: F)
    where
        F: FnOnce(ActionTarget),
    {
        navigate(classify::resolve_action_target(item));
    }

    pub fn unmark_action_completed(&mut self, item: &WeeklyActionItem) {
        let key = item.key();
        self.completed.retain(|done| done.key() != key);
    }

    fn mark_action_completed(&mut self, item: &WeeklyActionItem) -> bool {
        if self.is_completed(item) {
            return false;
        }
        self.completed.push(item.clone());
        true
    }
}

fn normalize(title: &str) -> String {
    title.trim().to_lowercase()
}
