//! The job store: single source of truth for tracked applications.
//!
//! Three collections are kept: `this_week` and `next_up` hold tracked copies,
//! `recommended_jobs` holds scan results. A job id lives in at most one of
//! the tracked lists, and may independently have a recommended copy.
//!
//! Every operation is total. An id that matches nothing is a no-op that only
//! logs a debug event.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{JobEntry, JobStatus};
use crate::preset::{RecommendedScanPreset, ScanPresetInput, ScreenFilter};

pub const DEFAULT_NEXT_ACTION: &str = "Submit Application";
pub const DEFAULT_NEXT_ACTION_DATE: &str = "Today";
pub const ALL_ROLES: &str = "All Roles";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStore {
    this_week: Vec<JobEntry>,
    next_up: Vec<JobEntry>,
    recommended_jobs: Vec<JobEntry>,
    saved_job_ids: BTreeSet<String>,
    filters: Vec<String>,
    active_filter: String,
    #[serde(default)]
    recommended_active_filter: ScreenFilter,
    #[serde(default)]
    recommended_scan_preset: Option<RecommendedScanPreset>,
}

impl Default for JobStore {
    fn default() -> Self {
        Self {
            this_week: Vec::new(),
            next_up: Vec::new(),
            recommended_jobs: Vec::new(),
            saved_job_ids: BTreeSet::new(),
            filters: ["All Roles", "Product Design", "Engineering", "Remote"]
                .into_iter()
                .map(String::from)
                .collect(),
            active_filter: ALL_ROLES.to_string(),
            recommended_active_filter: ScreenFilter::AllMatches,
            recommended_scan_preset: None,
        }
    }
}

impl JobStore {
    /// Rebuild a store from persisted collections, in their stored order.
    pub fn restore(
        this_week: Vec<JobEntry>,
        next_up: Vec<JobEntry>,
        recommended_jobs: Vec<JobEntry>,
        saved_job_ids: BTreeSet<String>,
        recommended_scan_preset: Option<RecommendedScanPreset>,
    ) -> Self {
        Self {
            this_week,
            next_up,
            recommended_jobs,
            saved_job_ids,
            recommended_scan_preset,
            ..Self::default()
        }
    }

    // --- Queries ---

    pub fn this_week(&self) -> &[JobEntry] {
        &self.this_week
    }

    pub fn next_up(&self) -> &[JobEntry] {
        &self.next_up
    }

    pub fn recommended_jobs(&self) -> &[JobEntry] {
        &self.recommended_jobs
    }

    pub fn saved_job_ids(&self) -> &BTreeSet<String> {
        &self.saved_job_ids
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved_job_ids.contains(id)
    }

    /// Tracked entries: `this_week` first, then `next_up`.
    pub fn all_tracked(&self) -> impl Iterator<Item = &JobEntry> {
        self.this_week.iter().chain(self.next_up.iter())
    }

    pub fn find_tracked(&self, id: &str) -> Option<&JobEntry> {
        self.all_tracked().find(|job| job.id == id)
    }

    pub fn find_recommended(&self, id: &str) -> Option<&JobEntry> {
        self.recommended_jobs.iter().find(|job| job.id == id)
    }

    /// Any copy of the job, tracked first.
    pub fn find(&self, id: &str) -> Option<&JobEntry> {
        self.find_tracked(id).or_else(|| self.find_recommended(id))
    }

    // --- Mutators ---

    /// Prepend a job to `this_week`. Does not deduplicate, and does not touch
    /// a recommended copy with the same id.
    pub fn add_job(&mut self, job: JobEntry) {
        debug!(job_id = %job.id, status = %job.status, "adding job");
        if job.status == JobStatus::Target {
            self.saved_job_ids.insert(job.id.clone());
        }
        self.this_week.insert(0, job);
    }

    pub fn update_job_status(&mut self, id: &str, status: JobStatus) {
        let leaving_target = status != JobStatus::Target;
        let mut tracked = false;

        for job in tracked_matches(&mut self.this_week, &mut self.next_up, id) {
            if leaving_target {
                job.saved_from_recommended = false;
                job.previous_status = None;
            } else if job.status != JobStatus::Target {
                job.previous_status = Some(job.status);
            }
            job.status = status;
            tracked = true;
        }

        let mut recommended = false;
        for job in self.recommended_jobs.iter_mut().filter(|job| job.id == id) {
            job.status = status;
            if leaving_target {
                job.saved_from_recommended = false;
            }
            recommended = true;
        }

        if !tracked && !recommended {
            debug!(job_id = id, "status update for unknown job ignored");
            return;
        }

        if leaving_target {
            self.saved_job_ids.remove(id);
        } else if tracked {
            self.saved_job_ids.insert(id.to_string());
        }
        debug!(job_id = id, %status, tracked, "updated job status");
    }

    /// Replace notes on every copy of the job. Appending is the caller's job.
    pub fn update_job_notes(&mut self, id: &str, notes: &str) {
        let mut touched = 0usize;
        for job in self
            .this_week
            .iter_mut()
            .chain(self.next_up.iter_mut())
            .chain(self.recommended_jobs.iter_mut())
            .filter(|job| job.id == id)
        {
            job.notes = notes.to_string();
            touched += 1;
        }
        if touched == 0 {
            debug!(job_id = id, "notes update for unknown job ignored");
        } else {
            debug!(job_id = id, touched, "updated job notes");
        }
    }

    /// Rewrite the pending action on the tracked copy. An empty action clears it.
    pub fn update_job_action(&mut self, id: &str, next_action: &str, next_action_date: &str) {
        let mut touched = 0usize;
        for job in tracked_matches(&mut self.this_week, &mut self.next_up, id) {
            job.next_action = next_action.to_string();
            job.next_action_date = next_action_date.to_string();
            touched += 1;
        }
        if touched == 0 {
            debug!(job_id = id, "action update for unknown job ignored");
        } else {
            debug!(job_id = id, next_action, touched, "updated next action");
        }
    }

    pub fn set_overdue(&mut self, id: &str, overdue: bool) {
        let mut touched = 0usize;
        for job in tracked_matches(&mut self.this_week, &mut self.next_up, id) {
            job.is_overdue = overdue;
            touched += 1;
        }
        if touched == 0 {
            debug!(job_id = id, "overdue update for unknown job ignored");
        } else {
            debug!(job_id = id, overdue, "updated overdue flag");
        }
    }

    /// Save a job if it isn't saved, unsave it if it is.
    pub fn toggle_save_job(&mut self, job: &JobEntry) {
        if self.saved_job_ids.contains(&job.id) {
            self.unsave(&job.id);
        } else {
            self.save(job);
        }
    }

    fn save(&mut self, job: &JobEntry) {
        let id = job.id.as_str();
        let patch_target = |entry: &mut JobEntry| {
            if entry.status != JobStatus::Target {
                entry.previous_status = Some(entry.status);
            }
            entry.status = JobStatus::Target;
        };

        if self.this_week.iter().any(|entry| entry.id == id) {
            self.this_week.iter_mut().filter(|entry| entry.id == id).for_each(patch_target);
            debug!(job_id = id, "saved job already tracked this week");
        } else if self.next_up.iter().any(|entry| entry.id == id) {
            self.next_up.iter_mut().filter(|entry| entry.id == id).for_each(patch_target);
            debug!(job_id = id, "saved job already tracked next up");
        } else {
            let mut saved = job.clone();
            saved.status = JobStatus::Target;
            saved.saved_from_recommended = true;
            saved.previous_status = None;
            if saved.next_action.is_empty() {
                saved.next_action = DEFAULT_NEXT_ACTION.to_string();
            }
            if saved.next_action_date.is_empty() {
                saved.next_action_date = DEFAULT_NEXT_ACTION_DATE.to_string();
            }
            self.next_up.insert(0, saved);
            debug!(job_id = id, "saved job into next up");
        }

        for entry in self.recommended_jobs.iter_mut().filter(|entry| entry.id == id) {
            entry.status = JobStatus::Target;
            entry.saved_from_recommended = true;
        }
        self.saved_job_ids.insert(id.to_string());
    }

    /// Unsave a job. A tracked entry that was `Target` before it was saved has
    /// no status to fall back to, so it stays saved and only loses the
    /// recommended marker.
    fn unsave(&mut self, id: &str) {
        self.next_up
            .retain(|entry| !(entry.id == id && entry.saved_from_recommended));

        let mut restored = None;
        let mut pinned = false;
        for entry in tracked_matches(&mut self.this_week, &mut self.next_up, id) {
            entry.saved_from_recommended = false;
            match entry.previous_status.take() {
                Some(previous) => {
                    entry.status = previous;
                    restored = Some(previous);
                }
                None => pinned |= entry.status == JobStatus::Target,
            }
        }

        for entry in self.recommended_jobs.iter_mut().filter(|entry| entry.id == id) {
            entry.saved_from_recommended = false;
            if let Some(previous) = restored {
                entry.status = previous;
            }
        }

        if pinned {
            debug!(job_id = id, "tracked target has no earlier status, kept saved");
        } else {
            self.saved_job_ids.remove(id);
            debug!(job_id = id, restored = ?restored, "unsaved job");
        }
    }

    /// Replace the recommended pool with fresh scan results. Ids that are
    /// currently saved keep their saved marker.
    pub fn replace_recommended(&mut self, jobs: Vec<JobEntry>) {
        self.recommended_jobs = jobs
            .into_iter()
            .map(|mut job| {
                if let Some(tracked) = self.find_tracked(&job.id) {
                    job.status = tracked.status;
                }
                job.saved_from_recommended = self.is_saved(&job.id);
                job
            })
            .collect();
        debug!(count = self.recommended_jobs.len(), "replaced recommended jobs");
    }

    // --- Filters ---

    pub fn filters(&self) -> &[String] {
        &self.filters
    }

    pub fn active_filter(&self) -> &str {
        &self.active_filter
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.active_filter = filter.to_string();
    }

    pub fn recommended_active_filter(&self) -> ScreenFilter {
        self.recommended_active_filter
    }

    pub fn set_recommended_active_filter(&mut self, filter: ScreenFilter) {
        self.recommended_active_filter = filter;
    }

    // --- Scan presets ---

    pub fn recommended_scan_preset(&self) -> Option<&RecommendedScanPreset> {
        self.recommended_scan_preset.as_ref()
    }

    pub fn save_recommended_scan_preset(&mut self, input: ScanPresetInput) -> &RecommendedScanPreset {
        let preset = RecommendedScanPreset::from_input(input);
        debug!(name = %preset.name, label = %preset.label, "saved scan preset");
        self.recommended_active_filter = preset.screen_filter;
        self.recommended_scan_preset.insert(preset)
    }

    pub fn clear_recommended_scan_preset(&mut self) {
        self.recommended_scan_preset = None;
    }
}

fn tracked_matches<'a>(
    this_week: &'a mut [JobEntry],
    next_up: &'a mut [JobEntry],
    id: &'a str,
) -> impl Iterator<Item = &'a mut JobEntry> {
    this_week
        .iter_mut()
        .chain(next_up.iter_mut())
        .filter(move |job| job.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommended(id: &str) -> JobEntry {
        JobEntry::new(id, "Stellar AI", "Senior Product Designer", "San Francisco, CA", JobStatus::Target)
            .with_next_action("Apply", "Today")
            .with_match("96%")
    }

    fn store() -> JobStore {
        let mut store = JobStore::default();
        store.replace_recommended(vec![recommended("j1"), recommended("j2")]);
        store.add_job(
            JobEntry::new("2", "Stripe", "Staff Product Designer", "Remote", JobStatus::Applied)
                .with_next_action("Follow up email", "Due in 2 days"),
        );
        store
    }

    /// `id ∈ saved ⇔ tracked status is Target`, for every tracked entry.
    fn assert_saved_ids_consistent(store: &JobStore) {
        for job in store.all_tracked() {
            assert_eq!(
                store.is_saved(&job.id),
                job.status == JobStatus::Target,
                "job {} has status {} but saved={}",
                job.id,
                job.status,
                store.is_saved(&job.id)
            );
        }
        for id in store.saved_job_ids() {
            assert!(store.find_tracked(id).is_some(), "saved id {id} has no tracked copy");
        }
    }

    #[test]
    fn add_job_prepends_and_tracks_saved_targets() {
        let mut store = store();
        store.add_job(JobEntry::new("m1", "Acme", "Designer", "Remote", JobStatus::Target));

        assert_eq!(store.this_week()[0].id, "m1");
        assert!(store.is_saved("m1"));
        assert_eq!(store.this_week().len(), 2);
    }

    #[test]
    fn add_job_is_not_idempotent() {
        let mut store = JobStore::default();
        let job = JobEntry::new("m1", "Acme", "Designer", "Remote", JobStatus::Applied);
        store.add_job(job.clone());
        store.add_job(job);
        assert_eq!(store.this_week().len(), 2);
    }

    #[test]
    fn add_job_leaves_recommended_copy_alone() {
        let mut store = store();
        let mut applied = recommended("j1");
        applied.status = JobStatus::Applied;
        applied.next_action = "Follow up".into();
        applied.next_action_date = "in 3 days".into();

        store.add_job(applied);

        assert_eq!(store.find_tracked("j1").unwrap().status, JobStatus::Applied);
        assert!(store.next_up().iter().all(|job| job.id != "j1"));
        assert_eq!(store.find_recommended("j1").unwrap().status, JobStatus::Target);
        assert!(!store.is_saved("j1"));
    }

    #[test]
    fn save_recommended_job_prepends_to_next_up() {
        let mut store = store();
        let job = recommended("j1");

        store.toggle_save_job(&job);

        let saved = &store.next_up()[0];
        assert_eq!(saved.id, "j1");
        assert_eq!(saved.status, JobStatus::Target);
        assert!(saved.saved_from_recommended);
        assert!(store.is_saved("j1"));
        assert!(store.find_recommended("j1").unwrap().saved_from_recommended);
        assert_saved_ids_consistent(&store);
    }

    #[test]
    fn save_applies_default_action() {
        let mut store = JobStore::default();
        let bare = JobEntry::new("r9", "Loomly", "Interaction Designer", "Remote", JobStatus::Target);

        store.toggle_save_job(&bare);

        let saved = store.find_tracked("r9").unwrap();
        assert_eq!(saved.next_action, DEFAULT_NEXT_ACTION);
        assert_eq!(saved.next_action_date, DEFAULT_NEXT_ACTION_DATE);
    }

    #[test]
    fn unsave_removes_entry_inserted_by_save() {
        let mut store = store();
        let before = store.clone();
        let job = recommended("j1");

        store.toggle_save_job(&job);
        store.toggle_save_job(&job);

        assert!(!store.is_saved("j1"));
        assert!(store.next_up().iter().all(|entry| entry.id != "j1"));
        assert_eq!(store.saved_job_ids(), before.saved_job_ids());
        assert_eq!(store.next_up(), before.next_up());
        assert_eq!(store.recommended_jobs(), before.recommended_jobs());
    }

    #[test]
    fn save_round_trip_restores_tracked_entry_in_place() {
        let mut store = store();
        store.update_job_notes("2", "Met the hiring manager");
        let before = store.clone();
        let job = store.find_tracked("2").unwrap().clone();

        store.toggle_save_job(&job);
        assert_eq!(store.this_week().len(), 1);
        assert_eq!(store.find_tracked("2").unwrap().status, JobStatus::Target);
        assert!(store.is_saved("2"));

        store.toggle_save_job(&job);
        assert_eq!(store.this_week(), before.this_week());
        assert_eq!(store.saved_job_ids(), before.saved_job_ids());
        assert_eq!(store.find_tracked("2").unwrap().notes, "Met the hiring manager");
    }

    #[test]
    fn unsave_keeps_target_entry_not_inserted_by_save() {
        let mut store = JobStore::default();
        let mut tracked = recommended("j1");
        tracked.next_action = "Coffee chat".into();
        tracked.saved_from_recommended = true;
        store.restore_this_week_for_test(tracked.clone());
        store.saved_job_ids.insert("j1".into());

        store.toggle_save_job(&tracked);

        let kept = store.find_tracked("j1").unwrap();
        assert_eq!(kept.status, JobStatus::Target);
        assert!(!kept.saved_from_recommended);
        assert!(store.is_saved("j1"));
        assert_saved_ids_consistent(&store);
    }

    #[test]
    fn unsaving_seeded_target_keeps_it_saved() {
        let mut store = JobStore::with_demo_data();
        let airbnb = store.find_tracked("3").unwrap().clone();

        store.toggle_save_job(&airbnb);
        store.toggle_save_job(&airbnb);

        assert_eq!(store.find_tracked("3").unwrap().status, JobStatus::Target);
        assert!(store.is_saved("3"));
        assert_eq!(store.next_up().len(), 3);
        assert_saved_ids_consistent(&store);
    }

    #[test]
    fn status_change_away_from_target_drops_saved_marker() {
        let mut store = store();
        let job = recommended("j1");
        store.toggle_save_job(&job);

        store.update_job_status("j1", JobStatus::Applied);

        let tracked = store.find_tracked("j1").unwrap();
        assert_eq!(tracked.status, JobStatus::Applied);
        assert!(!tracked.saved_from_recommended);
        assert!(!store.is_saved("j1"));
        let mirrored = store.find_recommended("j1").unwrap();
        assert_eq!(mirrored.status, JobStatus::Applied);
        assert!(!mirrored.saved_from_recommended);
    }

    #[test]
    fn status_change_back_to_target_marks_saved() {
        let mut store = store();
        store.update_job_status("2", JobStatus::Target);
        assert!(store.is_saved("2"));
        assert_saved_ids_consistent(&store);
    }

    #[test]
    fn unknown_ids_are_silent_no_ops() {
        let mut store = store();
        let before = store.clone();

        store.update_job_status("missing", JobStatus::Target);
        store.update_job_notes("missing", "notes");
        store.update_job_action("missing", "Follow up", "Tomorrow");
        store.set_overdue("missing", true);

        assert_eq!(store, before);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn captured_debug_log(run: impl FnOnce()) -> String {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, run);
        let bytes = log.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn unknown_ids_log_ignored_updates() {
        let mut store = store();

        let output = captured_debug_log(|| {
            store.update_job_notes("missing", "notes");
            store.update_job_action("missing", "Follow up", "Tomorrow");
            store.set_overdue("missing", true);
        });

        assert!(output.contains("notes update for unknown job ignored"));
        assert!(output.contains("action update for unknown job ignored"));
        assert!(output.contains("overdue update for unknown job ignored"));
        assert!(!output.contains("updated"));
    }

    #[test]
    fn set_overdue_flags_tracked_copy() {
        let mut store = store();
        store.set_overdue("2", true);
        assert!(store.find_tracked("2").unwrap().is_overdue);
        store.set_overdue("2", false);
        assert!(!store.find_tracked("2").unwrap().is_overdue);
    }

    #[test]
    fn notes_replace_on_every_copy() {
        let mut store = store();
        store.toggle_save_job(&recommended("j1"));

        store.update_job_notes("j1", "first");
        store.update_job_notes("j1", "second");

        assert_eq!(store.find_tracked("j1").unwrap().notes, "second");
        assert_eq!(store.find_recommended("j1").unwrap().notes, "second");
    }

    #[test]
    fn saved_ids_stay_consistent_over_mixed_sequences() {
        let mut store = store();
        let j1 = recommended("j1");
        let j2 = recommended("j2");
        let stripe = store.find_tracked("2").unwrap().clone();

        enum Step<'a> {
            Toggle(&'a JobEntry),
            Status(&'static str, JobStatus),
        }

        let steps = [
            Step::Toggle(&j1),
            Step::Status("j1", JobStatus::Interviewing),
            Step::Toggle(&j2),
            Step::Toggle(&stripe),
            Step::Status("j2", JobStatus::Rejected),
            Step::Toggle(&stripe),
            Step::Status("j1", JobStatus::Target),
            Step::Toggle(&j2),
            Step::Toggle(&j1),
            Step::Status("2", JobStatus::OfferReceived),
        ];

        for step in &steps {
            match step {
                Step::Toggle(job) => store.toggle_save_job(job),
                Step::Status(id, status) => store.update_job_status(id, *status),
            }
            assert_saved_ids_consistent(&store);
        }
        assert_eq!(store.find_tracked("j1").unwrap().status, JobStatus::Interviewing);
    }

    #[test]
    fn saved_ids_stay_consistent_from_demo_data() {
        let mut store = JobStore::with_demo_data();
        assert_saved_ids_consistent(&store);
        let netflix = store.find_tracked("4").unwrap().clone();
        let google = store.find_tracked("1").unwrap().clone();
        let stellar = store.find_recommended("j1").unwrap().clone();

        store.toggle_save_job(&netflix);
        assert_saved_ids_consistent(&store);
        store.update_job_status("4", JobStatus::Applied);
        assert_saved_ids_consistent(&store);
        store.toggle_save_job(&netflix);
        assert_saved_ids_consistent(&store);
        store.toggle_save_job(&netflix);
        assert_saved_ids_consistent(&store);
        store.toggle_save_job(&google);
        assert_saved_ids_consistent(&store);
        store.toggle_save_job(&stellar);
        assert_saved_ids_consistent(&store);
        store.toggle_save_job(&google);
        store.toggle_save_job(&stellar);
        assert_saved_ids_consistent(&store);

        assert_eq!(store.find_tracked("4").unwrap().status, JobStatus::Applied);
        assert_eq!(store.find_tracked("1").unwrap().status, JobStatus::Interview);
        assert!(store.find_tracked("j1").is_none());
    }

    #[test]
    fn interview_synonym_status_is_not_target() {
        let mut store = store();
        store.toggle_save_job(&recommended("j2"));
        store.update_job_status("j2", JobStatus::Interview);
        assert!(!store.is_saved("j2"));
        assert_eq!(store.find_tracked("j2").unwrap().status, JobStatus::Interviewing);
    }

    #[test]
    fn replace_recommended_keeps_saved_markers() {
        let mut store = store();
        store.toggle_save_job(&recommended("j1"));

        store.replace_recommended(vec![recommended("j1"), recommended("j3")]);

        assert!(store.find_recommended("j1").unwrap().saved_from_recommended);
        assert!(!store.find_recommended("j3").unwrap().saved_from_recommended);
        assert!(store.find_recommended("j2").is_none());
    }

    #[test]
    fn scan_preset_save_and_clear() {
        let mut store = JobStore::default();
        let preset = store.save_recommended_scan_preset(ScanPresetInput {
            screen_filter: ScreenFilter::Remote,
            remote_only: true,
            full_time_only: true,
            location_query: "Austin, TX".into(),
            name: "Texas Remote Focus".into(),
            ..Default::default()
        });
        assert_eq!(preset.label, "Remote • Full-time • Austin, TX");
        assert_eq!(store.recommended_active_filter(), ScreenFilter::Remote);

        store.clear_recommended_scan_preset();
        assert!(store.recommended_scan_preset().is_none());
    }

    #[test]
    fn store_round_trips_through_json() {
        let mut store = store();
        store.toggle_save_job(&recommended("j1"));

        let json = serde_json::to_string(&store).unwrap();
        let restored: JobStore = serde_json::from_str(&json).unwrap();

        assert_eq!(restored, store);
    }

    impl JobStore {
        fn restore_this_week_for_test(&mut self, job: JobEntry) {
            self.this_week.push(job);
        }
    }
}
