mod tui;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{Local, Utc};
use clap::{Args, Parser, Subcommand};
use rand::Rng;
use rand::distributions::Alphanumeric;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use careerlift::checklist::{ChecklistOptions, CheckOutcome, DecisionOutcome, TaskChecklist};
use careerlift::classify::{self, ActionTarget};
use careerlift::config::Config;
use careerlift::db::Database;
use careerlift::models::{Decision, JobEntry, JobStatus, WeeklyActionItem};
use careerlift::pipeline::{self, PipelineQuery, PipelineStatusFilter};
use careerlift::preset::{
    ExperienceLevel, SalaryRange, ScanCriteria, ScanPresetInput, ScreenFilter, SortOption, match_score,
};
use careerlift::store::{ALL_ROLES, JobStore};

/// Company names closer than this (Jaro-Winkler) count as a match.
const COMPANY_MATCH_THRESHOLD: f64 = 0.85;

#[derive(Parser)]
#[command(name = "careerlift")]
#[command(about = "Track job applications and work through the weekly action checklist")]
struct Cli {
    /// Database file (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Load the demo pipeline
    Seed {
        /// Replace existing data
        #[arg(long)]
        force: bool,
    },

    /// List tracked jobs
    List {
        /// Filter by status (all, applied, interview, offer, target, not-interested)
        #[arg(short, long, default_value = "all")]
        status: PipelineStatusFilter,

        /// Role filter, e.g. "Product Design" (remembered for later lists)
        #[arg(short, long)]
        role: Option<String>,

        /// Match role or company
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// Show job details
    Show {
        /// Job ID or company name
        job: String,
    },

    /// Track a new job
    Add {
        company: String,
        role: String,

        #[arg(short, long, default_value = "Remote")]
        location: String,

        #[arg(short, long, default_value = "Target")]
        status: JobStatus,

        /// Next action label
        #[arg(long)]
        action: Option<String>,

        /// Due label for the next action
        #[arg(long)]
        due: Option<String>,
    },

    /// Change a job's status and log it in the notes
    Status {
        /// Job ID or company name
        job: String,

        /// New status (target, applied, interviewing, offer-received, offer-signed, rejected, not-interested)
        status: JobStatus,

        /// Why, e.g. a disqualification reason
        #[arg(long)]
        reason: Option<String>,

        #[arg(long)]
        note: Option<String>,
    },

    /// Mark a job's next action overdue
    Overdue {
        /// Job ID or company name
        job: String,

        /// Clear the overdue flag instead
        #[arg(long)]
        clear: bool,
    },

    /// Append a note to a job
    Note {
        /// Job ID or company name
        job: String,

        text: String,
    },

    /// Draft a follow-up message for a job
    Outreach {
        /// Job ID or company name
        job: String,

        /// Log the draft as sent in the job's notes
        #[arg(long)]
        sent: bool,
    },

    /// Save or unsave a job
    Save {
        /// Job ID or company name
        job: String,
    },

    /// List recommended jobs
    Recommended {
        #[command(flatten)]
        scan: ScanArgs,

        /// Match role, company or location
        #[arg(short = 'q', long)]
        search: Option<String>,

        /// Use the saved scan preset instead of the flags
        #[arg(long)]
        preset: bool,
    },

    /// Replace the recommended jobs with scan results from a JSON file
    Import {
        /// JSON array of jobs
        file: PathBuf,
    },

    /// Manage the recommended-scan preset
    Preset {
        #[command(subcommand)]
        command: PresetCommands,
    },

    /// Show this week's action checklist
    Tasks,

    /// Complete an action (may ask for an outcome)
    Check {
        /// Task number from `tasks`
        task: usize,
    },

    /// Record the outcome of an action
    Decide {
        /// Task number from `tasks`
        task: usize,

        /// confirm or deny
        decision: Decision,
    },

    /// Restore a completed action to the checklist
    Uncheck {
        /// Completed task number from `tasks`
        task: usize,
    },

    /// Show where an action leads
    Open {
        /// Task number from `tasks`
        task: usize,
    },

    /// Browse the checklist interactively
    Browse,
}

#[derive(Subcommand)]
enum PresetCommands {
    /// Save the given filters as the scan preset
    Save {
        /// Preset name (defaults to the derived label)
        #[arg(short, long, default_value = "")]
        name: String,

        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Remove the scan preset
    Clear,

    /// Show the scan preset
    Show,
}

#[derive(Args)]
struct ScanArgs {
    /// Screen filter (all, remote, full-time, product-design)
    #[arg(long, default_value = "all")]
    filter: ScreenFilter,

    /// Sort order (match-desc, match-asc, role, company)
    #[arg(long, default_value = "match-desc")]
    sort: SortOption,

    #[arg(long)]
    remote: bool,

    #[arg(long)]
    full_time: bool,

    #[arg(long)]
    hybrid: bool,

    /// Location substring
    #[arg(long, default_value = "")]
    location: String,

    /// Salary floor (any, under-80k, 100k, 150k, 180k)
    #[arg(long, default_value = "any")]
    salary: SalaryRange,

    /// Experience level (any, entry, mid, senior, lead)
    #[arg(long, default_value = "any")]
    level: ExperienceLevel,
}

impl ScanArgs {
    fn preset_input(self, name: String) -> ScanPresetInput {
        ScanPresetInput {
            screen_filter: self.filter,
            sort_by: self.sort,
            remote_only: self.remote,
            full_time_only: self.full_time,
            hybrid_only: self.hybrid,
            location_query: self.location,
            salary_range: self.salary,
            experience_level: self.level,
            name,
        }
    }

    fn criteria(self) -> ScanCriteria {
        ScanCriteria {
            screen_filter: self.filter,
            sort_by: self.sort,
            remote_only: self.remote,
            full_time_only: self.full_time,
            hybrid_only: self.hybrid,
            location_query: self.location,
            salary_range: self.salary,
            experience_level: self.level,
            search: String::new(),
        }
    }
}

/// An opened database with the store and checklist loaded from it.
pub struct Session {
    db: Database,
    store: JobStore,
    checklist: TaskChecklist,
}

impl Session {
    fn open(path: &Path, options: ChecklistOptions) -> Result<Self> {
        let db = Database::open(path)?;
        db.ensure_initialized()?;
        let store = db.load_store()?;
        let mut checklist = TaskChecklist::from_state(options, db.load_checklist()?);
        let detected = checklist.refresh(&store);
        debug!(count = detected.len(), "checklist refreshed on open");
        Ok(Self { db, store, checklist })
    }

    fn save(&mut self) -> Result<()> {
        self.checklist.refresh(&self.store);
        self.db.save_store(&self.store)?;
        self.db.save_checklist(&self.checklist.state())
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_tracing(&config.log_level);

    let db_path = cli
        .db
        .clone()
        .or_else(|| config.database.clone())
        .unwrap_or_else(Database::default_path);
    let options = config.checklist_options();

    match cli.command {
        Commands::Init => {
            let db = Database::open(&db_path)?;
            db.init()?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::Seed { force } => {
            let mut db = Database::open(&db_path)?;
            db.init()?;
            if !db.is_empty()? && !force {
                bail!("Database already has jobs. Use --force to replace them.");
            }
            db.save_store(&JobStore::with_demo_data())?;
            db.save_checklist(&Default::default())?;
            println!("Loaded demo pipeline into {}", db.path().display());
        }

        Commands::List { status, role, search } => {
            let mut session = Session::open(&db_path, options)?;
            if let Some(role) = role {
                let filter = resolve_role_filter(&session.store, &role)?;
                session.store.set_filter(&filter);
                session.save()?;
            }
            let query = PipelineQuery {
                status,
                role_filter: session.store.active_filter().to_string(),
                search: search.unwrap_or_default(),
            };
            print_pipeline(&session.store, &query);
        }

        Commands::Show { job } => {
            let session = Session::open(&db_path, options)?;
            let job = resolve_job(&session.store, &job)?;
            print_job(&session.store, &job);
        }

        Commands::Add {
            company,
            role,
            location,
            status,
            action,
            due,
        } => {
            let mut session = Session::open(&db_path, options)?;
            let job = JobEntry::new(new_job_id(), company, role, location, status)
                .with_next_action(action.unwrap_or_default(), due.unwrap_or_default());
            let id = job.id.clone();
            session.store.add_job(job);
            session.save()?;
            println!("Added job {}", id);
        }

        Commands::Status {
            job,
            status,
            reason,
            note,
        } => {
            let mut session = Session::open(&db_path, options)?;
            let job = resolve_job(&session.store, &job)?;
            let at = pipeline::timestamp_label(&Local::now());

            if job.status == status {
                match note.as_deref().and_then(|n| pipeline::plain_note(&job.notes, n, &at)) {
                    Some(notes) => {
                        session.store.update_job_notes(&job.id, &notes);
                        println!("{} is already {}; note added.", job.company, status);
                    }
                    None => println!("{} is already {}.", job.company, status),
                }
            } else {
                let notes = pipeline::status_change_note(
                    &job.notes,
                    job.status,
                    status,
                    reason.as_deref(),
                    note.as_deref(),
                    &at,
                );
                session.store.update_job_notes(&job.id, &notes);
                session.store.update_job_status(&job.id, status);
                println!("{}: {} -> {}", job.company, job.status, status);
            }
            session.save()?;
        }

        Commands::Overdue { job, clear } => {
            let mut session = Session::open(&db_path, options)?;
            let job = resolve_job(&session.store, &job)?;
            if session.store.find_tracked(&job.id).is_none() {
                bail!("{} is not tracked. Save it first.", job.company);
            }
            session.store.set_overdue(&job.id, !clear);
            session.save()?;
            if clear {
                println!("{} is back on schedule.", job.company);
            } else {
                println!("{} marked overdue.", job.company);
            }
        }

        Commands::Note { job, text } => {
            let mut session = Session::open(&db_path, options)?;
            let job = resolve_job(&session.store, &job)?;
            let at = pipeline::timestamp_label(&Local::now());
            let notes = pipeline::plain_note(&job.notes, &text, &at).ok_or_else(|| anyhow!("Note is empty"))?;
            session.store.update_job_notes(&job.id, &notes);
            session.save()?;
            println!("Note added to {}.", job.company);
        }

        Commands::Outreach { job, sent } => {
            let mut session = Session::open(&db_path, options)?;
            let job = resolve_job(&session.store, &job)?;
            let draft = classify::build_outreach_draft(&job);

            if sent {
                let on = pipeline::date_label(&Local::now());
                let notes = pipeline::outreach_sent_note(&job.notes, &draft, &on);
                session.store.update_job_notes(&job.id, &notes);
                session.save()?;
                println!("Outreach to {} logged.", job.company);
            } else {
                println!("{}", draft);
            }
        }

        Commands::Save { job } => {
            let mut session = Session::open(&db_path, options)?;
            let job = resolve_job(&session.store, &job)?;
            session.store.toggle_save_job(&job);
            let saved = session.store.is_saved(&job.id);
            session.save()?;
            if saved {
                println!("Saved {} ({}).", job.headline(), job.id);
            } else {
                println!("Unsaved {} ({}).", job.headline(), job.id);
            }
        }

        Commands::Recommended { scan, search, preset } => {
            let session = Session::open(&db_path, options)?;
            let mut criteria = if preset {
                session
                    .store
                    .recommended_scan_preset()
                    .map(ScanCriteria::from)
                    .ok_or_else(|| anyhow!("No scan preset saved. Run 'careerlift preset save' first."))?
            } else {
                scan.criteria()
            };
            criteria.search = search.unwrap_or_default();
            print_recommended(&session.store, &criteria);
        }

        Commands::Import { file } => {
            let mut session = Session::open(&db_path, options)?;
            let jobs = read_scan_results(&file)?;
            let count = jobs.len();
            session.store.replace_recommended(jobs);
            session.save()?;
            println!("Imported {} recommended jobs from {}", count, file.display());
        }

        Commands::Preset { command } => {
            let mut session = Session::open(&db_path, options)?;
            match command {
                PresetCommands::Save { name, scan } => {
                    let descriptor = session
                        .store
                        .save_recommended_scan_preset(scan.preset_input(name))
                        .descriptor();
                    session.save()?;
                    println!("Saved scan preset: {}", descriptor);
                }

                PresetCommands::Clear => {
                    session.store.clear_recommended_scan_preset();
                    session.save()?;
                    println!("Scan preset cleared.");
                }

                PresetCommands::Show => match session.store.recommended_scan_preset() {
                    Some(preset) => {
                        println!("Name:   {}", preset.name);
                        println!("Label:  {}", preset.label);
                        println!("Filter: {}", preset.screen_filter);
                        println!("Sort:   {}", preset.sort_by.as_str());
                    }
                    None => println!("No scan preset saved."),
                },
            }
        }

        Commands::Tasks => {
            let mut session = Session::open(&db_path, options)?;
            print_tasks(&session.store, &session.checklist);
            session.save()?;
        }

        Commands::Check { task } => {
            let mut session = Session::open(&db_path, options)?;
            let item = active_task(&session, task)?;
            match session.checklist.handle_check_action(&mut session.store, &item) {
                CheckOutcome::Completed => println!("Completed: {}", item.title),
                CheckOutcome::Skipped => println!("'{}' has no job to update.", item.title),
                CheckOutcome::Prompted(prompt) => {
                    println!("{}", prompt.title);
                    println!("{}", prompt.message);
                    println!();
                    println!("  careerlift decide {} confirm   # {}", task, prompt.confirm_label);
                    println!("  careerlift decide {} deny      # {}", task, prompt.deny_label);
                }
            }
            session.save()?;
        }

        Commands::Decide { task, decision } => {
            let mut session = Session::open(&db_path, options)?;
            let item = active_task(&session, task)?;
            match session
                .checklist
                .apply_action_decision(&mut session.store, &item, decision)
            {
                DecisionOutcome::Committed => {
                    println!("Completed: {}", item.title);
                    if let Some(job) = session.store.find_tracked(&item.id) {
                        println!("{} is now {}.", job.company, job.status);
                        if job.has_pending_action() {
                            println!("Next: {} ({})", job.next_action, job.next_action_date);
                        }
                    }
                }
                DecisionOutcome::Dismissed => println!("No change for '{}'.", item.title),
                DecisionOutcome::Ignored => println!("'{}' has no job to update.", item.title),
            }
            session.save()?;
        }

        Commands::Uncheck { task } => {
            let mut session = Session::open(&db_path, options)?;
            let item = session
                .checklist
                .completed_actions()
                .get(task.wrapping_sub(1))
                .cloned()
                .ok_or_else(|| anyhow!("No completed task #{}", task))?;
            session.checklist.unmark_action_completed(&item);
            session.save()?;
            println!("Restored: {}", item.title);
        }

        Commands::Open { task } => {
            let session = Session::open(&db_path, options)?;
            let item = active_task(&session, task)?;
            session.checklist.handle_plan_action_press(&item, |target| print_target(&target));
        }

        Commands::Browse => {
            let mut session = Session::open(&db_path, options)?;
            tui::run_checklist(&mut session)?;
        }
    }

    Ok(())
}

fn active_task(session: &Session, number: usize) -> Result<WeeklyActionItem> {
    session
        .checklist
        .active_actions(&session.store)
        .into_iter()
        .nth(number.wrapping_sub(1))
        .ok_or_else(|| anyhow!("No task #{}. Run 'careerlift tasks' to see the list.", number))
}

/// Find a job by id, then exact company name, then closest company name.
fn resolve_job(store: &JobStore, query: &str) -> Result<JobEntry> {
    if let Some(job) = store.find(query) {
        return Ok(job.clone());
    }

    let wanted = query.trim().to_lowercase();
    let candidates: Vec<&JobEntry> = store.all_tracked().chain(store.recommended_jobs()).collect();

    if let Some(job) = candidates.iter().find(|job| job.company.to_lowercase() == wanted) {
        return Ok((*job).clone());
    }

    let best = candidates
        .iter()
        .map(|job| (strsim::jaro_winkler(&wanted, &job.company.to_lowercase()), *job))
        .max_by(|a, b| a.0.total_cmp(&b.0));

    match best {
        Some((score, job)) if score >= COMPANY_MATCH_THRESHOLD => {
            debug!(query, company = %job.company, score, "matched job by similar company name");
            Ok(job.clone())
        }
        _ => Err(anyhow!("No job matching '{}'", query)),
    }
}

/// Match a role filter case-insensitively against the store's filters.
fn resolve_role_filter(store: &JobStore, role: &str) -> Result<String> {
    let wanted = role.trim();
    if wanted.is_empty() {
        return Ok(ALL_ROLES.to_string());
    }
    store
        .filters()
        .iter()
        .find(|filter| filter.eq_ignore_ascii_case(wanted))
        .cloned()
        .ok_or_else(|| anyhow!("Unknown role filter '{}'. Use one of: {}", role, store.filters().join(", ")))
}

fn read_scan_results(path: &Path) -> Result<Vec<JobEntry>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    parse_scan_results(&contents).with_context(|| format!("Invalid scan results in {}", path.display()))
}

fn parse_scan_results(contents: &str) -> Result<Vec<JobEntry>> {
    let jobs: Vec<JobEntry> = serde_json::from_str(contents)?;
    if let Some(job) = jobs.iter().find(|job| job.id.trim().is_empty()) {
        bail!("Job '{}' has no id", job.headline());
    }
    Ok(jobs)
}

fn new_job_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(4)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect();
    format!("manual-{}-{}", Utc::now().timestamp_millis(), suffix)
}

fn print_pipeline(store: &JobStore, query: &PipelineQuery) {
    let jobs = query.apply(store);
    let counts = query.counts(store);

    if jobs.is_empty() {
        if query.is_filtering() {
            println!("No jobs match these filters.");
        } else {
            println!("No jobs tracked.");
        }
    } else {
        println!(
            "{:<26} {:<15} {:<16} {:<26} {:<26} {}",
            "ID", "STATUS", "COMPANY", "ROLE", "NEXT ACTION", "DUE"
        );
        println!("{}", "-".repeat(124));
        for job in jobs {
            let due = if job.is_overdue {
                format!("{} !", job.next_action_date)
            } else {
                job.next_action_date.clone()
            };
            println!(
                "{:<26} {:<15} {:<16} {:<26} {:<26} {}",
                truncate(&job.id, 24),
                job.status,
                truncate(&job.company, 14),
                truncate(&job.role, 24),
                truncate(&job.next_action, 24),
                due
            );
        }
    }

    println!();
    println!(
        "Applied {}  Interviewing {}  Offers {}  Saved {}",
        counts.applied, counts.interviewing, counts.offers, counts.saved
    );
    let roles: Vec<String> = query
        .role_filter_counts(store)
        .into_iter()
        .map(|(filter, count)| {
            if filter == query.role_filter {
                format!("[{} {}]", filter, count)
            } else {
                format!("{} {}", filter, count)
            }
        })
        .collect();
    println!("{}", roles.join("  "));
}

fn print_job(store: &JobStore, job: &JobEntry) {
    println!("Job {}", job.id);
    println!("{}", job.headline());
    println!("Location: {}", job.location);
    println!("Status: {}", job.status);
    if store.is_saved(&job.id) {
        println!("Saved: yes");
    }
    if store.find_tracked(&job.id).is_none() {
        println!("Tracked: no (recommended only)");
    }
    if job.has_pending_action() {
        let category = classify::tracked_action_type(&job.next_action)
            .map(|c| c.as_str())
            .unwrap_or("none");
        println!(
            "Next action: {} ({}) [{}]",
            job.next_action, job.next_action_date, category
        );
        if classify::is_outreach_action(&job.next_action) {
            println!("  Draft a message with: careerlift outreach {}", job.id);
        }
    }
    if let Some(score) = &job.match_score {
        println!("Match: {}", score);
    }
    if let Some(salary) = &job.salary {
        println!("Salary: {}", salary);
    }
    if !job.tags.is_empty() {
        println!("Tags: {}", job.tags.join(", "));
    }
    if !job.notes.is_empty() {
        println!("\n--- Notes ---\n{}", job.notes);
    }
}

fn print_recommended(store: &JobStore, criteria: &ScanCriteria) {
    let jobs = criteria.apply(store.recommended_jobs());
    if jobs.is_empty() {
        println!("No recommended jobs match.");
        return;
    }

    println!(
        "{:<2} {:<6} {:<6} {:<16} {:<28} {:<20} {}",
        "", "ID", "MATCH", "COMPANY", "ROLE", "LOCATION", "TAGS"
    );
    println!("{}", "-".repeat(100));
    for job in jobs {
        let marker = if store.is_saved(&job.id) { "*" } else { "" };
        println!(
            "{:<2} {:<6} {:<6} {:<16} {:<28} {:<20} {}",
            marker,
            truncate(&job.id, 6),
            format!("{}%", match_score(&job)),
            truncate(&job.company, 14),
            truncate(&job.role, 26),
            truncate(&job.location, 18),
            job.tags.join(", ")
        );
    }
}

fn print_tasks(store: &JobStore, checklist: &TaskChecklist) {
    let active = checklist.active_actions(store);
    let completed = checklist.completed_actions();

    println!("This week's actions");
    if active.is_empty() {
        println!("  All caught up.");
    }
    for (i, item) in active.iter().enumerate() {
        let due = item
            .job
            .as_ref()
            .map(|job| job.next_action_date.as_str())
            .unwrap_or("");
        println!("  {:>2}. [ ] {:<28} {:<36} {}", i + 1, item.title, truncate(&item.subtitle, 34), due);
    }

    if !completed.is_empty() {
        println!();
        println!("Completed");
        for (i, item) in completed.iter().enumerate() {
            println!("  {:>2}. [x] {:<28} {}", i + 1, item.title, truncate(&item.subtitle, 34));
        }
    }
}

fn print_target(target: &ActionTarget) {
    match &target.params.job {
        Some(job) => println!("Open {} for {}", target.screen, job.headline()),
        None if target.params.open_add_job_modal => println!("Open {} (add a job)", target.screen),
        None => println!("Open {}", target.screen),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_id_then_company() {
        let store = JobStore::with_demo_data();
        assert_eq!(resolve_job(&store, "3").unwrap().company, "Airbnb");
        assert_eq!(resolve_job(&store, "stripe").unwrap().id, "2");
        assert_eq!(resolve_job(&store, "Netflx").unwrap().id, "4");
        assert_eq!(resolve_job(&store, "Stellar AI").unwrap().id, "j1");
        assert!(resolve_job(&store, "Umbrella Corp").is_err());
    }

    #[test]
    fn role_filters_resolve_case_insensitively() {
        let store = JobStore::with_demo_data();
        assert_eq!(resolve_role_filter(&store, "product design").unwrap(), "Product Design");
        assert_eq!(resolve_role_filter(&store, " ").unwrap(), ALL_ROLES);
        assert!(resolve_role_filter(&store, "Marketing").is_err());
    }

    #[test]
    fn scan_results_parse_from_tracker_json() {
        let json = r#"[
            {"id": "j9", "company": "Orbit", "role": "Product Designer", "location": "Remote",
             "status": "Target", "nextAction": "", "nextActionDate": "", "tags": ["Remote", "Full-time"]}
        ]"#;
        let jobs = parse_scan_results(json).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].company, "Orbit");
        assert!(jobs[0].has_tag("remote"));

        let mut store = JobStore::with_demo_data();
        store.replace_recommended(jobs);
        assert_eq!(store.recommended_jobs().len(), 1);
        assert!(store.find_recommended("j1").is_none());

        let blank = r#"[{"id": " ", "company": "Orbit", "role": "Designer", "location": "Remote", "status": "Target"}]"#;
        assert!(parse_scan_results(blank).is_err());
        assert!(parse_scan_results("{}").is_err());
    }

    #[test]
    fn manual_ids_are_prefixed_and_unique() {
        let a = new_job_id();
        let b = new_job_id();
        assert!(a.starts_with("manual-"));
        assert_ne!(a, b);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("Short", 10), "Short");
        assert_eq!(truncate("Outreach sent • today", 12), "Outreach ...");
        assert_eq!(truncate("Café Résumé Studio", 8), "Café ...");
    }

    #[test]
    fn cli_parses_typed_arguments() {
        let cli = Cli::try_parse_from(["careerlift", "status", "3", "offer-signed", "--reason", "Great team"]).unwrap();
        match cli.command {
            Commands::Status { status, reason, .. } => {
                assert!(matches!(status, JobStatus::OfferSigned));
                assert_eq!(reason.as_deref(), Some("Great team"));
            }
            _ => panic!("expected status command"),
        }

        let cli = Cli::try_parse_from(["careerlift", "--db", "/tmp/x.db", "decide", "1", "yes"]).unwrap();
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/x.db")));
        assert!(matches!(cli.command, Commands::Decide { task: 1, decision: Decision::Confirm }));

        assert!(Cli::try_parse_from(["careerlift", "status", "3", "hired"]).is_err());

        let cli = Cli::try_parse_from(["careerlift", "overdue", "Airbnb", "--clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Overdue { clear: true, .. }));
    }
}
