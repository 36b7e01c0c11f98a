use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::checklist::ChecklistState;
use crate::models::{JobEntry, JobStatus, WeeklyActionItem};
use crate::preset::{RecommendedScanPreset, ScreenFilter};
use crate::store::JobStore;

const COLLECTIONS: [&str; 3] = ["this_week", "next_up", "recommended"];

pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_path() -> PathBuf {
        match directories::ProjectDirs::from("", "", "careerlift") {
            Some(dirs) => dirs.data_dir().join("careerlift.db"),
            None => PathBuf::from("careerlift.db"),
        }
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS jobs (
                collection TEXT NOT NULL CHECK (collection IN ('this_week', 'next_up', 'recommended')),
                position INTEGER NOT NULL,
                id TEXT NOT NULL,
                company TEXT NOT NULL,
                role TEXT NOT NULL,
                location TEXT NOT NULL,
                status TEXT NOT NULL CHECK (status IN ('Target', 'Applied', 'Interview', 'Interviewing',
                    'Offer Received', 'Offer Signed', 'Rejected', 'Not Interested')),
                next_action TEXT NOT NULL DEFAULT '',
                next_action_date TEXT NOT NULL DEFAULT '',
                is_overdue INTEGER NOT NULL DEFAULT 0,
                notes TEXT NOT NULL DEFAULT '',
                saved_from_recommended INTEGER NOT NULL DEFAULT 0,
                previous_status TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                match_score TEXT,
                salary TEXT,
                logo TEXT,
                color TEXT,
                PRIMARY KEY (collection, position)
            );

            CREATE TABLE IF NOT EXISTS saved_jobs (
                id TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS checklist_items (
                list TEXT NOT NULL CHECK (list IN ('completed', 'snapshot')),
                position INTEGER NOT NULL,
                item TEXT NOT NULL,
                PRIMARY KEY (list, position)
            );

            CREATE INDEX IF NOT EXISTS idx_jobs_id ON jobs(id);
            "#,
        )?;
        Ok(())
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        let tables: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='jobs'",
            [],
            |row| row.get(0),
        )?;
        if tables == 0 {
            return Err(anyhow!(
                "Database not initialized. Run 'careerlift init' first."
            ));
        }
        Ok(())
    }

    pub fn is_empty(&self) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
        Ok(count == 0)
    }

    // --- Job store ---

    /// Replace the persisted snapshot with `store`, in one transaction.
    pub fn save_store(&mut self, store: &JobStore) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM jobs", [])?;
        tx.execute("DELETE FROM saved_jobs", [])?;

        let lists = [store.this_week(), store.next_up(), store.recommended_jobs()];
        for (collection, jobs) in COLLECTIONS.iter().zip(lists) {
            for (position, job) in jobs.iter().enumerate() {
                insert_job(&tx, collection, position, job)?;
            }
        }

        for id in store.saved_job_ids() {
            tx.execute("INSERT INTO saved_jobs (id) VALUES (?1)", [id])?;
        }

        set_setting(&tx, "active_filter", store.active_filter())?;
        set_setting(
            &tx,
            "recommended_active_filter",
            store.recommended_active_filter().as_str(),
        )?;
        match store.recommended_scan_preset() {
            Some(preset) => {
                let json = serde_json::to_string(preset).context("Failed to encode scan preset")?;
                set_setting(&tx, "scan_preset", &json)?;
            }
            None => {
                tx.execute("DELETE FROM settings WHERE key = 'scan_preset'", [])?;
            }
        }

        tx.commit().context("Failed to save job store")
    }

    pub fn load_store(&self) -> Result<JobStore> {
        let this_week = self.load_collection("this_week")?;
        let next_up = self.load_collection("next_up")?;
        let recommended = self.load_collection("recommended")?;

        let mut stmt = self.conn.prepare("SELECT id FROM saved_jobs ORDER BY id")?;
        let saved = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<BTreeSet<_>, _>>()
            .context("Failed to load saved jobs")?;

        let preset = match self.get_setting("scan_preset")? {
            Some(json) => Some(
                serde_json::from_str::<RecommendedScanPreset>(&json)
                    .context("Failed to decode scan preset")?,
            ),
            None => None,
        };

        let mut store = JobStore::restore(this_week, next_up, recommended, saved, preset);
        if let Some(filter) = self.get_setting("active_filter")? {
            store.set_filter(&filter);
        }
        if let Some(filter) = self.get_setting("recommended_active_filter")? {
            let filter: ScreenFilter = filter.parse()?;
            store.set_recommended_active_filter(filter);
        }
        Ok(store)
    }

    fn load_collection(&self, collection: &str) -> Result<Vec<JobEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, company, role, location, status, next_action, next_action_date,
                    is_overdue, notes, saved_from_recommended, previous_status, tags,
                    match_score, salary, logo, color
             FROM jobs WHERE collection = ?1 ORDER BY position",
        )?;
        let rows = stmt.query_map([collection], Self::row_to_job)?;
        rows.collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to load {collection} jobs"))
    }

    fn row_to_job(row: &rusqlite::Row) -> rusqlite::Result<JobEntry> {
        let status: String = row.get(4)?;
        let previous: Option<String> = row.get(10)?;
        let tags: String = row.get(11)?;

        Ok(JobEntry {
            id: row.get(0)?,
            company: row.get(1)?,
            role: row.get(2)?,
            location: row.get(3)?,
            status: parse_column(4, &status)?,
            next_action: row.get(5)?,
            next_action_date: row.get(6)?,
            is_overdue: row.get(7)?,
            notes: row.get(8)?,
            saved_from_recommended: row.get(9)?,
            previous_status: previous.as_deref().map(|s| parse_column(10, s)).transpose()?,
            tags: serde_json::from_str(&tags).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(11, rusqlite::types::Type::Text, Box::new(e))
            })?,
            match_score: row.get(12)?,
            salary: row.get(13)?,
            logo: row.get(14)?,
            color: row.get(15)?,
        })
    }

    fn get_setting(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()
            .with_context(|| format!("Failed to read setting {key}"))
    }

    // --- Checklist ---

    pub fn save_checklist(&mut self, state: &ChecklistState) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM checklist_items", [])?;
        for (list, items) in [("completed", &state.completed), ("snapshot", &state.snapshot)] {
            for (position, item) in items.iter().enumerate() {
                let json = serde_json::to_string(item).context("Failed to encode checklist item")?;
                tx.execute(
                    "INSERT INTO checklist_items (list, position, item) VALUES (?1, ?2, ?3)",
                    params![list, position as i64, json],
                )?;
            }
        }
        tx.commit().context("Failed to save checklist")
    }

    pub fn load_checklist(&self) -> Result<ChecklistState> {
        Ok(ChecklistState {
            completed: self.load_checklist_list("completed")?,
            snapshot: self.load_checklist_list("snapshot")?,
        })
    }

    fn load_checklist_list(&self, list: &str) -> Result<Vec<WeeklyActionItem>> {
        let mut stmt = self
            .conn
            .prepare("SELECT item FROM checklist_items WHERE list = ?1 ORDER BY position")?;
        let rows = stmt.query_map([list], |row| row.get::<_, String>(0))?;

        let mut items = Vec::new();
        for json in rows {
            let json = json?;
            let item = serde_json::from_str(&json)
                .with_context(|| format!("Failed to decode {list} checklist item"))?;
            items.push(item);
        }
        Ok(items)
    }
}

fn insert_job(tx: &Transaction<'_>, collection: &str, position: usize, job: &JobEntry) -> Result<()> {
    let tags = serde_json::to_string(&job.tags)?;
    tx.execute(
        "INSERT INTO jobs (collection, position, id, company, role, location, status,
                           next_action, next_action_date, is_overdue, notes,
                           saved_from_recommended, previous_status, tags,
                           match_score, salary, logo, color)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
        params![
            collection,
            position as i64,
            job.id,
            job.company,
            job.role,
            job.location,
            job.status.as_str(),
            job.next_action,
            job.next_action_date,
            job.is_overdue,
            job.notes,
            job.saved_from_recommended,
            job.previous_status.map(|status| status.as_str()),
            tags,
            job.match_score,
            job.salary,
            job.logo,
            job.color,
        ],
    )
    .with_context(|| format!("Failed to save job {}", job.id))?;
    Ok(())
}

fn set_setting(tx: &Transaction<'_>, key: &str, value: &str) -> Result<()> {
    tx.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn parse_column(index: usize, value: &str) -> rusqlite::Result<JobStatus> {
    value
        .parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e)))
}
