//! Demo collections for a fresh tracker.

use std::collections::BTreeSet;

use crate::models::{JobEntry, JobStatus};
use crate::store::JobStore;

fn colored(job: JobEntry, color: &str) -> JobEntry {
    JobEntry {
        color: Some(color.to_string()),
        ..job
    }
}

fn recommended(id: &str, company: &str, role: &str, location: &str, score: &str, tags: [&str; 3]) -> JobEntry {
    let job = JobEntry::new(id, company, role, location, JobStatus::Target)
        .with_next_action("Apply", "Today")
        .with_match(score)
        .with_tags(tags);
    colored(job, "#f5f7f8")
}

impl JobStore {
    pub fn with_demo_data() -> Self {
        let this_week = vec![
            JobEntry::new("1", "Google", "Senior UX Engineer", "Mountain View", JobStatus::Interview)
                .with_next_action("Technical Screen", "Tomorrow, 2:00 PM"),
            colored(
                JobEntry::new("2", "Stripe", "Staff Product Designer", "Remote", JobStatus::Applied)
                    .with_next_action("Follow up email", "Due in 2 days"),
                "#635BFF",
            ),
        ];

        let mut airbnb = JobEntry::new("3", "Airbnb", "Design Lead", "San Francisco", JobStatus::Target)
            .with_next_action("Submit Application", "Overdue");
        airbnb.is_overdue = true;

        let next_up = vec![
            colored(airbnb, "#FF5A5F"),
            colored(
                JobEntry::new("4", "Netflix", "Senior Product Designer", "Los Gatos", JobStatus::Target)
                    .with_next_action("Coffee Chat w/ Recruiter", "Fri, Oct 24"),
                "#000000",
            ),
            colored(
                JobEntry::new("5", "Spotify", "Product Designer", "New York", JobStatus::OfferReceived)
                    .with_next_action("Sign Offer Letter", "Reviewing"),
                "#1DB954",
            ),
        ];

        let recommended_jobs = vec![
            recommended(
                "j1",
                "Stellar AI",
                "Senior Product Designer",
                "San Francisco, CA",
                "96%",
                ["Remote", "Full-time", "$160k - $210k"],
            ),
            recommended(
                "j2",
                "FinFlow",
                "Lead UX Researcher",
                "New York, NY",
                "92%",
                ["Hybrid", "Full-time", "$145k - $185k"],
            ),
            recommended(
                "j3",
                "Nexus Systems",
                "Staff Product Manager",
                "Austin, TX",
                "88%",
                ["Remote", "Full-time", "$180k+"],
            ),
            recommended(
                "j4",
                "Loomly",
                "Interaction Designer",
                "Remote",
                "85%",
                ["Remote", "Contract", "$90 - $120 / hr"],
            ),
        ];

        let saved: BTreeSet<String> = this_week
            .iter()
            .chain(next_up.iter())
            .filter(|job| job.status == JobStatus::Target)
            .map(|job| job.id.clone())
            .collect();

        JobStore::restore(this_week, next_up, recommended_jobs, saved, None)
    }
}
