//! Seed script for development: replaces the `tasks` collection with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Reads `MONGO_URI` (and the rest of the service configuration) from the
//! environment or `.env`. Users are owned by the task service, so the seed only
//! invents user ids and prints them for use with the analytics endpoints.

use chrono::{NaiveDate, Utc};
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::Collection;

use quicktask_analytics::config::AppConfig;
use quicktask_analytics::db::{self, TASKS_COLLECTION};
use quicktask_analytics::models::task::{Task, TaskPriority, TaskStatus};

use TaskPriority::{High, Low, Medium};
use TaskStatus::{Completed, InProgress, Todo};

/// (title, priority, status, due date). Completed tasks finish on their due date.
type SampleTask = (&'static str, TaskPriority, TaskStatus, &'static str);

const FIRST_USER_TASKS: &[SampleTask] = &[
    ("Draft quarterly roadmap", High, InProgress, "2026-01-25"),
    ("Review open pull requests", Medium, Todo, "2026-01-20"),
    ("Refresh API reference", Low, Completed, "2026-01-15"),
    ("Prepare sprint demo", Medium, Completed, "2026-01-16"),
    ("Fix token refresh bug", High, InProgress, "2026-01-18"),
    ("Add compound indexes", Medium, Todo, "2026-01-30"),
    ("Raise test coverage", High, Todo, "2026-01-22"),
    ("Customer walkthrough", High, Todo, "2026-01-28"),
    ("Evaluate queue library", Low, Todo, "2026-02-05"),
    ("Audit session handling", High, Completed, "2026-01-14"),
];

const SECOND_USER_TASKS: &[SampleTask] = &[
    ("Landing page mockups", High, InProgress, "2026-01-24"),
    ("Schedule user interviews", Medium, Todo, "2026-01-26"),
    ("Update colour tokens", Low, Completed, "2026-01-12"),
    ("Mobile wireframes", High, Todo, "2026-01-29"),
    ("Accessibility pass", Medium, InProgress, "2026-01-21"),
    ("Dashboard icon set", Low, Todo, "2026-02-01"),
    ("Revise brand guide", Medium, Completed, "2026-01-13"),
    ("Prototype usability test", High, Todo, "2026-01-27"),
    ("Newsletter template", Low, Completed, "2026-01-10"),
    ("Chart component polish", Medium, InProgress, "2026-01-23"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    let database = db::connect(&config).await?;
    let tasks: Collection<Task> = database.collection(TASKS_COLLECTION);

    println!("=== QuickTask Analytics Seed Script ===");
    println!("Database: {}", config.database_name);

    let cleared = tasks.delete_many(doc! {}).await?;
    println!("[done] Cleared {} existing tasks", cleared.deleted_count);

    let first_user = ObjectId::new();
    let second_user = ObjectId::new();

    let mut batch = build_tasks(first_user, FIRST_USER_TASKS)?;
    batch.extend(build_tasks(second_user, SECOND_USER_TASKS)?);
    let inserted = tasks.insert_many(&batch).await?;
    println!("[done] Inserted {} tasks", inserted.inserted_ids.len());

    println!("\n=== Seed complete! ===");
    println!("User 1: {first_user}");
    println!("User 2: {second_user}");
    println!("Try: GET /analytics/user-stats/{first_user}");

    Ok(())
}

fn build_tasks(user_id: ObjectId, samples: &[SampleTask]) -> anyhow::Result<Vec<Task>> {
    samples
        .iter()
        .map(|&(title, priority, status, due)| {
            let due = day_start(due)?;
            Ok(Task {
                id: None,
                user_id,
                title: title.to_string(),
                description: None,
                priority,
                status,
                due_date: Some(due),
                completed_at: (status == Completed).then_some(due),
            })
        })
        .collect()
}

fn day_start(date: &str) -> anyhow::Result<DateTime> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")?;
    let midnight = day
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid midnight for {date}"))?
        .and_local_timezone(Utc)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous date {date}"))?;
    Ok(DateTime::from_millis(midnight.timestamp_millis()))
}
