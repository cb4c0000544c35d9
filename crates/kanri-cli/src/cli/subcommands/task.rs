use chrono::NaiveDate;
use clap::Subcommand;
use kanri_core::ids::TaskId;

/// Task entity commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaskCommands {
    /// Create a task.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// low, medium, high
        #[arg(long)]
        priority: Option<String>,
        /// Initial column: pending, in_progress, done, cancelled
        #[arg(long)]
        status: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Due date (YYYY-MM-DD); defaults to the start date
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        patient: Option<String>,
        /// Owner; defaults to general.user
        #[arg(long)]
        owner: Option<String>,
    },
    /// Get a task by ID.
    Get { id: TaskId },
    /// Update task fields.
    Update {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, conflicts_with = "clear_start")]
        start: Option<NaiveDate>,
        /// Remove the start date.
        #[arg(long)]
        clear_start: bool,
        #[arg(long)]
        due: Option<NaiveDate>,
        #[arg(long)]
        patient: Option<String>,
    },
    /// Move a task to another status.
    Status { id: TaskId, status: String },
    /// Move several tasks at once; ineligible tasks are skipped.
    #[command(name = "bulk-status")]
    BulkStatus {
        status: String,
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },
    /// Delete a task.
    Delete { id: TaskId },
    /// List tasks.
    List {
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        priority: Option<String>,
        #[arg(long)]
        patient: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        due_from: Option<NaiveDate>,
        #[arg(long)]
        due_to: Option<NaiveDate>,
        /// due_date, priority, created_at, title, status
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Mark pending and in-progress tasks past their due date as overdue.
    #[command(name = "sweep-overdue")]
    SweepOverdue {
        /// Treat this date as today (YYYY-MM-DD).
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Show a task with its audit trail.
    History {
        id: TaskId,
        #[arg(long)]
        limit: Option<u32>,
    },
}
