//! Entity structs for the Kanri task workflow.
//!
//! Each entity maps to a table in the libSQL database (see
//! `kanri-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema validation.

mod audit;
mod task;

pub use audit::AuditEntry;
pub use task::{NewTask, Task};
