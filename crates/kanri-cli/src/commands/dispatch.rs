use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &mut AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Task { action } => commands::task::handle(&action, ctx, flags).await,
        Commands::Board { action } => commands::board::handle(&action, ctx, flags).await,
        Commands::Init(_) | Commands::Schema(_) => {
            anyhow::bail!("init and schema run before a project is opened")
        }
    }
}
