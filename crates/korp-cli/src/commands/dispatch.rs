use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(action, ctx, flags).await,
        Commands::Corpus { action } => commands::corpus::handle(action, ctx, flags).await,
        Commands::Retrain(args) => commands::retrain::handle(&args, ctx, flags).await,
        Commands::Stats(args) => commands::stats::handle(&args, ctx, flags).await,
        Commands::Predict(args) => commands::predict::handle(args, ctx, flags).await,
    }
}
