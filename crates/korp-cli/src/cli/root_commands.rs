use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuthCommands, CorpusCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Operator login, logout and session status.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Inspect and edit the training corpus.
    Corpus {
        #[command(subcommand)]
        action: CorpusCommands,
    },
    /// Retrain the model on the current corpus.
    Retrain(RetrainArgs),
    /// Show corpus statistics.
    Stats(StatsArgs),
    /// Classify a text as human-written or AI-generated.
    Predict(PredictArgs),
}

#[derive(Clone, Debug, Args)]
pub struct RetrainArgs {
    /// Return once the backend accepts the request, without reconciling.
    #[arg(long)]
    pub no_wait: bool,
}

#[derive(Clone, Debug, Args)]
pub struct StatsArgs {
    /// Frequent words to show per list (defaults to `stats.top_n`).
    #[arg(long)]
    pub top: Option<usize>,
}

#[derive(Clone, Debug, Args)]
pub struct PredictArgs {
    /// Text to classify.
    pub text: String,
}
