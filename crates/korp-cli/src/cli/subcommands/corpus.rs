use clap::{Args, Subcommand};

use korp_core::Label;

/// Corpus commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CorpusCommands {
    /// List every training example.
    List(CorpusListArgs),
    /// Count examples per label and training state.
    Counts,
    /// Submit a new training example.
    Add(CorpusAddArgs),
    /// Delete the example with exactly this text.
    Remove(CorpusRemoveArgs),
}

#[derive(Clone, Debug, Args)]
pub struct CorpusListArgs {
    /// Only show examples the model has not been trained on yet.
    #[arg(long)]
    pub untrained: bool,
}

#[derive(Clone, Debug, Args)]
pub struct CorpusAddArgs {
    pub text: String,
    /// human (menschlich) or ai (ki).
    #[arg(long)]
    pub label: Label,
}

#[derive(Clone, Debug, Args)]
pub struct CorpusRemoveArgs {
    pub text: String,
}
