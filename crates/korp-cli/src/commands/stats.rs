use serde::Serialize;

use korp_core::{Label, StatsSnapshot, WordCount};
use korp_corpus::{Intent, Outcome};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::StatsArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct LabelSummary<'a> {
    words: u64,
    chars: u64,
    top_words: &'a [WordCount],
}

#[derive(Serialize)]
struct StatsResponse<'a> {
    total_words: u64,
    total_chars: u64,
    total_sentences: u64,
    human: LabelSummary<'a>,
    ai: LabelSummary<'a>,
    top_words: &'a [WordCount],
}

impl<'a> StatsResponse<'a> {
    fn new(snapshot: &'a StatsSnapshot, top: usize) -> Self {
        let label = |label: Label| {
            let stats = snapshot.for_label(label);
            LabelSummary {
                words: stats.word_count,
                chars: stats.char_count,
                top_words: snapshot.top_words(Some(label), top),
            }
        };
        Self {
            total_words: snapshot.total_words,
            total_chars: snapshot.total_chars,
            total_sentences: snapshot.total_sentences,
            human: label(Label::Human),
            ai: label(Label::Ai),
            top_words: snapshot.top_words(None, top),
        }
    }
}

/// Handle `korp stats`.
pub async fn handle(args: &StatsArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = ctx.console.dispatch(Intent::FetchStats).await?;
    let Outcome::Stats(snapshot) = outcome else {
        anyhow::bail!("unexpected outcome for stats: {outcome:?}");
    };
    let top = args.top.unwrap_or(ctx.config.stats.top_n);
    output(&StatsResponse::new(&snapshot, top), flags.format)
}
