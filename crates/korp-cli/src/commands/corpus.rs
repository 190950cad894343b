use anyhow::Context;
use serde::Serialize;

use korp_core::{CorpusCounts, Label};
use korp_corpus::{Intent, MutationAck, Outcome};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CorpusCommands;
use crate::commands::refreshed;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct MutationResponse<'a> {
    action: &'static str,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<Label>,
    message: String,
    verified: bool,
    counts: CorpusCounts,
}

/// Handle `korp corpus <subcommand>`.
pub async fn handle(action: CorpusCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let console = &ctx.console;
    match action {
        CorpusCommands::List(args) => {
            let mut examples = refreshed(console).await?;
            if args.untrained {
                examples.retain(|example| !example.trained);
            }
            output(&examples, flags.format)
        }
        CorpusCommands::Counts => {
            refreshed(console).await?;
            output(&console.store().counts(), flags.format)
        }
        CorpusCommands::Add(args) => {
            let outcome = console
                .dispatch(Intent::Add {
                    text: args.text.clone(),
                    label: args.label,
                })
                .await
                .context("corpus add failed")?;
            let Outcome::Added(ack) = outcome else {
                anyhow::bail!("unexpected outcome for add: {outcome:?}");
            };
            report("add", &args.text, Some(args.label), ack, ctx, flags)
        }
        CorpusCommands::Remove(args) => {
            // The local mirror must hold the text before a delete is sent.
            refreshed(console).await?;
            let outcome = console
                .dispatch(Intent::Remove {
                    text: args.text.clone(),
                })
                .await
                .context("corpus remove failed")?;
            let Outcome::Removed(ack) = outcome else {
                anyhow::bail!("unexpected outcome for remove: {outcome:?}");
            };
            report("remove", &args.text, None, ack, ctx, flags)
        }
    }
}

fn report(
    action: &'static str,
    text: &str,
    label: Option<Label>,
    ack: MutationAck,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if !ack.verified {
        tracing::warn!("server acknowledged the change but the corpus could not be re-read");
    }
    output(
        &MutationResponse {
            action,
            text,
            label,
            message: ack.message,
            verified: ack.verified,
            counts: ctx.console.store().counts(),
        },
        flags.format,
    )
}
