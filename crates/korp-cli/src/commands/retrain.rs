use anyhow::Context;
use serde::Serialize;

use korp_corpus::{Intent, Outcome, ReconcileReport};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RetrainArgs;
use crate::commands::refreshed;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct RetrainResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    reconciliation: Option<ReconcileReport>,
}

/// Handle `korp retrain`.
///
/// The reconciliation task dies with the process, so unless `--no-wait` is
/// given the command blocks until it reports.
pub async fn handle(args: &RetrainArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    // Reconciliation watches what is untrained right now.
    refreshed(&ctx.console).await?;

    let outcome = ctx
        .console
        .dispatch(Intent::Retrain)
        .await
        .context("retrain failed")?;
    let Outcome::RetrainAccepted(receipt) = outcome else {
        anyhow::bail!("unexpected outcome for retrain: {outcome:?}");
    };

    let message = receipt.message.clone();
    if args.no_wait {
        return output(
            &RetrainResponse {
                message,
                reconciliation: None,
            },
            flags.format,
        );
    }

    let spinner = Progress::spinner("waiting for the retrained model to show up");
    let report = match receipt.reconciled().await {
        Ok(report) => report,
        Err(error) => {
            spinner.finish_err("reconciliation failed");
            return Err(error).context("retrain accepted, but the corpus could not be re-read");
        }
    };
    if report.is_complete() {
        spinner.finish_clear();
    } else {
        spinner.finish_ok("some examples still read untrained; check again with `korp corpus list`");
    }

    output(
        &RetrainResponse {
            message,
            reconciliation: Some(report),
        },
        flags.format,
    )
}
