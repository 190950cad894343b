use serde::Serialize;

use korp_core::Label;
use korp_corpus::{Intent, Outcome};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PredictArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct PredictResponse {
    verdict: Label,
    confidence: f64,
    human: f64,
    ai: f64,
}

/// Handle `korp predict <TEXT>`. Works without logging in.
pub async fn handle(args: PredictArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let outcome = ctx.console.dispatch(Intent::Predict { text: args.text }).await?;
    let Outcome::Prediction(prediction) = outcome else {
        anyhow::bail!("unexpected outcome for predict: {outcome:?}");
    };
    output(
        &PredictResponse {
            verdict: prediction.verdict(),
            confidence: prediction.confidence(),
            human: prediction.human,
            ai: prediction.ai,
        },
        flags.format,
    )
}
