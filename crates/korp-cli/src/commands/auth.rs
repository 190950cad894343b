use std::io::{BufRead, IsTerminal};

use anyhow::Context;
use serde::Serialize;

use korp_core::SessionStatus;
use korp_corpus::{Intent, Outcome};

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::cli::subcommands::auth::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    examples: usize,
    token_source: &'static str,
}

#[derive(Serialize)]
struct AuthStatusResponse {
    session: SessionStatus,
    token_source: &'static str,
    server: String,
    note: Option<&'static str>,
}

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
}

/// Handle `korp auth <subcommand>`.
pub async fn handle(action: AuthCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match action {
        AuthCommands::Login(args) => login(args, ctx, flags).await,
        AuthCommands::Logout => {
            ctx.console.dispatch(Intent::Logout).await?;
            output(&AuthLogoutResponse { cleared: true }, flags.format)
        }
        AuthCommands::Status => {
            let session = ctx.console.session().status();
            let note = (session == SessionStatus::Authenticated)
                .then_some("token held locally; the server checks it on the next call");
            output(
                &AuthStatusResponse {
                    session,
                    token_source: ctx.console.session().token_source(),
                    server: ctx.config.server.base_url.clone(),
                    note,
                },
                flags.format,
            )
        }
    }
}

async fn login(args: AuthLoginArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password()?,
    };

    let outcome = ctx
        .console
        .dispatch(Intent::Login { password })
        .await
        .context("login failed")?;
    let Outcome::LoggedIn { examples } = outcome else {
        anyhow::bail!("unexpected outcome for login: {outcome:?}");
    };

    output(
        &AuthLoginResponse {
            authenticated: true,
            examples,
            token_source: ctx.console.session().token_source(),
        },
        flags.format,
    )
}

/// First line of stdin, without the line ending.
fn read_password() -> anyhow::Result<String> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
    }
    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
