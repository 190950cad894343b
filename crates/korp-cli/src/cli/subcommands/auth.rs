use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Log in with the admin password.
    Login(AuthLoginArgs),
    /// Forget the stored session token.
    Logout,
    /// Show current session status.
    Status,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Admin password. Read from stdin when omitted.
    #[arg(long)]
    pub password: Option<String>,
}
