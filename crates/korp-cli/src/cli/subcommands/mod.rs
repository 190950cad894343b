pub mod auth;
pub mod corpus;

pub use auth::AuthCommands;
pub use corpus::CorpusCommands;
