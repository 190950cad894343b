//! # korp-api
//!
//! Backend access for korpus.
//!
//! Provides the `reqwest` client bound to one backend, reply classification
//! into transport / application / authorization failures, the operator
//! [`Session`] that owns the bearer token (persisted through a
//! [`TokenStore`]: OS keychain, file or memory), and the stateless
//! [`ClassifierClient`].

pub mod classifier;
pub mod client;
pub mod error;
pub mod session;
pub mod token_store;
pub mod wire;

mod http;

pub use classifier::ClassifierClient;
pub use client::{ApiClient, ClientOptions};
pub use error::ApiError;
pub use reqwest::Method;
pub use session::{LoginGrant, Session, SessionWatch};
pub use token_store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
