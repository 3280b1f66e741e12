//! # NexaFlow CLI
//!
//! Command-line front-end for the NexaFlow client SDK.
//!
//! This crate provides:
//! - **Local login**: the current DID is kept in `~/.nexaflow/auth.json`
//! - **Spaces**: create, list and select the space uploads go to
//! - **Uploads**: one or more files with title, description and tags
//! - **Identity**: create DIDs and check their syntax
//! - **Status**: network status and login state

pub mod commands;
pub mod format;
pub mod store;

pub use commands::UploadOptions;
pub use store::{AuthData, CurrentSpace, LocalStore};
