//! # NexaFlow Client SDK
//!
//! A client SDK for NexaFlow content-addressed storage and identity.
//!
//! ## Features
//!
//! - **Uploads**: SHA-256 derived content ids and gateway URLs
//! - **Spaces**: Named containers for uploaded files
//! - **Identity**: `did:<method>:...` identities with key material
//! - **Dispatch modes**: Simulated (default), live, or live with fallback
//!
//! In the default [`DispatchMode::Simulated`] mode every request is fully
//! built but never sent, and the answer is synthesized locally.
//!
//! ## Example
//!
//! ```rust,ignore
//! use nexaflow_client::{Config, NexaflowClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut client = NexaflowClient::new(Config::default())?;
//!     client.set_auth("did:key:z6MkvS5hwP993amMA9kCbwK2Wbd7SifuwsBnRKFmaGhN92ZR", "");
//!
//!     let space = client.create_space("Photos", "Holiday pictures").await?;
//!     println!("Space {} ({})", space.name, space.did);
//!
//!     let upload = client.upload_file("photo.jpg", None).await?;
//!     println!("CID: {}", upload.cid);
//!
//!     Ok(())
//! }
//! ```

pub mod cid;
mod client;
mod config;
pub mod did;
mod error;
mod multipart;
mod types;

pub use client::{NexaflowClient, DID_HEADER};
pub use config::{Config, DispatchMode, DEFAULT_API_URL, DEFAULT_TIMEOUT, USER_AGENT};
pub use did::{Did, DidError};
pub use error::{ClientError, Result};
pub use multipart::{upload_metadata, Metadata, UploadSource};
pub use types::*;
