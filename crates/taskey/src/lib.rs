//! Taskey CRM adapter.
//!
//! This crate sends leads, purchases, tasks and meetings to a Taskey
//! account through its form-encoded web API
//! (`https://{subdomain}.taskey.co.il/webapi/*.php`).
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskey::{
//!     Credentials, InputRecord, Operation, RecordParams, RecordProcessor, StaticCredentials,
//!     TaskeyClient,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let credentials = Credentials::new("acme", "api-key")?;
//! let client = TaskeyClient::new(Arc::new(StaticCredentials::new(credentials)));
//! let processor = RecordProcessor::new(client).continue_on_fail(true);
//!
//! let lead = InputRecord::new(
//!     Operation::AddLead,
//!     RecordParams {
//!         name: "Jane".to_string(),
//!         phone: "555".to_string(),
//!         ..Default::default()
//!     },
//! );
//!
//! for output in processor.process_batch(&[lead]).await? {
//!     println!("{}", serde_json::to_string(&output)?);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! - `TASKEY_SUBDOMAIN`: account subdomain
//! - `TASKEY_API_KEY`: API key
//! - `TASKEY_BASE_URL`: optional base URL override
//! - `TASKEY_CONTINUE_ON_FAIL`: set to "true" to keep going after a failed record
//!
//! # Architecture
//!
//! - [`CredentialSource`] supplies credentials for each record
//! - [`build_body`] maps record fields onto the form body for an [`Operation`]
//! - [`Transport`] performs the POST; [`HttpTransport`] uses `reqwest`
//! - [`RecordProcessor`] runs a batch in order and shapes [`OutputRecord`]s

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fields;
pub mod operation;
pub mod processor;
pub mod transport;

pub use client::TaskeyClient;
pub use config::Config;
pub use credentials::{CredentialSource, Credentials, EnvCredentials, StaticCredentials};
pub use error::{BatchError, TaskeyError};
pub use fields::{build_body, AdditionalField, RecordParams};
pub use operation::Operation;
pub use processor::{InputRecord, OutputJson, OutputRecord, PairedItem, RecordProcessor};
pub use transport::{HttpTransport, Transport};
