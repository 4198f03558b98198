//! Update discovery: request building, response model and the query client.
//!
//! ```ignore
//! use std::sync::Arc;
//! use vinupdate::config::ServiceConfig;
//! use vinupdate::http::ReqwestClient;
//! use vinupdate::query::{SoftwareType, UpdateQueryClient, Vin};
//!
//! let config = ServiceConfig::default();
//! let http = Arc::new(ReqwestClient::from_config(&config)?);
//! let client = UpdateQueryClient::new(http, config);
//!
//! let outcome = client.query(&Vin::parse("VF3CCHNZTHT014827")?)?;
//! if let Some(update) = outcome.result.latest_update(&SoftwareType::NacFirmware) {
//!     println!("NAC {} available at {}", update.version, update.url);
//! }
//! ```

mod client;
mod request;
mod response;

pub use client::{QueryOutcome, UpdateQueryClient};
pub use request::{AvailableUpdateRequest, SoftwareRequest, SoftwareType, Vin};
pub use response::{SoftwareStatus, UpdateDescriptor, UpdateQueryResult};
