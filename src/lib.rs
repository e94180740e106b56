//! ERPNext material flow
//!
//! Client-side automation of ERPNext's manufacturing material flow: fetch a
//! work order, check its required materials against warehouse stock, then
//! either raise a purchase Material Request for the shortages or submit a
//! "Material Transfer for Manufacture" Stock Entry into the WIP warehouse.
//!
//! ```no_run
//! use erpnext_material_flow::{config, nodes::MaterialCheckingParams, AppServices};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = config::load_config()?;
//! config::init_tracing(&config.log_level, config.log_json);
//!
//! let services = AppServices::from_config(&config).await?;
//! // Batch runs use the configured `item_error_policy`
//! let checks = services
//!     .check_materials(&[MaterialCheckingParams::new("MFG-WO-2024-00001")])
//!     .await?;
//! println!("{}", serde_json::to_string_pretty(&checks)?);
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod nodes;
pub mod services;

pub use auth::{CredentialProvider, ErpNextCredentials};
pub use client::{ErpNextClient, ListQuery, ResourceClient, ResourceResponse};
pub use config::{AppConfig, AppConfigError};
pub use errors::ServiceError;
pub use nodes::{ItemErrorPolicy, ItemOutcome};
pub use services::{AppServices, ServiceFactory};
