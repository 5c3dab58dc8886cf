//! Authenticated API client for the MBG school-meal platform: bearer credentials on every call,
//! single-flight session refresh with one retry, and typed facades for every backend resource.
//!
//! The crate is layered leaf-first:
//!
//! - [`store`] keeps the access/refresh [`auth::CredentialPair`] and persists it.
//! - [`classify`] turns a raw transport result into an [`classify::Outcome`].
//! - [`refresh`] guarantees at most one refresh call is in flight.
//! - [`pipeline`] attaches credentials, dispatches, and retries once after a refresh.
//! - [`resources`] exposes [`resources::ApiClient`] with one method per backend operation.

#![deny(clippy::all, unused_crate_dependencies)]
#![warn(missing_docs)]

pub mod auth;
pub mod classify;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod obs;
pub mod pipeline;
pub mod refresh;
pub mod resources;
pub mod session;
pub mod store;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
