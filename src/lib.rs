//! Session-aware async client for the mental math quiz API: bearer token lifecycle, serialized
//! refresh, and typed quiz operations in one crate.
//!
//! The crate is organized around four collaborators:
//!
//! - [`store::SessionTokenStore`] keeps the single session-scoped bearer token.
//! - [`session::RequestAuthenticator`] resolves a credential before every request, refreshing
//!   expired tokens through [`session::TokenRefresher`].
//! - [`session::TokenRefresher`] exchanges cookies for a fresh token and emits a
//!   [`session::LogoutEvent`] to the host when that fails.
//! - [`client::ApiClient`] exposes the typed quiz operations on top of the authenticator.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod quiz;
pub mod session;
pub mod store;

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
