//! Storage contract and the built-in single-slot session token store.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::SessionToken};

/// Boxed future returned by [`SessionTokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Session-scoped slot holding at most one bearer token.
///
/// Implementations carry no concurrency guarantees beyond memory safety: concurrent writers
/// race and the last write wins.
pub trait SessionTokenStore
where
	Self: Send + Sync,
{
	/// Returns the stored token, if any.
	fn get(&self) -> StoreFuture<'_, Option<SessionToken>>;

	/// Persists or replaces the stored token.
	fn set(&self, token: SessionToken) -> StoreFuture<'_, ()>;

	/// Removes the stored token.
	fn clear(&self) -> StoreFuture<'_, ()>;
}

/// Error type produced by [`SessionTokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;
	use std::error::Error as StdError;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "session storage unavailable".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("session storage unavailable"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
