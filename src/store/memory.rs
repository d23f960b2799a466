//! Thread-safe in-memory [`SessionTokenStore`], the session-scoped default.

// self
use crate::{
	_prelude::*,
	auth::SessionToken,
	store::{SessionTokenStore, StoreFuture},
};

type Slot = Arc<RwLock<Option<SessionToken>>>;

/// Single-slot token store that lives as long as the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Slot);
impl MemoryStore {
	/// Creates a store pre-populated with `token`.
	pub fn with_token(token: SessionToken) -> Self {
		Self(Arc::new(RwLock::new(Some(token))))
	}

	/// Returns the stored token without going through the async contract.
	pub fn snapshot(&self) -> Option<SessionToken> {
		self.0.read().clone()
	}
}
impl SessionTokenStore for MemoryStore {
	fn get(&self) -> StoreFuture<'_, Option<SessionToken>> {
		let slot = self.0.clone();

		Box::pin(async move { Ok(slot.read().clone()) })
	}

	fn set(&self, token: SessionToken) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			*slot.write() = Some(token);

			Ok(())
		})
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		let slot = self.0.clone();

		Box::pin(async move {
			slot.write().take();

			Ok(())
		})
	}
}
