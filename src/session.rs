use std::sync::Arc;

use crate::store::CredentialStore;
use crate::types::UserProfile;

/// Read-only session state derived from a shared credential store.
///
/// Every accessor recomputes from the store, so the answer is always
/// current with respect to logins, logouts and token renewals performed
/// through the same store — nothing is cached here.
pub struct Session<S> {
    store: Arc<S>,
}

// Manual Clone: avoid derive adding an `S: Clone` bound.
impl<S> Clone for Session<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: CredentialStore> Session<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// True iff a user profile is held.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.store.get().is_logged_in()
    }

    /// True iff logged in with the superuser flag set.
    #[must_use]
    pub fn is_elevated(&self) -> bool {
        self.store.get().is_elevated()
    }

    /// Snapshot of the current user profile, if any.
    #[must_use]
    pub fn profile(&self) -> Option<UserProfile> {
        self.store.get().into_parts().map(|(profile, _, _)| profile)
    }
}
