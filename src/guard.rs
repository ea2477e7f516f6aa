use std::sync::Arc;

use tokio::sync::watch;

use crate::session::Session;
use crate::store::CredentialStore;

/// Which modal the UI should present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    Login,
    Register,
}

/// Single-slot modal request channel, shared by the guard and the UI.
///
/// Same replace-on-open semantics as the notification channel: opening a
/// prompt displaces whatever was open before.
#[derive(Debug, Clone)]
pub struct PromptChannel {
    slot: Arc<watch::Sender<Option<Prompt>>>,
}

impl PromptChannel {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { slot: Arc::new(tx) }
    }

    pub fn open_login(&self) {
        self.slot.send_replace(Some(Prompt::Login));
    }

    pub fn open_register(&self) {
        self.slot.send_replace(Some(Prompt::Register));
    }

    pub fn close(&self) {
        self.slot.send_replace(None);
    }

    #[must_use]
    pub fn current(&self) -> Option<Prompt> {
        *self.slot.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Prompt>> {
        self.slot.subscribe()
    }
}

impl Default for PromptChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Session requirement attached to a route by the routing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    RequiresSession,
    RequiresElevated,
}

/// Outcome of a guard check. `Redirect` carries the route the transition
/// must be diverted to; the requested route must not be entered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect { to: String },
}

/// Pre-transition gate over the session state.
///
/// Checked before completing a transition into a guarded route: if the
/// requirement is unmet, the guard opens the login prompt and diverts the
/// transition to the fallback route. It never lets a guarded transition
/// complete while the requirement is unmet.
pub struct NavigationGuard<S> {
    session: Session<S>,
    prompts: PromptChannel,
    fallback_route: String,
}

impl<S: CredentialStore> NavigationGuard<S> {
    #[must_use]
    pub fn new(session: Session<S>, prompts: PromptChannel) -> Self {
        Self {
            session,
            prompts,
            fallback_route: "/".to_string(),
        }
    }

    /// Override the route unauthorized transitions are diverted to.
    #[must_use]
    pub fn with_fallback_route(mut self, route: impl Into<String>) -> Self {
        self.fallback_route = route.into();
        self
    }

    /// Decide whether a transition into a route with `access` may complete.
    #[must_use]
    pub fn check(&self, access: RouteAccess) -> GuardDecision {
        let met = match access {
            RouteAccess::Public => true,
            RouteAccess::RequiresSession => self.session.is_logged_in(),
            RouteAccess::RequiresElevated => self.session.is_elevated(),
        };
        if met {
            return GuardDecision::Allow;
        }

        tracing::debug!(?access, "blocked route transition, requesting login");
        self.prompts.open_login();
        GuardDecision::Redirect {
            to: self.fallback_route.clone(),
        }
    }
}
