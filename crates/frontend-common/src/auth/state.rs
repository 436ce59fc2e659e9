//! Observable authentication state

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use subsmania_http::client::MaybeSendSync;
use subsmania_http::types::UserProfile;
use subsmania_http::{SessionEndReason, SessionTerminator};

/// What the UI knows about the current session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserProfile>,
    pub is_logged_in: bool,
    pub is_admin: bool,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            is_logged_in: false,
            is_admin: false,
            loading: true, // Start with loading until the stored session is checked
        }
    }
}

/// Authentication state transitions
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AuthAction {
    /// Seeded from the cached profile at startup; loading is left as is
    Restored(Option<UserProfile>),
    LoggedIn(UserProfile),
    LoggedOut,
    SetLoading(bool),
}

impl AuthState {
    pub fn reduce(&self, action: AuthAction) -> Self {
        match action {
            AuthAction::Restored(user) => Self {
                is_logged_in: user.is_some(),
                is_admin: user.as_ref().is_some_and(UserProfile::is_admin),
                user,
                loading: self.loading,
            },
            AuthAction::LoggedIn(user) => Self {
                is_logged_in: true,
                is_admin: user.is_admin(),
                user: Some(user),
                loading: false,
            },
            AuthAction::LoggedOut => Self {
                user: None,
                is_logged_in: false,
                is_admin: false,
                loading: false,
            },
            AuthAction::SetLoading(loading) => Self {
                loading,
                ..self.clone()
            },
        }
    }
}

/// Called with the new state after every dispatch
pub trait AuthListener: MaybeSendSync {
    fn notify(&self, state: &AuthState);
}

impl<F> AuthListener for F
where
    F: Fn(&AuthState) + MaybeSendSync,
{
    fn notify(&self, state: &AuthState) {
        self(state);
    }
}

#[derive(Default)]
struct Shared {
    state: Mutex<AuthState>,
    listeners: Mutex<Vec<Arc<dyn AuthListener>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared, cloneable handle to the auth state
#[derive(Clone, Default)]
pub struct AuthHandle {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for AuthHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthHandle")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl AuthHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> AuthState {
        lock(&self.shared.state).clone()
    }

    /// Apply `action` and notify listeners; returns the new state
    pub fn dispatch(&self, action: AuthAction) -> AuthState {
        let next = {
            let mut state = lock(&self.shared.state);
            let next = state.reduce(action);
            *state = next.clone();
            next
        };

        // Listeners may dispatch again, so they run without any lock held
        let listeners = lock(&self.shared.listeners).clone();
        for listener in listeners {
            listener.notify(&next);
        }
        next
    }

    pub fn subscribe(&self, listener: impl AuthListener + 'static) {
        lock(&self.shared.listeners).push(Arc::new(listener));
    }

    /// Session-end hook that logs this state out before running `next`.
    ///
    /// `next` only runs when an established session died. A failed restore
    /// at startup, or a 401 on an anonymous visit, just leaves the state
    /// logged out.
    pub fn session_end_hook<T>(&self, next: T) -> SessionEndHook<T>
    where
        T: SessionTerminator,
    {
        SessionEndHook {
            auth: self.clone(),
            next,
        }
    }
}

/// See [`AuthHandle::session_end_hook`]
#[derive(Debug)]
pub struct SessionEndHook<T> {
    auth: AuthHandle,
    next: T,
}

impl<T: SessionTerminator> SessionTerminator for SessionEndHook<T> {
    fn terminate(&self, reason: &SessionEndReason) {
        let before = self.auth.snapshot();
        self.auth.dispatch(AuthAction::LoggedOut);
        if before.is_logged_in && !before.loading {
            self.next.terminate(reason);
        } else {
            debug!("Session ended before it was established: {reason}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use subsmania_http::types::Role;

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            member_id: 7,
            email: Some("kim@example.com".to_string()),
            name: "Kim".to_string(),
            role,
            image: None,
        }
    }

    #[test]
    fn test_starts_loading_and_logged_out() {
        let state = AuthState::default();
        assert!(state.loading);
        assert!(!state.is_logged_in);
        assert!(state.user.is_none());
    }

    #[test]
    fn test_restored_profile_keeps_loading() {
        let state = AuthState::default().reduce(AuthAction::Restored(Some(profile(Role::User))));
        assert!(state.is_logged_in);
        assert!(!state.is_admin);
        assert!(state.loading);

        let state = state.reduce(AuthAction::SetLoading(false));
        assert!(state.is_logged_in);
        assert!(!state.loading);
    }

    #[test]
    fn test_restored_without_profile_is_logged_out() {
        let state = AuthState::default().reduce(AuthAction::Restored(None));
        assert!(!state.is_logged_in);
        assert!(state.loading);
    }

    #[test]
    fn test_admin_role_sets_is_admin() {
        let state = AuthState::default().reduce(AuthAction::LoggedIn(profile(Role::Admin)));
        assert!(state.is_logged_in);
        assert!(state.is_admin);
        assert!(!state.loading);
    }

    #[test]
    fn test_logout_clears_everything() {
        let state = AuthState::default()
            .reduce(AuthAction::LoggedIn(profile(Role::Admin)))
            .reduce(AuthAction::LoggedOut);
        assert_eq!(
            state,
            AuthState {
                user: None,
                is_logged_in: false,
                is_admin: false,
                loading: false,
            }
        );
    }

    #[test]
    fn test_listeners_see_every_dispatch() {
        let auth = AuthHandle::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        auth.subscribe(move |state: &AuthState| sink.lock().unwrap().push(state.is_logged_in));

        auth.dispatch(AuthAction::LoggedIn(profile(Role::User)));
        auth.dispatch(AuthAction::LoggedOut);

        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_session_end_redirects_established_session() {
        let auth = AuthHandle::new();
        auth.dispatch(AuthAction::LoggedIn(profile(Role::User)));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let hook = auth.session_end_hook(move |_: &SessionEndReason| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        hook.terminate(&SessionEndReason::RefreshRejected { status: 401 });
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!auth.snapshot().is_logged_in);
    }

    #[test]
    fn test_session_end_during_restore_only_logs_out() {
        let auth = AuthHandle::new();
        auth.dispatch(AuthAction::Restored(Some(profile(Role::User))));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let hook = auth.session_end_hook(move |_: &SessionEndReason| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        hook.terminate(&SessionEndReason::TimedOut);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let state = auth.snapshot();
        assert!(!state.is_logged_in);
        assert!(!state.loading);
    }
}
