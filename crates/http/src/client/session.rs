//! Session-termination hook

use super::MaybeSendSync;
use crate::error::SessionEndReason;

/// Invoked once when the client gives up on a session.
///
/// Credentials are already cleared when this runs. Browser builds typically
/// navigate to the login page here; other hosts may run their own logout
/// routine instead.
pub trait SessionTerminator: MaybeSendSync {
    fn terminate(&self, reason: &SessionEndReason);
}

impl<F> SessionTerminator for F
where
    F: Fn(&SessionEndReason) + MaybeSendSync,
{
    fn terminate(&self, reason: &SessionEndReason) {
        self(reason);
    }
}

/// Default hook: only records that the session ended
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTermination;

impl SessionTerminator for LogTermination {
    fn terminate(&self, reason: &SessionEndReason) {
        warn!("Session ended without a termination hook: {reason}");
    }
}
