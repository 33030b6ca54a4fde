use storefront_auth::{Session, SessionUser};

/// Session context for a request.
///
/// Inserted by the session middleware on every request; anonymous when no
/// valid session cookie was presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.session.as_ref().map(|s| &s.user)
    }
}
