use dioxus::prelude::*;
use crate::api::session::Session;
use crate::models::{UserInfo, UserRole};
use crate::sync::DashboardScope;

/// Global authentication state, seeded from any saved session
pub static AUTH_STATE: GlobalSignal<AuthState> = Signal::global(AuthState::restore);

#[derive(Clone, Default)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    pub token: Option<String>,
}

impl AuthState {
    fn restore() -> Self {
        match crate::api::auth::restore_session() {
            Some(session) => {
                tracing::info!(username = %session.user.username, "Restored saved session");
                AuthState {
                    user: Some(session.user),
                    token: Some(session.token),
                }
            }
            None => AuthState::default(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(UserRole::Admin)
    }

    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    /// Which leads the signed-in user's dashboard lists.
    pub fn dashboard_scope(&self) -> Option<DashboardScope> {
        self.user.as_ref().map(DashboardScope::for_user)
    }
}

pub fn set_auth(session: Session) {
    let mut state = AUTH_STATE.write();
    state.user = Some(session.user);
    state.token = Some(session.token);
}

pub fn clear_auth() {
    let mut state = AUTH_STATE.write();
    state.user = None;
    state.token = None;
}
