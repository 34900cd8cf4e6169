use crate::api::session::Session;
use crate::api::{api_client, ApiError};
use crate::models::{LoginRequest, LoginResponse};

pub async fn login(username: &str, password: &str) -> Result<Session, ApiError> {
    let request = LoginRequest {
        username: username.to_string(),
        password: password.to_string(),
    };

    let response: LoginResponse = api_client()
        .post("/users/login", &request)
        .await?;

    if !response.success {
        return Err(ApiError::Rejected(response.message));
    }

    let (Some(token), Some(user)) = (response.token, response.user) else {
        return Err(ApiError::Parse("login response is missing token or user".to_string()));
    };

    let session = Session { token, user };

    // Persist the session so every later request (and the next start) sees it
    api_client().sessions().save(Some(&session));
    tracing::info!(username = %session.user.username, role = session.user.role.as_str(), "Logged in");

    Ok(session)
}

pub async fn logout() {
    api_client().sessions().save(None);
}

/// Session left over from a previous run, if any.
pub fn restore_session() -> Option<Session> {
    api_client().sessions().load()
}
