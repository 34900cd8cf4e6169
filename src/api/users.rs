use crate::api::{api_client, ApiError};
use crate::models::{Envelope, UserInfo};

/// Every account, for the admin user-management screen.
pub async fn get_all_users() -> Result<Vec<UserInfo>, ApiError> {
    let envelope: Envelope<Vec<UserInfo>> = api_client().get("/users/").await?;
    Ok(envelope.into_result()?.data.unwrap_or_default())
}
