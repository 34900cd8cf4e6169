use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::api::{ApiClient, ApiError};
use crate::models::{Envelope, Lead, LeadPage, LeadQuery, LeadUpdate, SearchRequest, UserInfo};
use crate::sync::LeadsBackend;

impl<T> Envelope<T> {
    /// Turns `success: false` into [`ApiError::Rejected`].
    pub fn into_result(self) -> Result<Self, ApiError> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Rejected(self.message))
        }
    }
}

impl Envelope<Vec<Lead>> {
    pub fn into_page(self) -> Result<LeadPage, ApiError> {
        let envelope = self.into_result()?;
        Ok(LeadPage {
            leads: envelope.data.unwrap_or_default(),
            pagination: envelope.pagination,
            total: envelope.total,
        })
    }
}

impl ApiClient {
    async fn lookup<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let envelope: Envelope<Vec<T>> = self.get(path).await?;
        Ok(envelope.into_result()?.data.unwrap_or_default())
    }

    async fn lookup_for<T: DeserializeOwned>(&self, path: &str, callby: Option<&str>) -> Result<Vec<T>, ApiError> {
        let envelope: Envelope<Vec<T>> = self
            .get_with_query(path, &[("callBy", callby.unwrap_or(""))])
            .await?;
        Ok(envelope.into_result()?.data.unwrap_or_default())
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl LeadsBackend for ApiClient {
    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage, ApiError> {
        let envelope: Envelope<Vec<Lead>> = self.get_with_query("/leads/", query).await?;
        envelope.into_page()
    }

    async fn search_leads(&self, request: &SearchRequest) -> Result<LeadPage, ApiError> {
        let envelope: Envelope<Vec<Lead>> = self.post("/leads/search", request).await?;
        envelope.into_page()
    }

    async fn update_lead(&self, id: &str, update: &LeadUpdate) -> Result<Option<String>, ApiError> {
        let envelope: Envelope<serde_json::Value> = self.put_item("/leads", id, update).await?;
        Ok(envelope.into_result()?.message)
    }

    async fn call_statuses(&self, callby: Option<&str>) -> Result<Vec<String>, ApiError> {
        self.lookup_for("/leads/call-statuses", callby).await
    }

    async fn all_call_statuses(&self) -> Result<Vec<String>, ApiError> {
        self.lookup("/leads/allCallStatus").await
    }

    async fn product_names(&self, callby: Option<&str>) -> Result<Vec<String>, ApiError> {
        self.lookup_for("/leads/products-name", callby).await
    }

    async fn budgets(&self) -> Result<Vec<String>, ApiError> {
        self.lookup("/leads/allBudgetsList").await
    }

    async fn unit_types(&self) -> Result<Vec<String>, ApiError> {
        self.lookup("/leads/allUnitslist").await
    }

    async fn team_leads(&self) -> Result<Vec<UserInfo>, ApiError> {
        self.lookup("/users/tl").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_envelope_keeps_server_message() {
        let envelope: Envelope<Vec<Lead>> = serde_json::from_value(serde_json::json!({
            "success": false,
            "message": "Lead list unavailable"
        }))
        .unwrap();

        let err = envelope.into_page().unwrap_err();
        assert_eq!(err, ApiError::Rejected(Some("Lead list unavailable".into())));
        assert_eq!(err.server_message(), Some("Lead list unavailable"));
    }

    #[test]
    fn test_page_keeps_legacy_total() {
        let envelope: Envelope<Vec<Lead>> = serde_json::from_value(serde_json::json!({
            "success": true,
            "data": [{"_id": "a1"}, {"_id": "a2"}],
            "total": 42
        }))
        .unwrap();

        let page = envelope.into_page().unwrap();
        assert_eq!(page.leads.len(), 2);
        assert_eq!(page.total, Some(42));
        assert!(page.pagination.is_none());
    }
}
