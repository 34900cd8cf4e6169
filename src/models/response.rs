use serde::{Deserialize, Serialize};

use super::Lead;

/// Common `{ success, data, message, ... }` wrapper used by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pagination: Option<PaginationBlock>,
    /// Legacy total count sent by endpoints without a pagination block.
    #[serde(default)]
    pub total: Option<u64>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationBlock {
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    #[serde(rename = "totalItems")]
    pub total_items: u64,
    #[serde(rename = "itemsPerPage")]
    pub items_per_page: u32,
}

/// One page of leads as returned by the listing or search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LeadPage {
    pub leads: Vec<Lead>,
    pub pagination: Option<PaginationBlock>,
    pub total: Option<u64>,
}

/// Query string for `GET /leads/`. Every key is always sent, `All` included.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct LeadQuery {
    pub callby: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    pub page: u32,
    pub limit: u32,
    #[serde(rename = "callStatus")]
    pub call_status: String,
    #[serde(rename = "productname")]
    pub product_name: String,
    #[serde(rename = "mobileSearch")]
    pub mobile_search: String,
}

impl LeadQuery {
    /// Stable representation used as the cache key parameter.
    pub fn fingerprint(&self) -> String {
        format!(
            "callby={}&startDate={}&endDate={}&page={}&limit={}&callStatus={}&productname={}&mobileSearch={}",
            self.callby,
            self.start_date,
            self.end_date,
            self.page,
            self.limit,
            self.call_status,
            self.product_name,
            self.mobile_search,
        )
    }
}

/// Body of `POST /leads/search`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct SearchRequest {
    pub name: String,
    #[serde(rename = "contactNumber")]
    pub contact_number: String,
    pub page: u32,
    pub limit: u32,
}
