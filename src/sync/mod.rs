//! Lead synchronization layer.
//!
//! One [`LeadSync`] per dashboard keeps a page of leads, the filter and search
//! state, and the pagination counters consistent with the backend while the
//! user clicks around. The pieces underneath are small on purpose:
//!
//! - [`cache`]: response cache with a freshness window and tag invalidation
//! - [`debounce`]: coalesces bursts of filter changes into one fetch
//! - [`canceller`]: newest request wins, superseded ones are dropped silently
//! - [`filters`] / [`pagination`]: pure state with the reset rules
//! - [`controller`]: the service wiring them to a [`LeadsBackend`]

pub mod cache;
pub mod canceller;
pub mod controller;
pub mod debounce;
pub mod filters;
pub mod pagination;
pub mod runtime;

#[cfg(all(test, not(target_arch = "wasm32")))]
mod http_tests;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::api::ApiError;
use crate::models::{LeadPage, LeadQuery, LeadUpdate, SearchRequest, UserInfo, ValidationError};

pub use cache::{CacheKey, Clock, Resource, ResponseCache, SystemClock};
pub use canceller::{RequestCanceller, RequestTicket};
pub use controller::{DashboardScope, LeadSync, LeadsSnapshot, Lookups, SyncPhase};
pub use debounce::Debouncer;
pub use filters::{Choice, FilterState, SearchState};
pub use pagination::Pagination;

pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(300);
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(800);
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A newer request replaced this one before it finished.
    #[error("Request superseded")]
    Cancelled,
}

impl SyncError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SyncError::Cancelled)
    }

    /// Text for the error banner: the server's own message when it sent one,
    /// otherwise `fallback`.
    pub fn banner_message(&self, fallback: &str) -> String {
        match self {
            SyncError::Validation(e) => e.to_string(),
            SyncError::Api(e) => e.server_message().unwrap_or(fallback).to_string(),
            SyncError::Cancelled => fallback.to_string(),
        }
    }
}

/// Timing and paging knobs for a [`LeadSync`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub page_size: u32,
    pub cache_ttl: Duration,
    pub filter_debounce: Duration,
    pub search_debounce: Duration,
}

impl Default for SyncOptions {
    fn default() -> Self {
        SyncOptions {
            page_size: DEFAULT_PAGE_SIZE,
            cache_ttl: CACHE_TTL,
            filter_debounce: FILTER_DEBOUNCE,
            search_debounce: SEARCH_DEBOUNCE,
        }
    }
}

/// Everything the sync layer needs from the leads REST API.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait LeadsBackend: Send + Sync {
    async fn list_leads(&self, query: &LeadQuery) -> Result<LeadPage, ApiError>;

    async fn search_leads(&self, request: &SearchRequest) -> Result<LeadPage, ApiError>;

    /// Returns the server's confirmation message, if it sent one.
    async fn update_lead(&self, id: &str, update: &LeadUpdate) -> Result<Option<String>, ApiError>;

    async fn call_statuses(&self, callby: Option<&str>) -> Result<Vec<String>, ApiError>;

    async fn all_call_statuses(&self) -> Result<Vec<String>, ApiError>;

    async fn product_names(&self, callby: Option<&str>) -> Result<Vec<String>, ApiError>;

    async fn budgets(&self) -> Result<Vec<String>, ApiError>;

    async fn unit_types(&self) -> Result<Vec<String>, ApiError>;

    async fn team_leads(&self) -> Result<Vec<UserInfo>, ApiError>;
}
