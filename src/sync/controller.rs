//! [`LeadSync`]: one service behind every lead dashboard.
//!
//! The admin, team-lead and user dashboards differ only in whose leads they
//! list, so they share this type and pass a [`DashboardScope`].
//!
//! Life cycle: `Idle -> InitialLoading -> Ready <-> Fetching`. Filter, page
//! and search changes move `Ready -> Fetching -> Ready`. A fetch that gets
//! superseded leaves state untouched; the newer one owns the phase.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::cache::{CacheKey, Clock, Resource, ResponseCache, SystemClock};
use super::canceller::{RequestCanceller, RequestTicket};
use super::debounce::Debouncer;
use super::filters::{product_options, Choice, FilterState, SearchState};
use super::pagination::Pagination;
use super::{LeadsBackend, SyncError, SyncOptions};
use crate::api::ApiError;
use crate::models::{Lead, LeadPage, LeadUpdate, UserInfo, UserRole};

const FETCH_FAILED: &str = "Failed to fetch leads";
const SEARCH_FAILED: &str = "Failed to search leads";
const UPDATE_FAILED: &str = "Failed to update lead";
const UPDATE_OK: &str = "Lead updated successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Idle,
    InitialLoading,
    Ready,
    Fetching,
}

/// Whose leads a dashboard shows. Maps to the `callby` query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardScope {
    /// Admin view over every lead.
    All,
    /// Team lead view over their team's leads.
    Team(String),
    /// A user's own leads.
    Own(String),
}

impl DashboardScope {
    pub fn for_user(user: &UserInfo) -> Self {
        match user.role {
            UserRole::Admin => DashboardScope::All,
            UserRole::TeamLead => DashboardScope::Team(user.username.clone()),
            UserRole::User => DashboardScope::Own(user.username.clone()),
        }
    }

    pub fn callby(&self) -> Option<&str> {
        match self {
            DashboardScope::All => None,
            DashboardScope::Team(name) | DashboardScope::Own(name) => Some(name),
        }
    }
}

/// Reference data for dropdowns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookups {
    pub call_statuses: Vec<String>,
    pub all_call_statuses: Vec<String>,
    pub products: Vec<String>,
    pub budgets: Vec<String>,
    pub unit_types: Vec<String>,
    pub team_leads: Vec<UserInfo>,
}

/// Everything a dashboard needs to render, published after each change.
#[derive(Debug, Clone, PartialEq)]
pub struct LeadsSnapshot {
    pub phase: SyncPhase,
    /// The list to render: filtered search results while searching,
    /// otherwise the fetched page.
    pub leads: Vec<Lead>,
    pub searching: bool,
    pub filters: FilterState,
    pub search: SearchState,
    pub pagination: Pagination,
    pub product_options: Vec<String>,
    pub lookups: Lookups,
    pub error: Option<String>,
    pub notice: Option<String>,
}

struct SyncState {
    phase: SyncPhase,
    filters: FilterState,
    search: SearchState,
    search_results: Option<Vec<Lead>>,
    leads: Vec<Lead>,
    pagination: Pagination,
    /// Page asked for by the newest request; becomes `pagination.current_page`
    /// once that request succeeds.
    requested_page: u32,
    product_options: Vec<String>,
    lookups: Lookups,
    error: Option<String>,
    notice: Option<String>,
}

impl SyncState {
    fn new(page_size: u32) -> Self {
        SyncState {
            phase: SyncPhase::Idle,
            filters: FilterState::default(),
            search: SearchState::default(),
            search_results: None,
            leads: Vec::new(),
            pagination: Pagination::new(page_size),
            requested_page: 1,
            product_options: Vec::new(),
            lookups: Lookups::default(),
            error: None,
            notice: None,
        }
    }

    fn loaded(&self) -> &[Lead] {
        self.search_results.as_deref().unwrap_or(&self.leads)
    }

    fn snapshot(&self) -> LeadsSnapshot {
        let leads = match &self.search_results {
            Some(results) => self.filters.apply(results),
            None => self.leads.clone(),
        };
        LeadsSnapshot {
            phase: self.phase,
            leads,
            searching: self.search_results.is_some(),
            filters: self.filters.clone(),
            search: self.search.clone(),
            pagination: self.pagination,
            product_options: self.product_options.clone(),
            lookups: self.lookups.clone(),
            error: self.error.clone(),
            notice: self.notice.clone(),
        }
    }

    fn apply_page(&mut self, page: &LeadPage) {
        self.pagination.update_from_server(
            page.pagination.as_ref(),
            page.total,
            page.leads.len(),
            self.requested_page,
        );
        self.requested_page = self.pagination.current_page;
    }

    /// Product choices for the current status, taken from what is loaded now.
    fn refresh_product_options(&mut self) {
        self.product_options = product_options(
            &self.filters.call_status,
            self.loaded(),
            &self.lookups.products,
        );
    }

    fn restart_paging(&mut self) {
        self.pagination.reset();
        self.requested_page = 1;
    }
}

#[derive(Clone, Copy)]
enum Window {
    Filters,
    MobileSearch,
}

#[derive(Clone)]
pub struct LeadSync {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn LeadsBackend>,
    scope: DashboardScope,
    options: SyncOptions,
    state: Mutex<SyncState>,
    cache: Mutex<ResponseCache>,
    canceller: RequestCanceller,
    filter_debounce: Debouncer,
    search_debounce: Debouncer,
    updates: watch::Sender<LeadsSnapshot>,
}

impl LeadSync {
    pub fn new(backend: Arc<dyn LeadsBackend>, scope: DashboardScope, options: SyncOptions) -> Self {
        Self::with_clock(backend, scope, options, Arc::new(SystemClock))
    }

    pub fn with_clock(
        backend: Arc<dyn LeadsBackend>,
        scope: DashboardScope,
        options: SyncOptions,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let state = SyncState::new(options.page_size);
        let (updates, _) = watch::channel(state.snapshot());
        LeadSync {
            inner: Arc::new(Inner {
                backend,
                scope,
                options,
                state: Mutex::new(state),
                cache: Mutex::new(ResponseCache::new(options.cache_ttl, clock)),
                canceller: RequestCanceller::new(),
                filter_debounce: Debouncer::new(),
                search_debounce: Debouncer::new(),
                updates,
            }),
        }
    }

    pub fn scope(&self) -> &DashboardScope {
        &self.inner.scope
    }

    pub fn snapshot(&self) -> LeadsSnapshot {
        self.lock_state().snapshot()
    }

    /// Receiver that sees a new snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<LeadsSnapshot> {
        self.inner.updates.subscribe()
    }

    /// First load: lookups, then the first page.
    pub async fn load(&self) -> Result<(), SyncError> {
        {
            let mut state = self.lock_state();
            state.phase = SyncPhase::InitialLoading;
            self.publish(&state);
        }
        info!(scope = ?self.inner.scope, "Loading lead dashboard");
        self.load_lookups().await;
        self.refresh().await
    }

    /// Re-runs whichever query is active: the search while search results
    /// are shown, the filtered listing otherwise.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let searching = self.lock_state().search_results.is_some();
        if searching {
            self.run_search().await
        } else {
            self.fetch_leads().await
        }
    }

    pub fn set_call_status(&self, status: Choice) {
        let mut state = self.lock_state();
        if !state.filters.set_call_status(status) {
            return;
        }
        state.refresh_product_options();
        self.filters_changed(state, Window::Filters);
    }

    pub fn set_product(&self, product: Choice) {
        let mut state = self.lock_state();
        if state.filters.set_product_name(product) {
            self.filters_changed(state, Window::Filters);
        }
    }

    pub fn set_date_range(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        let mut state = self.lock_state();
        if state.filters.set_date_range(start, end) {
            self.filters_changed(state, Window::Filters);
        }
    }

    pub fn set_mobile_search(&self, term: &str) {
        let mut state = self.lock_state();
        if state.filters.set_mobile_search(term) {
            self.filters_changed(state, Window::MobileSearch);
        }
    }

    /// Goes to `page` right away (no debounce). Out-of-range pages are clamped.
    pub async fn set_page(&self, page: u32) -> Result<(), SyncError> {
        {
            let mut state = self.lock_state();
            let target = state.pagination.clamp(page);
            if target == state.requested_page {
                return Ok(());
            }
            state.requested_page = target;
        }
        self.refresh().await
    }

    pub async fn next_page(&self) -> Result<(), SyncError> {
        let page = self.lock_state().requested_page.saturating_add(1);
        self.set_page(page).await
    }

    pub async fn prev_page(&self) -> Result<(), SyncError> {
        let page = self.lock_state().requested_page.saturating_sub(1);
        self.set_page(page).await
    }

    /// Name / contact search. Results replace the listing until
    /// [`clear_search`](Self::clear_search); an empty search clears.
    pub async fn search(&self, name: &str, contact_number: &str) -> Result<(), SyncError> {
        let search = SearchState::new(name, contact_number);
        if search.is_empty() {
            return self.clear_search().await;
        }
        self.cancel_pending();
        {
            let mut state = self.lock_state();
            state.search = search;
            state.restart_paging();
        }
        self.run_search().await
    }

    pub async fn clear_search(&self) -> Result<(), SyncError> {
        self.cancel_pending();
        {
            let mut state = self.lock_state();
            state.search = SearchState::default();
            state.search_results = None;
            state.restart_paging();
            self.publish(&state);
        }
        self.fetch_leads().await
    }

    /// Validates and saves an edit, then reloads what the edit may have changed.
    /// Errors only when the edit was not saved.
    pub async fn submit_edit(&self, id: &str, update: LeadUpdate) -> Result<(), SyncError> {
        if let Err(e) = update.validate() {
            let err = SyncError::from(e);
            self.report(&err, UPDATE_FAILED);
            return Err(err);
        }

        match self.inner.backend.update_lead(id, &update).await {
            Ok(message) => {
                {
                    let mut cache = self.lock_cache();
                    let dropped = cache.invalidate(Resource::Leads)
                        + cache.invalidate(Resource::CallStatuses)
                        + cache.invalidate(Resource::AllCallStatuses);
                    debug!(dropped, "Invalidated lead caches after edit");
                }
                {
                    let mut state = self.lock_state();
                    state.error = None;
                    state.notice = Some(message.unwrap_or_else(|| UPDATE_OK.to_string()));
                    self.publish(&state);
                }
                info!(lead_id = id, "Lead updated");
                self.load_lookups().await;
                // Saved either way; a failed reload is already on the banner.
                let _ = self.refresh().await;
                Ok(())
            }
            Err(e) => {
                let err = SyncError::from(e);
                self.report(&err, UPDATE_FAILED);
                Err(err)
            }
        }
    }

    pub fn clear_error(&self) {
        let mut state = self.lock_state();
        if state.error.take().is_some() {
            self.publish(&state);
        }
    }

    pub fn clear_notice(&self) {
        let mut state = self.lock_state();
        if state.notice.take().is_some() {
            self.publish(&state);
        }
    }

    /// Abandons in-flight requests and pending debounced fetches.
    pub fn shutdown(&self) {
        self.inner.canceller.cancel_all();
        self.cancel_pending();
        debug!(scope = ?self.inner.scope, "Lead dashboard shut down");
    }

    /// Drops debounced fetches that were armed for the previous mode.
    fn cancel_pending(&self) {
        self.inner.filter_debounce.cancel();
        self.inner.search_debounce.cancel();
    }

    fn filters_changed(&self, mut state: MutexGuard<'_, SyncState>, window: Window) {
        let searching = state.search_results.is_some();
        if searching {
            // Search results are filtered in memory. Off page 1, the search
            // itself goes back to page 1; the shown page changes once those
            // results arrive.
            let on_first_page = state.requested_page == 1 && state.pagination.current_page == 1;
            self.publish(&state);
            if on_first_page {
                return;
            }
            state.requested_page = 1;
        } else {
            state.restart_paging();
            self.publish(&state);
        }
        drop(state);

        let (debouncer, delay) = match window {
            Window::Filters => (&self.inner.filter_debounce, self.inner.options.filter_debounce),
            Window::MobileSearch => (&self.inner.search_debounce, self.inner.options.search_debounce),
        };
        let this = self.clone();
        debouncer.schedule(delay, move || async move {
            let _ = if searching {
                this.run_search().await
            } else {
                this.fetch_leads().await
            };
        });
    }

    async fn fetch_leads(&self) -> Result<(), SyncError> {
        let query = {
            let state = self.lock_state();
            state.filters.to_query(
                self.inner.scope.callby().unwrap_or(""),
                state.requested_page,
                self.inner.options.page_size,
            )
        };
        let key = CacheKey::new(Resource::Leads, query.fingerprint());

        let ticket = self.inner.canceller.begin();
        let cached: Option<LeadPage> = self.lock_cache().get_fresh(&key);
        let result = match cached {
            Some(page) => {
                debug!(query = %key.params, "Serving leads from cache");
                Ok(page)
            }
            None => {
                self.mark_fetching();
                let result = self
                    .inner
                    .canceller
                    .run(&ticket, self.inner.backend.list_leads(&query))
                    .await;
                if let Ok(page) = &result {
                    self.lock_cache().put(key, page);
                }
                result
            }
        };

        self.settle(&ticket, result, FETCH_FAILED, |state, page| {
            state.apply_page(&page);
            state.leads = page.leads;
            state.refresh_product_options();
        })
    }

    async fn run_search(&self) -> Result<(), SyncError> {
        let request = {
            let state = self.lock_state();
            state.search.to_request(state.requested_page, self.inner.options.page_size)
        };

        let ticket = self.inner.canceller.begin();
        self.mark_fetching();
        let result = self
            .inner
            .canceller
            .run(&ticket, self.inner.backend.search_leads(&request))
            .await;

        self.settle(&ticket, result, SEARCH_FAILED, |state, page| {
            state.apply_page(&page);
            state.search_results = Some(page.leads);
            state.refresh_product_options();
        })
    }

    /// Applies a finished request, unless a newer one has started since.
    fn settle<T>(
        &self,
        ticket: &RequestTicket,
        result: Result<T, SyncError>,
        fallback: &str,
        apply: impl FnOnce(&mut SyncState, T),
    ) -> Result<(), SyncError> {
        let mut state = self.lock_state();
        if !self.inner.canceller.is_current(ticket) {
            debug!(generation = ticket.generation(), "Dropping superseded response");
            return Ok(());
        }

        match result {
            Ok(value) => {
                apply(&mut *state, value);
                state.error = None;
                state.phase = SyncPhase::Ready;
                self.publish(&state);
                Ok(())
            }
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => {
                warn!("{}: {}", fallback, e);
                state.error = Some(e.banner_message(fallback));
                state.phase = SyncPhase::Ready;
                // The page we tried to reach was never shown.
                state.requested_page = state.pagination.current_page;
                self.publish(&state);
                Err(e)
            }
        }
    }

    fn report(&self, err: &SyncError, fallback: &str) {
        warn!("{}: {}", fallback, err);
        let mut state = self.lock_state();
        state.error = Some(err.banner_message(fallback));
        self.publish(&state);
    }

    fn mark_fetching(&self) {
        let mut state = self.lock_state();
        if state.phase != SyncPhase::InitialLoading && state.phase != SyncPhase::Fetching {
            state.phase = SyncPhase::Fetching;
            self.publish(&state);
        }
    }

    async fn load_lookups(&self) {
        let backend = &self.inner.backend;
        let callby = self.inner.scope.callby();
        let params = callby.unwrap_or("").to_string();
        let is_admin = self.inner.scope == DashboardScope::All;

        let (statuses, all_statuses, products, budgets, units, team_leads) = futures::join!(
            self.cached(CacheKey::new(Resource::CallStatuses, params.clone()), backend.call_statuses(callby)),
            self.cached(CacheKey::new(Resource::AllCallStatuses, ""), backend.all_call_statuses()),
            self.cached(CacheKey::new(Resource::Products, params.clone()), backend.product_names(callby)),
            self.cached(CacheKey::new(Resource::Budgets, ""), backend.budgets()),
            self.cached(CacheKey::new(Resource::UnitTypes, ""), backend.unit_types()),
            async {
                if is_admin {
                    self.cached(CacheKey::new(Resource::TeamLeads, ""), backend.team_leads()).await
                } else {
                    Ok(Vec::new())
                }
            },
        );

        let mut state = self.lock_state();
        let lookups = &mut state.lookups;
        keep_or_log(&mut lookups.call_statuses, statuses, "call statuses");
        keep_or_log(&mut lookups.all_call_statuses, all_statuses, "all call statuses");
        keep_or_log(&mut lookups.products, products, "product names");
        keep_or_log(&mut lookups.budgets, budgets, "budgets");
        keep_or_log(&mut lookups.unit_types, units, "unit types");
        keep_or_log(&mut lookups.team_leads, team_leads, "team leads");
        state.refresh_product_options();
        self.publish(&state);
    }

    async fn cached<T, Fut>(&self, key: CacheKey, fetch: Fut) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let hit: Option<T> = self.lock_cache().get_fresh(&key);
        if let Some(value) = hit {
            debug!(resource = ?key.resource, "Lookup cache hit");
            return Ok(value);
        }
        let value = fetch.await?;
        self.lock_cache().put(key, &value);
        Ok(value)
    }

    fn publish(&self, state: &SyncState) {
        self.inner.updates.send_replace(state.snapshot());
    }

    fn lock_state(&self) -> MutexGuard<'_, SyncState> {
        self.inner.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn lock_cache(&self) -> MutexGuard<'_, ResponseCache> {
        self.inner.cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

fn keep_or_log<T>(slot: &mut Vec<T>, result: Result<Vec<T>, ApiError>, what: &str) {
    match result {
        Ok(values) => *slot = values,
        Err(e) => warn!("Failed to load {}: {}", what, e),
    }
}

impl std::fmt::Debug for LeadSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadSync")
            .field("scope", &self.inner.scope)
            .finish_non_exhaustive()
    }
}
