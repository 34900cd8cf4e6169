use std::sync::Arc;

use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::api::api_client;
use crate::components::common::{ErrorBanner, LoadingSpinner};
use crate::components::leads::{FilterBar, LeadDetails, LeadEditForm, LeadTable, PaginationBar, SearchBar};
use crate::config::app_config;
use crate::models::{Lead, LeadUpdate};
use crate::state::{show_notification, NotificationType};
use crate::sync::{Choice, DashboardScope, LeadSync, LeadsBackend, SyncPhase};

#[derive(Clone, PartialEq)]
enum LeadModal {
    View(Lead),
    Edit(Lead),
}

fn title(scope: &DashboardScope) -> &'static str {
    match scope {
        DashboardScope::All => "All Leads",
        DashboardScope::Team(_) => "Team Leads",
        DashboardScope::Own(_) => "My Leads",
    }
}

/// The lead dashboard for one scope. Owns a [`LeadSync`] for as long as it
/// is mounted and re-renders from its snapshots.
#[component]
pub fn LeadDashboard(scope: DashboardScope) -> Element {
    let sync = use_hook(|| {
        let backend: Arc<dyn LeadsBackend> = Arc::new(api_client().clone());
        LeadSync::new(backend, scope.clone(), app_config().sync)
    });
    let mut snapshot = use_signal(|| sync.snapshot());
    let mut modal = use_signal(|| None::<LeadModal>);
    let mut saving = use_signal(|| false);

    // Mirror every published snapshot into the signal, then start loading
    use_hook(|| {
        let mut updates = sync.subscribe();
        let watcher = sync.clone();
        spawn(async move {
            while updates.changed().await.is_ok() {
                let next = updates.borrow_and_update().clone();
                if let Some(notice) = &next.notice {
                    show_notification(notice, NotificationType::Success);
                    watcher.clear_notice();
                }
                snapshot.set(next);
            }
        });

        let loader = sync.clone();
        spawn(async move {
            let _ = loader.load().await;
        });
    });

    use_drop({
        let sync = sync.clone();
        move || sync.shutdown()
    });

    let on_call_status = {
        let sync = sync.clone();
        move |status: Choice| sync.set_call_status(status)
    };
    let on_product = {
        let sync = sync.clone();
        move |product: Choice| sync.set_product(product)
    };
    let on_date_range = {
        let sync = sync.clone();
        move |(start, end): (Option<NaiveDate>, Option<NaiveDate>)| sync.set_date_range(start, end)
    };
    let on_mobile_search = {
        let sync = sync.clone();
        move |term: String| sync.set_mobile_search(&term)
    };
    let on_search = {
        let sync = sync.clone();
        move |(name, contact): (String, String)| {
            let sync = sync.clone();
            spawn(async move {
                let _ = sync.search(&name, &contact).await;
            });
        }
    };
    let on_clear_search = {
        let sync = sync.clone();
        move |_: ()| {
            let sync = sync.clone();
            spawn(async move {
                let _ = sync.clear_search().await;
            });
        }
    };
    let on_page = {
        let sync = sync.clone();
        move |page: u32| {
            let sync = sync.clone();
            spawn(async move {
                let _ = sync.set_page(page).await;
            });
        }
    };
    let on_dismiss_error = {
        let sync = sync.clone();
        move |_: ()| sync.clear_error()
    };
    let on_submit_edit = {
        let sync = sync.clone();
        move |update: LeadUpdate| {
            let Some(LeadModal::Edit(lead)) = modal() else {
                return;
            };
            let sync = sync.clone();
            saving.set(true);
            spawn(async move {
                if sync.submit_edit(&lead.id, update).await.is_ok() {
                    modal.set(None);
                }
                saving.set(false);
            });
        }
    };

    let current = snapshot.read().clone();
    let busy = matches!(current.phase, SyncPhase::Fetching | SyncPhase::InitialLoading);
    let edit_statuses = if current.lookups.all_call_statuses.is_empty() {
        current.lookups.call_statuses.clone()
    } else {
        current.lookups.all_call_statuses.clone()
    };
    let team_leads = if sync.scope() == &DashboardScope::All {
        current.lookups.team_leads.clone()
    } else {
        Vec::new()
    };

    rsx! {
        div { class: "flex-1 flex flex-col overflow-hidden",
            // Header
            div { class: "flex items-center justify-between p-4 border-b bg-white",
                h2 { class: "text-xl font-semibold", "{title(&scope)}" }
                div { class: "flex items-center gap-3",
                    if current.phase == SyncPhase::Fetching {
                        span { class: "text-sm text-gray-400", "Updating..." }
                    }
                    if current.searching {
                        span { class: "text-sm text-blue-600", "Search results" }
                    }
                    span { class: "text-sm text-gray-500", "{current.pagination.total_items} leads" }
                }
            }

            if let Some(message) = current.error.clone() {
                div { class: "px-4 pt-4",
                    ErrorBanner { message: message, on_dismiss: on_dismiss_error }
                }
            }

            FilterBar {
                filters: current.filters.clone(),
                call_statuses: current.lookups.call_statuses.clone(),
                product_options: current.product_options.clone(),
                on_call_status: on_call_status,
                on_product: on_product,
                on_date_range: on_date_range,
                on_mobile_search: on_mobile_search,
            }

            SearchBar {
                searching: current.searching,
                on_search: on_search,
                on_clear: on_clear_search,
            }

            div { class: "flex-1 overflow-auto",
                if current.phase == SyncPhase::InitialLoading {
                    LoadingSpinner {}
                } else {
                    LeadTable {
                        leads: current.leads.clone(),
                        on_view: move |lead: Lead| modal.set(Some(LeadModal::View(lead))),
                        on_edit: move |lead: Lead| modal.set(Some(LeadModal::Edit(lead))),
                    }
                }
            }

            PaginationBar {
                pagination: current.pagination,
                busy: busy,
                on_page: on_page,
            }

            match modal() {
                Some(LeadModal::View(lead)) => rsx! {
                    div { class: "fixed inset-y-0 right-0 z-40 w-96 shadow-xl",
                        LeadDetails {
                            lead: lead,
                            on_close: move |_: ()| modal.set(None),
                            on_edit: move |lead: Lead| modal.set(Some(LeadModal::Edit(lead))),
                        }
                    }
                },
                Some(LeadModal::Edit(lead)) => rsx! {
                    LeadEditForm {
                        key: "{lead.id}",
                        lead: lead,
                        call_statuses: edit_statuses,
                        products: current.lookups.products.clone(),
                        budgets: current.lookups.budgets.clone(),
                        unit_types: current.lookups.unit_types.clone(),
                        team_leads: team_leads,
                        saving: saving(),
                        on_submit: on_submit_edit,
                        on_cancel: move |_: ()| modal.set(None),
                    }
                },
                None => rsx! {},
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_follows_scope() {
        assert_eq!(title(&DashboardScope::All), "All Leads");
        assert_eq!(title(&DashboardScope::Team("kiran".into())), "Team Leads");
        assert_eq!(title(&DashboardScope::Own("ravi".into())), "My Leads");
    }
}
