use dioxus::prelude::*;
use crate::api;
use crate::components::common::{Badge, ErrorBanner, LoadingSpinner};
use crate::models::{UserInfo, UserRole};

fn role_color(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "bg-purple-100 text-purple-800",
        UserRole::TeamLead => "bg-blue-100 text-blue-800",
        UserRole::User => "bg-gray-100 text-gray-800",
    }
}

/// Admin-only list of every account.
#[component]
pub fn UserList() -> Element {
    let mut users = use_signal(Vec::<UserInfo>::new);
    let mut is_loading = use_signal(|| true);
    let mut error = use_signal(|| None::<String>);

    // Fetch users on mount
    use_effect(move || {
        spawn(async move {
            is_loading.set(true);
            match api::users::get_all_users().await {
                Ok(data) => {
                    users.set(data);
                    error.set(None);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch users: {}", e);
                    error.set(Some(e.server_message().unwrap_or("Failed to fetch users").to_string()));
                }
            }
            is_loading.set(false);
        });
    });

    rsx! {
        div { class: "h-full flex flex-col",
            div { class: "flex items-center justify-between p-4 border-b",
                h2 { class: "text-xl font-semibold", "Users" }
                span { class: "text-sm text-gray-500", "{users.read().len()} users" }
            }

            div { class: "flex-1 overflow-y-auto p-4",
                if *is_loading.read() {
                    LoadingSpinner {}
                } else if let Some(err) = error() {
                    ErrorBanner { message: err, on_dismiss: move |_: ()| error.set(None) }
                } else {
                    table { class: "min-w-full divide-y divide-gray-200",
                        thead { class: "bg-gray-50",
                            tr {
                                th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Username" }
                                th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Email" }
                                th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Role" }
                                th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Team Lead" }
                            }
                        }
                        tbody { class: "bg-white divide-y divide-gray-200",
                            for user in users.read().iter() {
                                tr { key: "{user.id}",
                                    td { class: "px-4 py-3 font-medium", "{user.username}" }
                                    td { class: "px-4 py-3 text-gray-600", "{user.email.clone().unwrap_or_default()}" }
                                    td { class: "px-4 py-3",
                                        Badge { text: user.role.display_name().to_string(), color_class: role_color(user.role).to_string() }
                                    }
                                    td { class: "px-4 py-3 text-gray-600", "{user.team_lead.clone().unwrap_or_default()}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
