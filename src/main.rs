//! Lead Desk - real-estate lead CRM client
//!
//! Dioxus frontend over the leads REST API. Admins, team leads and users
//! each get a lead dashboard scoped to the leads they may see.

mod api;
mod components;
mod config;
mod models;
mod routes;
mod state;
mod sync;

use std::sync::Arc;

use dioxus::prelude::*;
use routes::Route;
use state::AUTH_STATE;
use components::common::Notification;
use config::AppConfig;
use api::session::SessionStore;

fn main() -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer())
            .with(tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lead_desk=info".parse()?))
            .init();

        // Load environment variables
        dotenvy::dotenv().ok();
    }

    let config = load_config()?;
    tracing::info!(api_url = %config.api_url, page_size = config.sync.page_size, "Starting Lead Desk");

    // Initialize API client
    api::init_api_client(api::ApiClient::with_sessions(&config.api_url, session_store(&config)));
    config::init_app_config(config);

    // Launch the Dioxus app
    dioxus::launch(App);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> anyhow::Result<AppConfig> {
    use anyhow::Context;
    AppConfig::from_env().context("Invalid Lead Desk configuration")
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> anyhow::Result<AppConfig> {
    // No process environment on web: take API_URL from build time, else the
    // page's own origin
    let api_url = option_env!("API_URL")
        .map(str::to_string)
        .or_else(|| {
            web_sys::window()
                .and_then(|w| w.location().origin().ok())
                .map(|origin| format!("{}/api", origin))
        });
    AppConfig::from_lookup(|key| match key {
        "API_URL" => api_url.clone(),
        _ => None,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn session_store(config: &AppConfig) -> Arc<dyn SessionStore> {
    match &config.session_file {
        Some(path) => Arc::new(api::session::FileSessionStore::new(path.clone())),
        None => Arc::new(api::session::MemorySessionStore::default()),
    }
}

#[cfg(target_arch = "wasm32")]
fn session_store(_config: &AppConfig) -> Arc<dyn SessionStore> {
    Arc::new(api::session::LocalStorageSessionStore::new("lead-desk.session"))
}

#[component]
fn App() -> Element {
    let auth_state = AUTH_STATE.read();

    rsx! {
        // Global styles
        style { {include_str!("../assets/styles.css")} }

        // Notification toast
        Notification {}

        // Main content
        if auth_state.is_authenticated() {
            AuthenticatedApp {}
        } else {
            LoginPage {}
        }
    }
}

#[component]
fn AuthenticatedApp() -> Element {
    // Wrap everything in Router so Link components work
    rsx! {
        Router::<Route> {}
    }
}

/// Layout component that wraps all authenticated routes
#[component]
pub fn AppLayout() -> Element {
    let auth_state = AUTH_STATE.read();
    let is_admin = auth_state.is_admin();

    rsx! {
        div { class: "h-screen flex flex-col bg-gray-100",
            TopBar {}

            div { class: "flex-1 flex overflow-hidden",
                Sidebar { is_admin: is_admin }

                // Outlet renders the matched route
                div { class: "flex-1 flex overflow-hidden",
                    Outlet::<Route> {}
                }
            }
        }
    }
}

#[component]
fn TopBar() -> Element {
    let auth_state = AUTH_STATE.read();
    let username = auth_state.username().unwrap_or("User");
    let role = auth_state.role().map(|r| r.display_name()).unwrap_or_default();

    let logout = move |_| {
        spawn(async move {
            api::auth::logout().await;
            state::clear_auth();
        });
    };

    rsx! {
        header { class: "bg-white border-b px-6 py-3 flex items-center justify-between",
            div { class: "flex items-center gap-3",
                span { class: "text-2xl", "\u{1F3E0}" }
                h1 { class: "text-xl font-bold text-gray-800", "Lead Desk" }
            }

            div { class: "flex items-center gap-4",
                span { class: "text-gray-600", "Welcome, {username}" }
                span { class: "text-xs text-gray-400", "{role}" }
                button {
                    class: "px-4 py-2 text-gray-600 hover:bg-gray-100 rounded-lg",
                    onclick: logout,
                    "Logout"
                }
            }
        }
    }
}

#[component]
fn Sidebar(is_admin: bool) -> Element {
    let current_route = use_route::<Route>();

    let mut nav_items = vec![(Route::Leads {}, "Leads", "\u{1F4CB}")];
    if is_admin {
        nav_items.push((Route::Users {}, "Users", "\u{1F465}"));
    }

    rsx! {
        nav { class: "w-64 bg-white border-r flex flex-col",
            div { class: "flex-1 py-4",
                for (route, label, icon) in nav_items.iter() {
                    Link {
                        to: route.clone(),
                        class: if std::mem::discriminant(&current_route) == std::mem::discriminant(route) {
                            "flex items-center gap-3 px-6 py-3 bg-blue-50 text-blue-600 border-r-4 border-blue-600 font-medium"
                        } else {
                            "flex items-center gap-3 px-6 py-3 text-gray-700 hover:bg-gray-100 transition-colors"
                        },
                        span { class: "text-xl", "{icon}" }
                        span { "{label}" }
                    }
                }
            }
        }
    }
}

#[component]
fn LoginPage() -> Element {
    let mut username = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut is_loading = use_signal(|| false);
    let mut error = use_signal(|| None::<String>);

    let mut login = move |_| {
        let user = username();
        let pass = password();

        if user.is_empty() || pass.is_empty() {
            error.set(Some("Please enter username and password".to_string()));
            return;
        }

        is_loading.set(true);
        error.set(None);

        spawn(async move {
            match api::auth::login(&user, &pass).await {
                Ok(session) => {
                    state::set_auth(session);
                }
                Err(e) => {
                    tracing::warn!("Login failed: {}", e);
                    let message = e.server_message().map(str::to_string)
                        .unwrap_or_else(|| format!("Login failed: {}", e));
                    error.set(Some(message));
                }
            }
            is_loading.set(false);
        });
    };

    rsx! {
        div { class: "min-h-screen flex items-center justify-center bg-gray-100",
            div { class: "bg-white rounded-lg shadow-lg p-8 w-full max-w-md",
                div { class: "text-center mb-8",
                    span { class: "text-5xl", "\u{1F3E0}" }
                    h1 { class: "text-2xl font-bold mt-4", "Lead Desk" }
                    p { class: "text-gray-500", "Sign in to continue" }
                }

                if let Some(err) = error.read().as_ref() {
                    div { class: "bg-red-100 border border-red-400 text-red-700 px-4 py-3 rounded mb-4",
                        "{err}"
                    }
                }

                form {
                    onsubmit: move |e| {
                        e.prevent_default();
                        login(e);
                    },

                    div { class: "mb-4",
                        label { class: "block text-sm font-medium text-gray-700 mb-1", "Username" }
                        input {
                            class: "w-full px-4 py-3 border border-gray-300 rounded-lg focus:outline-none focus:ring-2 focus:ring-blue-500",
                            r#type: "text",
                            placeholder: "Enter your username",
                            value: "{username}",
                            oninput: move |e| username.set(e.value()),
                        }
                    }

                    div { class: "mb-6",
                        label { class: "block text-sm font-medium text-gray-700 mb-1", "Password" }
                        input {
                            class: "w-full px-4 py-3 border border-gray-300 rounded-lg focus:outline-none focus:ring-2 focus:ring-blue-500",
                            r#type: "password",
                            placeholder: "Enter your password",
                            value: "{password}",
                            oninput: move |e| password.set(e.value()),
                        }
                    }

                    button {
                        class: "w-full py-3 bg-blue-600 text-white rounded-lg hover:bg-blue-700 font-medium disabled:opacity-50",
                        r#type: "submit",
                        disabled: *is_loading.read(),
                        if *is_loading.read() { "Signing in..." } else { "Sign In" }
                    }
                }
            }
        }
    }
}
