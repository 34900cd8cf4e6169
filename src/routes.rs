use dioxus::prelude::*;

use crate::components::{leads::LeadDashboard, users::UserList};
use crate::state::AUTH_STATE;
use crate::AppLayout;

#[derive(Routable, Clone, PartialEq, Debug)]
#[rustfmt::skip]
pub enum Route {
    #[layout(AppLayout)]
        #[route("/")]
        Leads {},

        #[route("/users")]
        Users {},
    #[end_layout]

    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn Leads() -> Element {
    // Scope is fixed per login; the dashboard remounts when the user changes
    let Some(scope) = AUTH_STATE.read().dashboard_scope() else {
        return rsx! {};
    };

    rsx! {
        LeadDashboard { key: "{scope:?}", scope: scope.clone() }
    }
}

#[component]
fn Users() -> Element {
    if !AUTH_STATE.read().is_admin() {
        return rsx! {
            div { class: "flex-1 flex items-center justify-center text-gray-500",
                "Only admins can view users"
            }
        };
    }

    rsx! {
        div { class: "flex-1 bg-white",
            UserList {}
        }
    }
}

#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let path = segments.join("/");

    rsx! {
        div { class: "min-h-screen flex flex-col items-center justify-center text-gray-500",
            p { class: "mb-4", "Page not found: /{path}" }
            Link { to: Route::Leads {}, class: "text-blue-600 hover:underline", "Back to leads" }
        }
    }
}
