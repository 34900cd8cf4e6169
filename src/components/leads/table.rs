use dioxus::prelude::*;
use crate::components::common::Badge;
use crate::models::{is_closed_status, Lead};

pub fn status_color(status: &str) -> &'static str {
    if status.is_empty() {
        "bg-gray-100 text-gray-800"
    } else if is_closed_status(status) {
        "bg-red-100 text-red-800"
    } else {
        "bg-blue-100 text-blue-800"
    }
}

#[component]
pub fn LeadTable(leads: Vec<Lead>, on_view: EventHandler<Lead>, on_edit: EventHandler<Lead>) -> Element {
    if leads.is_empty() {
        return rsx! {
            div { class: "text-center text-gray-500 p-8", "No leads found" }
        };
    }

    rsx! {
        table { class: "min-w-full divide-y divide-gray-200",
            thead { class: "bg-gray-50",
                tr {
                    th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Name" }
                    th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Contact" }
                    th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Status" }
                    th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Product" }
                    th { class: "px-4 py-3 text-left text-xs font-medium text-gray-500 uppercase", "Follow Up" }
                    th { class: "px-4 py-3 text-right text-xs font-medium text-gray-500 uppercase", "Actions" }
                }
            }
            tbody { class: "bg-white divide-y divide-gray-200",
                for lead in leads.iter() {
                    LeadRow {
                        key: "{lead.id}",
                        lead: lead.clone(),
                        on_view: on_view,
                        on_edit: on_edit,
                    }
                }
            }
        }
    }
}

#[component]
fn LeadRow(lead: Lead, on_view: EventHandler<Lead>, on_edit: EventHandler<Lead>) -> Element {
    let name = lead.full_name();
    let contact = lead.contact_number.clone().unwrap_or_default();
    let status = lead.status().to_string();
    let product = lead.product_name.clone().unwrap_or_default();
    let follow_up = lead.follow_up_day();
    let tel = lead.tel_uri();
    let view_lead = lead.clone();
    let edit_lead = lead.clone();

    rsx! {
        tr { class: "hover:bg-gray-50",
            td { class: "px-4 py-3 font-medium text-gray-900", "{name}" }
            td { class: "px-4 py-3 text-gray-600", "{contact}" }
            td { class: "px-4 py-3",
                Badge { text: status.clone(), color_class: status_color(&status).to_string() }
            }
            td { class: "px-4 py-3 text-gray-600", "{product}" }
            td { class: "px-4 py-3 text-gray-600", "{follow_up}" }
            td { class: "px-4 py-3 text-right space-x-2 whitespace-nowrap",
                button {
                    class: "px-2 py-1 text-sm text-gray-700 hover:bg-gray-100 rounded",
                    onclick: move |_| on_view.call(view_lead.clone()),
                    "View"
                }
                button {
                    class: "px-2 py-1 text-sm text-blue-600 hover:bg-blue-50 rounded",
                    onclick: move |_| on_edit.call(edit_lead.clone()),
                    "Edit"
                }
                if let Some(href) = tel {
                    a {
                        class: "px-2 py-1 text-sm text-green-600 hover:bg-green-50 rounded",
                        href: "{href}",
                        "Call"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_statuses_stand_out() {
        assert_eq!(status_color("Not Qualified"), "bg-red-100 text-red-800");
        assert_eq!(status_color("Warm"), "bg-blue-100 text-blue-800");
        assert_eq!(status_color(""), "bg-gray-100 text-gray-800");
    }
}
