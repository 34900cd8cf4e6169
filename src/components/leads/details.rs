use dioxus::prelude::*;
use crate::components::leads::status_color;
use crate::models::Lead;

/// Read-only view of one lead.
#[component]
pub fn LeadDetails(lead: Lead, on_close: EventHandler<()>, on_edit: EventHandler<Lead>) -> Element {
    // Format timestamps outside of rsx
    let created_at_str = lead.created_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let updated_at_str = lead.updated_at
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let status = lead.status().to_string();
    let status_class = status_color(&status);
    let tel = lead.tel_uri();
    let edit_lead = lead.clone();

    let fields = [
        ("Email", lead.email.clone()),
        ("Contact Number", lead.contact_number.clone()),
        ("Product", lead.product_name.clone()),
        ("Unit Type", lead.unit_type.clone()),
        ("Budget", lead.budget.clone()),
        ("Assigned To", lead.assigned_to.clone()),
        ("Follow Up", Some(lead.follow_up_day()).filter(|d| !d.is_empty())),
        ("Remarks", lead.remarks.clone()),
    ];

    rsx! {
        div { class: "h-full flex flex-col bg-white",
            // Header
            div { class: "flex items-center justify-between p-4 border-b",
                h2 { class: "text-xl font-semibold", "{lead.full_name()}" }
                button {
                    class: "text-gray-500 hover:text-gray-700",
                    onclick: move |_| on_close.call(()),
                    "\u{2715}"
                }
            }

            div { class: "flex-1 overflow-y-auto p-4",
                div { class: "mb-4",
                    span { class: "px-3 py-1 rounded-full text-sm {status_class}", "{status}" }
                }

                div { class: "bg-gray-50 rounded-lg p-4 mb-4",
                    dl { class: "grid grid-cols-2 gap-3",
                        for (label, value) in fields.iter() {
                            if let Some(value) = value {
                                div { key: "{label}",
                                    dt { class: "text-xs text-gray-500", "{label}" }
                                    dd { class: "text-gray-900", "{value}" }
                                }
                            }
                        }
                    }
                }

                div { class: "text-sm text-gray-500 space-y-1",
                    if !created_at_str.is_empty() {
                        p { "Created: {created_at_str}" }
                    }
                    if !updated_at_str.is_empty() {
                        p { "Updated: {updated_at_str}" }
                    }
                }
            }

            div { class: "flex gap-3 p-4 border-t",
                if let Some(href) = tel {
                    a {
                        class: "px-4 py-2 bg-green-600 hover:bg-green-700 text-white rounded",
                        href: "{href}",
                        "\u{1F4DE} Call"
                    }
                }
                button {
                    class: "px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded",
                    onclick: move |_| on_edit.call(edit_lead.clone()),
                    "Edit"
                }
            }
        }
    }
}
