use dioxus::prelude::*;
use crate::components::common::{Input, Select};
use crate::models::{is_closed_status, Lead, LeadUpdate, UserInfo};

/// Edit form pre-populated from a row. Validation happens on submit in
/// `LeadSync::submit_edit`; the form only marks which fields are required.
#[component]
pub fn LeadEditForm(
    lead: Lead,
    call_statuses: Vec<String>,
    products: Vec<String>,
    budgets: Vec<String>,
    unit_types: Vec<String>,
    team_leads: Vec<UserInfo>,
    saving: bool,
    on_submit: EventHandler<LeadUpdate>,
    on_cancel: EventHandler<()>,
) -> Element {
    let initial = LeadUpdate::from_lead(&lead);
    let mut form = use_signal(move || initial);

    let closed = is_closed_status(&form.read().call_status);
    let required = !closed;
    let assignees: Vec<String> = team_leads.iter().map(|u| u.username.clone()).collect();
    let values = form.read().clone();

    rsx! {
        div { class: "fixed inset-0 z-40 bg-black/40 flex items-center justify-center",
            form {
                class: "bg-white rounded-lg shadow-xl w-full max-w-2xl max-h-[90vh] overflow-y-auto p-6",
                onsubmit: move |e| {
                    e.prevent_default();
                    on_submit.call(form.read().clone());
                },
                div { class: "flex items-center justify-between mb-4",
                    h2 { class: "text-xl font-semibold", "Edit Lead" }
                    button {
                        class: "text-gray-500 hover:text-gray-700",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "\u{2715}"
                    }
                }

                div { class: "grid grid-cols-2 gap-x-4",
                    Input {
                        label: "First Name",
                        value: values.first_name.clone(),
                        required: required,
                        oninput: move |e: FormEvent| form.write().first_name = e.value(),
                    }
                    Input {
                        label: "Last Name",
                        value: values.last_name.clone(),
                        oninput: move |e: FormEvent| form.write().last_name = e.value(),
                    }
                    Input {
                        label: "Email",
                        input_type: "email",
                        value: values.email.clone(),
                        oninput: move |e: FormEvent| form.write().email = e.value(),
                    }
                    Input {
                        label: "Contact Number",
                        input_type: "tel",
                        value: values.contact_number.clone(),
                        required: required,
                        oninput: move |e: FormEvent| form.write().contact_number = e.value(),
                    }
                    Select {
                        label: "Call Status",
                        value: values.call_status.clone(),
                        options: call_statuses.clone(),
                        required: required,
                        onchange: move |v: String| form.write().call_status = v,
                    }
                    Input {
                        label: "Follow Up Date",
                        input_type: "date",
                        value: values.follow_up_date.chars().take(10).collect::<String>(),
                        required: required,
                        oninput: move |e: FormEvent| form.write().follow_up_date = e.value(),
                    }
                    Select {
                        label: "Product",
                        value: values.product_name.clone(),
                        options: products.clone(),
                        onchange: move |v: String| form.write().product_name = v,
                    }
                    Select {
                        label: "Unit Type",
                        value: values.unit_type.clone(),
                        options: unit_types.clone(),
                        onchange: move |v: String| form.write().unit_type = v,
                    }
                    Select {
                        label: "Budget",
                        value: values.budget.clone(),
                        options: budgets.clone(),
                        onchange: move |v: String| form.write().budget = v,
                    }
                    if !assignees.is_empty() {
                        Select {
                            label: "Assigned To",
                            value: values.assigned_to.clone(),
                            options: assignees.clone(),
                            onchange: move |v: String| form.write().assigned_to = v,
                        }
                    }
                }

                div { class: "mb-4",
                    label { class: "block text-sm font-medium text-gray-700 mb-1",
                        "Remarks"
                        span { class: "text-red-500", " *" }
                    }
                    textarea {
                        class: "w-full px-3 py-2 border border-gray-300 rounded-md focus:outline-none focus:ring-2 focus:ring-blue-500",
                        rows: "3",
                        value: "{values.remarks}",
                        oninput: move |e| form.write().remarks = e.value(),
                    }
                }

                if closed {
                    p { class: "text-sm text-gray-500 mb-4",
                        "Closing status: only remarks are required."
                    }
                }

                div { class: "flex justify-end gap-3",
                    button {
                        class: "px-4 py-2 bg-gray-200 hover:bg-gray-300 text-gray-800 rounded",
                        r#type: "button",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                    button {
                        class: "px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded disabled:opacity-50",
                        r#type: "submit",
                        disabled: saving,
                        if saving { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}
