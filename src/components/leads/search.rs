use dioxus::prelude::*;

/// Name / contact search. Submitting with both fields blank clears the search.
#[component]
pub fn SearchBar(
    searching: bool,
    on_search: EventHandler<(String, String)>,
    on_clear: EventHandler<()>,
) -> Element {
    let mut name = use_signal(String::new);
    let mut contact = use_signal(String::new);

    rsx! {
        form {
            class: "flex items-end gap-3 px-4 py-3 border-b bg-gray-50",
            onsubmit: move |e| {
                e.prevent_default();
                on_search.call((name(), contact()));
            },
            div { class: "flex-1",
                label { class: "block text-xs font-medium text-gray-500 mb-1", "Name" }
                input {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-md",
                    r#type: "text",
                    placeholder: "Lead name",
                    value: "{name}",
                    oninput: move |e| name.set(e.value()),
                }
            }
            div { class: "flex-1",
                label { class: "block text-xs font-medium text-gray-500 mb-1", "Contact Number" }
                input {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-md",
                    r#type: "text",
                    placeholder: "Contact number",
                    value: "{contact}",
                    oninput: move |e| contact.set(e.value()),
                }
            }
            button {
                class: "px-4 py-2 bg-blue-600 hover:bg-blue-700 text-white rounded-md",
                r#type: "submit",
                "Search"
            }
            if searching {
                button {
                    class: "px-4 py-2 bg-gray-200 hover:bg-gray-300 text-gray-800 rounded-md",
                    r#type: "button",
                    onclick: move |_| {
                        name.set(String::new());
                        contact.set(String::new());
                        on_clear.call(());
                    },
                    "Clear"
                }
            }
        }
    }
}
