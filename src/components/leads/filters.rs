use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::sync::{Choice, FilterState};

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn day_value(day: Option<NaiveDate>) -> String {
    day.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

/// Call status, product, date range and mobile number filters.
#[component]
pub fn FilterBar(
    filters: FilterState,
    call_statuses: Vec<String>,
    product_options: Vec<String>,
    on_call_status: EventHandler<Choice>,
    on_product: EventHandler<Choice>,
    on_date_range: EventHandler<(Option<NaiveDate>, Option<NaiveDate>)>,
    on_mobile_search: EventHandler<String>,
) -> Element {
    let status = filters.call_status.as_param().to_string();
    let product = filters.product_name.as_param().to_string();
    let start = filters.start_date;
    let end = filters.end_date;
    let start_value = day_value(start);
    let end_value = day_value(end);

    rsx! {
        div { class: "grid grid-cols-5 gap-3 p-4 border-b bg-white",
            div {
                label { class: "block text-xs font-medium text-gray-500 mb-1", "Call Status" }
                select {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-md",
                    value: "{status}",
                    onchange: move |e| on_call_status.call(Choice::from_value(&e.value())),
                    option { value: Choice::ALL, selected: filters.call_status.is_all(), "All" }
                    for s in call_statuses.iter() {
                        option { key: "{s}", value: "{s}", selected: *s == status, "{s}" }
                    }
                }
            }
            div {
                label { class: "block text-xs font-medium text-gray-500 mb-1", "Product" }
                select {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-md",
                    value: "{product}",
                    onchange: move |e| on_product.call(Choice::from_value(&e.value())),
                    option { value: Choice::ALL, selected: filters.product_name.is_all(), "All" }
                    for p in product_options.iter() {
                        option { key: "{p}", value: "{p}", selected: *p == product, "{p}" }
                    }
                }
            }
            div {
                label { class: "block text-xs font-medium text-gray-500 mb-1", "From" }
                input {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-md",
                    r#type: "date",
                    value: "{start_value}",
                    onchange: move |e| on_date_range.call((parse_day(&e.value()), end)),
                }
            }
            div {
                label { class: "block text-xs font-medium text-gray-500 mb-1", "To" }
                input {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-md",
                    r#type: "date",
                    value: "{end_value}",
                    onchange: move |e| on_date_range.call((start, parse_day(&e.value()))),
                }
            }
            div {
                label { class: "block text-xs font-medium text-gray-500 mb-1", "Mobile" }
                input {
                    class: "w-full px-3 py-2 border border-gray-300 rounded-md",
                    r#type: "search",
                    placeholder: "Search by mobile...",
                    value: "{filters.mobile_search}",
                    oninput: move |e| on_mobile_search.call(e.value()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_input_values() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(day_value(day), "2024-03-09");
        assert_eq!(parse_day("2024-03-09"), day);
        assert_eq!(parse_day(""), None);
        assert_eq!(day_value(None), "");
    }
}
