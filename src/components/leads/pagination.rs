use dioxus::prelude::*;
use crate::sync::Pagination;

/// Page numbers shown around the current page.
const WINDOW: u32 = 2;

pub fn page_window(pagination: &Pagination) -> std::ops::RangeInclusive<u32> {
    let first = pagination.current_page.saturating_sub(WINDOW).max(1);
    let last = (pagination.current_page + WINDOW).min(pagination.total_pages.max(1));
    first..=last
}

#[component]
pub fn PaginationBar(pagination: Pagination, busy: bool, on_page: EventHandler<u32>) -> Element {
    let current = pagination.current_page;
    let pages: Vec<u32> = page_window(&pagination).collect();

    rsx! {
        div { class: "flex items-center justify-between px-4 py-3 border-t bg-white",
            span { class: "text-sm text-gray-600",
                "Page {current} of {pagination.total_pages} ({pagination.total_items} leads)"
            }
            div { class: "flex gap-1",
                button {
                    class: "px-3 py-1 rounded border disabled:opacity-50",
                    disabled: busy || !pagination.has_prev(),
                    onclick: move |_| on_page.call(current.saturating_sub(1)),
                    "Prev"
                }
                for page in pages {
                    button {
                        key: "{page}",
                        class: if page == current { "px-3 py-1 rounded border bg-blue-600 text-white" } else { "px-3 py-1 rounded border hover:bg-gray-100" },
                        disabled: busy,
                        onclick: move |_| on_page.call(page),
                        "{page}"
                    }
                }
                button {
                    class: "px-3 py-1 rounded border disabled:opacity-50",
                    disabled: busy || !pagination.has_next(),
                    onclick: move |_| on_page.call(current + 1),
                    "Next"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(current_page: u32, total_pages: u32) -> Pagination {
        let mut pagination = Pagination::new(20);
        pagination.total_pages = total_pages;
        pagination.current_page = current_page;
        pagination
    }

    #[test]
    fn test_window_is_clipped_to_range() {
        assert_eq!(page_window(&at(1, 3)), 1..=3);
        assert_eq!(page_window(&at(5, 10)), 3..=7);
        assert_eq!(page_window(&at(10, 10)), 8..=10);
        assert_eq!(page_window(&at(1, 0)), 1..=1);
    }
}
