mod dashboard;
mod details;
mod edit;
mod filters;
mod pagination;
mod search;
mod table;

pub use dashboard::LeadDashboard;
pub use details::LeadDetails;
pub use edit::LeadEditForm;
pub use filters::FilterBar;
pub use pagination::PaginationBar;
pub use search::SearchBar;
pub use table::{status_color, LeadTable};
