pub mod common;
pub mod leads;
pub mod users;
