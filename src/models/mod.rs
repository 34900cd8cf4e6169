pub mod lead;
pub mod auth;
pub mod response;

pub use lead::*;
pub use auth::*;
pub use response::*;
