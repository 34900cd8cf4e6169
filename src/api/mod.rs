pub mod client;
pub mod session;
pub mod auth;
pub mod leads;
pub mod users;

pub use client::*;
