mod list;

pub use list::UserList;
