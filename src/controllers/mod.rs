pub mod auth;
pub mod catalog;
pub mod comments;
pub mod home;
pub mod me;
pub mod posts;
pub mod users;
