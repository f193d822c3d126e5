use sqlx::{Postgres, Transaction};

pub mod catalog;
pub mod comment;
pub mod error;
pub mod post;
pub mod user;

pub type PostgresTransaction = Transaction<'static, Postgres>;
