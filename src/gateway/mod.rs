//! SQLite access for the load pipeline and the reports.

mod catalog;
mod connection;

pub use catalog::CatalogEntry;
pub use connection::{ConnectOptions, Credentials, Gateway, OpenMode};
