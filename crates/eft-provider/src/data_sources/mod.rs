//! Read-only data sources

mod server;
mod sites;

pub use server::ServerDataSource;
pub use sites::SitesDataSource;
