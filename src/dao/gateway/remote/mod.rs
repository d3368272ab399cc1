mod config;
mod error;
mod store;

pub use config::RemoteConfig;
pub use error::{RemoteError, RemoteResult};
pub use store::RemoteGateway;
