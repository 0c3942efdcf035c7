mod client;
mod provider;
mod types;

pub use client::ClientOptions;
pub use provider::GitLabProvider;
