//! Azure Resource Manager implementation of [`CloudProvider`](super::CloudProvider).

pub mod auth;
pub mod client;
pub mod environment;
mod responses;

pub use auth::ServicePrincipal;
pub use client::{AzureClient, ClientOptions};
pub use environment::AzureEnvironment;
