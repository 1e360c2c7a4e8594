pub mod client;
pub mod http;
pub mod transport;

pub use client::{JiraClient, Transition};
pub use transport::Transport;

#[cfg(test)]
pub mod fake;
