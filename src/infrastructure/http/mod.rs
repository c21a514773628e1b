//! HTTP transport adapters.

pub mod client;

pub use client::HttpClient;
