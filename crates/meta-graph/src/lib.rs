//! Meta Graph API integration — account listing and paginated ad-level
//! insight retrieval.

pub mod client;

pub use client::GraphClient;
