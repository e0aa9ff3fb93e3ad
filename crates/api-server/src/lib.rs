//! HTTP API for the ads reporter — the report endpoint plus
//! operational probes and the metrics exporter.

pub mod rest;
pub mod server;

pub use server::ApiServer;
