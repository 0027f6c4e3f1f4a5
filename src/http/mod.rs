//! HTTP transport layer for the translation relay

pub mod handlers;
