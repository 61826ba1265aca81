// Credential encryption
pub mod crypto;

// State and session stores
pub mod store;

// HTTP API
pub mod api;

// Bearer token extraction
pub mod auth;

// Configuration
pub mod config;

// GitHub endpoint contract
pub mod provider;
