//! Service integrations for external APIs and clients.
//!
//! The chat service is defined as a generic trait plus a Slack implementation,
//! so the interaction layer can be tested against a mock.

pub mod chat;
