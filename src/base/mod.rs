//! Core components, types, and utilities for calm-bot.
//!
//! This module contains the building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The reply templates the bot answers with.
//! - Common result aliases.

pub mod config;
pub mod replies;
pub mod types;
