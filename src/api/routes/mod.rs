//! API route modules.

pub mod chat;
