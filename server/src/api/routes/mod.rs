//! API route handlers

pub mod chats;
pub mod health;
