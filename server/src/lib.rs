//! Vizor server: stores reconstructed chats and serves them to viewers.

pub mod api;
pub mod app;
pub mod core;
pub mod data;
pub mod domain;
