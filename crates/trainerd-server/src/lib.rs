//! Trainer console server library - device WebSocket transport and operator API.
//!
//! This library provides the HTTP routes, WebSocket handlers, and application state
//! for the trainer console daemon. It's separated from main.rs to enable integration testing.

pub mod config;
pub mod device_ws;
pub mod events_ws;
pub mod logging;
pub mod presentation;
pub mod routes;
pub mod state;
pub mod transport;
