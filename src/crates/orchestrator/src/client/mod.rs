//! WebSocket client for communicating with aco server.
//!
//! This module provides the AcoClient for sending tool requests and receiving
//! responses via WebSocket.

pub mod client;
pub mod messages;

pub use client::AcoClient;
pub use messages::*;

