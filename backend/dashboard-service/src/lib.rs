//! Social analytics dashboard
//!
//! Reads users and posts from the remote social API (falling back to a small
//! built-in data set when it is unreachable) and derives three views from them:
//! top users by comments, trending posts and a sampled news feed.

pub mod cache;
pub mod clients;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;
pub mod views;

pub use config::Config;
pub use error::{AppError, Result};
