//! Combo file server
//!
//! Serves several files from a directory concatenated into one HTTP
//! response, in the order they are named in the query string:
//!
//! ```text
//! GET /?base.css&grid.css&pure/buttons.css
//! ```
//!
//! The pipeline lives in [`combo`]; [`store`] abstracts where files come
//! from and [`server`] runs the listener.

pub mod cli;
pub mod combo;
pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod store;
