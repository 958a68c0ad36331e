//! # TaskHub API Server Library
//!
//! HTTP surface for the TaskHub project and task service. Domain logic
//! lives in `taskhub_shared`; this crate wires it to axum.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request extractors with JSON rejections
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
