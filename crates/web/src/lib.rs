//! Storefront web server: routing, request context and HTML rendering.

pub mod app;
pub mod config;
pub mod context;
pub mod middleware;
pub mod views;
