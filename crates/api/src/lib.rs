//! HTTP surface: login, session endpoints, the edge gate and guarded pages.

pub mod app;
pub mod authz;
pub mod config;
pub mod context;
pub mod middleware;
