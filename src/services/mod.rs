//! Business logic layer, sitting between HTTP handlers and the upstream
//! clients.

pub mod proxy_service;

pub use proxy_service::ProxyService;
