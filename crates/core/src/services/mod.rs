pub mod chart_service;
pub mod context;
pub mod filter_service;
pub mod pagination;
pub mod period_service;
pub mod resolver;
pub mod session_service;
pub mod store;
pub mod summary_service;
pub mod theme_service;
