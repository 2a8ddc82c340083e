pub mod bill;
pub mod budget;
pub mod category;
pub mod chart;
pub mod dashboard;
pub mod filter;
pub mod paging;
pub mod period;
pub mod route;
pub mod session;
pub mod settings;
pub mod transaction;
pub mod user;
pub mod wire;
