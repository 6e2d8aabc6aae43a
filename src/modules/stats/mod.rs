pub mod handle;
pub mod model;
pub mod route;
pub mod service;

pub use model::DashboardStats;
pub use service::StatsService;
