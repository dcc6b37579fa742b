pub mod auth;
pub mod dao;
pub mod dashboard;

pub use auth::AuthService;
pub use dashboard::DashboardService;
