pub mod activity;
pub mod award;
pub mod base;
pub mod event;
pub mod message;
pub mod team;
pub mod team_metric;
pub mod user;

pub use base::BaseDao;
