pub mod api;
pub mod domain;
pub mod entities;
pub mod metrics;
pub mod migrator;
pub mod notifications;
pub mod telemetry;

pub use sea_orm;
