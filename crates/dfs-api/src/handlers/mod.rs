pub mod health;
pub mod metrics;
pub mod optimize;
pub mod projections;
