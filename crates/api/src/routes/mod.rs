pub mod discount;
pub mod health;
pub mod metrics;
