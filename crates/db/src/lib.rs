pub mod connection;
pub mod context;
pub mod fixtures;
pub mod migrations;
pub mod repositories;

pub use connection::{connect, connect_with_settings, DbPool};
pub use context::load_shopper_context;
pub use fixtures::{DemoDataset, SeedResult, VerificationResult, DEMO_SESSION};
