//! # Torq Centralized Configuration
//!
//! Configuration loading and protocol constants for the AMM pool engine.
//!
//! ## Features
//!
//! - **Pool Constants**: minimum liquidity lock, fee ratio, price scale
//! - **Engine Configuration**: vault account, logging, event delivery
//!
//! ## Usage
//!
//! ```rust
//! use torq_config::amm;
//!
//! assert_eq!(amm::MINIMUM_LIQUIDITY, 1_000);
//! assert_eq!(amm::FEE_NUMERATOR, 997);
//! ```

pub mod amm;
pub mod service_config;

pub use service_config::{load_config, EngineConfig, EngineSettings, EventSettings, LoggingConfig};
