//! Pool engine replay service
//!
//! Loads an engine configuration and a JSON scenario, seeds an in-memory
//! ledger, drives the pool engine step by step and reports every outcome and
//! emitted event as a JSON line.

pub mod scenario;

pub use scenario::{RunSummary, Scenario, ScenarioRunner, Step, StepOutcome, StepReport};
