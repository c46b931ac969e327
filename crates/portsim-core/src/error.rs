//! Layered error taxonomy. Each concern gets its own small enum; `RunError`
//! composes them at the driver's public boundary.

use thiserror::Error;

/// Raised while validating a [`crate::config::RunConfig`] or building a
/// run's sampler inputs, before scheduling starts.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("warehouse probability p must lie in [0.0, 1.0], got {0}")]
    InvalidWarehouseProbability(String),

    #[error("MAX_ROADSTEAD must be at least 1, got {0}")]
    InvalidMaxRoadstead(u32),

    #[error("years must be positive, got {0}")]
    InvalidYears(String),

    #[error("dedicated_capacity must be positive when dedicated_trucks > 0, got {0}")]
    InvalidDedicatedCapacity(String),

    #[error("initial_grain must be non-negative, got {0}")]
    InvalidInitialGrain(String),

    #[error("a named time constant must be non-negative: {name} = {value}")]
    NegativeTimeConstant { name: &'static str, value: String },

    #[error("filtered {column} data is empty after applying the domain filters")]
    EmptyFilteredData { column: &'static str },
}

/// Raised by the scheduler or resource primitives on a programming-error
/// condition (as opposed to a normal simulated state).
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SchedulerError {
    #[error("attempted to schedule a timeout with negative duration: {0}")]
    NegativeTimeout(String),

    #[error("attempted to schedule an event strictly before the current virtual time")]
    EventInPast,
}

/// Sampling from an empty empirical column at runtime. Should be
/// unreachable once a [`crate::config::SimulationInputs`]-equivalent bundle
/// has passed `ConfigError` validation; kept as a distinct variant so a
/// violated invariant surfaces with a precise message rather than a panic.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DataError {
    #[error("attempted to sample from an empty {column} column at runtime")]
    EmptyColumnAtRuntime { column: &'static str },
}

/// The single error type returned by a run's public entry point.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error(transparent)]
    Data(#[from] DataError),
}
