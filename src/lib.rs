//! Scripted synthetic-text generator.
//!
//! Users hold weighted vocabularies of logical operations (symbol
//! sequences). The engine samples texts from them with a seeded generator and
//! records where every occurrence and symbol landed, plus per-user frequency
//! histograms. Scripts drive the engine; reports export the results as CSV.

pub mod config;
pub mod error;
pub mod types {
    pub mod logical_operation;
    pub mod text_entry;
}
pub mod parsing;
pub mod simulation {
    pub mod engine;
    pub mod histogram;
    pub mod locations;
    pub mod sampler;
    pub mod user;
    pub mod vocabulary;
}
pub mod executor;
pub mod report;

pub use config::Config;
pub use error::{ExecutionError, ScriptError, SimulationError};
pub use parsing::Command;
pub use simulation::engine::SimulationEngine;
pub use types::logical_operation::LogicalOperation;
pub use types::text_entry::{HistogramRow, OccurrenceLocation, SymbolLocation, TextEntry};
