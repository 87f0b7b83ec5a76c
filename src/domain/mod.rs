//! Core domain types and logic.

pub mod price;
pub mod schedule;
pub mod portfolio;
pub mod simulation;
pub mod cash_flow;
pub mod xirr;
pub mod analysis;
pub mod comparison;
pub mod pipeline;
pub mod config_validation;
pub mod error;
