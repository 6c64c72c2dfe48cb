//! Core of the 2-D gravity playground.
//!
//! Main components:
//! - [`engine`] - one fixed-size N-body step, split into phases.
//! - [`force_buffer`] - per-body force accumulator used by the engine.
//! - [`body`] - point masses and their bounded trails.
//! - [`controller`] - interaction state machine (placement, editing, run control).
//! - [`scheduler`] - frame tokens for the run loop.
//! - [`params`] - runtime parameters (trails, speed, canvas size).
//! - [`config`] - tuned constants, loadable from JSON.
//! - [`types`] - shared ids, colors and canvas geometry.

pub mod body;
pub mod config;
pub mod controller;
pub mod engine;
pub mod force_buffer;
pub mod params;
pub mod scheduler;
pub mod types;
