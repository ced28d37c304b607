//! Benchmark utilities for sprig.
//!
//! This crate provides the benchmarking infrastructure for the ECS:
//!
//! - **Microbenchmarks**: Individual operations (allocate, insert, join, event flush, tick)
//! - **Scenario benchmarks**: Whole ticks of a particle simulation and a sparse-id workload
//! - **Frame timing**: Per-tick duration statistics
//!
//! # Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench -p sprig_bench
//!
//! # Run specific benchmark group
//! cargo bench -p sprig_bench -- join
//! ```
//!
//! Results are written to `target/criterion/` with HTML reports for visualization.

pub mod components;
pub mod frame_timer;
pub mod scenarios;
