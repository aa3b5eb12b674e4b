//! # CycleKit CAM Tools
//!
//! Canned-cycle tooling for drilling, tapping and boring.
//!
//! ## Tools Included
//!
//! - **Cycle Points**: expands a cycle invocation into rapid, feed and dwell motion
//! - **Synthesizer**: writes the canonical G-code line (and whole hole blocks) for a cycle

pub mod cycle_points;
pub mod error;
pub mod synthesizer;

pub use cycle_points::{
    generate, generate_result, CyclePointGenerator, DEFAULT_PECK_INCREMENT, MAX_PECK_ITERATIONS,
    PECK_DEPTH_TOLERANCE, TAP_REVERSAL_DWELL,
};
pub use error::{CamToolError, CamToolResult, ParameterError, ParameterResult};
pub use synthesizer::{synthesize, synthesize_program};
