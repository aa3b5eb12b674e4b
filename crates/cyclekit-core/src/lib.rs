//! # CycleKit Core
//!
//! Core types shared by every CycleKit crate: machine positions and planes,
//! canned-cycle types and their parameter records, motion primitives and the
//! per-line interpretation result, plus the common error types.

pub mod cycle;
pub mod data;
pub mod error;
pub mod motion;

pub use cycle::{CycleFamily, CycleParameters, CycleType, CYCLE_FIELDS};
pub use data::{Position, WorkPlane};
pub use error::{CoreError, GcodeError, Result};
pub use motion::{CycleResult, MotionKind, MotionPrimitive};
