//! # CycleKit Parser
//!
//! G-code line tokenizing and the modal state machine that turns canned-cycle
//! lines into motion.

pub mod command;
pub mod parser;

pub use command::{tokenize, Command};
pub use parser::{MachineState, ModalStateTracker, DEFAULT_REFERENCE_CLEARANCE};
