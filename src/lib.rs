//! # CycleKit
//!
//! A canned-cycle G-code interpreter and toolpath synthesizer for CNC
//! drilling, tapping and boring.
//!
//! ## Architecture
//!
//! CycleKit is organized as a workspace with multiple crates:
//!
//! 1. **cyclekit-core** - Cycle types, parameter records, motion primitives, errors
//! 2. **cyclekit-parser** - Line tokenizer and the modal state tracker
//! 3. **cyclekit-camtools** - Cycle point generation and G-code synthesis
//! 4. **cyclekit-designer** - Contour toolpaths from part geometry
//! 5. **cyclekit-settings** - JSON/TOML configuration
//! 6. **cyclekit** - Command line binary that integrates all crates
//!
//! ## Features
//!
//! - **Modal Tracking**: G17/G18/G19 planes, G90/G91 modes, cycle continuation and G80 cancel
//! - **Cycles**: G81, G82, G83, G84, G74, G85, G86, G87, G89 plus unlisted G73-G89 codes
//! - **Synthesis**: canonical cycle lines and multi-hole blocks
//! - **Contours**: tool radius offsets, Z stepping and climb/conventional cuts

pub mod commands;

pub use cyclekit_camtools as camtools;
pub use cyclekit_designer as designer;
pub use cyclekit_parser as parser;
pub use cyclekit_settings as settings;

pub use cyclekit_core::{
    CoreError, CycleFamily, CycleParameters, CycleResult, CycleType, GcodeError, MotionKind,
    MotionPrimitive, Position, WorkPlane,
};

pub use cyclekit_parser::{tokenize, Command, MachineState, ModalStateTracker};

pub use cyclekit_camtools::{generate_result, synthesize, synthesize_program, CyclePointGenerator};

pub use cyclekit_designer::{
    ContourGenerator, CutDirection, DesignElement, Geometry, OffsetSide, Point, ToolpathProgram,
    ToolpathSettings,
};

pub use cyclekit_settings::{Config, InterpreterSettings, OutputSettings};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so program text on stdout stays clean
/// - RUST_LOG environment variable support
/// - INFO as the default level
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
