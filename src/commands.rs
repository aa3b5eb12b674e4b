//! Subcommand implementations for the `cyclekit` binary.
//!
//! Each function takes already-read input and returns the text to print, so
//! the binary only handles arguments and I/O.

use anyhow::Context;
use cyclekit_camtools::{synthesize, synthesize_program};
use cyclekit_core::{
    CycleParameters, CycleResult, CycleType, GcodeError, MotionKind, Position,
    Result as CoreResult,
};
use cyclekit_designer::{ContourGenerator, DesignElement, ToolpathProgram};
use cyclekit_parser::{tokenize, ModalStateTracker};
use cyclekit_settings::{Config, InterpreterSettings};
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of interpreting a whole program
#[derive(Debug, Clone, Default, Serialize)]
pub struct InterpretReport {
    pub results: Vec<CycleResult>,
    /// Tokenizer issues with their 1-based line numbers
    #[serde(skip)]
    pub issues: Vec<(usize, GcodeError)>,
    /// Line where interpretation stopped on an invalid result
    pub stopped_at: Option<usize>,
}

impl InterpretReport {
    /// Fail with the first tokenizer issue, if any
    pub fn ensure_clean(&self) -> CoreResult<()> {
        match self.issues.first() {
            Some((_, issue)) => Err(issue.clone().into()),
            None => Ok(()),
        }
    }
}

/// Run a program through a fresh tracker
pub fn interpret_program(text: &str, settings: &InterpreterSettings) -> InterpretReport {
    let mut tracker = ModalStateTracker::new();
    let mut report = InterpretReport::default();

    for (index, raw) in text.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();
        if line.is_empty() || (settings.skip_semicolon_lines && line.starts_with(';')) {
            continue;
        }

        let command = tokenize(line);
        report
            .issues
            .extend(command.issues.iter().cloned().map(|issue| (line_number, issue)));
        if settings.stop_on_invalid && command.is_malformed() {
            warn!("Stopping at line {}: malformed G-code", line_number);
            report.stopped_at = Some(line_number);
            break;
        }

        if let Some(result) = tracker.process(&command) {
            let invalid = !result.valid;
            report.results.push(result);
            if invalid && settings.stop_on_invalid {
                warn!("Stopping at line {}: invalid cycle result", line_number);
                report.stopped_at = Some(line_number);
                break;
            }
        }
    }

    for (line, issue) in &report.issues {
        warn!("Line {}: {}", line, issue);
    }
    info!("Interpreted {} cycle invocations", report.results.len());
    report
}

/// One summary line per cycle result
pub fn format_result(result: &CycleResult) -> String {
    let name = result
        .cycle_type
        .map(|cycle_type| cycle_type.to_string())
        .unwrap_or_else(|| "No cycle".to_string());

    if !result.valid {
        return format!(
            "{}: invalid ({})",
            name,
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    let count = |kind: MotionKind| result.points.iter().filter(|p| p.kind == kind).count();
    let mut line = format!(
        "{} at X{:.3} Y{:.3}: {} rapid, {} feed, {} dwell",
        name,
        result.params.x.unwrap_or_default(),
        result.params.y.unwrap_or_default(),
        count(MotionKind::Rapid),
        count(MotionKind::Linear),
        count(MotionKind::Dwell),
    );
    if result.fallback {
        line.push_str(" (drilling shape)");
    }
    line
}

/// Render a report as text or JSON
pub fn render_report(report: &InterpretReport, json: bool) -> anyhow::Result<String> {
    if json {
        return serde_json::to_string_pretty(report).context("Failed to serialize results");
    }
    let mut out: Vec<String> = report.results.iter().map(format_result).collect();
    if let Some(line) = report.stopped_at {
        out.push(format!("Stopped at line {}", line));
    }
    Ok(out.join("\n"))
}

/// Synthesize one cycle line, or a block when hole locations are given
pub fn synthesize_cycle(
    cycle_type: CycleType,
    params: &CycleParameters,
    holes: &[Position],
) -> anyhow::Result<String> {
    if holes.is_empty() {
        return Ok(synthesize(cycle_type, params));
    }
    let block = synthesize_program(cycle_type, holes, params)
        .with_context(|| format!("Failed to synthesize {}", cycle_type))?;
    Ok(block.trim_end().to_string())
}

/// Parse a `X,Y` hole location
pub fn parse_hole(text: &str) -> Result<Position, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{}'", text))?;
    let x: f64 = x.trim().parse().map_err(|_| format!("bad X in '{}'", text))?;
    let y: f64 = y.trim().parse().map_err(|_| format!("bad Y in '{}'", text))?;
    Ok(Position::new(x, y, 0.0))
}

/// Generate a contour program from a geometry JSON document
pub fn contour_program(geometry_json: &str, config: &Config) -> anyhow::Result<ToolpathProgram> {
    let element: DesignElement =
        serde_json::from_str(geometry_json).context("Invalid geometry document")?;
    let program = ContourGenerator::new(config.toolpath.clone())
        .with_line_numbers(config.output.line_numbers_enabled)
        .with_return_to_origin(config.output.return_to_origin)
        .generate(&element);

    if let Some(error) = &program.error {
        warn!("Contour not generated: {}", error);
    }
    Ok(program)
}
