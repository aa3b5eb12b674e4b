use anyhow::Context;
use clap::{Parser, Subcommand};
use cyclekit::commands::{
    contour_program, interpret_program, parse_hole, render_report, synthesize_cycle,
};
use cyclekit::{init_logging, Config, CycleParameters, CycleType, Position, BUILD_DATE, VERSION};
use std::path::PathBuf;
use tracing::debug;

/// Canned-cycle G-code interpreter and toolpath synthesizer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (.json or .toml); defaults to the platform config directory
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interpret a G-code program and report every cycle invocation
    Interpret {
        file: PathBuf,
        /// Print full results (including motion) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write the canonical G-code for a cycle
    Synthesize {
        /// Cycle code or name, e.g. G83 or peck-drilling
        cycle: CycleType,
        #[command(flatten)]
        params: ParamArgs,
        /// Hole location as X,Y; repeat for a multi-hole block
        #[arg(long = "hole", value_parser = parse_hole)]
        holes: Vec<Position>,
    },
    /// Generate a contour program from a geometry JSON file
    Contour {
        geometry: PathBuf,
        /// Print the program with preview points as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args, Debug)]
struct ParamArgs {
    #[arg(short, long, allow_negative_numbers = true)]
    x: Option<f64>,
    #[arg(short, long, allow_negative_numbers = true)]
    y: Option<f64>,
    #[arg(short, long, allow_negative_numbers = true)]
    z: Option<f64>,
    #[arg(short, long, allow_negative_numbers = true)]
    r: Option<f64>,
    #[arg(short, long)]
    q: Option<f64>,
    #[arg(short, long)]
    p: Option<f64>,
    #[arg(short, long)]
    f: Option<f64>,
    #[arg(short, long)]
    s: Option<f64>,
    #[arg(short, long, allow_negative_numbers = true)]
    i: Option<f64>,
    #[arg(short, long, allow_negative_numbers = true)]
    j: Option<f64>,
    #[arg(short, long, allow_negative_numbers = true)]
    k: Option<f64>,
}

impl ParamArgs {
    fn to_parameters(&self, cycle_type: CycleType) -> CycleParameters {
        let words = [
            ('X', self.x),
            ('Y', self.y),
            ('Z', self.z),
            ('R', self.r),
            ('Q', self.q),
            ('P', self.p),
            ('F', self.f),
            ('S', self.s),
            ('I', self.i),
            ('J', self.j),
            ('K', self.k),
        ];
        CycleParameters::from_words(
            cycle_type,
            words
                .into_iter()
                .filter_map(|(letter, value)| value.map(|v| (letter, v))),
        )
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();
    debug!("cyclekit {} built {}", VERSION, BUILD_DATE);

    let config = Config::load_or_default(cli.config.as_deref()).context("Failed to load config")?;

    let output = match cli.command {
        Commands::Interpret { file, json } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let report = interpret_program(&text, &config.interpreter);
            let output = render_report(&report, json)?;
            if config.interpreter.stop_on_invalid {
                if let Err(e) = report.ensure_clean() {
                    println!("{}", output);
                    return Err(e).with_context(|| {
                        format!("Stopped at line {}", report.stopped_at.unwrap_or_default())
                    });
                }
            }
            output
        }
        Commands::Synthesize {
            cycle,
            params,
            holes,
        } => synthesize_cycle(cycle, &params.to_parameters(cycle), &holes)?,
        Commands::Contour { geometry, json } => {
            let text = std::fs::read_to_string(&geometry)
                .with_context(|| format!("Failed to read {}", geometry.display()))?;
            let program = contour_program(&text, &config)?;
            if json {
                program.to_json()?
            } else {
                program.gcode
            }
        }
    };

    println!("{}", output);
    Ok(())
}
