//! Construction Estimator
//!
//! Material, cost and layout estimates for building projects.

mod logger;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{info, warn};

use construction_estimator::blueprint::{self, render_svg};
use construction_estimator::config::Settings;
use construction_estimator::generator::OpenAiCompatibleGenerator;
use construction_estimator::planner::{self, TextGenerator};
use construction_estimator::{
    EstimateRequest, FloorPlan, FloorSpec, Numeric, checked_floor_count, estimate,
};

/// Environment variable holding the chat completions API key
const API_KEY_ENV: &str = "LLM_API_KEY";

#[derive(Parser)]
#[command(name = "construction-estimator")]
#[command(about = "Material, cost and layout estimates for building projects")]
struct Cli {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct ProjectArgs {
    /// Built-up area in square yards
    #[arg(short, long)]
    area: Option<String>,

    /// Floor count, e.g. "3" or "G+2"
    #[arg(short, long)]
    floors: Option<String>,

    /// Cost per square yard
    #[arg(short, long)]
    rate: Option<String>,

    /// Read the request from a JSON file; flags override its fields
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate materials, costs and floor layout
    Estimate {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show the floor layout of a building
    Blueprint {
        /// Floor count, e.g. "3" or "G+2"
        #[arg(short, long)]
        floors: Option<String>,

        /// Write one SVG file per floor into this directory
        #[arg(long)]
        svg_dir: Option<PathBuf>,
    },

    /// Show the construction schedule
    Schedule {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print JSON instead of a list
        #[arg(long)]
        json: bool,
    },

    /// Full project report (estimate and schedule) as JSON
    Report {
        #[command(flatten)]
        project: ProjectArgs,
    },

    /// Ask the construction assistant a question
    Chat {
        /// Question text
        #[arg(required = true)]
        message: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load(cli.config.as_deref())?;
    let level = cli.log_level.as_deref().unwrap_or(&settings.log_level);
    logger::init(level)?;

    // Without an API key, schedules and chat use their fallbacks
    let remote = remote_generator(&settings);
    let generator = remote.as_ref().map(|g| g as &dyn TextGenerator);

    match cli.command {
        Commands::Estimate { project, json } => {
            let request = build_request(&settings, project)?;
            match estimate(&request) {
                Ok(result) if json => println!("{}", serde_json::to_string_pretty(&result)?),
                Ok(result) => print!("{}", result),
                Err(e) => return report_error(&e.to_string(), json),
            }
        }

        Commands::Blueprint { floors, svg_dir } => {
            let spec = match floors {
                Some(text) => FloorSpec::Text(text),
                None => settings.defaults.floors.clone().unwrap_or_default(),
            };
            let floors = match checked_floor_count(&spec) {
                Ok(floors) => floors,
                Err(e) => return report_error(&e.to_string(), false),
            };
            let plans = blueprint::generate_blueprint(floors);

            match svg_dir {
                Some(dir) => write_svgs(&dir, &plans)?,
                None => {
                    for plan in &plans {
                        println!("{}", plan);
                    }
                }
            }
        }

        Commands::Schedule { project, json } => {
            let request = build_request(&settings, project)?;
            let area = match request.built_up_area.to_f64("built_up_area") {
                Ok(area) => area,
                Err(e) => return report_error(&e.to_string(), json),
            };
            let schedule = planner::schedule_for(generator, area, &request.floors.to_string());

            if json {
                println!("{}", serde_json::to_string_pretty(&schedule)?);
            } else {
                for entry in &schedule {
                    println!("Week {:<6} {}", entry.week, entry.phase);
                    if !entry.activities.is_empty() {
                        println!("            {}", entry.activities.join(" • "));
                    }
                }
            }
        }

        Commands::Report { project } => {
            let request = build_request(&settings, project)?;
            match planner::plan_project(&request, generator) {
                Ok(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                Err(e) => return report_error(&e.to_string(), true),
            }
        }

        Commands::Chat { message } => {
            let reply = planner::chat_reply(generator, &message.join(" "));
            println!("{}", reply.text());
            if reply.is_error() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Chat completions client, when an API key is present in the environment
fn remote_generator(settings: &Settings) -> Option<OpenAiCompatibleGenerator> {
    let key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())?;
    match OpenAiCompatibleGenerator::new(&settings.generator, Some(key)) {
        Ok(generator) => {
            info!(model = %settings.generator.model, "using remote text generator");
            Some(generator)
        }
        Err(e) => {
            warn!(error = %e, "could not build text generator, using fallbacks");
            None
        }
    }
}

/// Combine the request file, flags and configured defaults into one request
fn build_request(settings: &Settings, project: ProjectArgs) -> Result<EstimateRequest> {
    let Some(path) = project.input else {
        return Ok(settings.request(project.area, project.floors, project.rate));
    };

    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let mut request: EstimateRequest =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))?;

    if let Some(area) = project.area {
        request.built_up_area = Numeric::Text(area);
    }
    if let Some(floors) = project.floors {
        request.floors = FloorSpec::Text(floors);
    }
    if let Some(rate) = project.rate {
        request.cost_per_sq_area = Numeric::Text(rate);
    }

    Ok(request)
}

/// Report an invalid request and exit with a failure status
fn report_error(message: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&json!({ "error": message }))?);
    } else {
        eprintln!("error: {}", message);
    }
    std::process::exit(1);
}

fn write_svgs(dir: &Path, plans: &[FloorPlan]) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    for (i, plan) in plans.iter().enumerate() {
        let path = dir.join(format!("floor-{}.svg", i));
        fs::write(&path, render_svg(plan))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(floor = %plan.floor_name, path = %path.display(), "wrote floor plan");
        println!("{} -> {}", plan.floor_name, path.display());
    }

    Ok(())
}
