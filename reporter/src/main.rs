use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use common::{config::Config, logger::init_logger};
use grader::GradingJob;
use grader::utilities::file_loader::JsonFileAttemptStore;
use tracing::{error, info};
use util::grading_config::GraderConfig;

#[derive(Parser, Debug)]
#[command(version, about = "Analyze and grade one student's attempt log")]
struct Args {
    /// JSON array of attempt records
    attempts: PathBuf,
    /// Student whose session is graded
    student_id: String,
    /// Grading configuration (JSON). Overrides GRADER_CONFIG_PATH.
    config: Option<PathBuf>,
    /// Write the report here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Environment file
    #[arg(long, default_value = ".env")]
    env: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let env = Config::init(&args.env);
    let _log_guard = init_logger(&env.log_level, &env.log_dir, &env.log_file, env.log_to_stdout);
    info!(project = %env.project_name, "starting");

    if let Err(e) = run(&args, env) {
        error!("{e:#}");
        return Err(e);
    }
    Ok(())
}

fn run(args: &Args, env: &Config) -> Result<()> {
    let config_path = args
        .config
        .clone()
        .or_else(|| env.grader_config_path.as_ref().map(PathBuf::from));
    let config = load_config(config_path.as_deref())?;

    let store = JsonFileAttemptStore::new(&args.attempts);
    info!(path = %store.path().display(), student_id = %args.student_id, "reading attempt log");
    let response = GradingJob::new(&store, &args.student_id)
        .with_config(config)
        .context("grading configuration rejected")?
        .run()
        .with_context(|| format!("failed to grade {}", args.student_id))?;

    let json = serde_json::to_string_pretty(&response).context("failed to serialize report")?;
    match &args.out {
        Some(path) => {
            fs::write(path, json)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GraderConfig> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading grading configuration");
            GraderConfig::load(path).map_err(|e| anyhow!(e))
        }
        None => Ok(GraderConfig::default_config()),
    }
}
