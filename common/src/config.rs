use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::env;

/// Runtime settings for the grading runner, read from the environment (and an optional
/// `.env` file).
#[derive(Debug, Deserialize)]
pub struct Config {
    pub project_name: String,
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    /// JSON file overriding the default grading configuration.
    pub grader_config_path: Option<String>,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

impl Config {
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();

        CONFIG.get_or_init(Self::from_env)
    }

    fn from_env() -> Self {
        let project_name = env::var("PROJECT_NAME").unwrap_or_else(|_| "curve-grader".into());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".into());
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| "grader.log".into());
        let log_to_stdout = env::var("LOG_TO_STDOUT")
            .map(|v| parse_flag(&v))
            .unwrap_or(true);
        let grader_config_path = env::var("GRADER_CONFIG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty());

        Config {
            project_name,
            log_level,
            log_dir,
            log_file,
            log_to_stdout,
            grader_config_path,
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
