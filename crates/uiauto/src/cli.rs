//! Command line interface for inspecting resolved configuration.

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::json;
use std::fmt::Write as _;
use std::path::PathBuf;
use uiauto_artifacts::{ArtifactKind, ArtifactPaths};
use uiauto_config::{ConfigResolver, DEFAULT_CONFIG_DIR, ResolvedConfig, ResolverOptions};

/// uiauto command line.
#[derive(Debug, Parser)]
#[command(name = "uiauto", version, about = "Inspect layered UI automation config")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the resolved configuration.
    Config {
        #[command(flatten)]
        source: SourceArgs,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
        format: OutputFormat,
        /// Print the account password instead of masking it.
        #[arg(long)]
        show_secrets: bool,
    },
    /// Print where failure artifacts for a test would be written.
    Paths {
        /// Test name used in artifact file names.
        test_name: String,
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Where to read config documents from.
#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Directory holding config.yaml and config_<env>.yaml.
    #[arg(long, default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: PathBuf,
    /// Active environment; overrides the base document's `env`.
    #[arg(long, env = "UI_AUTOMATION_ENV")]
    pub env: Option<String>,
}

impl SourceArgs {
    pub fn options(&self) -> ResolverOptions {
        let options = ResolverOptions::without_env(&self.config_dir);
        match self.env.as_deref() {
            Some(env) => options.with_env_override(env),
            None => options,
        }
    }

    pub fn resolver(&self) -> ConfigResolver {
        ConfigResolver::new(self.options())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Render the resolved config with the documents it came from.
pub fn render_config(
    config: &ResolvedConfig,
    format: OutputFormat,
    show_secrets: bool,
) -> anyhow::Result<String> {
    let document = if show_secrets {
        config.document.clone()
    } else {
        config.redacted_document()
    };

    match format {
        OutputFormat::Yaml => {
            let mut out = String::new();
            writeln!(out, "# env: {}", config.env)?;
            for source in &config.sources {
                writeln!(out, "# {}: {}", source.source.as_str(), source.path.display())?;
            }
            out.push_str(&serde_yaml::to_string(&document).context("failed to render yaml")?);
            Ok(out)
        }
        OutputFormat::Json => {
            let sources: Vec<_> = config
                .sources
                .iter()
                .map(|source| {
                    json!({
                        "source": source.source.as_str(),
                        "path": source.path.display().to_string(),
                    })
                })
                .collect();
            let config_value =
                serde_json::to_value(&document).context("failed to convert config to json")?;
            let rendered = json!({
                "env": config.env,
                "sources": sources,
                "config": config_value,
            });
            Ok(serde_json::to_string_pretty(&rendered)?)
        }
    }
}

/// Screenshot and trace paths for `test_name` at `timestamp`.
pub fn failure_paths(
    config: &ResolvedConfig,
    test_name: &str,
    timestamp: NaiveDateTime,
) -> Vec<(ArtifactKind, PathBuf)> {
    let paths = ArtifactPaths::from_config(config);
    [ArtifactKind::Screenshot, ArtifactKind::Trace]
        .into_iter()
        .map(|kind| (kind, paths.path_for(kind, test_name, timestamp)))
        .collect()
}

/// Execute a parsed command and return what should be printed.
pub fn run(cli: Cli) -> anyhow::Result<String> {
    match cli.command {
        Command::Config {
            source,
            format,
            show_secrets,
        } => {
            let config = source
                .resolver()
                .resolve()
                .context("failed to resolve config")?;
            render_config(&config, format, show_secrets)
        }
        Command::Paths { test_name, source } => {
            let config = source
                .resolver()
                .resolve()
                .context("failed to resolve config")?;
            let now = chrono::Local::now().naive_local();
            let mut out = String::new();
            for (kind, path) in failure_paths(&config, &test_name, now) {
                writeln!(out, "{kind:?}: {}", path.display())?;
            }
            Ok(out)
        }
    }
}
