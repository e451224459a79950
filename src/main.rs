//! raysynth - render Ray cluster manifests from a cluster request

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};

use raysynth::{synthesize, SynthesisConfig, SynthesisRequest};
use raysynth_common::labels::{DEFAULT_GPU_ACCELERATOR, DEFAULT_IMAGE_REPOSITORY};
use raysynth_common::telemetry::{init_telemetry, LogFormat, TelemetryConfig};
use raysynth_workload::compute_template_config_map;

/// raysynth - synthesize RayCluster and head Service manifests
#[derive(Parser, Debug)]
#[command(name = "raysynth", version, about, long_about = None)]
struct Cli {
    /// Path to the request document (YAML or JSON)
    ///
    /// The document holds `cluster` and `computeTemplates`.
    #[arg(short = 'f', long = "cluster", global = true)]
    cluster_file: Option<PathBuf>,

    /// Image repository used when a group does not set an image
    #[arg(
        long,
        env = "RAYSYNTH_IMAGE_REPOSITORY",
        default_value = DEFAULT_IMAGE_REPOSITORY,
        global = true
    )]
    image_repository: String,

    /// GPU resource key used when a compute template does not set one
    #[arg(
        long,
        env = "RAYSYNTH_GPU_ACCELERATOR",
        default_value = DEFAULT_GPU_ACCELERATOR,
        global = true
    )]
    gpu_accelerator: String,

    /// Log line format (logs go to stderr)
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text, global = true)]
    log_format: LogFormatArg,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the RayCluster and head Service as JSON (default)
    Render,

    /// Print the JSON Schema of the request document
    Schema,

    /// Print the ConfigMap record of one compute template
    Template {
        /// Compute template name
        name: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormatArg {
    Json,
    Text,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Text => LogFormat::Text,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_telemetry(TelemetryConfig {
        format: cli.log_format.into(),
        ..Default::default()
    })
    .context("failed to initialize logging")?;

    let config = SynthesisConfig::default()
        .with_image_repository(&cli.image_repository)
        .with_gpu_accelerator(&cli.gpu_accelerator);

    match cli.command.unwrap_or(Commands::Render) {
        Commands::Schema => {
            let schema = schemars::schema_for!(SynthesisRequest);
            println!("{}", serde_json::to_string_pretty(&schema)?);
        }
        Commands::Render => {
            let request = load_request(cli.cluster_file.as_ref())?;
            let output = synthesize(&request.cluster, &request.template_index(), &config)
                .with_context(|| format!("failed to synthesize cluster '{}'", request.cluster.name))?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Commands::Template { name } => {
            let request = load_request(cli.cluster_file.as_ref())?;
            let index = request.template_index();
            let Some(template) = index.get(&name) else {
                bail!("compute template '{}' not found in request", name);
            };
            let cm = compute_template_config_map(template);
            println!("{}", serde_json::to_string_pretty(&cm)?);
        }
    }

    Ok(())
}

fn load_request(path: Option<&PathBuf>) -> anyhow::Result<SynthesisRequest> {
    let Some(path) = path else {
        bail!("a request document is required (--cluster <FILE>)");
    };
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read request document {:?}", path))?;
    let request = SynthesisRequest::from_yaml(&content)
        .with_context(|| format!("failed to parse request document {:?}", path))?;
    tracing::debug!(
        cluster = %request.cluster.name,
        templates = request.compute_templates.len(),
        "loaded request document"
    );
    Ok(request)
}
