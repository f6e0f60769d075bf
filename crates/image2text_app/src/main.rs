mod platform;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use engine_logging::engine_warn;
use image2text_core::{ModelName, WorkflowState, WorkflowType};

use platform::app::{self, Job};
use platform::config::{self, DEFAULT_CONFIG_FILE};
use platform::logging::{self, LogDestination};

#[derive(Parser)]
#[command(name = "image2text")]
#[command(about = "Postcards, resized images and poetry from the image2text service")]
#[command(version)]
struct Cli {
    /// Config file (RON); missing files fall back to defaults
    #[arg(long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Generation model, overriding `default_model` from the config
    #[arg(long, global = true)]
    model: Option<String>,

    /// Service base URL, overriding `base_url` from the config
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Where log records go, overriding `log_destination` from the config
    #[arg(long, value_enum, global = true)]
    log: Option<LogDestination>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Turn an image into a postcard with generated text
    Generate {
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = WorkflowArg::Mood)]
        workflow: WorkflowArg,
    },
    /// Resize an image on the service
    Resize {
        file: PathBuf,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        width: u32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        height: u32,
    },
    /// Comment on a poem and render it
    Poetry { text: String },
    /// Write a config file with every option at its default
    InitConfig { path: Option<PathBuf> },
}

#[derive(Clone, Copy, ValueEnum)]
enum WorkflowArg {
    Mood,
    Sarcastic,
}

impl From<WorkflowArg> for WorkflowType {
    fn from(arg: WorkflowArg) -> Self {
        match arg {
            WorkflowArg::Mood => WorkflowType::Mood,
            WorkflowArg::Sarcastic => WorkflowType::Sarcastic,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let job = match cli.command {
        Command::InitConfig { path } => {
            let path = path.unwrap_or(cli.config);
            let written = config::write_default(&path)?;
            println!("Wrote {}", written.display());
            return Ok(ExitCode::SUCCESS);
        }
        Command::Generate { file, workflow } => Job::Generate {
            file,
            workflow_type: workflow.into(),
        },
        Command::Resize {
            file,
            width,
            height,
        } => Job::Resize {
            file,
            width,
            height,
        },
        Command::Poetry { text } => Job::Poetry { text },
    };

    let loaded = config::load(&cli.config);
    let mut client_config = loaded.as_ref().ok().cloned().unwrap_or_default();
    logging::initialize(cli.log.unwrap_or(client_config.log_destination));
    if let Err(err) = &loaded {
        engine_warn!("Using default config: {}", err);
    }
    if let Some(base_url) = cli.base_url {
        client_config.base_url = base_url;
    }
    let model = ModelName::new(
        cli.model
            .unwrap_or_else(|| client_config.default_model.clone()),
    );

    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let state = runtime.block_on(app::run(&client_config, model, job))?;

    Ok(match state {
        WorkflowState::Succeeded(_) => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}
