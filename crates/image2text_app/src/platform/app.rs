use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{anyhow, Context};
use engine_logging::{engine_info, engine_warn};
use image2text_core::{ModelName, Msg, OperationKind, WorkflowState, WorkflowType, WorkflowView};
use image2text_engine::{ReqwestTransport, RetryingTransport, WorkflowController};

use super::config::ClientConfig;
use super::ui;
use super::upload;

/// One command line invocation's worth of work.
#[derive(Debug, Clone)]
pub enum Job {
    Generate {
        file: PathBuf,
        workflow_type: WorkflowType,
    },
    Resize {
        file: PathBuf,
        width: u32,
        height: u32,
    },
    Poetry {
        text: String,
    },
}

impl Job {
    fn kind(&self) -> OperationKind {
        match self {
            Job::Generate { workflow_type, .. } => OperationKind::ImageGenerate {
                workflow_type: *workflow_type,
            },
            Job::Resize { width, height, .. } => OperationKind::ImageResize {
                width: *width,
                height: *height,
            },
            Job::Poetry { .. } => OperationKind::PoetryGenerate,
        }
    }

    fn input_msg(&self) -> anyhow::Result<Msg> {
        match self {
            Job::Generate { file, .. } | Job::Resize { file, .. } => {
                Ok(Msg::FileSelected(upload::load_candidate(file)?))
            }
            Job::Poetry { text } => Ok(Msg::TextChanged(text.clone())),
        }
    }
}

/// Runs `job` to a terminal state, printing every state change on stdout.
pub async fn run(
    config: &ClientConfig,
    model: ModelName,
    job: Job,
) -> anyhow::Result<WorkflowState> {
    let transport =
        ReqwestTransport::new(config.transport_settings()).context("invalid transport settings")?;
    let controller =
        WorkflowController::new(RetryingTransport::new(transport), config.retry_policy());
    let printer = spawn_printer(controller.subscribe());

    engine_info!("Running {:?} with model {}", job.kind(), model);
    controller.dispatch(job.input_msg()?).await;
    let state = controller
        .dispatch(Msg::SubmitClicked {
            kind: job.kind(),
            model,
        })
        .await;

    // Dropping the controller closes the channel and ends the printer.
    drop(controller);
    printer
        .join()
        .map_err(|_| anyhow!("output thread panicked"))?;

    if let WorkflowState::Failed(failure) = &state {
        engine_warn!("Workflow failed: {}", failure);
    }
    Ok(state)
}

fn spawn_printer(updates: mpsc::Receiver<WorkflowView>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut previous = Vec::new();
        for view in updates {
            let lines = ui::render::render(&view);
            if lines != previous {
                for line in &lines {
                    println!("{line}");
                }
                previous = lines;
            }
        }
    })
}
