//! Classify the webcam stream and selected image files.
//!
use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::Result;
use cam_classify::{
    console::ConsoleSurface,
    sensors::V4lCamera,
    shell::{spawn_line_reader, Command, HELP},
};
use clap::Parser;
use classifier::{
    camera::CameraConstraints,
    config::{Config, DEFAULT_METADATA, DEFAULT_MODEL},
    meter::spawn_meter_logger,
    session::Session,
    AssetMap,
};
use common::assets::{DEFAULT_CLASS0_ASSET, DEFAULT_CLASS1_ASSET};
use env_logger::TimestampPrecision;

const STARTUP_NOTICE: &str =
    "Failed to load the model or camera. Check file paths and permissions.";

#[derive(Parser, Debug)]
#[clap(author, version)]
struct Args {
    /// Path or URL of the ONNX model
    #[clap(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Path or URL of the model metadata
    #[clap(long, default_value = DEFAULT_METADATA)]
    metadata: String,

    /// Video device of the user-facing camera
    #[clap(long, default_value = "/dev/video0")]
    device: String,

    /// Width of the camera canvas
    #[clap(long, default_value_t = 320)]
    width: u32,

    /// Height of the camera canvas
    #[clap(long, default_value_t = 240)]
    height: u32,

    /// Do not mirror camera frames
    #[clap(long)]
    no_flip: bool,

    /// Only analyze files
    #[clap(long)]
    no_camera: bool,

    /// Image shown when "Class 2" wins
    #[clap(long, default_value = DEFAULT_CLASS0_ASSET)]
    class0_asset: String,

    /// Image shown when "Class 1" wins
    #[clap(long, default_value = DEFAULT_CLASS1_ASSET)]
    class1_asset: String,

    /// Minimum milliseconds between camera inferences
    #[clap(long, default_value_t = 300)]
    throttle_ms: u64,

    /// Milliseconds between camera frames
    #[clap(long, default_value_t = 33)]
    frame_interval_ms: u64,

    /// Image file to analyze right after startup
    #[clap(long)]
    file: Option<PathBuf>,

    /// Print display changes as JSON lines
    #[clap(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            model: self.model.clone(),
            metadata: self.metadata.clone(),
            assets: AssetMap::new(&self.class0_asset, &self.class1_asset),
            throttle: Duration::from_millis(self.throttle_ms),
            frame_interval: Duration::from_millis(self.frame_interval_ms),
            camera: CameraConstraints {
                device: self.device.clone(),
                width: self.width,
                height: self.height,
                flip: !self.no_flip,
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Setup logger
    env_logger::builder()
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let surface = Arc::new(ConsoleSurface::new(args.json));
    let mut session = match Session::load(args.config(), surface).await {
        Ok(session) => session,
        Err(err) => {
            log::error!("{err:?}");
            eprintln!("{STARTUP_NOTICE}");
            return Ok(ExitCode::FAILURE);
        }
    };

    spawn_meter_logger();

    if !args.no_camera {
        if let Err(err) = session.start_camera(Box::new(V4lCamera::new())).await {
            log::error!("{err:?}");
            eprintln!("{STARTUP_NOTICE}");
        }
    }

    if let Some(path) = &args.file {
        session.select_file(path);
        analyze(&session).await;
    }

    run_shell(&session).await?;

    if let Some(report) = session.shutdown().await {
        log::info!(
            "Camera pulled {} frames, ran {} inferences ({} failed)",
            report.frames,
            report.inferences,
            report.failures
        );
    }

    Ok(ExitCode::SUCCESS)
}

/// Read commands from stdin until `quit`, end of input or Ctrl-C.
async fn run_shell(session: &Session) -> Result<()> {
    let mut lines = spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    println!("{HELP}");

    loop {
        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(line) = line.transpose()? else {
            break;
        };

        match Command::parse(&line) {
            Command::Open(path) => session.select_file(path),
            Command::Analyze => analyze(session).await,
            Command::State => println!("{}", serde_json::to_string_pretty(&session.snapshot())?),
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Empty => {}
            Command::Unknown(line) => println!("Unknown command {line:?}, try `help`"),
        }
    }

    Ok(())
}

async fn analyze(session: &Session) {
    match session.analyze().await {
        Ok(verdict) => log::debug!("File verdict {:?}", verdict),
        Err(err) if err.is_user_error() => println!("Select a file first."),
        Err(err) => {
            log::error!("{err:?}");
            eprintln!("Unable to analyze the selected file: {err}");
        }
    }
}
