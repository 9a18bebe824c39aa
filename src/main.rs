use clap::{Parser, Subcommand};
use photo_frame::config;
use photo_frame::imaging::{EncodeFormat, RustBackend};
use photo_frame::orchestrator::{Orchestrator, SessionEvent};
use photo_frame::output;
use photo_frame::types::CropRectangle;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;

#[derive(Parser)]
#[command(name = "photo-frame")]
#[command(about = "Crop a photo into a circle and place it inside a decorative frame")]
#[command(long_about = "\
Crop a photo into a circle and place it inside a decorative frame

The crop rectangle is given in percent of the photo: x and y are the top-left
corner, w and h the size. By default it is square and starts at 5,5,90,90;
a non-square rectangle is shrunk around its center until it is square.

  photo-frame frame portrait.jpg                  # → ./framed-photo.png
  photo-frame frame portrait.jpg --crop 20,5,60,60 --output out/
  photo-frame crop portrait.jpg                   # → ./portrait-crop.jpg

Run 'photo-frame gen-config' to generate a documented config.toml.
Set RUST_LOG=photo_frame=debug to see why a step produced nothing.")]
#[command(version)]
struct Cli {
    /// Directory holding config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    /// Print progress events as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

/// Crop rectangle flag shared by the image commands.
#[derive(clap::Args, Clone)]
struct CropArgs {
    /// Crop rectangle as X,Y,W,H in percent of the photo
    #[arg(long, value_parser = parse_crop)]
    crop: Option<CropArg>,
}

#[derive(Subcommand)]
enum Command {
    /// Crop a photo and write the framed result as framed-photo.png
    Frame {
        /// Photo to frame (jpg, png, tiff, webp)
        photo: PathBuf,
        #[command(flatten)]
        crop: CropArgs,
        /// Directory for framed-photo.png
        #[arg(long, default_value = ".")]
        output: PathBuf,
    },
    /// Write only the cropped photo as JPEG
    Crop {
        /// Photo to crop (jpg, png, tiff, webp)
        photo: PathBuf,
        #[command(flatten)]
        crop: CropArgs,
        /// Output file [default: <photo>-crop.jpg in the current directory]
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

/// `X,Y,W,H` as given on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CropArg([f64; 4]);

fn parse_crop(s: &str) -> Result<CropArg, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{part}' is not a number: {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [x, y, w, h] = values[..] else {
        return Err(format!("expected X,Y,W,H, got {} values", values.len()));
    };
    if values.iter().any(|v| !v.is_finite() || !(0.0..=100.0).contains(v)) {
        return Err("crop values must be between 0 and 100".to_string());
    }
    Ok(CropArg([x, y, w, h]))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Frame {
            photo,
            crop,
            output,
        } => {
            let frame_config = config::load_config(&cli.config)?;
            init_thread_pool(&frame_config.processing);
            let (tx, printer) = spawn_printer(cli.json);
            let mut orch = Orchestrator::new(RustBackend::new(), &frame_config, Some(tx));

            crop_photo(&mut orch, &photo, crop.crop, &frame_config);
            orch.confirm_crop();
            if orch.session().shows_upload_control() {
                log::debug!("no crop from {}; nothing to frame", photo.display());
            } else {
                orch.download(&output);
            }

            drop(orch);
            join_printer(printer)?;
        }
        Command::Crop {
            photo,
            crop,
            output,
        } => {
            let frame_config = config::load_config(&cli.config)?;
            init_thread_pool(&frame_config.processing);
            let (tx, printer) = spawn_printer(cli.json);
            let mut orch = Orchestrator::new(RustBackend::new(), &frame_config, Some(tx));

            crop_photo(&mut orch, &photo, crop.crop, &frame_config);
            orch.confirm_crop();
            let cropped = orch.session().cropped().cloned();

            drop(orch);
            join_printer(printer)?;

            if let Some(cropped) = cropped {
                let format = EncodeFormat::Jpeg(frame_config.crop.quality());
                let path = output.unwrap_or_else(|| default_crop_path(&photo, format));
                std::fs::write(&path, cropped.bytes())?;
                println!("Wrote    {}", path.display());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Feed "file selected", an optional crop adjustment and "crop finalized".
fn crop_photo(
    orch: &mut Orchestrator<RustBackend>,
    photo: &Path,
    crop: Option<CropArg>,
    frame_config: &config::FrameConfig,
) {
    orch.select_file(photo);
    if let Some(CropArg([x, y, width, height])) = crop {
        let initial = frame_config.crop.initial_rectangle();
        orch.adjust_crop(CropRectangle {
            aspect: initial.aspect,
            ..CropRectangle::new(x, y, width, height)
        });
    }
    orch.finalize_crop();
}

/// `<stem>-crop.<ext>` in the current directory.
fn default_crop_path(photo: &Path, format: EncodeFormat) -> PathBuf {
    let stem = photo
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    PathBuf::from(format!("{stem}-crop.{}", format.extension()))
}

/// Print events on a separate thread as they arrive.
fn spawn_printer(json: bool) -> (Sender<SessionEvent>, JoinHandle<()>) {
    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event, json);
        }
    });
    (tx, printer)
}

fn join_printer(printer: JoinHandle<()>) -> Result<(), Box<dyn std::error::Error>> {
    printer
        .join()
        .map_err(|_| "output thread panicked".into())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
