use clap::{Parser, Subcommand};
use simple_fit::config::{self, FitConfig};
use simple_fit::imaging::{
    FileHandle, FsFileList, RustBackend, ScaleOptions, enumerate_files,
    environment_supports_file_reading, read_as_encoded_image, scale,
};
use simple_fit::output;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Bounding box for the `scale` command.
#[derive(clap::Args, Clone)]
struct BoundsArgs {
    /// Maximum height in pixels (exact height with --stretch)
    #[arg(long)]
    height: Option<u32>,
    /// Maximum width in pixels (exact width with --stretch)
    #[arg(long)]
    width: Option<u32>,
    /// Set each axis independently instead of keeping the aspect ratio
    #[arg(long)]
    stretch: bool,
}

impl BoundsArgs {
    fn options(&self) -> ScaleOptions {
        ScaleOptions {
            height: self.height,
            width: self.width,
            preserve_ratio: !self.stretch,
        }
    }
}

#[derive(Parser)]
#[command(name = "simple-fit")]
#[command(about = "Read images as data URLs and scale them to fit a bounding box")]
#[command(long_about = "\
Read images as data URLs and scale them to fit a bounding box

Directories passed as paths expand to the image files beneath them, sorted
by name. Everything else keeps the order given on the command line.

Scaling rules:
  Keep ratio (default): only shrinks, and only when a given limit is
                        exceeded. Images that already fit are returned
                        byte-for-byte unchanged.
  --stretch:            each given axis is set exactly; missing axes keep
                        their natural size.

Run 'simple-fit gen-config' to generate a documented simple-fit.toml.")]
#[command(version)]
struct Cli {
    /// Config file [default: ./simple-fit.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the files a set of paths expands to
    List {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Read files as data URLs and report their dimensions
    Encode {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Print one JSON object per file, including the full data URL
        #[arg(long)]
        json: bool,
    },
    /// Scale one image to fit a bounding box
    Scale {
        path: PathBuf,
        #[command(flatten)]
        bounds: BoundsArgs,
        /// Write the resulting data URL here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Print the result as JSON (data URL + dimensions)
        #[arg(long)]
        json: bool,
    },
    /// Print a stock simple-fit.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let fit_config = load_cli_config(cli.config.as_deref())?;
    let backend = RustBackend::with_settings(fit_config.render_settings());

    match cli.command {
        Command::List { paths } => {
            let list = FsFileList::from_paths(&paths)?;
            output::print_lines(&output::format_file_list(&enumerate_files(&list)));
        }
        Command::Encode { paths, json } => {
            ensure_file_reading(&backend)?;
            let list = FsFileList::from_paths(&paths)?;
            let files = enumerate_files(&list);
            let mut failed = 0;

            for (i, file) in files.iter().enumerate() {
                let outcome = within(fit_config.timeout(), read_as_encoded_image(&backend, file)).await;
                match outcome {
                    Ok(Ok(blob)) if json => println!("{}", serde_json::to_string(&blob)?),
                    Ok(Ok(blob)) => output::print_lines(&output::format_blob(i + 1, &blob)),
                    Ok(Err(e)) => {
                        failed += 1;
                        report_failure(i + 1, file.name(), &e, json)?;
                    }
                    Err(elapsed) => {
                        failed += 1;
                        report_failure(i + 1, file.name(), &elapsed, json)?;
                    }
                }
            }

            if failed > 0 {
                return Err(format!("{} of {} files failed", failed, files.len()).into());
            }
        }
        Command::Scale {
            path,
            bounds,
            out,
            json,
        } => {
            // Reject empty bounds before touching the file
            let options = bounds.options();
            options.validate()?;
            ensure_file_reading(&backend)?;

            let list = FsFileList::from_paths([&path])?;
            let file = enumerate_files(&list)
                .into_iter()
                .next()
                .ok_or_else(|| format!("no image found at {}", path.display()))?;

            let blob = within(fit_config.timeout(), read_as_encoded_image(&backend, &file)).await??;
            let pending = scale(&backend, &blob.base64, &options)?;
            let result = within(fit_config.timeout(), pending).await??;

            let rendered = if json {
                serde_json::to_string(&result)?
            } else {
                result.base64.to_string()
            };
            match out {
                Some(out) => {
                    std::fs::write(&out, &rendered)?;
                    let destination = out.display().to_string();
                    output::print_lines(&output::format_scale(
                        &blob.name,
                        blob.dimensions,
                        &result,
                        &destination,
                    ));
                }
                None => println!("{}", rendered),
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (warnings only by default).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load `--config` if given (it must exist), else `./simple-fit.toml` if present.
fn load_cli_config(explicit: Option<&Path>) -> Result<FitConfig, config::ConfigError> {
    match explicit {
        Some(path) if !path.exists() => Err(config::ConfigError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("config file not found: {}", path.display()),
        ))),
        Some(path) => config::load_config(path),
        None => config::load_config(Path::new(config::CONFIG_FILE_NAME)),
    }
}

fn ensure_file_reading(backend: &RustBackend) -> Result<(), String> {
    if environment_supports_file_reading(backend) {
        Ok(())
    } else {
        Err("file reading is not supported in this environment".to_string())
    }
}

/// Await `fut`, giving up after `limit` if one is set.
async fn within<F: Future>(
    limit: Option<Duration>,
    fut: F,
) -> Result<F::Output, tokio::time::error::Elapsed> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut).await,
        None => Ok(fut.await),
    }
}

fn report_failure(
    index: usize,
    name: &str,
    error: &dyn std::fmt::Display,
    json: bool,
) -> Result<(), serde_json::Error> {
    if json {
        let line = serde_json::json!({ "name": name, "error": error.to_string() });
        println!("{}", serde_json::to_string(&line)?);
    } else {
        output::print_lines(&output::format_failure(index, name, error));
    }
    Ok(())
}
