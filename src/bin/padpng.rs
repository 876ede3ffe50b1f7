use padpng::{pad, plan_for, Ratio};

use clap::Parser;
use std::{io::Write, path::{Path, PathBuf}, process::ExitCode};

/// Prints log records to stderr, filtered by the `PADPNG_LOG` env var.
struct StderrLogger;
impl log::Log for StderrLogger {
  fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
    metadata.level() <= log::max_level()
  }
  fn log(&self, record: &log::Record<'_>) {
    if self.enabled(record.metadata()) {
      eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
    }
  }
  fn flush(&self) {
    let _ = std::io::stderr().flush();
  }
}
static LOGGER: StderrLogger = StderrLogger;

fn init_logging() {
  let level = std::env::var("PADPNG_LOG")
    .ok()
    .and_then(|s| s.parse::<log::LevelFilter>().ok())
    .unwrap_or(log::LevelFilter::Warn);
  if log::set_logger(&LOGGER).is_ok() {
    log::set_max_level(level);
  }
}

#[derive(Parser)]
#[command(name = "padpng", version, about = "Pads a PNG to a width:height ratio.")]
struct Args {
  /// PNG file to read
  input: PathBuf,

  /// Where to write the padded PNG (or a copy of the input)
  output: PathBuf,

  /// Target ratio as `W:H`
  #[arg(default_value = "3:2")]
  ratio: Ratio,
}

fn main() -> ExitCode {
  let args = Args::parse();
  init_logging();
  if !args.ratio.is_allowed() {
    log::warn!("{} isn't one of the usual ratios, padding anyway", args.ratio);
  }
  match pad_a_png_file(&args.input, &args.output, args.ratio) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      eprintln!("{}: {e}", args.input.display());
      ExitCode::FAILURE
    }
  }
}

/// Pads `input` into `output`, or copies it over unchanged when padding
/// doesn't apply.
fn pad_a_png_file<P: AsRef<Path>>(input: P, output: P, ratio: Ratio) -> std::io::Result<()> {
  let bytes = std::fs::read(input)?;
  match plan_for(&bytes, ratio) {
    Ok(plan) => log::info!("plan: {plan:?}"),
    Err(e) => log::info!("no plan: {e}"),
  }
  let out = match pad(&bytes, ratio) {
    Ok(padded) => {
      log::info!("padded {} bytes into {} bytes", bytes.len(), padded.len());
      padded
    }
    Err(e) => {
      log::info!("using the original bytes: {e}");
      bytes
    }
  };
  std::fs::write(output, out)
}

#[test]
fn test_args_ratio() {
  let args = Args::try_parse_from(["padpng", "in.png", "out.png"]).unwrap();
  assert_eq!(args.input, PathBuf::from("in.png"));
  assert_eq!(args.output, PathBuf::from("out.png"));
  assert_eq!(args.ratio, Ratio::THREE_TWO);
  let args = Args::try_parse_from(["padpng", "in.png", "out.png", "16:9"]).unwrap();
  assert_eq!(args.ratio, Ratio::SIXTEEN_NINE);
  assert!(Args::try_parse_from(["padpng", "in.png", "out.png", "0:9"]).is_err());
  assert!(Args::try_parse_from(["padpng", "in.png"]).is_err());
}
