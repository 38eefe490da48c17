#![forbid(unsafe_code)]

//! Command-line argument parsing for the replay demo.
//!
//! Parses args manually and accepts environment overrides via the
//! `SCROLLPIC_DEMO_*` prefix.

use std::env;
use std::process;

use crate::script::{self, Step};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
ScrollPic replay demo

Mounts a carousel on an in-memory page, drives it on a virtual clock and
prints one JSON object per line for every mount, input and settled transition.

USAGE:
    scrollpic-demo [OPTIONS]

OPTIONS:
    --slides=N           Number of slides (default: 5)
    --width=PX           Slide width in pixels (default: 600)
    --height=PX          Slide height in pixels (default: 300)
    --duration-ms=MS     Virtual time to simulate (default: 10000)
    --frame-ms=MS        Clock step between frames (default: 5)
    --wheelable          Enable wheel input
    --script=LIST        Comma-separated T@ACTION inputs, e.g. 100@right,900@index:3
                         ACTION: right | left | index:D | wheel:DELTA | enter | leave
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    SCROLLPIC_DEMO_SLIDES       Override --slides
    SCROLLPIC_DEMO_WIDTH        Override --width
    SCROLLPIC_DEMO_HEIGHT       Override --height
    SCROLLPIC_DEMO_DURATION_MS  Override --duration-ms
    SCROLLPIC_DEMO_FRAME_MS     Override --frame-ms
    SCROLLPIC_DEMO_WHEELABLE    Override --wheelable (1|true)
    SCROLLPIC_DEMO_SCRIPT       Override --script
    SCROLLPIC_LOG               Log filter for stderr (falls back to RUST_LOG, default: warn)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    pub slides: usize,
    pub width: f64,
    pub height: f64,
    /// Virtual time to simulate.
    pub duration_ms: u64,
    /// Clock step between frames.
    pub frame_ms: u64,
    pub wheelable: bool,
    pub script: Vec<Step>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            slides: 5,
            width: 600.0,
            height: 300.0,
            duration_ms: 10_000,
            frame_ms: 5,
            wheelable: false,
            script: Vec::new(),
        }
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

fn parse_value<T: std::str::FromStr>(flag: &str, val: &str) -> Result<T, String> {
    val.trim()
        .parse()
        .map_err(|_| format!("Invalid {flag} value: {val}"))
}

fn parse_flag(val: &str) -> bool {
    matches!(val.trim(), "1" | "true" | "yes" | "on")
}

impl Opts {
    /// Parse process arguments and environment, exiting on `--help`,
    /// `--version` or bad input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match parse_from(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("scrollpic-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

/// Parse `args` with `var` supplying environment overrides.
///
/// Environment variables take precedence over defaults but are overridden by
/// explicit command-line flags.
pub fn parse_from(
    args: &[String],
    var: impl Fn(&str) -> Option<String>,
) -> Result<Command, String> {
    let mut opts = Opts::default();

    if let Some(val) = var("SCROLLPIC_DEMO_SLIDES") {
        opts.slides = parse_value("SCROLLPIC_DEMO_SLIDES", &val)?;
    }
    if let Some(val) = var("SCROLLPIC_DEMO_WIDTH") {
        opts.width = parse_value("SCROLLPIC_DEMO_WIDTH", &val)?;
    }
    if let Some(val) = var("SCROLLPIC_DEMO_HEIGHT") {
        opts.height = parse_value("SCROLLPIC_DEMO_HEIGHT", &val)?;
    }
    if let Some(val) = var("SCROLLPIC_DEMO_DURATION_MS") {
        opts.duration_ms = parse_value("SCROLLPIC_DEMO_DURATION_MS", &val)?;
    }
    if let Some(val) = var("SCROLLPIC_DEMO_FRAME_MS") {
        opts.frame_ms = parse_value("SCROLLPIC_DEMO_FRAME_MS", &val)?;
    }
    if let Some(val) = var("SCROLLPIC_DEMO_WHEELABLE") {
        opts.wheelable = parse_flag(&val);
    }
    if let Some(val) = var("SCROLLPIC_DEMO_SCRIPT") {
        opts.script = script::parse(&val).map_err(|e| e.to_string())?;
    }

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            "--wheelable" => opts.wheelable = true,
            other => {
                if let Some(val) = other.strip_prefix("--slides=") {
                    opts.slides = parse_value("--slides", val)?;
                } else if let Some(val) = other.strip_prefix("--width=") {
                    opts.width = parse_value("--width", val)?;
                } else if let Some(val) = other.strip_prefix("--height=") {
                    opts.height = parse_value("--height", val)?;
                } else if let Some(val) = other.strip_prefix("--duration-ms=") {
                    opts.duration_ms = parse_value("--duration-ms", val)?;
                } else if let Some(val) = other.strip_prefix("--frame-ms=") {
                    opts.frame_ms = parse_value("--frame-ms", val)?;
                } else if let Some(val) = other.strip_prefix("--script=") {
                    opts.script = script::parse(val).map_err(|e| e.to_string())?;
                } else {
                    return Err(format!("Unknown argument: {other}"));
                }
            }
        }
    }

    if opts.frame_ms == 0 {
        return Err("--frame-ms must be at least 1".to_string());
    }
    Ok(Command::Run(opts))
}
