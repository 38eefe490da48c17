#![forbid(unsafe_code)]

//! ScrollPic replay demo binary entry point.

use std::io::{self, BufWriter, Write};

use scrollpic_demo::cli;
use scrollpic_demo::replay;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn init_logging() {
    let filter = std::env::var("SCROLLPIC_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();
}

fn main() {
    init_logging();
    let opts = cli::Opts::parse();

    let frames = match replay::replay(&opts) {
        Ok(frames) => frames,
        Err(e) => {
            eprintln!("Replay error: {e}");
            std::process::exit(1);
        }
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for frame in &frames {
        let written = serde_json::to_writer(&mut out, frame)
            .map_err(io::Error::from)
            .and_then(|()| out.write_all(b"\n"));
        if let Err(e) = written {
            eprintln!("Output error: {e}");
            std::process::exit(1);
        }
    }
    if let Err(e) = out.flush() {
        eprintln!("Output error: {e}");
        std::process::exit(1);
    }
}
