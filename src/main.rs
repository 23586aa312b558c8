use anyhow::{Context, Result};
use ged::cli::{self, Args};
use ged::config::{self, Config};
use ged::logger;
use ged::parser::parse_args;
use ged::processor::Processor;
use std::io::{self, BufWriter};
use std::process::ExitCode;
use tracing::debug;

fn main() -> ExitCode {
    match run(cli::parse_args()) {
        Ok(()) => ExitCode::SUCCESS,
        // The reader went away (e.g. `ged … | head`); nothing left to do
        Err(err) if is_broken_pipe(&err) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ged: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;

    let debug_enabled = args.debug || config.debug_enabled();
    if let Some(log_path) = logger::init_debug_logging(debug_enabled, config.log_filter())? {
        debug!(path = %log_path.display(), rules = ?args.rules, "debug logging enabled");
    }

    let rules = parse_args(&args.rules).context("error parsing rules")?;

    let streaming = args.streaming.unwrap_or_else(|| config.streaming_enabled());
    let processor = Processor::with_streaming(rules, streaming);
    debug!(streaming = processor.is_streaming(), "starting");

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();

    if processor.is_streaming() {
        let mut stdout = stdout;
        processor.process(stdin, &mut stdout)
    } else {
        let mut writer = BufWriter::new(stdout);
        processor.process(stdin, &mut writer)
    }
}

fn load_config(args: &Args) -> Result<Config> {
    match &args.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    }
}

fn is_broken_pipe(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|e| e.kind() == io::ErrorKind::BrokenPipe)
    })
}
