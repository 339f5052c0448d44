use clap::Parser;
use layertree::cli::args::Cli;
use layertree::cli::commands::execute_command;
use layertree::cli::output;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

// Targets that stay quiet even at -ddd.
const NOISY_TARGETS: [&str; 2] = ["config::", "serde_json::"];

fn main() {
    let cli = Cli::parse();

    setup_logging(level_for(cli.debug));

    if let Err(e) = execute_command(&cli) {
        output::error(&e);
        std::process::exit(e.exit_code());
    }
}

/// `-d` count to log level; anything past `-ddd` is trace.
fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn setup_logging(level: LevelFilter) {
    let module_filter = filter_fn(|metadata| {
        !NOISY_TARGETS
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(level).with_filter(module_filter))
        .init();

    tracing::debug!("log level: {}", level);
}
