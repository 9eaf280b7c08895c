//! `calm-bot` executable: parse flags, set up tracing, load tokens, serve.

use calm_bot::base::{config::Config, types::Void};
use clap::Parser;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::{Protocol, WithExportConfig};
use tracing_subscriber::{filter::LevelFilter, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt};

/// Answers `/calm`, mentions and direct messages on Slack.
///
/// Needs `SLACK_BOT_TOKEN` and `SLACK_APP_TOKEN`, from the environment or a TOML file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML file with the tokens; defaults to `.hidden/config.toml` when present.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
    /// Log more: `-v` for debug, `-vv` for trace.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Also export spans to the OTLP/HTTP collector named by the `OTEL_EXPORTER_OTLP_*` variables.
    #[arg(long)]
    otlp: bool,
}

/// Installs the global subscriber: stdout always, OTLP on request.
fn init_tracing(verbose: u8, otlp: bool) -> Void {
    let level_filter = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let stdout = tracing_subscriber::fmt::layer()
        .without_time()
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE);

    let otel = if otlp {
        let exporter = opentelemetry_otlp::SpanExporter::builder().with_http().with_protocol(Protocol::HttpBinary).build()?;
        let tracer = opentelemetry_sdk::trace::SdkTracerProvider::builder().with_simple_exporter(exporter).build().tracer("calm-bot");
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry().with(otel).with(level_filter).with(stdout).init();

    Ok(())
}

#[tokio::main]
async fn main() -> Void {
    let args = Args::parse();

    init_tracing(args.verbose, args.otlp)?;

    // Missing tokens stop the process here, before anything connects.
    let config = Config::load(args.config.as_deref())?;

    calm_bot::start(config).await
}
