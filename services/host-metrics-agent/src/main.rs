use host_metrics_agent::collectors::{SysinfoCpuReader, SysinfoMemoryReader};
use host_metrics_agent::config::{self, AgentConfig};
use host_metrics_agent::publishers::{wait_for_report, HttpTransport, RemoteReporter, StdoutEmitter};
use host_metrics_agent::{logging, Agent, ConfigLoadError, SampleAssembler, SystemClock};
use tracing::{error, info, info_span, warn, Instrument, Span};
use uuid::Uuid;

#[tokio::main]
async fn main() {
    logging::init();

    match config::load_env_file() {
        Ok(_) => {}
        Err(ConfigLoadError::EnvFileMissing) => {
            info!("No .env file found, using process environment")
        }
        Err(e) => warn!(error = %e, "Error loading .env file"),
    }
    let config = AgentConfig::load();

    let span = info_span!("sample", run_id = %Uuid::new_v4());
    run(config).instrument(span).await;
}

async fn run(config: AgentConfig) {
    let reporter = match HttpTransport::new() {
        Ok(transport) => RemoteReporter::new(config.destination_url.clone(), transport),
        Err(e) => RemoteReporter::disabled(format!("{e:#}")),
    };

    let mut agent = Agent::new(
        SampleAssembler::new(
            SysinfoCpuReader::new(config.cpu_window()),
            SysinfoMemoryReader::new(),
            SystemClock,
        ),
        StdoutEmitter::stdout(),
        reporter,
    );

    // The CPU reader sleeps through its window, keep it off the async workers.
    let span = Span::current();
    let outcome = tokio::task::spawn_blocking(move || span.in_scope(|| agent.run_once())).await;

    match outcome {
        Ok(outcome) => {
            if let Some(report) = outcome.report {
                wait_for_report(report, config.report_grace()).await;
            }
        }
        Err(e) => error!(error = %e, "Sampling task failed"),
    }
}
