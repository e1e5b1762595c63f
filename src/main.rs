use clap::Parser;
use flow_variableizer::cli::{self, Cli};
use flow_variableizer::error::FlowError;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli::get_log_level(cli.verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .init();

    debug!("flow-variableizer started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = cli::execute(cli).await {
        error!("Fatal error: {:#}", e);
        let exit_code = match e.downcast_ref::<FlowError>() {
            Some(flow_error) => {
                eprintln!("Error: {}", flow_error.user_message());
                flow_error.exit_code()
            }
            None => {
                eprintln!("Error: {e}");
                1
            }
        };
        std::process::exit(exit_code);
    }
}
