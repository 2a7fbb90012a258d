use clap::Parser;
use std::io;

use boardlink::core::output::{OutputFormatter, OutputWriter};
use boardlink::logging::{LogConfig, init_logging};
use boardlink::{Args, BoardlinkError, Config, ExitCode, LinkRunner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let args = Args::parse();

    if args.create_config {
        return match Config::create_sample_config() {
            Ok(path) => {
                println!("Sample configuration written to {}", path.display());
                ExitCode::Success.into()
            }
            Err(e) => report_fatal(&args, BoardlinkError::Other(e)),
        };
    }

    let config = match args.resolve_config() {
        Ok(config) => config,
        Err(e) => return report_fatal(&args, e.into()),
    };

    let _log_guard = init_logging(LogConfig::from_args(&args));
    tracing::info!(
        version = boardlink::VERSION,
        owner = %config.owner,
        owner_source = %config.owner.source(),
        repo = %config.repo,
        issues = config.issues.value().len(),
        "starting"
    );

    let result = LinkRunner::new(config, args.output).run().await;
    result.exit_code.into()
}

/// Print an error that happened before the runner took over.
fn report_fatal(args: &Args, err: BoardlinkError) -> std::process::ExitCode {
    let mut output = OutputWriter::new(io::stdout(), args.output);
    let _ = output.write_error(&err.to_string(), &err.remediation());
    let _ = output.flush();
    ExitCode::Failure.into()
}
