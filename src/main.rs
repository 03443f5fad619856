use clap::Parser;
use mastodon_scout::cli::{self, Config};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::try_parse() {
        Ok(config) => config,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
        Err(err) => err.exit(),
    };

    env_logger::Builder::new()
        .filter_level(config.verbosity().log_level_filter())
        .init();

    cli::run(config).await
}
