use color_eyre::Result;
use liftlog::cli::{parse_args, run, USAGE};
use liftlog::config::ClientConfig;
use liftlog::logging::LoggingConfig;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let command = match parse_args(std::env::args()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    // A second subscriber (tests, embedding) is not fatal.
    if let Err(e) = LoggingConfig::from_env().init() {
        eprintln!("Logging disabled: {}", e);
    }

    run(command, ClientConfig::from_env()).await
}
