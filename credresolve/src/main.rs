use clap::Parser;
use log::{debug, error};

use credresolve::{Args, build_properties, execute_command};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.parse().unwrap_or(log::LevelFilter::Info))
        .target(env_logger::Target::Stderr)
        .init();

    debug!("Starting credresolve with args: {:?}", std::env::args());

    let result = match build_properties(&args) {
        Ok(properties) => execute_command(&args.command, properties).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(output) => println!("{}", output.trim_end()),
        Err(e) => {
            error!("{e}");
            std::process::exit(e.exit_code());
        }
    }
}
