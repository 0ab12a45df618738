//! Command line tool to serve the prediction form

use anyhow::Result;
use car_evaluator::server::{self, Context};
use pico_args::Arguments;

const HELP: &str = "\
Usage: serve [OPTIONS]

Options:
  -h, --help           Print help
  -a, --artifacts      The artifact directory written by the trainer (defaults to 'artifacts')
  -p, --port           The port to bind (defaults to 4000)
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The artifact directory to load
    artifacts: Option<String>,

    /// The port to bind
    port: Option<u16>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let args = Args {
        help: pargs.contains(["-h", "--help"]),
        artifacts: pargs.opt_value_from_str(["-a", "--artifacts"])?,
        port: pargs.opt_value_from_str(["-p", "--port"])?,
    };

    Ok(args)
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let args = parse_args()?;

    if args.help {
        println!("{}", HELP);

        return Ok(());
    }

    let artifact_dir = args
        .artifacts
        .unwrap_or_else(|| "artifacts".to_string());

    let context = Context::load(&artifact_dir)?;

    server::serve(context, args.port.unwrap_or(server::DEFAULT_PORT)).await
}
