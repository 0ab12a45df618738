//! Command line tool to train the classifier offline

use anyhow::Result;
use car_evaluator::training::{self, Config};
use pico_args::Arguments;

const HELP: &str = "\
Usage: train [OPTIONS]

Options:
  -h, --help           Print help
  -s, --source         The dataset source, a URL or a file path (defaults to the UCI archive)
  -a, --artifacts      The directory to write artifacts to (defaults to 'artifacts')
  -n, --num-trees      The number of trees in the forest (defaults to 100)
  --seed               The random seed for the split and the forest (defaults to 42)
";

#[derive(Debug)]
struct Args {
    /// Prints the usage menu
    help: bool,

    /// The dataset source to use
    source: Option<String>,

    /// The artifact directory to use
    artifacts: Option<String>,

    /// The number of trees to fit
    num_trees: Option<u16>,

    /// The random seed to use
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();

    let args = Args {
        help: pargs.contains(["-h", "--help"]),
        source: pargs.opt_value_from_str(["-s", "--source"])?,
        artifacts: pargs.opt_value_from_str(["-a", "--artifacts"])?,
        num_trees: pargs.opt_value_from_str(["-n", "--num-trees"])?,
        seed: pargs.opt_value_from_str("--seed")?,
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

    let mut config = Config::default();

    if let Some(source) = args.source {
        config.source = source;
    }

    if let Some(artifacts) = args.artifacts {
        config.artifact_dir = artifacts;
    }

    if let Some(num_trees) = args.num_trees {
        config.n_trees = num_trees;
    }

    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    training::train(&config).await
}
