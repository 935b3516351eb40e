use anyhow::Result;
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use frogsim::{SimConfig, Simulation, SimulationError};

#[derive(Parser)]
#[command(name = "frogsim")]
#[command(about = "Frog population and disease spread simulation", long_about = None)]
#[command(version, disable_help_flag = true)]
struct Cli {
    /// Initial number of frogs
    #[arg(short = 'f', value_name = "N")]
    frogs: Option<u32>,

    /// Initial number of infected frogs
    #[arg(short = 'i', value_name = "N")]
    infected: Option<u32>,

    /// Years to simulate
    #[arg(short = 'y', value_name = "N")]
    years: Option<u32>,

    #[arg(short = 'h', action = ArgAction::SetTrue)]
    usage: bool,
}

impl Cli {
    fn into_config(self) -> SimConfig {
        let defaults = SimConfig::default();
        SimConfig {
            initial_frogs: self.frogs.unwrap_or(defaults.initial_frogs),
            initial_infected: self.infected.unwrap_or(defaults.initial_infected),
            years: self.years.unwrap_or(defaults.years),
            ..defaults
        }
    }
}

fn print_usage() {
    eprint!(
        "\nThe arguments you can provide are:\n\
         \t'-f' <initial number of frogs>\n\
         \t'-i' <initial number of infected frogs>\n\
         \t'-y' <years to simulate>\n\
         \t'-h' Prints this message\n\n"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.usage {
        print_usage();
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.into_config();
    log::debug!("configuration: {}", serde_json::to_string(&config)?);

    let simulation = Simulation::new(config)?;
    match simulation.run().await {
        Ok(report) => {
            println!("{}", report.summary_line());
            Ok(())
        }
        Err(SimulationError::PopulationCap { cap, .. }) => {
            eprintln!("\tMORE THAN {} FROGS! EXITING...", cap);
            std::process::exit(1);
        }
        Err(err) => Err(err.into()),
    }
}
