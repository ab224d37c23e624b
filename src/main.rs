//! Netscope CLI - analyse a network topology described in a TOML file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use netscope::{
    config::TopologyFile,
    report::NOT_APPLICABLE,
    route::{minimum_spanning_tree, shortest_path},
    session::Session,
    topology::classify,
    tour::approximate_tour,
};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Analyse network topologies: detect their shape, route over them, and compute minimum
/// spanning trees and tours.
#[derive(Parser)]
#[command(name = "netscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = r#"
Analyse a network topology of PCs, switches and routers joined by weighted links.

The topology is read from a TOML file:

  [[devices]]
  id = "R1"
  kind = "Router"

  [[links]]
  u = "R1"
  v = "S1"
  weight = 10

Examples:
  netscope report office.toml --from R1 --to PC3
  netscope classify office.toml
  netscope tour office.toml --json
"#)]
struct Cli {
    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the complete analysis report
    Report {
        /// Topology file
        file: PathBuf,

        /// Route source, overrides the file's [route] section
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Route target, overrides the file's [route] section
        #[arg(long, requires = "from")]
        to: Option<String>,
    },

    /// Detect the topology
    Classify {
        /// Topology file
        file: PathBuf,
    },

    /// Compute the cheapest route between two devices
    Route {
        /// Topology file
        file: PathBuf,
        from: String,
        to: String,
    },

    /// Compute the minimum spanning tree (or forest)
    Mst {
        /// Topology file
        file: PathBuf,
    },

    /// Approximate a tour visiting every device
    Tour {
        /// Topology file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match &cli.command {
        Commands::Report { file, from, to } => {
            let (topology, session) = load(file)?;
            let route = match (from, to) {
                (Some(from), Some(to)) => Some((from.as_str(), to.as_str())),
                _ => topology.route(),
            };

            let report = session
                .analyze(route)
                .context("failed to analyse the topology")?;

            if cli.json {
                print_json(&report)?;
            } else {
                print!("{report}");
            }
        }
        Commands::Classify { file } => {
            let (_, session) = load(file)?;
            let classification = classify(&session.build_graph()?);

            if cli.json {
                print_json(&classification)?;
            } else {
                println!("{}", classification.topology);
                println!("{}", classification.reason);
            }
        }
        Commands::Route { file, from, to } => {
            let (_, session) = load(file)?;
            let route = shortest_path(&session.build_graph()?, from, to)
                .with_context(|| format!("failed to route from {from} to {to}"))?;

            if cli.json {
                print_json(&route)?;
            } else {
                println!("{}", route.path.join(" ➔ "));
                println!("Total Cost = {}", route.cost);
            }
        }
        Commands::Mst { file } => {
            let (_, session) = load(file)?;
            let forest = minimum_spanning_tree(&session.build_graph()?);

            if cli.json {
                print_json(&forest)?;
            } else {
                for link in &forest.links {
                    println!("{} - {} ({})", link.u, link.v, link.weight);
                }

                if forest.links.is_empty() {
                    println!("Total Cost = {NOT_APPLICABLE}");
                } else if forest.is_tree() {
                    println!("Total Cost = {}", forest.total_cost);
                } else {
                    println!(
                        "Total Cost = {} (spanning forest, {} components)",
                        forest.total_cost, forest.components
                    );
                }
            }
        }
        Commands::Tour { file } => {
            let (_, session) = load(file)?;
            let tour = approximate_tour(&session.build_graph()?)
                .context("failed to approximate a tour")?;

            if cli.json {
                print_json(&tour)?;
            } else {
                println!("{}", tour.cycle.join(" ➔ "));
                println!("Walk: {}", tour.walk.join(" ➔ "));
                println!("Total Cost = {}", tour.cost);
            }
        }
    }

    Ok(())
}

/// Logs go to stderr. `RUST_LOG` takes precedence over the verbosity flags.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("netscope={default_level}")));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn load(path: &Path) -> Result<(TopologyFile, Session)> {
    let topology = TopologyFile::load(path)?;
    let session = topology
        .to_session()
        .with_context(|| format!("invalid topology in {}", path.display()))?;

    debug!(
        devices = session.devices().len(),
        links = session.links().len(),
        "registered topology"
    );

    Ok((topology, session))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}
