//! Weft CLI library
//!
//! This module contains the core CLI logic: it reads a TOML graph, lays it
//! out with the force solver and writes the settled diagram as SVG.

pub mod error;
pub mod error_adapter;
pub mod graph;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::info;

use weft::{Diagram, export::svg::SvgSurface, layout::ForceSolver, record::DataSource};

use error::CliError;
use graph::Graph;

/// Run the Weft CLI application
///
/// This function lays out the input graph and writes the resulting SVG to
/// the output file.
///
/// # Errors
///
/// Returns [`CliError::Graph`] when the input is not a valid graph file, and
/// [`CliError::Weft`] for I/O, configuration and export failures.
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing graph"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;
    let graph = Graph::parse(&source)?;
    info!(
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        constraints = graph.constraints.len();
        "Parsed graph"
    );

    let solver = match args.seed {
        Some(seed) => ForceSolver::with_seed(seed),
        None => ForceSolver::new(),
    };
    let surface = SvgSurface::new(app_config.style().clone());

    let data = DataSource::new(graph.nodes.clone(), graph.edges.clone());
    let mut diagram = Diagram::new(
        app_config.diagram().clone(),
        data,
        graph::accessors(),
        solver,
        surface,
    )
    .with_constrain(move |nodes, _| graph.constraints_for(nodes));

    diagram.render();
    let ticks = diagram.settle();

    diagram.surface().write_to(&args.output)?;

    info!(output_file = args.output, ticks; "SVG exported successfully");

    Ok(())
}
