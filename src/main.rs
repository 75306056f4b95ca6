//! Vinculo CLI — batch cleaning and graph analysis of contract CSV files
//!
//! One subcommand per operation; all file paths come from the arguments.
//! The library does the work, the CLI does the I/O.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table as DisplayTable};
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use vinculo::report::{self, DegreeEntry, DegreeFilter, VertexEntry};
use vinculo::{GraphBuilder, Table};

#[derive(Parser)]
#[command(name = "vinculo", version, about = "Contract network analysis toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Format a tax-id column as CNPJ (DD.DDD.DDD/DDDD-DD)
    FormatTaxId {
        input: PathBuf,
        output: PathBuf,

        /// Column holding the raw tax ids
        #[arg(long, default_value = "tax_id")]
        column: String,
    },
    /// Upper-case every value of a column
    Uppercase {
        input: PathBuf,
        output: PathBuf,

        /// Column to normalize
        #[arg(long, default_value = "name")]
        column: String,
    },
    /// Remove columns from a table; absent names are ignored
    DropColumns {
        input: PathBuf,
        output: PathBuf,

        /// Comma-separated column names to remove
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },
    /// Keep the first row per key-column value
    Dedup {
        input: PathBuf,
        output: PathBuf,

        /// Key column for deduplication
        #[arg(long, default_value = "name")]
        column: String,
    },
    /// Build the institution-vendor graph and write its derived reports
    Graph {
        /// Contracts table (institution, name, tax_id, contract_value)
        contracts: PathBuf,

        /// Identity-links table (tax_id, name)
        links: PathBuf,

        /// Vertex identity table output
        #[arg(long, default_value = "vertices.csv")]
        vertices_out: PathBuf,

        /// Degree ranking of vertices named in the links table
        #[arg(long, default_value = "linked_degrees.csv")]
        linked_degrees_out: PathBuf,

        /// Degree ranking of vertices above the threshold
        #[arg(long, default_value = "top_degrees.csv")]
        top_degrees_out: PathBuf,

        /// Node-size table output (skipped when absent)
        #[arg(long)]
        sizes_out: Option<PathBuf>,

        /// Keep vertices with degree strictly greater than this
        #[arg(long, default_value_t = 1)]
        min_degree: usize,

        /// Summary format printed to stdout
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Serialize)]
struct GraphSummary<'a> {
    vertices: usize,
    edges: usize,
    total_weight: f64,
    vertex_table: &'a [VertexEntry],
    linked_degrees: &'a [DegreeEntry],
    top_degrees: &'a [DegreeEntry],
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::FormatTaxId {
            input,
            output,
            column,
        } => vinculo::clean::format_tax_id_file(&input, &output, &column).map_err(Into::into),
        Commands::Uppercase {
            input,
            output,
            column,
        } => vinculo::clean::uppercase_file(&input, &output, &column).map_err(Into::into),
        Commands::DropColumns {
            input,
            output,
            columns,
        } => vinculo::clean::drop_columns_file(&input, &output, &columns).map_err(Into::into),
        Commands::Dedup {
            input,
            output,
            column,
        } => vinculo::clean::dedup_file(&input, &output, &column).map_err(Into::into),
        Commands::Graph {
            contracts,
            links,
            vertices_out,
            linked_degrees_out,
            top_degrees_out,
            sizes_out,
            min_degree,
            format,
        } => run_graph(GraphArgs {
            contracts,
            links,
            vertices_out,
            linked_degrees_out,
            top_degrees_out,
            sizes_out,
            min_degree,
            format,
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

struct GraphArgs {
    contracts: PathBuf,
    links: PathBuf,
    vertices_out: PathBuf,
    linked_degrees_out: PathBuf,
    top_degrees_out: PathBuf,
    sizes_out: Option<PathBuf>,
    min_degree: usize,
    format: OutputFormat,
}

fn run_graph(args: GraphArgs) -> Result<()> {
    let contracts = Table::from_csv_path(&args.contracts)?;
    let links = Table::from_csv_path(&args.links)?;

    let builder = GraphBuilder::from_tables(&contracts, &links)?;
    let graph = builder.build();

    let vertices = report::vertex_table(&graph, builder.contracts(), builder.links());
    report::write_vertex_table(&vertices, &args.vertices_out)?;
    info!(path = %args.vertices_out.display(), rows = vertices.len(), "vertex table written");

    let link_names: FxHashSet<String> = builder
        .links()
        .iter()
        .map(|l| l.alias.clone())
        .collect();
    let linked = report::rank_degrees(&graph, DegreeFilter::Members(&link_names));
    report::write_degree_ranking(&linked, &args.linked_degrees_out)?;
    info!(path = %args.linked_degrees_out.display(), rows = linked.len(), "linked degrees written");

    let top = report::rank_degrees(&graph, DegreeFilter::MinDegree(args.min_degree));
    report::write_degree_ranking(&top, &args.top_degrees_out)?;
    info!(path = %args.top_degrees_out.display(), rows = top.len(), "top degrees written");

    if let Some(path) = &args.sizes_out {
        let sizes = report::node_sizes(&graph, builder.contracts());
        report::write_node_sizes(&sizes, path)?;
        info!(path = %path.display(), rows = sizes.len(), "node sizes written");
    }

    match args.format {
        OutputFormat::Json => {
            let summary = GraphSummary {
                vertices: graph.vertex_count(),
                edges: graph.edge_count(),
                total_weight: graph.total_weight(),
                vertex_table: &vertices,
                linked_degrees: &linked,
                top_degrees: &top,
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Table => {
            println!(
                "{} vertices, {} edges, total contract value {}",
                graph.vertex_count(),
                graph.edge_count(),
                graph.total_weight()
            );

            if !top.is_empty() {
                let mut display = DisplayTable::new();
                display.set_content_arrangement(ContentArrangement::Dynamic);
                display.set_header(vec!["Vertex", "Degree"]);
                for entry in &top {
                    display.add_row(vec![entry.name.clone(), entry.degree.to_string()]);
                }
                println!("{display}");
                println!("{} vertex(es) above degree {}", top.len(), args.min_degree);
            }
        }
    }

    Ok(())
}
