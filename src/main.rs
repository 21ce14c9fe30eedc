use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use depscope::config;
use depscope::fetch::{self, DependencySource};
use depscope::graph::{GraphBuilder, PackageFilter, PackageNode};
use depscope::render::{D2Compiler, Renderer};

#[derive(Parser)]
#[command(name = "depscope")]
#[command(version)]
#[command(about = "Transitive dependency graph explorer with cycle detection and D2 diagram output", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a package's dependency graph and render it
    Run {
        /// Path to the JSON run configuration
        config: PathBuf,

        /// Also list the packages that depend on the given package
        #[arg(long, value_name = "PACKAGE")]
        reverse: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run { config, reverse } => run(&config, reverse.as_deref()),
    }
}

fn run(config_path: &Path, reverse: Option<&str>) -> anyhow::Result<()> {
    let config = config::load_file(config_path)
        .with_context(|| format!("loading configuration from '{}'", config_path.display()))?;
    println!("{config}");
    println!();

    let source = fetch::source_for(&config);

    // The root package's own fetch is the one failure that aborts the
    // run; failures deeper in the graph are absorbed by the builder.
    banner("Direct Dependencies");
    let direct = source
        .direct_dependencies(&config.package_name)
        .with_context(|| {
            format!(
                "fetching direct dependencies of '{}'",
                config.package_name
            )
        })?;
    println!("Direct dependencies of '{}':", config.package_name);
    if direct.is_empty() {
        println!("  (no dependencies)");
    } else {
        for dep in &direct {
            println!("  - {dep}");
        }
    }
    println!();

    banner("Dependency Graph");
    let filter = PackageFilter::new(&config.filter_substring);
    let graph = GraphBuilder::new(source.as_ref()).build(&config.package_name, &filter);

    println!("Dependency graph for '{}':", config.package_name);
    println!("Total packages in graph: {}", graph.package_count());
    println!();

    let mut nodes: Vec<&PackageNode> = graph.packages().collect();
    nodes.sort_by(|a, b| a.name.cmp(&b.name));
    for node in nodes {
        if node.is_leaf() {
            println!("{} -> (no dependencies)", node.name);
        } else {
            println!("{} -> {}", node.name, node.dependencies.join(", "));
        }
    }
    println!();

    if graph.has_cycles() {
        println!("Warning: Circular dependencies detected:");
        for cycle in graph.cycles() {
            println!("  Cycle: {}", cycle.cycle_path());
        }
    } else {
        println!("No circular dependencies detected.");
    }
    println!();

    if let Some(target) = reverse {
        banner("Reverse Dependencies");
        let mut dependents = graph.reverse_dependencies(target);
        dependents.sort_unstable();
        println!("Packages that depend on '{target}':");
        if dependents.is_empty() {
            println!("  (no packages depend on this package)");
        } else {
            for pkg in dependents {
                println!("  - {pkg}");
            }
        }
        println!();
    }

    banner("Visualization");
    let renderer = Renderer::new(&config.output_file);
    let outcome = renderer
        .render(&graph, &D2Compiler::new())
        .context("writing diagram description")?;

    println!("D2 description:");
    println!("{}", "-".repeat(50));
    println!("{}", outcome.description);
    println!("{}", "-".repeat(50));
    println!();

    match &outcome.image_path {
        Some(image) => println!("Visualization complete! SVG saved to: {}", image.display()),
        None => {
            println!(
                "D2 description saved to: {}",
                outcome.description_path.display()
            );
            println!("Install the D2 compiler to generate an SVG: https://d2lang.com/");
            println!(
                "Then run: d2 {} {}",
                outcome.description_path.display(),
                config.output_file
            );
        }
    }

    Ok(())
}

fn banner(title: &str) {
    println!("{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}
