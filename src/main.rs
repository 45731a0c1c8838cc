use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

use kclique::{builder, count, generator, ordering, reader, CsrGraph};

#[derive(Parser)]
#[command(name = "kclique")]
#[command(about = "Exact k-clique counting via pivoted enumeration", long_about = None)]
struct Cli {
    /// Load graph from file (.el edge list or .sg serialized graph)
    #[arg(short = 'f', value_name = "FILE")]
    file: Option<PathBuf>,

    /// Symmetrize input edge list
    #[arg(short = 's')]
    symmetrize: bool,

    /// Generate 2^scale Kronecker graph
    #[arg(short = 'g', value_name = "SCALE", conflicts_with = "file")]
    kron_scale: Option<u32>,

    /// Generate 2^scale uniform-random graph
    #[arg(short = 'u', value_name = "SCALE", conflicts_with_all = ["file", "kron_scale"])]
    uniform_scale: Option<u32>,

    /// Average degree for synthetic graphs
    #[arg(short = 'k', value_name = "DEGREE", default_value_t = generator::DEFAULT_DEGREE)]
    degree: usize,

    /// Clique size to count
    #[arg(short = 'c', value_name = "K", default_value_t = 3)]
    clique_size: usize,

    /// Count all clique sizes up to the maximum possible
    #[arg(short = 'm')]
    sweep: bool,
}

fn build_graph(cli: &Cli) -> Result<CsrGraph> {
    if let Some(path) = &cli.file {
        reader::load_graph(path, cli.symmetrize)
    } else if let Some(scale) = cli.uniform_scale {
        // synthetic graphs are always symmetrized
        Ok(builder::from_edge_list(
            &generator::generate_uniform(scale, cli.degree),
            true,
        ))
    } else if let Some(scale) = cli.kron_scale {
        Ok(builder::from_edge_list(
            &generator::generate_kronecker(scale, cli.degree),
            true,
        ))
    } else {
        anyhow::bail!("No graph input specified. (Use -h for help)")
    }
}

fn print_count_row(k: usize, count: count::Count) {
    println!("{:4} {:>width$}", k, count, width = count::COUNT_DIGITS);
}

fn print_clique_counts(counts: &[count::Count]) {
    println!("   k | {:>width$}", "clique count", width = count::COUNT_DIGITS);
    println!("{}", "-".repeat(count::COUNT_DIGITS + 7));
    for (k, &c) in counts.iter().enumerate() {
        if c != 0 {
            print_count_row(k, c);
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    anyhow::ensure!(cli.clique_size >= 1, "clique size must be at least 1");

    let dag = {
        let start = Instant::now();
        let g = build_graph(&cli)?;
        println!("Graph built in {:.2}s", start.elapsed().as_secs_f64());
        if g.directed() {
            eprintln!("Input graph is directed but clique counting requires undirected");
            std::process::exit(-2);
        }
        let start = Instant::now();
        let dag = ordering::directionalize(&g);
        println!("Directing took {:.2}s", start.elapsed().as_secs_f64());
        dag
        // the undirected CSR drops here; only the DAG stays resident
    };

    dag.print_stats();
    let max_degree = ordering::find_max_degree(&dag);
    println!("Max degree: {}", max_degree);

    let start = Instant::now();
    if cli.sweep {
        // large enough to cover any clique the DAG can hold
        let max_k = max_degree + 1;
        let counts = count::count_sweep(&dag, max_k);
        println!("Counting took {:.2}s", start.elapsed().as_secs_f64());
        print_clique_counts(&counts);
    } else {
        let k_count = count::count_fixed(&dag, cli.clique_size);
        println!("Counting took {:.2}s", start.elapsed().as_secs_f64());
        print!("k: ");
        print_count_row(cli.clique_size, k_count);
    }
    Ok(())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp || e.kind() == ErrorKind::DisplayVersion => {
            e.print().ok();
            std::process::exit(0);
        }
        Err(e) => {
            e.print().ok();
            std::process::exit(-1);
        }
    };
    if cli.file.is_none() && cli.kron_scale.is_none() && cli.uniform_scale.is_none() {
        eprintln!("No graph input specified. (Use -h for help)");
        std::process::exit(-1);
    }
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
