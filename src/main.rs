use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use collectd_catalog::{Catalog, Graph, Plugin, RenderOptions, Settings, TimeRange};

#[derive(Parser, Debug)]
#[command(name = "collectd-catalog", version)]
#[command(about = "Browse the hosts, plugins and graphs of a collectd RRD tree")]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    settings: Option<PathBuf>,

    /// collectd configuration holding the DataDir entries
    #[arg(long, global = true)]
    collectd_config: Option<PathBuf>,

    /// JSON graph definition file
    #[arg(long, global = true)]
    definitions: Option<PathBuf>,

    /// Scan this data directory instead of reading collectd.conf (repeatable)
    #[arg(long = "data-dir", global = true)]
    data_dirs: Vec<PathBuf>,

    /// Print listings as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List hosts
    Hosts,
    /// List the plugins of a host
    Plugins { host: String },
    /// List the graphs of the plugins selected by `name[-instance|-*|-prefix*]`
    Graphs { host: String, plugin: String },
    /// Show the files backing a graph
    Sources(GraphPath),
    /// Show the maximum of each source of a graph
    Max {
        #[command(flatten)]
        graph: GraphPath,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Render a graph
    Generate {
        #[command(flatten)]
        graph: GraphPath,
        #[command(flatten)]
        range: RangeArgs,
        /// Render option `key=value` (repeatable); `upper=50%` scales to the data
        #[arg(short = 'O', long = "option", value_parser = parse_option)]
        options: Vec<(String, String)>,
        /// Write the artifact here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export the whole catalog as JSON
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct GraphPath {
    host: String,
    /// Plugin segment, e.g. `cpu-*`
    plugin: String,
    /// Graph segment, `type[-instance]`
    graph: String,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// Start of the range, in rrdtool time syntax
    #[arg(long, default_value = "-1d", allow_hyphen_values = true)]
    start: String,
    #[arg(long, default_value = "now", allow_hyphen_values = true)]
    end: String,
}

impl From<&RangeArgs> for TimeRange {
    fn from(args: &RangeArgs) -> Self {
        TimeRange::new(&args.start, &args.end)
    }
}

fn parse_option(value: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = value
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {value}"))?;
    if key.is_empty() {
        return Err(format!("empty option name in {key}={value}"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = load_settings(&cli)?;
    debug!("Using settings {:?}", settings);
    let catalog = settings.catalog().context("Failed to set up catalog")?;

    match &cli.command {
        Command::Hosts => {
            let hosts = catalog.hosts()?;
            if cli.json {
                let names: Vec<&str> = hosts.iter().map(|h| h.name()).collect();
                print_json(&json!(names))
            } else {
                hosts.iter().for_each(|h| println!("{}", h));
                Ok(())
            }
        }
        Command::Plugins { host } => {
            let host = catalog.host(host)?;
            let plugins = catalog.plugins(&host)?;
            if cli.json {
                print_json(&Value::Array(plugins.iter().map(plugin_json).collect()))
            } else {
                plugins.iter().for_each(|p| println!("{}", p.full_name()));
                Ok(())
            }
        }
        Command::Graphs { host, plugin } => {
            let graphs = catalog.list_graphs(host, plugin)?;
            if cli.json {
                print_json(&Value::Array(graphs.iter().map(graph_json).collect()))
            } else {
                graphs.iter().for_each(|g| println!("{}", g.title()));
                Ok(())
            }
        }
        Command::Sources(path) => {
            let graph = find_graph(&catalog, path)?;
            let sources = catalog.graph_sources(&graph)?;
            if cli.json {
                print_json(&serde_json::to_value(&sources)?)
            } else {
                for source in &sources {
                    println!("{}\t{}", source.label, source.path.display());
                }
                Ok(())
            }
        }
        Command::Max { graph, range } => {
            let graph = find_graph(&catalog, graph)?;
            let maxima = catalog
                .calculate_max(&graph, &range.into())
                .with_context(|| format!("Failed to compute maxima of {}", graph.title()))?;
            if cli.json {
                print_json(&json!(maxima))
            } else {
                for (label, value) in &maxima {
                    println!("{}\t{}", label, value);
                }
                Ok(())
            }
        }
        Command::Generate {
            graph,
            range,
            options,
            output,
        } => {
            let graph = find_graph(&catalog, graph)?;
            let options: RenderOptions = options.iter().cloned().collect();
            let artifact = catalog
                .generate(&graph, &range.into(), options)
                .with_context(|| format!("Failed to render {}", graph.title()))?;
            write_output(output.as_deref(), &artifact)
        }
        Command::Export { output } => {
            let tree = export_catalog(&catalog)?;
            let mut bytes = serde_json::to_vec_pretty(&tree)?;
            bytes.push(b'\n');
            write_output(output.as_deref(), &bytes)
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Settings from file and environment, overridden by command line flags.
fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load(cli.settings.as_deref()).context("Failed to load settings")?;
    if let Some(path) = &cli.collectd_config {
        settings.collectd_config = path.clone();
    }
    if let Some(path) = &cli.definitions {
        settings.graph_definitions = Some(path.clone());
    }
    if !cli.data_dirs.is_empty() {
        settings.data_dirs = cli.data_dirs.clone();
    }
    Ok(settings)
}

fn find_graph(catalog: &Catalog, path: &GraphPath) -> Result<Graph> {
    Ok(catalog.find_graph(&path.host, &path.plugin, &path.graph)?)
}

fn plugin_json(plugin: &Plugin) -> Value {
    json!({
        "name": plugin.name(),
        "full_name": plugin.full_name(),
        "title": plugin.title(),
        "instance": plugin.instance(),
    })
}

fn graph_json(graph: &Graph) -> Value {
    json!({
        "plugin": graph.plugin().full_name(),
        "type": graph.type_name(),
        "full_name": graph.full_name(),
        "title": graph.title(),
        "instance": graph.instance(),
        "has_definition": graph.definition().is_some(),
    })
}

/// The full host/plugin/graph tree with the files behind each graph.
fn export_catalog(catalog: &Catalog) -> Result<Value> {
    let mut hosts = Vec::new();
    for host in catalog.hosts()? {
        let mut plugins = Vec::new();
        for plugin in catalog.plugins(&host)? {
            let mut graphs = Vec::new();
            for graph in catalog.graphs(&plugin)? {
                let mut entry = graph_json(&graph);
                let files: Vec<String> = graph
                    .relative_files()
                    .into_iter()
                    .map(|(_, path)| path.display().to_string())
                    .collect();
                entry["files"] = json!(files);
                graphs.push(entry);
            }
            let mut entry = plugin_json(&plugin);
            entry["graphs"] = Value::Array(graphs);
            plugins.push(entry);
        }
        hosts.push(json!({
            "name": host.name(),
            "plugins": plugins,
        }));
    }

    let data_dirs: Vec<String> = catalog
        .directories()
        .data_directories()?
        .iter()
        .map(|d| d.display().to_string())
        .collect();

    Ok(json!({
        "data_directories": data_dirs,
        "hosts": hosts,
    }))
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => io::stdout().lock().write_all(bytes)?,
    }
    Ok(())
}
