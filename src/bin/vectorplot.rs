use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "vectorplot", version)]
struct Cli {
    /// Log debug output from the plotting core to stderr.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a drawing script into an output file.
    Render(RenderArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input script JSON (an array of drawing commands).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output file path.
    #[arg(long)]
    out: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Svg)]
    format: FormatChoice,

    /// Device parameter, e.g. `--param BITMAPSIZE=300x200`. May be repeated.
    #[arg(long = "param", value_parser = parse_param)]
    params: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Svg,
    Png,
    Hpgl,
    Meta,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
    }
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    let (k, v) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if k.trim().is_empty() {
        return Err(format!("empty parameter name in '{s}'"));
    }
    Ok((k.trim().to_owned(), v.to_owned()))
}

fn read_script(path: &Path) -> anyhow::Result<vectorplot::Script> {
    let f = File::open(path).with_context(|| format!("open script '{}'", path.display()))?;
    let script = vectorplot::Script::from_reader(BufReader::new(f))
        .with_context(|| format!("parse script '{}'", path.display()))?;
    Ok(script)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let script = read_script(&args.in_path)?;

    let mut params = vectorplot::PlotterParams::new();
    for (k, v) in args.params {
        params.set(k, v);
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let out = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;

    let kind = match args.format {
        FormatChoice::Svg => vectorplot::BackendKind::Svg,
        FormatChoice::Png => vectorplot::BackendKind::Png,
        FormatChoice::Hpgl => vectorplot::BackendKind::Hpgl,
        FormatChoice::Meta => vectorplot::BackendKind::Meta,
    };
    let backend = vectorplot::create_backend(kind, Box::new(BufWriter::new(out)), &params);
    let mut plotter = vectorplot::Plotter::new(backend, params);

    script
        .render(&mut plotter)
        .with_context(|| format!("render '{}'", args.in_path.display()))?;
    if plotter.is_open() {
        plotter.closepl().context("close the last page")?;
    }

    eprintln!("wrote {}", args.out.display());
    Ok(())
}
