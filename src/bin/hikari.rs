use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hikari", version)]
struct Cli {
    /// Log at debug level (`RUST_LOG` takes precedence).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON scene script. Paths inside it resolve against its directory.
    Render(RenderArgs),
    /// Convert a `.fb` framebuffer file to PNG.
    Convert(ConvertArgs),
    /// List the built-in plugin implementations.
    Plugins,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input scene script JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Worker thread count (defaults to `HIKARI_RENDER_THREADS`, then all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Render rows on the calling thread.
    #[arg(long)]
    serial: bool,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input framebuffer file.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Convert(args) => cmd_convert(args),
        Command::Plugins => cmd_plugins(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut threading = hikari::RenderThreading::from_env();
    if let Some(n) = args.threads {
        anyhow::ensure!(n > 0, "--threads must be >= 1");
        threading.threads = Some(n);
    }
    threading.parallel = !args.serial;

    let mut ctx = hikari::SceneContext::new();
    ctx.set_threading(threading);

    let renders = hikari::run_script_file(&args.in_path, &mut ctx)
        .with_context(|| format!("run scene script '{}'", args.in_path.display()))?;

    for stats in &renders {
        eprintln!(
            "rendered {} pixels ({} samples) in {:.2?}",
            stats.pixels, stats.samples, stats.elapsed
        );
    }
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let fb = hikari::FrameBuffer::load_fb(&args.in_path)
        .with_context(|| format!("load framebuffer '{}'", args.in_path.display()))?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    fb.save_png(&args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_plugins() -> anyhow::Result<()> {
    let registry = hikari::PluginRegistry::with_builtins();
    for info in registry.implementations() {
        println!("{:<24} {:<10} {}", info.name, info.factory.kind().as_str(), info.help);
    }
    Ok(())
}
