use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use lv_app::{
    AppConfig, AppError, AppResult, CalculationSlot, SlotEvent, SubmitOutcome, clear_history,
    history, load_record, persist,
};
use lv_core::{ParamInput, TimeSeries};
use lv_kernel::KernelSession;
use lv_results::JsonRecordStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lv-cli")]
#[command(about = "Lotka-Volterra workbench CLI - solve and manage saved calculations", long_about = None)]
struct Cli {
    /// Config file (defaults to $LVSIM_CONFIG or ./lvsim.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Kernel executable, overriding the config file
    #[arg(long, global = true)]
    kernel: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the predator-prey system with the Wolfram kernel
    Solve(SolveArgs),
    /// List saved calculations, newest first
    History,
    /// Show a saved calculation
    Show {
        /// Record ID
        id: String,
        /// Also write the series as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Delete every saved calculation
    ClearHistory {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args)]
struct SolveArgs {
    /// Prey growth rate
    #[arg(long)]
    alpha: Option<String>,
    /// Predation rate
    #[arg(long)]
    beta: Option<String>,
    /// Predator death rate
    #[arg(long)]
    gamma: Option<String>,
    /// Predator growth rate per prey eaten
    #[arg(long)]
    delta: Option<String>,
    /// Initial prey population
    #[arg(long)]
    x0: Option<String>,
    /// Initial predator population
    #[arg(long)]
    y0: Option<String>,
    /// Save the result to the record store
    #[arg(long)]
    save: bool,
    /// Write the series as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

impl SolveArgs {
    fn input(&self) -> ParamInput {
        let defaults = ParamInput::default();
        let pick = |value: &Option<String>, fallback: &String| {
            value.clone().unwrap_or_else(|| fallback.clone())
        };
        ParamInput {
            alpha: pick(&self.alpha, &defaults.alpha),
            beta: pick(&self.beta, &defaults.beta),
            gamma: pick(&self.gamma, &defaults.gamma),
            delta: pick(&self.delta, &defaults.delta),
            x0: pick(&self.x0, &defaults.x0),
            y0: pick(&self.y0, &defaults.y0),
        }
    }
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?.with_kernel_override(cli.kernel);

    match cli.command {
        Commands::Solve(args) => cmd_solve(&config, &args),
        Commands::History => cmd_history(&config),
        Commands::Show { id, csv } => cmd_show(&config, &id, csv.as_deref()),
        Commands::ClearHistory { yes } => cmd_clear_history(&config, yes),
    }
}

fn load_config(path: Option<&Path>) -> AppResult<AppConfig> {
    match path {
        Some(path) => AppConfig::load(path),
        None => AppConfig::discover(),
    }
}

fn open_store(config: &AppConfig) -> AppResult<JsonRecordStore> {
    Ok(JsonRecordStore::new(config.store_path.clone())?)
}

fn cmd_solve(config: &AppConfig, args: &SolveArgs) -> AppResult<()> {
    let input = args.input();
    let session = Arc::new(KernelSession::new(config.kernel.clone()));
    println!(
        "Solving Lotka-Volterra with kernel `{}`",
        session.config().command
    );
    let mut slot = CalculationSlot::new(session);

    if slot.submit(&input)? == SubmitOutcome::AlreadyRunning {
        return Ok(());
    }

    let started = Instant::now();
    let event = loop {
        if let Some(event) = slot.wait(Duration::from_millis(100)) {
            break event;
        }
        render_spinner(started.elapsed());
    };
    clear_progress_line();

    let completed = match event {
        SlotEvent::Completed(done) => done,
        SlotEvent::Failed(message) => {
            warn!(error = %message, "solve failed");
            return Err(AppError::Evaluation(message));
        }
    };
    println!(
        "✓ Solved in {:.2}s",
        started.elapsed().as_secs_f64()
    );
    print_summary(&completed.series);

    if let Some(path) = &args.csv {
        write_csv(&completed.series, path)?;
    }
    if args.save {
        let store = open_store(config)?;
        let outcome = persist(&store, Some(&completed), None)?;
        info!(record_id = %outcome.id, store = %store.path().display(), "result saved");
        println!("✓ {}: {}", outcome.message(), outcome.id);
    }
    Ok(())
}

fn cmd_history(config: &AppConfig) -> AppResult<()> {
    let store = open_store(config)?;
    let entries = history(&store)?;

    if entries.is_empty() {
        println!("No saved calculations");
    } else {
        println!("Saved calculations:");
        for entry in entries {
            println!("  {}  {}", entry.id, entry.label);
        }
    }
    Ok(())
}

fn cmd_show(config: &AppConfig, id: &str, csv: Option<&Path>) -> AppResult<()> {
    let store = open_store(config)?;
    let (id, completed) = load_record(&store, id)?;
    let p = completed.params;

    println!("Calculation {}", id);
    println!(
        "  α = {}, β = {}, γ = {}, δ = {}",
        p.alpha, p.beta, p.gamma, p.delta
    );
    println!("  x₀ = {}, y₀ = {}", p.x0, p.y0);
    print_summary(&completed.series);

    if let Some(path) = csv {
        write_csv(&completed.series, path)?;
    }
    Ok(())
}

fn cmd_clear_history(config: &AppConfig, yes: bool) -> AppResult<()> {
    if !yes {
        println!("This deletes every saved calculation. Re-run with --yes to confirm.");
        return Ok(());
    }
    let store = open_store(config)?;
    clear_history(&store)?;
    info!(store = %store.path().display(), "history cleared");
    println!("✓ Calculation history cleared");
    Ok(())
}

fn print_summary(series: &TimeSeries) {
    let t = series.t();
    let (x_min, x_max) = series.x_range();
    let (y_min, y_max) = series.y_range();
    println!("  Samples: {}", series.len());
    if let (Some(first), Some(last)) = (t.first(), t.last()) {
        println!("  Time range: {:.1} - {:.1}", first, last);
    }
    println!("  Prey range: {:.2} - {:.2}", x_min, x_max);
    println!("  Predator range: {:.2} - {:.2}", y_min, y_max);
}

fn write_csv(series: &TimeSeries, path: &Path) -> AppResult<()> {
    let mut csv = String::from("t,prey,predators\n");
    for ((t, x), y) in series.t().iter().zip(series.x()).zip(series.y()) {
        csv.push_str(&format!("{},{},{}\n", t, x, y));
    }
    std::fs::write(path, csv)?;
    info!(path = %path.display(), samples = series.len(), "series exported");
    println!(
        "✓ Exported {} samples to {}",
        series.len(),
        path.display()
    );
    Ok(())
}

fn render_spinner(elapsed: Duration) {
    let spinner = ['|', '/', '-', '\\'];
    let secs = elapsed.as_secs_f64();
    let spin_idx = ((secs * 10.0) as usize) % spinner.len();
    print!("\r{} waiting for kernel  elapsed={:.1}s", spinner[spin_idx], secs);
    let _ = io::stdout().flush();
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(60));
    let _ = io::stdout().flush();
}
