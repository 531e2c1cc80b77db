use clap::{Parser, Subcommand};
use osc_app::{
    AppResult, BatchProgressEvent, BatchStage, GenerateRequest, GenerateResponse, animate,
    generate, load_study, plot,
};
use osc_plot::BitmapPlotter;
use osc_results::Scenario;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "osc")]
#[command(about = "Oscillator studies - run, analyse and plot simulator sweeps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation batch and write results.json
    Generate {
        /// Directory for run output and results.json
        #[arg(default_value = "data/")]
        output_dir: PathBuf,
        /// Which study to run (coupled or damped)
        #[arg(long, default_value = "coupled")]
        scenario: Scenario,
        /// Study configuration file (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Sweep frequencies around the chain harmonics instead of the configured ranges
        #[arg(long)]
        ideal_frequencies: bool,
        /// Number of simulations run at once
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Analyse results.json and write the charts
    Plot {
        /// Directory holding results.json
        #[arg(default_value = "data/")]
        output_dir: PathBuf,
        /// Study configuration file (YAML or JSON)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Write one GIF per run that kept its positions
    Animate {
        /// Directory holding results.json
        #[arg(default_value = "data/")]
        output_dir: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Generate {
            output_dir,
            scenario,
            config,
            ideal_frequencies,
            workers,
        } => cmd_generate(
            &output_dir,
            scenario,
            config.as_deref(),
            ideal_frequencies,
            workers,
        ),
        Commands::Plot { output_dir, config } => cmd_plot(&output_dir, config.as_deref()),
        Commands::Animate { output_dir } => cmd_animate(&output_dir),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            clear_progress_line();
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn cmd_generate(
    output_dir: &Path,
    scenario: Scenario,
    config_path: Option<&Path>,
    ideal_frequencies: bool,
    workers: Option<usize>,
) -> AppResult<()> {
    let mut config = load_study(config_path)?;
    if let Some(workers) = workers {
        config.runner.workers = workers;
    }
    println!(
        "Running {} study into {} ({} workers)",
        scenario,
        output_dir.display(),
        config.runner.workers
    );

    let last_emit = Mutex::new((Instant::now(), None::<BatchStage>));
    let on_progress = |event: BatchProgressEvent| {
        let Ok(mut last) = last_emit.lock() else {
            return;
        };
        let emit_now = last.1 != Some(event.stage) || last.0.elapsed().as_millis() >= 100;
        if emit_now {
            render_cli_progress(&event);
            *last = (Instant::now(), Some(event.stage));
        }
    };

    let request = GenerateRequest {
        output_dir,
        scenario,
        config: &config,
        ideal_frequencies,
    };
    let response = generate(&request, Some(&on_progress))?;
    clear_progress_line();
    print_generate_summary(&response);
    Ok(())
}

fn print_generate_summary(response: &GenerateResponse) {
    println!("✓ Results written to {}", response.results_path.display());
    println!("  Simulations: {}", response.requested);
    if response.skipped_runs > 0 {
        println!("  Reused: {}", response.skipped_runs);
    }
    if response.failed_runs > 0 {
        println!("  Failed: {}", response.failed_runs);
    }
    println!(
        "  Parsed: {} ({} unreadable)",
        response.parsed, response.parse_failures
    );

    let timing = &response.timing;
    println!("\nTiming Summary:");
    println!("  Total time: {:.3} s", timing.total_time_s);
    println!("  Planning: {:.3} s", timing.plan_time_s);
    println!("  Simulating: {:.3} s", timing.simulate_time_s);
    println!("  Parsing: {:.3} s", timing.parse_time_s);
    println!("  Saving: {:.3} s", timing.save_time_s);
}

fn cmd_plot(output_dir: &Path, config_path: Option<&Path>) -> AppResult<()> {
    let config = load_study(config_path)?;
    let mut plotter = BitmapPlotter::new();
    let summary = plot(output_dir, &config.analysis, &mut plotter)?;

    println!("✓ {} charts written to {}", summary.charts, output_dir.display());
    if !summary.resonances.is_empty() {
        println!("\nResonances:");
        for (k, w0) in &summary.resonances {
            println!("  k={k:>8.1} kg/s²  w0={w0:.4} rad/s");
        }
    }
    if let Some(c) = summary.best_constant {
        println!("  Best fit: w0 = {c:.4} * sqrt(k)");
    }
    if !summary.mean_squared_errors.is_empty() {
        println!("\nMean squared error:");
        for (integrator, dt, mse) in &summary.mean_squared_errors {
            println!("  {integrator:<8} dt={dt:.0e}  mse={mse:.3e}");
        }
    }
    Ok(())
}

fn cmd_animate(output_dir: &Path) -> AppResult<()> {
    let mut plotter = BitmapPlotter::new();
    let written = animate(output_dir, &mut plotter)?;
    for path in &written {
        println!("✓ {}", path.display());
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &BatchProgressEvent) {
    let mut line = match event.fraction_complete() {
        Some(fraction) => {
            let width = 28usize;
            let filled = ((fraction * width as f64).round() as usize).min(width);
            format!(
                "\r[{}{}] {:>6.2}%  {}/{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled)),
                fraction * 100.0,
                event.completed.unwrap_or(0),
                event.total.unwrap_or(0)
            )
        }
        None => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            format!("\r{} {}", spinner[spin_idx], event.stage.label())
        }
    };
    line.push_str(&format!("  elapsed={:.1}s", event.elapsed_wall_s));
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {msg}"));
    }
    print!("{line}");
    let _ = io::stdout().flush();
}
