//! Temperature sweep of the 2D Ising model on one lattice size.
//!
//! Writes energy, |magnetization|, specific heat, susceptibility and
//! acceptance rate per temperature to CSV. With `--show-snapshots` the
//! thermalizing lattice is printed to stderr from a viewer thread.

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use ising::config::{DeltaMode, LatticePolicy, SimConfig, TemperatureSchedule};
use ising::finite_size::peak;
use ising::report::write_series_csv;
use ising::utils::rng::{seeded_rng, stream_seed};
use ising::{
    ChannelSink, DropPolicy, LatticeSnapshot, NullSink, ObservableSeries, Scheduler, SinkEvent,
    VisualizationSink,
};
use std::path::PathBuf;
use std::thread;

#[derive(Parser, Debug)]
#[command(about = "Metropolis simulation of the 2D Ising model over a temperature range")]
struct Cli {
    /// Lattice side length N
    #[arg(long, default_value_t = 16)]
    size: usize,

    /// Coupling J (negative = antiferromagnetic)
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    coupling: f64,

    /// Uniform external field h
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    field: f64,

    #[arg(long, default_value_t = 1.0)]
    t_min: f64,

    #[arg(long, default_value_t = 4.0)]
    t_max: f64,

    /// Number of temperature points
    #[arg(long, default_value_t = 16)]
    n_temps: usize,

    /// Draw temperatures from N(2.269, 0.64) clipped to (t_min, t_max)
    #[arg(long)]
    gaussian: bool,

    /// Thermalization length in sweeps of N² moves
    #[arg(long, default_value_t = 1000)]
    therm_sweeps: usize,

    /// Measurement sweeps per temperature
    #[arg(long, default_value_t = 1000)]
    sweeps: usize,

    /// Fixed seed; omit for an entropy-seeded run
    #[arg(long)]
    seed: Option<u64>,

    /// 'fresh' or 'anneal'
    #[arg(long, default_value = "fresh")]
    lattice_policy: String,

    /// 'flip-recompute' or 'closed-form'
    #[arg(long, default_value = "flip-recompute")]
    delta_mode: String,

    /// Print a lattice frame every this many thermalization moves
    #[arg(long)]
    show_snapshots: Option<usize>,

    /// Snapshot queue capacity
    #[arg(long, default_value_t = 4)]
    queue: usize,

    #[arg(long, default_value = "ising_results.csv")]
    output: PathBuf,
}

fn render(snapshot: &LatticeSnapshot) -> String {
    let n = snapshot.size;
    let mut grid = vec![vec!['-'; n]; n];
    for &(i, j) in &snapshot.up {
        grid[i][j] = '+';
    }
    let mut out = format!("T = {:.3}, move {}\n", snapshot.temperature, snapshot.moves);
    for row in grid {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn run_with_sink<S: VisualizationSink>(
    cfg: SimConfig,
    sink: S,
    bar: &ProgressBar,
) -> Result<ObservableSeries, ising::IsingError> {
    let mut scheduler = Scheduler::new(cfg, sink)?;
    scheduler.run_with_progress(&|p| {
        bar.set_message(format!("T = {:.3}", p.temperature));
        bar.inc(1);
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Cli::parse();

    let schedule = if args.gaussian {
        TemperatureSchedule::Gaussian {
            center: 2.269,
            width: 0.64,
            count: args.n_temps,
            min: args.t_min,
            max: args.t_max,
        }
    } else {
        TemperatureSchedule::Linear { start: args.t_min, end: args.t_max, count: args.n_temps }
    };
    let mut schedule_rng = seeded_rng(args.seed.map(|s| stream_seed(s, 1)));
    let temperatures = schedule.temperatures(&mut schedule_rng)?;

    let cfg = SimConfig {
        lattice_size: args.size,
        coupling: args.coupling,
        field: args.field,
        temperatures,
        thermalization_moves: 0,
        measurement_sweeps: args.sweeps,
        seed: args.seed,
        lattice_policy: LatticePolicy::try_from(args.lattice_policy.as_str())?,
        delta_mode: DeltaMode::try_from(args.delta_mode.as_str())?,
        snapshot_interval: args.show_snapshots,
    }
    .with_thermalization_sweeps(args.therm_sweeps)?;
    println!("Configuration:\n{cfg:#?}");

    let bar = ProgressBar::new(cfg.temperatures.len() as u64);
    bar.set_style(ProgressStyle::with_template(
        " {bar:40.cyan/blue} {pos}/{len} {msg} [{elapsed_precise}]",
    )?);

    let series = if args.show_snapshots.is_some() {
        let (sink, rx) = ChannelSink::bounded(args.queue, DropPolicy::DropOldest);
        let viewer = thread::spawn(move || {
            for event in rx.iter() {
                match event {
                    SinkEvent::Snapshot(s) => eprint!("{}", render(&s)),
                    SinkEvent::Series(s) => eprintln!("received {} temperature points", s.len()),
                }
            }
        });
        let series = run_with_sink(cfg, sink, &bar)?;
        if viewer.join().is_err() {
            log::warn!("snapshot viewer thread panicked");
        }
        series
    } else {
        run_with_sink(cfg, NullSink, &bar)?
    };
    bar.finish();

    if let Some((t, cv)) = peak(&series.temperature, &series.specific_heat) {
        log::info!("specific heat peak Cv = {cv:.4} at T = {t:.4}");
    }

    write_series_csv(&args.output, &series)?;
    println!("Sweep complete → {}", args.output.display());
    Ok(())
}
