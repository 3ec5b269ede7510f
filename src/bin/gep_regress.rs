//! Command-line driver for the GEP engine and the Adam sine-sum baseline.
//!
//! Flags are parsed by hand (`std::env::args`), in the teacher's
//! no-framework driver style — the closest single-crate teacher pulls in
//! no CLI-argument crate anywhere in its own driver surface, so this
//! keeps the same ambient stack rather than introducing one.

use gep_regress::adam::{AdamConfig, SineCells};
use gep_regress::dataset::Dataset;
use gep_regress::error::GepResult;
use gep_regress::gep::{GepConfig, IslandModel, MainProcess};
use gep_regress::rng::GepRng;
use std::process::ExitCode;
use std::sync::Arc;

struct Args {
    population: usize,
    length: usize,
    min: f64,
    max: f64,
    max_generations: usize,
    stop_fitness: f64,
    keep: usize,
    mutation_rate: f64,
    seed: Option<u64>,
    islands: usize,
    exchange_every: usize,
    sine_cells: Option<usize>,
    adam_epochs: usize,
}

impl Default for Args {
    fn default() -> Self {
        Args {
            population: 300,
            length: 20,
            min: 1.0,
            max: 4.0,
            max_generations: 100,
            stop_fitness: 0.99,
            keep: 150,
            mutation_rate: 0.1,
            seed: None,
            islands: 1,
            exchange_every: 10,
            sine_cells: None,
            adam_epochs: 1,
        }
    }
}

fn parse_args(raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();
    let mut raw = raw.peekable();
    while let Some(flag) = raw.next() {
        let mut value = || raw.next().ok_or_else(|| format!("{flag} requires a value"));
        match flag.as_str() {
            "--population" => args.population = parse(value()?, &flag)?,
            "--length" => args.length = parse(value()?, &flag)?,
            "--min" => args.min = parse(value()?, &flag)?,
            "--max" => args.max = parse(value()?, &flag)?,
            "--max-generations" => args.max_generations = parse(value()?, &flag)?,
            "--stop-fitness" => args.stop_fitness = parse(value()?, &flag)?,
            "--keep" => args.keep = parse(value()?, &flag)?,
            "--mutation-rate" => args.mutation_rate = parse(value()?, &flag)?,
            "--seed" => args.seed = Some(parse(value()?, &flag)?),
            "--islands" => args.islands = parse(value()?, &flag)?,
            "--exchange-every" => args.exchange_every = parse(value()?, &flag)?,
            "--sine-cells" => args.sine_cells = Some(parse(value()?, &flag)?),
            "--adam-epochs" => args.adam_epochs = parse(value()?, &flag)?,
            other => return Err(format!("unrecognized flag: {other}")),
        }
    }
    Ok(args)
}

fn parse<T: std::str::FromStr>(raw: String, flag: &str) -> Result<T, String> {
    raw.parse().map_err(|_| format!("invalid value for {flag}: {raw}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let outcome = if let Some(total) = args.sine_cells {
        run_sine_cells(&args, total)
    } else {
        run_gep(&args)
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn config_from_args(args: &Args) -> GepConfig {
    let mut config = GepConfig::default()
        .with_population_size(args.population)
        .with_chromosome_length(args.length)
        .with_bounds(args.min, args.max)
        .with_max_generations(args.max_generations)
        .with_stop_fitness(args.stop_fitness)
        .with_keep(args.keep)
        .with_mutation_rate(args.mutation_rate);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    config
}

fn run_gep(args: &Args) -> GepResult<()> {
    let dataset = Arc::new(Dataset::default());
    let config = config_from_args(args);
    config.validate()?;

    if args.islands <= 1 {
        tracing::info!(population = args.population, length = args.length, "starting single-island GEP run");
        let mut process = MainProcess::with_seed(config, dataset)?;
        process.run()?;
        tracing::info!(generation = process.generation(), fitness = process.best_fitness()?, "run complete");
        println!("generation={} best_fitness={}", process.generation(), process.best_fitness()?);
        println!("best={}", process.best()?);
        return Ok(());
    }

    tracing::info!(islands = args.islands, "starting island-model GEP run");
    let master_seed = args.seed.unwrap_or_else(rand::random);
    let per_batch = config.clone().with_max_generations(args.exchange_every);
    let mut model = IslandModel::new(args.islands, per_batch, dataset, master_seed)?;
    let mut rng = GepRng::seed(master_seed);

    model.run()?;
    tracing::info!(max_fitness = model.max_fitness()?, "initial island batch complete");

    while model.max_fitness()? < args.stop_fitness {
        model.exchange(&mut rng)?;
        model.run_continue(args.exchange_every, args.stop_fitness, args.keep, args.mutation_rate)?;
        tracing::info!(max_fitness = model.max_fitness()?, "island exchange complete");
    }

    println!("max_fitness={}", model.max_fitness()?);
    println!("best={}", model.best_chromosome()?);
    Ok(())
}

fn run_sine_cells(args: &Args, total: usize) -> GepResult<()> {
    tracing::info!(total, epochs = args.adam_epochs, "starting Adam sine-sum fit");
    let dataset = Dataset::default();
    let mut rng = match args.seed {
        Some(seed) => GepRng::seed(seed),
        None => GepRng::seed(rand::random()),
    };
    let mut cells = SineCells::new(total, -1.0, 1.0, &mut rng)?;
    let config = AdamConfig::default().with_epochs(args.adam_epochs);

    let mut log_progress = |epoch: u64, mse: f64| {
        tracing::debug!(epoch, mse, "adam epoch complete");
    };
    cells.fit(
        |i| dataset.input(i),
        |i| dataset.output(i),
        dataset.total(),
        &config,
        Some(&mut log_progress),
    )?;

    println!("fitted={cells}");
    Ok(())
}
