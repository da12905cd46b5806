//! Benchmark execution and reporting.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use seedcast_core::{
    CoreError, Diffusion, DiffusionModel, Direction, GraphStore, NodeId, SolverRequest,
};
use tracing::{info, warn};

use crate::errors::CliError;
use crate::options::{EvalOptions, Options};

/// Runs each requested solver over one graph and reports seed sets,
/// wall time and estimated spread. One diffusion engine is shared by
/// all evaluations, and every solver's spread is estimated with the
/// same trial randomness so the comparison is fair.
pub struct Benchmarker<'g> {
    graph: &'g GraphStore,
    model: DiffusionModel,
    engine: Box<dyn Diffusion + 'g>,
    simulations: usize,
    seed_count: usize,
    backwards: bool,
    raw: bool,
    output: Option<PathBuf>,
    run_seed: u64,
}

struct Outcome {
    solver: String,
    seeds: Vec<NodeId>,
    seconds: f64,
    forward: f64,
    backward: Option<f64>,
}

impl<'g> Benchmarker<'g> {
    pub fn new(graph: &'g GraphStore, options: &Options, run_seed: u64) -> Self {
        let model = DiffusionModel::from(options.model);
        Benchmarker {
            graph,
            model,
            engine: model.build(graph),
            simulations: options.simulations,
            seed_count: options.seed_count,
            backwards: options.backwards,
            raw: options.raw,
            output: options.output.clone(),
            run_seed,
        }
    }

    pub fn run(&self, requests: &[SolverRequest]) -> Result<(), CliError> {
        for request in requests {
            let mut solver = match request.build(self.graph, self.model, self.run_seed) {
                Ok(solver) => solver,
                Err(CoreError::UnknownSolver(selector)) => {
                    warn!(selector = %selector, "skipping unknown solver");
                    continue;
                }
                Err(other) => return Err(other.into()),
            };
            let name = solver.name();
            info!(solver = %name, graph = %self.graph.name(), "benchmarking");

            let started = Instant::now();
            let seeds = solver.solve(self.seed_count);
            let seconds = started.elapsed().as_secs_f64();

            let forward =
                self.engine
                    .spread(&seeds, self.simulations, Direction::Forward, self.run_seed);
            let backward = self.backwards.then(|| {
                self.engine
                    .spread(&seeds, self.simulations, Direction::Backward, self.run_seed)
            });

            let outcome = Outcome {
                solver: name,
                seeds,
                seconds,
                forward,
                backward,
            };
            if let Some(dir) = &self.output {
                let file = write_seed_file(dir, &outcome)?;
                info!(file = %file.display(), "seed set written");
            }
            if self.raw {
                print_raw(&outcome);
            } else {
                print_framed(self.graph, self.model, self.simulations, &outcome);
            }
        }
        Ok(())
    }
}

/// Scores an externally supplied seed set: no solver runs, the timed
/// step is the spread estimation itself. The report is labelled with
/// the seed file's name in place of a solver name.
pub fn evaluate(graph: &GraphStore, options: &EvalOptions, seeds: Vec<NodeId>, run_seed: u64) {
    let model = DiffusionModel::from(options.model);
    let engine = model.build(graph);
    let label = options
        .seed_set
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| "seed set".to_string());
    info!(seed_set = %label, count = seeds.len(), "evaluating fixed seed set");

    let started = Instant::now();
    let forward = engine.spread(&seeds, options.simulations, Direction::Forward, run_seed);
    let backward = options.backwards.then(|| {
        engine.spread(&seeds, options.simulations, Direction::Backward, run_seed)
    });
    let seconds = started.elapsed().as_secs_f64();

    let outcome = Outcome {
        solver: label,
        seeds,
        seconds,
        forward,
        backward,
    };
    if options.raw {
        print_raw(&outcome);
    } else {
        print_framed(graph, model, options.simulations, &outcome);
    }
}

/// Writes one seed per line under `<dir>/<solver>/result-<n>.txt`,
/// never clobbering the results of an earlier run.
fn write_seed_file(dir: &std::path::Path, outcome: &Outcome) -> Result<PathBuf, CliError> {
    let solver_dir = dir.join(&outcome.solver);
    fs::create_dir_all(&solver_dir)?;
    let path = (0..)
        .map(|n| solver_dir.join(format!("result-{n}.txt")))
        .find(|p| !p.exists())
        .expect("unbounded result numbering");
    let mut file = fs::File::create(&path)?;
    for seed in &outcome.seeds {
        writeln!(file, "{seed}")?;
    }
    Ok(path)
}

fn joined(seeds: &[NodeId]) -> String {
    seeds
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_framed(graph: &GraphStore, model: DiffusionModel, simulations: usize, o: &Outcome) {
    let title = format!("{} on {}", o.solver, graph.name());
    let width = title.len().max(46);
    let rule = format!("+{}+", "-".repeat(width + 2));
    println!("{rule}");
    println!("| {title:<width$} |");
    println!("{rule}");
    println!("  model      {}", model.as_str());
    println!("  seeds      {}", joined(&o.seeds));
    println!("  time       {:.3} s", o.seconds);
    println!("  spread     {:.2}  ({simulations} trials)", o.forward);
    if let Some(backward) = o.backward {
        println!("  backward   {backward:.2}");
    }
    println!();
}

fn print_raw(o: &Outcome) {
    let mut line = format!(
        "{}\t{}\t{:.6}\t{:.4}",
        o.solver,
        o.seeds.len(),
        o.seconds,
        o.forward
    );
    if let Some(backward) = o.backward {
        line.push_str(&format!("\t{backward:.4}"));
    }
    line.push('\t');
    line.push_str(&joined(&o.seeds));
    println!("{line}");
}
