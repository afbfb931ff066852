mod os_signal_termination;
mod result;

use std::io::Write;

use clap::Parser;
use clap::Subcommand;
use gourd_solver::api::CpSolver;
use gourd_solver::api::SolverParameters;
use gourd_solver::api::SolverStatus;
use gourd_solver::api::ValueSelection;
use gourd_solver::api::VariableSelection;
use gourd_solver::convert_case::Case;
use gourd_solver::rand::rngs::SmallRng;
use gourd_solver::rand::Rng;
use gourd_solver::rand::SeedableRng;
use gourd_solver::samples;
use gourd_solver::samples::Operation;
use gourd_solver::samples::Sample;
use gourd_solver::statistics::configure_statistic_logging;
use log::error;
use log::info;
use log::LevelFilter;
use result::GourdResult;

#[derive(Debug, Parser)]
#[command(
    help_template = "\
{before-help}{name} {version}
Authors: {author}
About: {about}

{usage-heading}\n{tab}{usage}

{all-args}{after-help}
",
    author,
    version,
    about,
    arg_required_else_help = true
)]
struct Args {
    /// The sample model to solve.
    #[command(subcommand)]
    sample: SampleCommand,

    /// The time limit for the solver in seconds. Without a limit the solver runs until it proves
    /// optimality or infeasibility, or until it is interrupted (SIGINT/SIGTERM).
    ///
    /// Possible values: f64
    #[arg(short = 't', long = "time-limit", global = true, verbatim_doc_comment)]
    time_limit: Option<f64>,

    /// The number of portfolio workers. Every worker searches the whole problem with its own
    /// branching strategy; the workers share the best objective value found so far.
    ///
    /// Possible values: usize
    #[arg(
        long = "num-workers",
        default_value_t = 1,
        global = true,
        verbatim_doc_comment
    )]
    num_workers: usize,

    /// Report all solutions in the case of satisfaction problems, or every intermediate solution
    /// in the case of optimisation problems. Enumeration uses a single worker.
    ///
    /// Possible values: bool
    #[arg(short = 'a', long = "all-solutions", global = true, verbatim_doc_comment)]
    all_solutions: bool,

    /// The random seed to use for the Pseudo Random Number Generator; worker `i` uses the seed
    /// plus `i`.
    ///
    /// Possible values: u64
    #[arg(long = "random-seed", default_value_t = 42, global = true, verbatim_doc_comment)]
    random_seed: u64,

    /// Enables log message output from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 'v', long = "verbose", global = true, verbatim_doc_comment)]
    verbose: bool,

    /// Enables logging of statistics from the solver.
    ///
    /// Possible values: bool
    #[arg(short = 's', long = "log-statistics", global = true, verbatim_doc_comment)]
    log_statistics: bool,

    /// How the first worker selects the variable to branch on.
    #[arg(long, value_enum, default_value_t, global = true)]
    variable_selection: VariableSelection,

    /// How the first worker selects the value of the chosen variable.
    #[arg(long, value_enum, default_value_t, global = true)]
    value_selection: ValueSelection,
}

#[derive(Debug, Subcommand)]
enum SampleCommand {
    /// Place N queens on an N by N board such that no two queens attack each other.
    NQueens {
        #[arg(default_value_t = 8)]
        n: u32,
    },
    /// Solve the cryptarithm SEND + MORE = MONEY.
    SendMoreMoney,
    /// Pack all items into a single bin.
    BinPacking {
        /// The weights of the items, separated by commas.
        #[arg(long, value_delimiter = ',', default_values_t = [6, 6])]
        weights: Vec<i64>,
        /// The capacity of the bin.
        #[arg(long, default_value_t = 12)]
        capacity: i64,
    },
    /// Minimise the makespan of a job shop with three jobs on three machines.
    JobShop,
    /// Find the shortest tour through randomly placed cities.
    Tsp {
        /// The number of cities.
        #[arg(long, default_value_t = 8)]
        cities: usize,
    },
}

impl Args {
    fn parameters(&self) -> SolverParameters {
        let parameters = SolverParameters::default()
            .with_num_workers(self.num_workers)
            .with_enumerate_all_solutions(self.all_solutions)
            .with_random_seed(self.random_seed)
            .with_log_search_progress(self.verbose)
            .with_search_strategy(self.variable_selection, self.value_selection);

        match self.time_limit {
            Some(seconds) => parameters.with_time_limit_seconds(seconds),
            None => parameters,
        }
    }
}

fn configure_logging(verbose: bool, log_statistics: bool) -> std::io::Result<()> {
    if log_statistics {
        configure_statistic_logging(
            "%%%mzn-stat:",
            Some("%%%mzn-stat-end"),
            Some(Case::Camel),
            None,
        );
    }
    let level_filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .format(move |buf, record| {
            write!(buf, "% ")?;

            writeln!(buf, "{}", record.args())
        })
        .filter_level(level_filter)
        .target(env_logger::Target::Stdout)
        .init();
    info!("Logging successfully configured");
    Ok(())
}

fn main() {
    match run() {
        Ok(()) => {}
        Err(e) => {
            error!("Execution failed, error: {e}");
            std::process::exit(1);
        }
    }
}

fn run() -> GourdResult<()> {
    let args = Args::parse();

    configure_logging(args.verbose, args.log_statistics)?;

    let solver = CpSolver::new();
    os_signal_termination::install(&solver.stop_handle())?;

    let parameters = args.parameters();
    match &args.sample {
        SampleCommand::NQueens { n } => solve(&solver, &samples::n_queens(*n), &parameters),
        SampleCommand::SendMoreMoney => solve(&solver, &samples::send_more_money(), &parameters),
        SampleCommand::BinPacking { weights, capacity } => solve(
            &solver,
            &samples::bin_packing(weights, *capacity),
            &parameters,
        ),
        SampleCommand::JobShop => solve(
            &solver,
            &samples::job_shop(&job_shop_instance()),
            &parameters,
        ),
        SampleCommand::Tsp { cities } => solve(
            &solver,
            &samples::tsp(&random_cities(*cities, args.random_seed)),
            &parameters,
        ),
    }
}

/// Solves the sample, printing every reported solution followed by a separator line and a final
/// status line in the MiniZinc output conventions.
fn solve(
    solver: &CpSolver,
    sample: &(impl Sample + Sync),
    parameters: &SolverParameters,
) -> GourdResult<()> {
    let response = solver.solve_with_callback(sample.model(), parameters, |solution| {
        println!("{}", sample.format_solution(solution));
        if let Some(objective_value) = solution.objective_value() {
            println!("objective = {objective_value}");
        }
        println!("----------");
    });

    if let Some(model_error) = response.model_error() {
        return Err(model_error.clone().into());
    }

    match response.status() {
        SolverStatus::Optimal => println!("=========="),
        SolverStatus::Infeasible => println!("=====UNSATISFIABLE====="),
        SolverStatus::Unknown => println!("=====UNKNOWN====="),
        SolverStatus::Feasible | SolverStatus::ModelInvalid => {}
    }
    response.log_statistics();

    Ok(())
}

/// The job shop from the OR-Tools documentation; its optimal makespan is 11.
fn job_shop_instance() -> Vec<Vec<Operation>> {
    let operation = |machine, duration| Operation { machine, duration };
    vec![
        vec![operation(0, 3), operation(1, 2), operation(2, 2)],
        vec![operation(0, 2), operation(2, 1), operation(1, 4)],
        vec![operation(1, 4), operation(2, 3)],
    ]
}

/// The rounded euclidean distances between cities placed uniformly in a 100 by 100 square.
fn random_cities(num_cities: usize, seed: u64) -> Vec<Vec<i64>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let positions = (0..num_cities)
        .map(|_| (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
        .collect::<Vec<(f64, f64)>>();

    positions
        .iter()
        .map(|&(x1, y1)| {
            positions
                .iter()
                .map(|&(x2, y2)| (x1 - x2).hypot(y1 - y2).round() as i64)
                .collect()
        })
        .collect()
}
