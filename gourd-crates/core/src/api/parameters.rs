use std::time::Duration;

use crate::branching::branchers::IndependentVariableValueBrancher;
use crate::branching::value_selection::InDomainMax;
use crate::branching::value_selection::InDomainMin;
use crate::branching::value_selection::InDomainRandom;
use crate::branching::value_selection::InDomainSplit;
use crate::branching::value_selection::ReverseInDomainSplit;
use crate::branching::value_selection::ValueSelector;
use crate::branching::variable_selection::AntiFirstFail;
use crate::branching::variable_selection::FirstFail;
use crate::branching::variable_selection::InputOrder;
use crate::branching::variable_selection::RandomSelector;
use crate::branching::variable_selection::VariableSelector;
use crate::branching::Brancher;
use crate::engine::variables::DomainId;

/// How the next variable to branch on is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum VariableSelection {
    /// The first unfixed variable in creation order.
    InputOrder,
    /// The unfixed variable with the smallest domain; ties go to the lowest index.
    #[default]
    FirstFail,
    /// The unfixed variable with the largest domain.
    AntiFirstFail,
    /// A uniformly random unfixed variable.
    Random,
}

/// Which decision is taken on the selected variable; the alternative is its negation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ValueSelection {
    /// `x <= lb(x)`
    #[default]
    Min,
    /// `x >= ub(x)`
    Max,
    /// The lower half of the domain.
    Split,
    /// The upper half of the domain.
    ReverseSplit,
    /// `x == v` for a random value `v` of the domain.
    Random,
}

/// The strategies given to the workers after the first one, in order.
const PORTFOLIO: [(VariableSelection, ValueSelection); 5] = [
    (VariableSelection::FirstFail, ValueSelection::Split),
    (VariableSelection::InputOrder, ValueSelection::Min),
    (VariableSelection::Random, ValueSelection::Random),
    (VariableSelection::AntiFirstFail, ValueSelection::Max),
    (VariableSelection::FirstFail, ValueSelection::ReverseSplit),
];

/// The options of a solve.
///
/// ```
/// # use std::time::Duration;
/// # use gourd_core::api::SolverParameters;
/// let parameters = SolverParameters::default()
///     .with_time_limit_seconds(2.5)
///     .with_num_workers(4);
///
/// assert_eq!(Some(Duration::from_millis(2500)), parameters.time_limit);
/// assert_eq!(4, parameters.num_workers);
/// assert_eq!(42, parameters.random_seed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverParameters {
    /// Wall-clock budget; checked before every decision.
    pub time_limit: Option<Duration>,
    /// The number of portfolio workers; `0` is treated as `1`.
    pub num_workers: usize,
    /// Report every solution instead of stopping at the first (satisfaction) or only reporting
    /// improvements (optimisation). Forces a single worker.
    pub enumerate_all_solutions: bool,
    /// Worker `i` seeds its random generator with `random_seed + i`.
    pub random_seed: u64,
    /// Log a line for every solution found.
    pub log_search_progress: bool,
    /// The number of decisions each worker may take.
    pub decision_limit: Option<u64>,
    /// The variable selection of the first worker.
    pub variable_selection: VariableSelection,
    /// The value selection of the first worker.
    pub value_selection: ValueSelection,
}

impl Default for SolverParameters {
    fn default() -> Self {
        SolverParameters {
            time_limit: None,
            num_workers: 1,
            enumerate_all_solutions: false,
            random_seed: 42,
            log_search_progress: false,
            decision_limit: None,
            variable_selection: VariableSelection::default(),
            value_selection: ValueSelection::default(),
        }
    }
}

impl SolverParameters {
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = Some(time_limit);
        self
    }

    /// Negative or NaN limits stop immediately, infinite ones never.
    pub fn with_time_limit_seconds(self, seconds: f64) -> Self {
        let time_limit = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX);
        self.with_time_limit(time_limit)
    }

    pub fn with_num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    pub fn with_enumerate_all_solutions(mut self, enumerate_all_solutions: bool) -> Self {
        self.enumerate_all_solutions = enumerate_all_solutions;
        self
    }

    pub fn with_random_seed(mut self, random_seed: u64) -> Self {
        self.random_seed = random_seed;
        self
    }

    pub fn with_log_search_progress(mut self, log_search_progress: bool) -> Self {
        self.log_search_progress = log_search_progress;
        self
    }

    pub fn with_decision_limit(mut self, decision_limit: u64) -> Self {
        self.decision_limit = Some(decision_limit);
        self
    }

    pub fn with_search_strategy(
        mut self,
        variable_selection: VariableSelection,
        value_selection: ValueSelection,
    ) -> Self {
        self.variable_selection = variable_selection;
        self.value_selection = value_selection;
        self
    }

    /// The number of workers which will actually run.
    pub(crate) fn effective_num_workers(&self) -> usize {
        if self.enumerate_all_solutions {
            1
        } else {
            self.num_workers.max(1)
        }
    }

    /// The strategy of worker `index`: the configured one for the first worker, a fixed rotation
    /// for the others.
    pub(crate) fn strategy_of_worker(&self, index: usize) -> (VariableSelection, ValueSelection) {
        match index {
            0 => (self.variable_selection, self.value_selection),
            _ => PORTFOLIO[(index - 1) % PORTFOLIO.len()],
        }
    }
}

/// A brancher over `variables` following the given strategy.
pub(crate) fn create_brancher(
    variables: &[DomainId],
    variable_selection: VariableSelection,
    value_selection: ValueSelection,
) -> impl Brancher {
    let variable_selector: Box<dyn VariableSelector<DomainId>> = match variable_selection {
        VariableSelection::InputOrder => Box::new(InputOrder::new(variables)),
        VariableSelection::FirstFail => Box::new(FirstFail::new(variables)),
        VariableSelection::AntiFirstFail => Box::new(AntiFirstFail::new(variables)),
        VariableSelection::Random => Box::new(RandomSelector::new(variables)),
    };
    let value_selector: Box<dyn ValueSelector<DomainId>> = match value_selection {
        ValueSelection::Min => Box::new(InDomainMin),
        ValueSelection::Max => Box::new(InDomainMax),
        ValueSelection::Split => Box::new(InDomainSplit),
        ValueSelection::ReverseSplit => Box::new(ReverseInDomainSplit),
        ValueSelection::Random => Box::new(InDomainRandom),
    };

    IndependentVariableValueBrancher::new(variable_selector, value_selector)
}
