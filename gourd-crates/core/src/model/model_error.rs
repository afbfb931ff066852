use thiserror::Error;

use crate::engine::variables::DomainId;

/// The reasons a model is rejected before search starts. Solving such a model reports
/// `ModelInvalid`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("variable '{name}' has an empty domain")]
    EmptyDomain { name: String },
    #[error("{constraint} constraint refers to unknown variable {variable}")]
    UnknownVariable {
        constraint: &'static str,
        variable: DomainId,
    },
    #[error("literal over variable '{name}' whose domain is not within {{0, 1}}")]
    NonBooleanLiteral { name: String },
    #[error("table tuple {tuple} has {actual} values but the table has arity {expected}")]
    TupleArity {
        tuple: usize,
        actual: usize,
        expected: usize,
    },
    #[error("task {task} of a cumulative constraint can have a negative demand")]
    NegativeDemand { task: usize },
    #[error("interval '{name}' can have a negative size")]
    NegativeIntervalSize { name: String },
    #[error("reservoir level range [{min_level}, {max_level}] does not contain 0")]
    ReservoirExcludesZero { min_level: i64, max_level: i64 },
    #[error("the expression of linear constraint {constraint} overflows 64 bits")]
    LinearOverflow { constraint: usize },
    #[error("objective coefficient {coefficient} cannot be negated")]
    InvalidObjectiveCoefficient { coefficient: i64 },
    #[error("the range of the objective does not fit in 64 bits")]
    ObjectiveOverflow,
}
