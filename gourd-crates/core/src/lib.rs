//! # Gourd
//! The propagation and search kernel of a finite-domain constraint programming solver.
//!
//! A [`model::Model`] holds integer variables with their initial [`engine::Domain`]s and a list of
//! constraint records, each a [`model::Constraint`] optionally enforced by literals. The
//! [`api::CpSolver`] hands a private [`engine::VariableStore`] to every search worker, which
//! alternates between propagating the constraints to a fixpoint and branching on a variable,
//! undoing narrowings through the trail when a branch fails. For optimisation problems every
//! solution tightens a bound on the objective which propagates like any other linear constraint.
//!
//! ```
//! # use gourd_core::api::CpSolver;
//! # use gourd_core::api::SolverParameters;
//! # use gourd_core::api::SolverStatus;
//! # use gourd_core::model::Model;
//! let mut model = Model::default();
//! let x = model.new_int_var(0, 3, "x");
//! let y = model.new_int_var(0, 3, "y");
//! let z = model.new_int_var(0, 3, "z");
//! let _ = model.add_less_than(x, y);
//! let _ = model.add_less_than(y, z);
//! let _ = model.add_less_than(z, x);
//!
//! let response = CpSolver::new().solve(&model, &SolverParameters::default());
//! assert_eq!(SolverStatus::Infeasible, response.status());
//! ```
pub mod api;
pub mod asserts;
pub(crate) mod basic_types;
pub mod branching;
pub mod containers;
pub mod engine;
pub(crate) mod math;
pub mod model;
pub mod propagators;
pub mod statistics;

pub use convert_case;
pub use rand;

pub use crate::basic_types::EmptyDomain;
pub use crate::basic_types::Inconsistency;
pub use crate::basic_types::InvalidNarrowing;
pub use crate::basic_types::Narrowing;
pub use crate::basic_types::Random;
pub use crate::basic_types::TrailMark;
pub use crate::engine::predicates;
pub use crate::engine::termination;
pub use crate::engine::variables;
