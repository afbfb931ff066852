//! # Gourd
//! Gourd is a finite-domain constraint programming solver. A problem is stated as a
//! [`model::Model`] of bounded integer variables and (global) constraints, optionally with a linear
//! objective, and solved by the [`api::CpSolver`] through propagation and depth-first search, on a
//! single thread or as a portfolio of workers sharing the best objective bound.
//!
//! ```rust
//! # use gourd_solver::api::CpSolver;
//! # use gourd_solver::api::SolverParameters;
//! # use gourd_solver::api::SolverStatus;
//! # use gourd_solver::model::Model;
//! let mut model = Model::default();
//! let x = model.new_int_var(0, 9, "x");
//! let y = model.new_int_var(0, 9, "y");
//! let _ = model.add_all_different([x, y]);
//! let _ = model.add_linear(gourd_solver::model::LinearExpr::from(x) + y, 17, 17);
//! model.maximize(x);
//!
//! let response = CpSolver::new().solve(&model, &SolverParameters::default());
//! assert_eq!(SolverStatus::Optimal, response.status());
//! assert_eq!(Some(9), response.value(x));
//! assert_eq!(Some(8), response.value(y));
//! ```
//!
//! The [`samples`] module contains a handful of classic models which are also exposed through the
//! `gourd-solver` binary.
pub mod samples;

pub use gourd_core::*;
