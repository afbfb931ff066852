//! The model a user builds and hands to the solver: variables with initial domains, constraint
//! records with their enforcement literals, intervals and an optional objective.

mod constraint;
mod constraint_handle;
mod cp_model;
mod linear_expr;
mod model_error;

pub use constraint::Constraint;
pub use constraint::ConstraintRecord;
pub use constraint_handle::ConstraintHandle;
pub use cp_model::Model;
pub use linear_expr::LinearExpr;
pub use model_error::ModelError;
