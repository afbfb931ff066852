use gourd_solver::model::ModelError;
use thiserror::Error;

pub(crate) type GourdResult<T> = Result<T, GourdError>;

#[derive(Error, Debug)]
pub(crate) enum GourdError {
    #[error("IO error, more details: {0}")]
    IOError(#[from] std::io::Error),
    #[error("The model is invalid, more details: {0}")]
    InvalidModel(#[from] ModelError),
}
