use thiserror::Error;

use crate::calculator::CalculatorError;
use crate::model::{CredentialsError, QuestionError, TaskError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Credentials(#[from] CredentialsError),
    #[error(transparent)]
    Task(#[from] TaskError),
    #[error(transparent)]
    Calculator(#[from] CalculatorError),
}
