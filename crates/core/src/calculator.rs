use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CalculatorError {
    #[error("cannot divide by zero")]
    DivisionByZero,

    #[error("unknown operation: {raw}")]
    UnknownOperation { raw: String },
}

/// The four supported binary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOp {
    /// Parse an operator symbol (`+`, `-`, `*`, `/`).
    ///
    /// # Errors
    ///
    /// Returns `CalculatorError::UnknownOperation` for anything else.
    pub fn parse(raw: &str) -> Result<Self, CalculatorError> {
        match raw.trim() {
            "+" => Ok(BinaryOp::Add),
            "-" => Ok(BinaryOp::Subtract),
            "*" => Ok(BinaryOp::Multiply),
            "/" => Ok(BinaryOp::Divide),
            other => Err(CalculatorError::UnknownOperation {
                raw: other.to_owned(),
            }),
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Apply one binary operation.
///
/// # Errors
///
/// Returns `CalculatorError::DivisionByZero` when dividing by zero.
pub fn evaluate(lhs: f64, op: BinaryOp, rhs: f64) -> Result<f64, CalculatorError> {
    match op {
        BinaryOp::Add => Ok(lhs + rhs),
        BinaryOp::Subtract => Ok(lhs - rhs),
        BinaryOp::Multiply => Ok(lhs * rhs),
        BinaryOp::Divide => {
            if rhs == 0.0 {
                Err(CalculatorError::DivisionByZero)
            } else {
                Ok(lhs / rhs)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_operations_evaluate() {
        assert_eq!(evaluate(2.0, BinaryOp::Add, 3.0).unwrap(), 5.0);
        assert_eq!(evaluate(2.0, BinaryOp::Subtract, 3.0).unwrap(), -1.0);
        assert_eq!(evaluate(2.0, BinaryOp::Multiply, 3.0).unwrap(), 6.0);
        assert_eq!(evaluate(9.0, BinaryOp::Divide, 3.0).unwrap(), 3.0);
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let err = evaluate(1.0, BinaryOp::Divide, 0.0).unwrap_err();
        assert_eq!(err, CalculatorError::DivisionByZero);
    }

    #[test]
    fn parse_accepts_only_known_symbols() {
        assert_eq!(BinaryOp::parse(" * ").unwrap(), BinaryOp::Multiply);
        assert!(matches!(
            BinaryOp::parse("%"),
            Err(CalculatorError::UnknownOperation { .. })
        ));
    }
}
