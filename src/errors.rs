use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("paginate expression {expression} is not supported by {evaluator}")]
    PaginateExpressionNotSupported { expression: String, evaluator: String },

    #[error("key arity mismatch for type {type_name}: expected {expected} key values, got {actual}")]
    KeyArityMismatch { type_name: String, expected: usize, actual: usize },

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_paginate_names_expression_and_evaluator() {
        let err = StoreError::PaginateExpressionNotSupported {
            expression: "Cursor { cursor: None, take: None }".into(),
            evaluator: "PaginateEvaluator".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Cursor"));
        assert!(msg.contains("PaginateEvaluator"));
    }

    #[test]
    fn key_arity_display() {
        let err = StoreError::KeyArityMismatch { type_name: "users".into(), expected: 2, actual: 1 };
        assert_eq!(
            err.to_string(),
            "key arity mismatch for type users: expected 2 key values, got 1"
        );
    }
}
