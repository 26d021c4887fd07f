use super::paged::PaginatedResult;
use super::types::{DEFAULT_PAGE_SIZE, PaginateExpression};
use crate::entity::Entity;
use crate::errors::{Result, StoreError};

/// Windowing function compiled from a [`PaginateExpression`].
pub type EntityPaginateFn = Box<dyn Fn(Vec<Entity>) -> PaginatedResult>;

const EVALUATOR_NAME: &str = "PaginateEvaluator";

/// Compiles paginate directives. Offset and size windows are supported;
/// cursor windows are rejected at compile time.
#[derive(Debug, Clone, Copy)]
pub struct PaginateEvaluator {
    default_page_size: usize,
}

impl Default for PaginateEvaluator {
    fn default() -> Self {
        Self { default_page_size: DEFAULT_PAGE_SIZE }
    }
}

impl PaginateEvaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Page length used when a directive leaves it unset.
    #[must_use]
    pub const fn with_default_page_size(default_page_size: usize) -> Self {
        Self { default_page_size }
    }

    #[must_use]
    pub const fn default_page_size(&self) -> usize {
        self.default_page_size
    }

    /// # Errors
    /// Returns [`StoreError::PaginateExpressionNotSupported`] for cursor directives.
    pub fn compile(&self, expr: &PaginateExpression) -> Result<EntityPaginateFn> {
        match *expr {
            PaginateExpression::Offset { offset, limit } => {
                let page_length = limit.unwrap_or(self.default_page_size);
                let offset = offset.unwrap_or(0);
                Ok(Box::new(move |entities: Vec<Entity>| {
                    PaginatedResult::new(entities, 0, page_length, offset)
                }))
            }
            PaginateExpression::Size { page, size } => {
                let page_index = isize::try_from(page.unwrap_or(0)).unwrap_or(isize::MAX);
                let page_length = size.unwrap_or(self.default_page_size);
                Ok(Box::new(move |entities: Vec<Entity>| {
                    PaginatedResult::new(entities, page_index, page_length, 0)
                }))
            }
            PaginateExpression::Cursor { .. } => {
                log::warn!("cursor pagination requested but not supported: {expr:?}");
                Err(StoreError::PaginateExpressionNotSupported {
                    expression: format!("{expr:?}"),
                    evaluator: EVALUATOR_NAME.to_string(),
                })
            }
        }
    }

    /// Compile and apply in one step.
    ///
    /// # Errors
    /// See [`PaginateEvaluator::compile`].
    pub fn paginate(&self, expr: &PaginateExpression, entities: Vec<Entity>) -> Result<PaginatedResult> {
        Ok(self.compile(expr)?(entities))
    }
}
