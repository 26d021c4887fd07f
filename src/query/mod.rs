// Submodules for separation of concerns
mod compare;
mod filter;
mod paged;
mod paginate;
mod sort;
mod types;

// Public API re-exports
pub use compare::{compare_optional, compare_values, values_equal};
pub use filter::{EntityFilterFn, FilterEvaluator};
pub use paged::PaginatedResult;
pub use paginate::{EntityPaginateFn, PaginateEvaluator};
pub use sort::{EntitySortFn, SortEvaluator};
pub use types::{BatchReport, BrowseOptions, FilterExpression, PaginateExpression, SortExpression};
pub(crate) use types::DEFAULT_PAGE_SIZE;
