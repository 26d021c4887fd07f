use std::ops::Range;
use std::sync::Arc;

use crate::entity::Entity;

/// One page of a browse, plus what is needed to step to its neighbours.
///
/// The source sequence is the filtered and sorted result before windowing and
/// is shared between a page and the pages derived from it. Pages outside the
/// source are empty rather than errors.
#[derive(Debug, Clone)]
pub struct PaginatedResult {
    source: Arc<[Entity]>,
    page_index: isize,
    page_length: usize,
    offset: usize,
    entities: Vec<Entity>,
}

impl PaginatedResult {
    pub fn new(
        source: impl Into<Arc<[Entity]>>,
        page_index: isize,
        page_length: usize,
        offset: usize,
    ) -> Self {
        let source = source.into();
        let range = window(source.len(), page_index, page_length, offset);
        let entities = source[range].to_vec();
        Self { source, page_index, page_length, offset, entities }
    }

    /// The whole sequence as page 0.
    pub fn single_page(source: impl Into<Arc<[Entity]>>) -> Self {
        let source = source.into();
        let len = source.len();
        Self::new(source, 0, len, 0)
    }

    /// Count of entities before windowing.
    #[must_use]
    pub fn total_length(&self) -> usize {
        self.source.len()
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn into_entities(self) -> Vec<Entity> {
        self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    #[must_use]
    pub const fn page_index(&self) -> isize {
        self.page_index
    }

    #[must_use]
    pub const fn page_length(&self) -> usize {
        self.page_length
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub fn has_next_page(&self) -> bool {
        let next_start = self.offset as i128 + (self.page_index as i128 + 1) * self.page_length as i128;
        next_start < self.total_length() as i128
    }

    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.page_index >= 1
    }

    #[must_use]
    pub fn next_page(&self) -> Self {
        Self::new(
            Arc::clone(&self.source),
            self.page_index.saturating_add(1),
            self.page_length,
            self.offset,
        )
    }

    #[must_use]
    pub fn prev_page(&self) -> Self {
        Self::new(
            Arc::clone(&self.source),
            self.page_index.saturating_sub(1),
            self.page_length,
            self.offset,
        )
    }
}

impl<'a> IntoIterator for &'a PaginatedResult {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.iter()
    }
}

// [offset + index*length, offset + (index+1)*length) clamped to [0, total].
fn window(total: usize, page_index: isize, page_length: usize, offset: usize) -> Range<usize> {
    let total_i = total as i128;
    let start = offset as i128 + page_index as i128 * page_length as i128;
    let end = start + page_length as i128;
    let lo = start.clamp(0, total_i);
    let hi = end.clamp(0, total_i);
    if lo >= hi {
        return 0..0;
    }
    // both bounds lie in 0..=total here
    lo as usize..hi as usize
}
