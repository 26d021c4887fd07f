use std::cmp::Ordering;

use super::compare::compare_optional;
use super::types::SortExpression;
use crate::entity::Entity;

/// Three-way comparator compiled from a [`SortExpression`].
pub type EntitySortFn<'a> = Box<dyn Fn(&Entity, &Entity) -> Ordering + 'a>;

/// Compiles sort chains into comparators.
#[derive(Debug, Default, Clone, Copy)]
pub struct SortEvaluator;

impl SortEvaluator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compile `expr`. The parent chain is consulted first and only a tie there
    /// lets this node's own property decide, giving most-significant-key-first order.
    #[must_use]
    pub fn compile<'a>(&self, expr: &'a SortExpression) -> EntitySortFn<'a> {
        let parent = expr.parent().map(|p| self.compile(p));
        let (property, descending) = match expr {
            SortExpression::Asc { property, .. } => (property, false),
            SortExpression::Desc { property, .. } => (property, true),
        };
        Box::new(move |x: &Entity, y: &Entity| {
            if let Some(parent) = &parent {
                let ord = parent(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            let ord = compare_optional(property.extract(x), property.extract(y));
            if descending { ord.reverse() } else { ord }
        })
    }

    /// Stable in-place sort of `entities` by `expr`.
    pub fn sort(&self, expr: &SortExpression, entities: &mut [Entity]) {
        let cmp = self.compile(expr);
        entities.sort_by(|a, b| cmp(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn names(es: &[Entity], field: &str) -> Vec<String> {
        es.iter().map(|e| e.data.get_str(field).unwrap_or_default().to_string()).collect()
    }

    #[test]
    fn chain_orders_ties_by_secondary_key() {
        let mut es = vec![
            Entity::new(doc! {"g": 1, "n": "z"}),
            Entity::new(doc! {"g": 1, "n": "a"}),
            Entity::new(doc! {"g": 0, "n": "m"}),
        ];
        SortEvaluator::new().sort(&SortExpression::asc("g").then_asc("n"), &mut es);
        assert_eq!(names(&es, "n"), vec!["m", "a", "z"]);
    }

    #[test]
    fn descending_and_mixed_directions() {
        let mut es = vec![
            Entity::new(doc! {"g": 1, "n": "a"}),
            Entity::new(doc! {"g": 2, "n": "b"}),
            Entity::new(doc! {"g": 1, "n": "c"}),
        ];
        SortEvaluator::new().sort(&SortExpression::desc("g").then_desc("n"), &mut es);
        assert_eq!(names(&es, "n"), vec!["b", "c", "a"]);
        SortEvaluator::new().sort(&SortExpression::asc("g").then_desc("n"), &mut es);
        assert_eq!(names(&es, "n"), vec!["c", "a", "b"]);
    }

    #[test]
    fn parent_decides_before_child() {
        let a = Entity::new(doc! {"g": 0, "n": "z"});
        let b = Entity::new(doc! {"g": 1, "n": "a"});
        let expr = SortExpression::asc("g").then_asc("n");
        let cmp = SortEvaluator::new().compile(&expr);
        assert_eq!(cmp(&a, &b), Ordering::Less);
        assert_eq!(cmp(&b, &a), Ordering::Greater);
        assert_eq!(cmp(&a, &a), Ordering::Equal);
    }

    #[test]
    fn missing_values_sort_first_ascending() {
        let mut es = vec![
            Entity::new(doc! {"n": "b", "rank": 2}),
            Entity::new(doc! {"n": "none"}),
            Entity::new(doc! {"n": "a", "rank": 1}),
        ];
        SortEvaluator::new().sort(&SortExpression::asc("rank"), &mut es);
        assert_eq!(names(&es, "n"), vec!["none", "a", "b"]);
        SortEvaluator::new().sort(&SortExpression::desc("rank"), &mut es);
        assert_eq!(names(&es, "n"), vec!["b", "a", "none"]);
    }

    #[test]
    fn equal_keys_keep_insertion_order() {
        let mut es: Vec<Entity> =
            (0..5).map(|i| Entity::new(doc! {"k": 1, "i": i})).collect();
        SortEvaluator::new().sort(&SortExpression::asc("k"), &mut es);
        let order: Vec<i32> = es.iter().map(|e| e.data.get_i32("i").unwrap()).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }
}
