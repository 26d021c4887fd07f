use bson::Bson;
use std::cmp::Ordering;

use super::compare::{compare_values, values_equal};
use super::types::FilterExpression;
use crate::entity::{Entity, PropertyRef};

/// Predicate compiled from a [`FilterExpression`].
pub type EntityFilterFn<'a> = Box<dyn Fn(&Entity) -> bool + 'a>;

/// Compiles filter trees into predicates over entities.
#[derive(Debug, Default, Clone, Copy)]
pub struct FilterEvaluator;

impl FilterEvaluator {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compile `expr` into a predicate. Composite nodes compile each child
    /// through this same evaluator, so tree depth is up to the caller.
    #[must_use]
    pub fn compile<'a>(&self, expr: &'a FilterExpression) -> EntityFilterFn<'a> {
        match expr {
            FilterExpression::Eq { property, value } => {
                Box::new(move |e: &Entity| property.extract(e).is_some_and(|v| values_equal(v, value)))
            }
            FilterExpression::NotEq { property, value } => {
                Box::new(move |e: &Entity| !property.extract(e).is_some_and(|v| values_equal(v, value)))
            }
            FilterExpression::In { property, values } => {
                Box::new(move |e: &Entity| property.extract(e).is_some_and(|v| is_in_set(v, values)))
            }
            FilterExpression::NotIn { property, values } => {
                Box::new(move |e: &Entity| !property.extract(e).is_some_and(|v| is_in_set(v, values)))
            }
            FilterExpression::Gt { property, value } => ordered(property, value, Ordering::is_gt),
            FilterExpression::Gte { property, value } => ordered(property, value, Ordering::is_ge),
            FilterExpression::Lt { property, value } => ordered(property, value, Ordering::is_lt),
            FilterExpression::Lte { property, value } => ordered(property, value, Ordering::is_le),
            FilterExpression::Contains { property, value } => {
                textual(property, move |s: &str| s.contains(value.as_str()), false)
            }
            FilterExpression::NotContains { property, value } => {
                textual(property, move |s: &str| !s.contains(value.as_str()), true)
            }
            FilterExpression::StartsWith { property, value } => {
                textual(property, move |s: &str| s.starts_with(value.as_str()), false)
            }
            FilterExpression::NotStartsWith { property, value } => {
                textual(property, move |s: &str| !s.starts_with(value.as_str()), true)
            }
            FilterExpression::EndsWith { property, value } => {
                textual(property, move |s: &str| s.ends_with(value.as_str()), false)
            }
            FilterExpression::NotEndsWith { property, value } => {
                textual(property, move |s: &str| !s.ends_with(value.as_str()), true)
            }
            FilterExpression::And(children) => {
                let fns: Vec<EntityFilterFn<'a>> = children.iter().map(|c| self.compile(c)).collect();
                Box::new(move |e: &Entity| fns.iter().all(|f| f(e)))
            }
            FilterExpression::Or(children) => {
                let fns: Vec<EntityFilterFn<'a>> = children.iter().map(|c| self.compile(c)).collect();
                Box::new(move |e: &Entity| fns.iter().any(|f| f(e)))
            }
        }
    }

    /// One-shot evaluation of `expr` against `entity`.
    #[must_use]
    pub fn matches(&self, expr: &FilterExpression, entity: &Entity) -> bool {
        self.compile(expr)(entity)
    }
}

fn is_in_set(v: &Bson, set: &[Bson]) -> bool {
    set.iter().any(|x| values_equal(v, x))
}

// A missing property never satisfies an ordering comparison.
fn ordered<'a>(
    property: &'a PropertyRef,
    value: &'a Bson,
    accept: fn(Ordering) -> bool,
) -> EntityFilterFn<'a> {
    Box::new(move |e: &Entity| property.extract(e).is_some_and(|v| accept(compare_values(v, value))))
}

// Text leaves only test strings; any other value (or none) yields `otherwise`.
fn textual<'a>(
    property: &'a PropertyRef,
    test: impl Fn(&str) -> bool + 'a,
    otherwise: bool,
) -> EntityFilterFn<'a> {
    Box::new(move |e: &Entity| match property.extract(e) {
        Some(Bson::String(s)) => test(s.as_str()),
        _ => otherwise,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn alice() -> Entity {
        Entity::new(doc! {"name": "alice", "age": 30, "city": "Oslo", "info": {"visits": 3}})
    }

    fn eval(f: &FilterExpression, e: &Entity) -> bool {
        FilterEvaluator::new().matches(f, e)
    }

    #[test]
    fn equality_leaves() {
        let e = alice();
        assert!(eval(&FilterExpression::eq("name", "alice"), &e));
        assert!(eval(&FilterExpression::eq("age", 30.0), &e));
        assert!(!eval(&FilterExpression::eq("name", "bob"), &e));
        assert!(eval(&FilterExpression::not_eq("name", "bob"), &e));
        // absent property is unequal to anything
        assert!(!eval(&FilterExpression::eq("missing", "x"), &e));
        assert!(eval(&FilterExpression::not_eq("missing", "x"), &e));
        assert!(eval(&FilterExpression::eq("info.visits", 3), &e));
    }

    #[test]
    fn membership_leaves() {
        let e = alice();
        assert!(eval(&FilterExpression::in_("city", ["Bergen", "Oslo"]), &e));
        assert!(!eval(&FilterExpression::in_("city", ["Bergen"]), &e));
        assert!(eval(&FilterExpression::not_in("city", ["Bergen"]), &e));
        assert!(!eval(&FilterExpression::not_in("age", [Bson::Int64(30)]), &e));
        assert!(!eval(&FilterExpression::in_("city", Vec::<Bson>::new()), &e));
        assert!(eval(&FilterExpression::not_in("missing", [1]), &e));
    }

    #[test]
    fn membership_scans_the_whole_set() {
        let e = Entity::new(doc! {"n": 1500});
        let values: Vec<i32> = (0..=1500).collect();
        assert!(eval(&FilterExpression::in_("n", values.clone()), &e));
        assert!(!eval(&FilterExpression::not_in("n", values), &e));
    }

    #[test]
    fn ordering_leaves() {
        let e = alice();
        assert!(eval(&FilterExpression::gt("age", 29), &e));
        assert!(!eval(&FilterExpression::gt("age", 30), &e));
        assert!(eval(&FilterExpression::gte("age", 30), &e));
        assert!(eval(&FilterExpression::lt("age", 30.5), &e));
        assert!(eval(&FilterExpression::lte("age", 30), &e));
        assert!(!eval(&FilterExpression::lte("age", 29), &e));
        assert!(eval(&FilterExpression::gt("name", "aaron"), &e));
        assert!(!eval(&FilterExpression::gt("missing", 0), &e));
        assert!(!eval(&FilterExpression::lt("missing", 0), &e));
    }

    #[test]
    fn text_leaves_on_strings() {
        let e = alice();
        assert!(eval(&FilterExpression::contains("name", "lic"), &e));
        assert!(!eval(&FilterExpression::not_contains("name", "lic"), &e));
        assert!(eval(&FilterExpression::starts_with("name", "al"), &e));
        assert!(eval(&FilterExpression::not_starts_with("name", "li"), &e));
        assert!(eval(&FilterExpression::ends_with("name", "ice"), &e));
        assert!(!eval(&FilterExpression::not_ends_with("name", "ice"), &e));
    }

    #[test]
    fn text_leaves_on_non_strings() {
        let e = alice();
        assert!(!eval(&FilterExpression::contains("age", "3"), &e));
        assert!(eval(&FilterExpression::not_contains("age", "3"), &e));
        assert!(!eval(&FilterExpression::starts_with("age", "3"), &e));
        assert!(eval(&FilterExpression::not_starts_with("age", "3"), &e));
        assert!(!eval(&FilterExpression::ends_with("missing", ""), &e));
        assert!(eval(&FilterExpression::not_ends_with("missing", ""), &e));
    }

    #[test]
    fn composites_and_nesting() {
        let e = alice();
        let f = FilterExpression::and(vec![
            FilterExpression::eq("city", "Oslo"),
            FilterExpression::or(vec![
                FilterExpression::lt("age", 18),
                FilterExpression::starts_with("name", "a"),
            ]),
        ]);
        assert!(eval(&f, &e));
        assert!(eval(&FilterExpression::and(vec![]), &e));
        assert!(!eval(&FilterExpression::or(vec![]), &e));

        let mut deep = FilterExpression::eq("name", "alice");
        for _ in 0..200 {
            deep = FilterExpression::and(vec![deep]);
        }
        assert!(eval(&deep, &e));
    }
}
