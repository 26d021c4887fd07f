use crate::entity::PropertyRef;
use bson::Bson;
use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_PAGE_SIZE: usize = 20;

/// Filter tree. Leaves test one property; `And`/`Or` combine children in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterExpression {
    Eq { property: PropertyRef, value: Bson },
    NotEq { property: PropertyRef, value: Bson },
    In { property: PropertyRef, values: Vec<Bson> },
    NotIn { property: PropertyRef, values: Vec<Bson> },
    Gt { property: PropertyRef, value: Bson },
    Gte { property: PropertyRef, value: Bson },
    Lt { property: PropertyRef, value: Bson },
    Lte { property: PropertyRef, value: Bson },
    Contains { property: PropertyRef, value: String },
    NotContains { property: PropertyRef, value: String },
    StartsWith { property: PropertyRef, value: String },
    NotStartsWith { property: PropertyRef, value: String },
    EndsWith { property: PropertyRef, value: String },
    NotEndsWith { property: PropertyRef, value: String },
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
}

impl FilterExpression {
    pub fn eq(property: impl Into<PropertyRef>, value: impl Into<Bson>) -> Self {
        Self::Eq { property: property.into(), value: value.into() }
    }

    pub fn not_eq(property: impl Into<PropertyRef>, value: impl Into<Bson>) -> Self {
        Self::NotEq { property: property.into(), value: value.into() }
    }

    pub fn in_<V: Into<Bson>>(
        property: impl Into<PropertyRef>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::In { property: property.into(), values: values.into_iter().map(Into::into).collect() }
    }

    pub fn not_in<V: Into<Bson>>(
        property: impl Into<PropertyRef>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self::NotIn {
            property: property.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn gt(property: impl Into<PropertyRef>, value: impl Into<Bson>) -> Self {
        Self::Gt { property: property.into(), value: value.into() }
    }

    pub fn gte(property: impl Into<PropertyRef>, value: impl Into<Bson>) -> Self {
        Self::Gte { property: property.into(), value: value.into() }
    }

    pub fn lt(property: impl Into<PropertyRef>, value: impl Into<Bson>) -> Self {
        Self::Lt { property: property.into(), value: value.into() }
    }

    pub fn lte(property: impl Into<PropertyRef>, value: impl Into<Bson>) -> Self {
        Self::Lte { property: property.into(), value: value.into() }
    }

    pub fn contains(property: impl Into<PropertyRef>, value: impl Into<String>) -> Self {
        Self::Contains { property: property.into(), value: value.into() }
    }

    pub fn not_contains(property: impl Into<PropertyRef>, value: impl Into<String>) -> Self {
        Self::NotContains { property: property.into(), value: value.into() }
    }

    pub fn starts_with(property: impl Into<PropertyRef>, value: impl Into<String>) -> Self {
        Self::StartsWith { property: property.into(), value: value.into() }
    }

    pub fn not_starts_with(property: impl Into<PropertyRef>, value: impl Into<String>) -> Self {
        Self::NotStartsWith { property: property.into(), value: value.into() }
    }

    pub fn ends_with(property: impl Into<PropertyRef>, value: impl Into<String>) -> Self {
        Self::EndsWith { property: property.into(), value: value.into() }
    }

    pub fn not_ends_with(property: impl Into<PropertyRef>, value: impl Into<String>) -> Self {
        Self::NotEndsWith { property: property.into(), value: value.into() }
    }

    #[must_use]
    pub fn and(children: Vec<FilterExpression>) -> Self {
        Self::And(children)
    }

    #[must_use]
    pub fn or(children: Vec<FilterExpression>) -> Self {
        Self::Or(children)
    }
}

/// Sort node. `parent` holds the higher-priority key evaluated first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortExpression {
    Asc {
        property: PropertyRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<Box<SortExpression>>,
    },
    Desc {
        property: PropertyRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<Box<SortExpression>>,
    },
}

impl SortExpression {
    pub fn asc(property: impl Into<PropertyRef>) -> Self {
        Self::Asc { property: property.into(), parent: None }
    }

    pub fn desc(property: impl Into<PropertyRef>) -> Self {
        Self::Desc { property: property.into(), parent: None }
    }

    /// Break ties of `self` by `property`, ascending.
    #[must_use]
    pub fn then_asc(self, property: impl Into<PropertyRef>) -> Self {
        Self::Asc { property: property.into(), parent: Some(Box::new(self)) }
    }

    /// Break ties of `self` by `property`, descending.
    #[must_use]
    pub fn then_desc(self, property: impl Into<PropertyRef>) -> Self {
        Self::Desc { property: property.into(), parent: Some(Box::new(self)) }
    }

    #[must_use]
    pub fn property(&self) -> &PropertyRef {
        match self {
            Self::Asc { property, .. } | Self::Desc { property, .. } => property,
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<&SortExpression> {
        match self {
            Self::Asc { parent, .. } | Self::Desc { parent, .. } => parent.as_deref(),
        }
    }
}

/// Windowing directive. Unset numbers fall back to defaults at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaginateExpression {
    Offset { offset: Option<usize>, limit: Option<usize> },
    Size { page: Option<usize>, size: Option<usize> },
    Cursor { cursor: Option<String>, take: Option<usize> },
}

impl PaginateExpression {
    #[must_use]
    pub const fn offset(offset: usize, limit: usize) -> Self {
        Self::Offset { offset: Some(offset), limit: Some(limit) }
    }

    #[must_use]
    pub const fn size(page: usize, size: usize) -> Self {
        Self::Size { page: Some(page), size: Some(size) }
    }

    pub fn cursor(cursor: impl Into<String>, take: usize) -> Self {
        Self::Cursor { cursor: Some(cursor.into()), take: Some(take) }
    }
}

/// Options scoping a browse: which entities, in which order, which window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrowseOptions {
    #[serde(default)]
    pub filter: Option<FilterExpression>,
    #[serde(default)]
    pub sort: Option<SortExpression>,
    #[serde(default)]
    pub paginate: Option<PaginateExpression>,
}

impl BrowseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn filter(mut self, filter: FilterExpression) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortExpression) -> Self {
        self.sort = Some(sort);
        self
    }

    #[must_use]
    pub fn paginate(mut self, paginate: PaginateExpression) -> Self {
        self.paginate = Some(paginate);
        self
    }
}

/// Outcome of a predicate-scoped batch update or remove.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    pub matched: u64,
}
