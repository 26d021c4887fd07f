use bson::{Bson, Document as BsonDocument};

use super::EntityProvider;
use crate::entity::{Entity, PropertyRef, TypeMetadata};
use crate::errors::{Result, StoreError};
use crate::query::{BatchReport, BrowseOptions, PaginatedResult, values_equal};
use crate::telemetry;

fn to_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

impl EntityProvider {
    /// Append `entity` unless the same identity is already resident.
    pub fn add(&mut self, meta: &TypeMetadata, entity: Entity) -> Entity {
        let added = self.store.collection_mut(meta).push(entity.clone());
        telemetry::log_audit("add", meta.name(), u64::from(added));
        entity
    }

    pub fn bulk_add(&mut self, meta: &TypeMetadata, entities: Vec<Entity>) -> Vec<Entity> {
        let col = self.store.collection_mut(meta);
        let added = entities.iter().filter(|&e| col.push(e.clone())).count();
        telemetry::log_audit("bulk_add", meta.name(), to_u64(added));
        entities
    }

    /// Shallow-merge the fields of `entity` onto the resident entity with the
    /// same identity. An absent entity is left alone and still returned.
    pub fn update(&mut self, meta: &TypeMetadata, entity: Entity) -> Entity {
        let found = self.store.collection_mut(meta).assign(&entity.id, &entity.data);
        if !found {
            log::debug!("update of non-resident entity {} in {}", entity.id, meta.name());
        }
        telemetry::log_audit("update", meta.name(), u64::from(found));
        entity
    }

    pub fn bulk_update(&mut self, meta: &TypeMetadata, entities: Vec<Entity>) -> Vec<Entity> {
        let col = self.store.collection_mut(meta);
        let found = entities.iter().filter(|&e| col.assign(&e.id, &e.data)).count();
        telemetry::log_audit("bulk_update", meta.name(), to_u64(found));
        entities
    }

    /// Update when resident, add otherwise.
    pub fn save(&mut self, meta: &TypeMetadata, entity: Entity) -> Entity {
        let col = self.store.collection_mut(meta);
        if !col.assign(&entity.id, &entity.data) {
            col.push(entity.clone());
        }
        telemetry::log_audit("save", meta.name(), 1);
        entity
    }

    pub fn bulk_save(&mut self, meta: &TypeMetadata, entities: Vec<Entity>) -> Vec<Entity> {
        let col = self.store.collection_mut(meta);
        for e in &entities {
            if !col.assign(&e.id, &e.data) {
                col.push(e.clone());
            }
        }
        telemetry::log_audit("bulk_save", meta.name(), to_u64(entities.len()));
        entities
    }

    /// Excise the resident entity with the identity of `entity`; no-op when absent.
    pub fn remove(&mut self, meta: &TypeMetadata, entity: Entity) -> Entity {
        let removed = self.store.collection_mut(meta).remove(&entity.id).is_some();
        telemetry::log_audit("remove", meta.name(), u64::from(removed));
        entity
    }

    pub fn bulk_remove(&mut self, meta: &TypeMetadata, entities: Vec<Entity>) -> Vec<Entity> {
        let col = self.store.collection_mut(meta);
        let removed = entities.iter().filter(|&e| col.remove(&e.id).is_some()).count();
        telemetry::log_audit("bulk_remove", meta.name(), to_u64(removed));
        entities
    }

    /// Merge `fields` onto every entity a browse with `options` would return.
    ///
    /// # Errors
    /// Returns [`StoreError::PaginateExpressionNotSupported`] for cursor pagination.
    pub fn batch_update(
        &mut self,
        meta: &TypeMetadata,
        options: &BrowseOptions,
        fields: &BsonDocument,
    ) -> Result<BatchReport> {
        let start = std::time::Instant::now();
        let page = self.browse(meta, options)?;
        let col = self.store.collection_mut(meta);
        for e in &page {
            col.assign(&e.id, fields);
        }
        let matched = to_u64(page.len());
        crate::dev6!(
            "{{\"bench\":\"provider\",\"op\":\"batch_update\",\"type\":\"{}\",\"duration_ms\":{},\"matched\":{}}}",
            meta.name(),
            u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            matched
        );
        telemetry::log_audit("batch_update", meta.name(), matched);
        Ok(BatchReport { matched })
    }

    /// Remove every entity a browse with `options` returns. The browsed page
    /// is resolved once; removal goes by identity.
    ///
    /// # Errors
    /// Returns [`StoreError::PaginateExpressionNotSupported`] for cursor pagination.
    pub fn batch_remove(&mut self, meta: &TypeMetadata, options: &BrowseOptions) -> Result<BatchReport> {
        let start = std::time::Instant::now();
        let page = self.browse(meta, options)?;
        let col = self.store.collection_mut(meta);
        let removed = page.iter().filter(|&e| col.remove(&e.id).is_some()).count();
        let matched = to_u64(removed);
        crate::dev6!(
            "{{\"bench\":\"provider\",\"op\":\"batch_remove\",\"type\":\"{}\",\"duration_ms\":{},\"matched\":{}}}",
            meta.name(),
            u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            matched
        );
        telemetry::log_audit("batch_remove", meta.name(), matched);
        Ok(BatchReport { matched })
    }

    /// First browsed entity whose declared key properties match `key_values`.
    ///
    /// Key properties are walked in declaration order; each one equal to the
    /// next pending key value consumes it. A candidate matches once every key
    /// value has been consumed.
    ///
    /// # Errors
    /// Returns [`StoreError::KeyArityMismatch`] when `strict_key_arity` is set
    /// and the value count differs from the declared key count, and
    /// [`StoreError::PaginateExpressionNotSupported`] for cursor pagination.
    pub fn query_one(
        &self,
        meta: &TypeMetadata,
        key_values: &[Bson],
        options: &BrowseOptions,
    ) -> Result<Option<Entity>> {
        let expected = meta.key_count();
        if self.config.strict_key_arity && expected != key_values.len() {
            log::warn!(
                "query_one on {}: {} key values for {} key properties",
                meta.name(),
                key_values.len(),
                expected
            );
            telemetry::record_rejected();
            return Err(StoreError::KeyArityMismatch {
                type_name: meta.name.clone(),
                expected,
                actual: key_values.len(),
            });
        }
        let page = self.browse(meta, options)?;
        Ok(page.into_entities().into_iter().find(|e| matches_keys(meta, key_values, e)))
    }

    /// Filter, then sort, then paginate the entities of `meta`.
    ///
    /// # Errors
    /// Returns [`StoreError::PaginateExpressionNotSupported`] for cursor pagination.
    pub fn query_many(&self, meta: &TypeMetadata, options: &BrowseOptions) -> Result<PaginatedResult> {
        self.browse(meta, options)
    }

    fn browse(&self, meta: &TypeMetadata, options: &BrowseOptions) -> Result<PaginatedResult> {
        let start = std::time::Instant::now();
        let paginate = options
            .paginate
            .as_ref()
            .map(|p| self.paginate.compile(p))
            .transpose()
            .inspect_err(|_| telemetry::record_rejected())?;

        let mut entities: Vec<Entity> = match (self.store.collection(meta.name()), &options.filter) {
            (None, _) => Vec::new(),
            (Some(col), None) => col.to_vec(),
            (Some(col), Some(filter)) => {
                let pred = self.filter.compile(filter);
                col.iter().filter(|&e| pred(e)).cloned().collect()
            }
        };
        if let Some(sort) = &options.sort {
            self.sort.sort(sort, &mut entities);
        }
        let page = match paginate {
            Some(paginate) => paginate(entities),
            None => PaginatedResult::single_page(entities),
        };

        telemetry::record_browse();
        log::debug!(
            "browse {}: {} of {} entities on page {}",
            meta.name(),
            page.len(),
            page.total_length(),
            page.page_index()
        );
        crate::dev6!(
            "{{\"bench\":\"provider\",\"op\":\"browse\",\"type\":\"{}\",\"duration_ms\":{},\"total\":{},\"result_count\":{},\"filtered\":{},\"sorted\":{},\"paginated\":{}}}",
            meta.name(),
            u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            to_u64(page.total_length()),
            to_u64(page.len()),
            options.filter.is_some(),
            options.sort.is_some(),
            options.paginate.is_some()
        );
        Ok(page)
    }
}

fn matches_keys(meta: &TypeMetadata, key_values: &[Bson], entity: &Entity) -> bool {
    let mut pending = key_values.iter().peekable();
    if pending.peek().is_none() {
        return true;
    }
    for prop in meta.key_properties() {
        let Some(want) = pending.peek() else { break };
        let value = PropertyRef::new(prop.name.as_str()).extract(entity);
        if value.is_some_and(|v| values_equal(v, want)) {
            pending.next();
            if pending.peek().is_none() {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::query::{FilterExpression, PaginateExpression, SortExpression};
    use bson::doc;

    fn users() -> TypeMetadata {
        TypeMetadata::new("users").with_key("region").with_property("name").with_key("number")
    }

    fn seeded() -> (EntityProvider, Vec<Entity>) {
        let mut p = EntityProvider::new();
        let es = vec![
            Entity::new(doc! {"region": "eu", "number": 1, "name": "a", "age": 30}),
            Entity::new(doc! {"region": "eu", "number": 2, "name": "b", "age": 20}),
            Entity::new(doc! {"region": "us", "number": 1, "name": "c", "age": 40}),
        ];
        p.bulk_add(&users(), es.clone());
        (p, es)
    }

    #[test]
    fn add_is_idempotent_per_identity() {
        let (mut p, es) = seeded();
        let returned = p.add(&users(), es[0].clone());
        assert_eq!(returned.id, es[0].id);
        assert_eq!(p.collection_len("users"), 3);
        p.bulk_add(&users(), vec![es[1].clone(), Entity::new(doc! {"name": "d"})]);
        assert_eq!(p.collection_len("users"), 4);
    }

    #[test]
    fn update_merges_onto_resident_only() {
        let (mut p, es) = seeded();
        let mut changed = Entity::with_id(es[0].id, doc! {"age": 31});
        changed.set("city", "Oslo");
        p.update(&users(), changed);
        let page = p.query_many(&users(), &BrowseOptions::new()).unwrap();
        let first = &page.entities()[0];
        assert_eq!(first.data, doc! {"region": "eu", "number": 1, "name": "a", "age": 31, "city": "Oslo"});

        let stranger = Entity::new(doc! {"name": "ghost"});
        let returned = p.update(&users(), stranger.clone());
        assert_eq!(returned, stranger);
        assert_eq!(p.collection_len("users"), 3);
    }

    #[test]
    fn save_adds_or_updates() {
        let (mut p, es) = seeded();
        p.save(&users(), Entity::with_id(es[1].id, doc! {"name": "bb"}));
        assert_eq!(p.collection_len("users"), 3);
        p.save(&users(), Entity::new(doc! {"name": "new"}));
        assert_eq!(p.collection_len("users"), 4);
        p.bulk_save(&users(), vec![Entity::with_id(es[2].id, doc! {"age": 41}), Entity::new(doc! {})]);
        assert_eq!(p.collection_len("users"), 5);
        let hit = p
            .query_many(&users(), &BrowseOptions::new().filter(FilterExpression::eq("name", "bb")))
            .unwrap();
        assert_eq!(hit.len(), 1);
    }

    #[test]
    fn remove_and_bulk_remove() {
        let (mut p, es) = seeded();
        p.remove(&users(), es[0].clone());
        p.remove(&users(), es[0].clone());
        assert_eq!(p.collection_len("users"), 2);
        p.bulk_remove(&users(), vec![es[1].clone(), es[2].clone()]);
        assert_eq!(p.collection_len("users"), 0);
    }

    #[test]
    fn batch_ops_follow_the_browse() {
        let (mut p, _) = seeded();
        let opts = BrowseOptions::new().filter(FilterExpression::eq("region", "eu"));
        let report = p.batch_update(&users(), &opts, &doc! {"flag": true}).unwrap();
        assert_eq!(report.matched, 2);
        let flagged = p
            .query_many(&users(), &BrowseOptions::new().filter(FilterExpression::eq("flag", true)))
            .unwrap();
        assert_eq!(flagged.len(), 2);

        let capped = BrowseOptions::new()
            .sort(SortExpression::desc("age"))
            .paginate(PaginateExpression::offset(0, 1));
        assert_eq!(p.batch_remove(&users(), &capped).unwrap().matched, 1);
        assert_eq!(p.collection_len("users"), 2);
        assert_eq!(p.batch_remove(&users(), &opts).unwrap().matched, 2);
        assert_eq!(p.collection_len("users"), 0);
        assert_eq!(p.batch_remove(&users(), &opts).unwrap(), BatchReport { matched: 0 });
    }

    #[test]
    fn batch_ops_reject_cursor_without_mutating() {
        let (mut p, _) = seeded();
        let opts = BrowseOptions::new().paginate(PaginateExpression::cursor("c", 1));
        assert!(p.batch_remove(&users(), &opts).is_err());
        assert!(p.batch_update(&users(), &opts, &doc! {"x": 1}).is_err());
        assert_eq!(p.collection_len("users"), 3);
    }

    #[test]
    fn query_one_walks_keys_in_declaration_order() {
        let (p, _) = seeded();
        let hit = p
            .query_one(&users(), &[Bson::from("eu"), Bson::from(2)], &BrowseOptions::new())
            .unwrap()
            .unwrap();
        assert_eq!(hit.data.get_str("name").unwrap(), "b");
        // positional: values in the wrong order do not match
        assert!(
            p.query_one(&users(), &[Bson::from(2), Bson::from("eu")], &BrowseOptions::new())
                .unwrap()
                .is_none()
        );
        // browse options narrow the candidates first
        let only_us = BrowseOptions::new().filter(FilterExpression::eq("region", "us"));
        assert!(
            p.query_one(&users(), &[Bson::from("eu"), Bson::from(1)], &only_us).unwrap().is_none()
        );
    }

    #[test]
    fn query_one_resolves_dotted_key_paths() {
        let meta = TypeMetadata::new("parcels").with_key("addr.zip").with_key("seq");
        let mut p = EntityProvider::new();
        p.bulk_add(
            &meta,
            vec![
                Entity::new(doc! {"addr": {"zip": "0150"}, "seq": 1}),
                Entity::new(doc! {"addr": {"zip": "5003"}, "seq": 1}),
            ],
        );
        let hit = p
            .query_one(&meta, &[Bson::from("5003"), Bson::from(1)], &BrowseOptions::new())
            .unwrap()
            .unwrap();
        assert_eq!(hit.data.get_document("addr").unwrap().get_str("zip").unwrap(), "5003");
        assert!(
            p.query_one(&meta, &[Bson::from("9999"), Bson::from(1)], &BrowseOptions::new())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn query_one_key_arity() {
        let (p, _) = seeded();
        let err = p.query_one(&users(), &[Bson::from("eu")], &BrowseOptions::new()).unwrap_err();
        assert!(matches!(err, StoreError::KeyArityMismatch { expected: 2, actual: 1, .. }));

        let lax = ProviderConfig { strict_key_arity: false, ..ProviderConfig::default() };
        let mut p = EntityProvider::with_config(lax);
        p.add(&users(), Entity::new(doc! {"region": "us", "number": 7}));
        let hit = p.query_one(&users(), &[Bson::from("us")], &BrowseOptions::new()).unwrap();
        assert!(hit.is_some());
        let first = p.query_one(&users(), &[], &BrowseOptions::new()).unwrap();
        assert!(first.is_some());
    }

    #[test]
    fn unseen_type_browses_empty() {
        let p = EntityProvider::new();
        let page = p.query_many(&TypeMetadata::new("nothing"), &BrowseOptions::new()).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total_length(), 0);
        assert_eq!(p.collection_len("nothing"), 0);
    }

    #[test]
    fn browse_emits_bench_line() {
        let (p, _) = seeded();
        let _g = crate::utils::devlog::enable_thread_sink();
        p.query_many(&users(), &BrowseOptions::new().filter(FilterExpression::eq("region", "eu")))
            .unwrap();
        let lines = crate::utils::devlog::drain();
        assert_eq!(lines.len(), 1);
        let v: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(v["op"], "browse");
        assert_eq!(v["total"], 2);
        assert_eq!(v["filtered"], true);
    }
}
