use content_api_core::sanitize::sanitize_title;
use content_api_core::{
    NewTerm, ObjectId, StoreError, Term, TermId, TermLookup, TermOrder, TermQuery, TermStore,
    TermUpdate,
};

use crate::ContentStore;

impl ContentStore {
    fn ensure_taxonomy(&self, taxonomy: &str) -> Result<(), StoreError> {
        if self.taxonomies.contains(taxonomy) {
            Ok(())
        } else {
            Err(StoreError::UnknownTaxonomy(taxonomy.to_string()))
        }
    }

    fn slug_taken(&self, taxonomy: &str, slug: &str) -> bool {
        self.terms
            .values()
            .any(|t| t.taxonomy == taxonomy && t.slug == slug)
    }

    /// Recompute `count` for the given terms from the relationship table.
    fn refresh_counts(&mut self, ids: impl IntoIterator<Item = TermId>) {
        for id in ids {
            let count = self
                .relationships
                .values()
                .filter(|assigned| assigned.contains(&id))
                .count() as u64;
            if let Some(term) = self.terms.get_mut(&id) {
                term.count = count;
            }
        }
    }
}

impl TermStore for ContentStore {
    fn get_term(&self, taxonomy: &str, lookup: TermLookup<'_>) -> Option<Term> {
        let found = match lookup {
            TermLookup::Id(id) => self.terms.get(&id).filter(|t| t.taxonomy == taxonomy),
            TermLookup::Slug(slug) => self
                .terms
                .values()
                .find(|t| t.taxonomy == taxonomy && t.slug == slug),
            TermLookup::Name(name) => self
                .terms
                .values()
                .find(|t| t.taxonomy == taxonomy && t.name == name),
        };
        found.cloned()
    }

    fn insert_term(&mut self, taxonomy: &str, term: NewTerm) -> Result<Term, StoreError> {
        self.ensure_taxonomy(taxonomy)?;

        let name = term.name.trim().to_string();
        if name.is_empty() {
            return Err(StoreError::EmptyTermName);
        }

        if let Some(parent) = term.parent {
            if self.get_term(taxonomy, TermLookup::Id(parent)).is_none() {
                return Err(StoreError::InvalidParent(parent));
            }
        }

        let sibling_exists = self
            .terms
            .values()
            .any(|t| t.taxonomy == taxonomy && t.name == name && t.parent == term.parent);

        let slug = match term.slug {
            Some(explicit) => {
                let slug = sanitize_title(&explicit);
                if slug.is_empty() || self.slug_taken(taxonomy, &slug) {
                    return Err(StoreError::DuplicateTerm {
                        taxonomy: taxonomy.to_string(),
                        slug,
                    });
                }
                slug
            }
            None => {
                let base = sanitize_title(&name);
                if sibling_exists || base.is_empty() {
                    return Err(StoreError::DuplicateTerm {
                        taxonomy: taxonomy.to_string(),
                        slug: base,
                    });
                }
                if self.slug_taken(taxonomy, &base) {
                    (2..)
                        .map(|n| format!("{base}-{n}"))
                        .find(|candidate| !self.slug_taken(taxonomy, candidate))
                        .unwrap_or_else(|| base.clone())
                } else {
                    base
                }
            }
        };

        let id = self.next_term_id;
        self.next_term_id += 1;
        let created = Term {
            id,
            taxonomy: taxonomy.to_string(),
            name,
            slug,
            parent: term.parent,
            description: term.description,
            count: 0,
        };
        self.terms.insert(id, created.clone());
        tracing::debug!(taxonomy, term_id = id, slug = %created.slug, "term inserted");
        Ok(created)
    }

    fn update_term(
        &mut self,
        taxonomy: &str,
        id: TermId,
        update: TermUpdate,
    ) -> Result<Term, StoreError> {
        let term = self
            .terms
            .get_mut(&id)
            .filter(|t| t.taxonomy == taxonomy)
            .ok_or_else(|| StoreError::TermNotFound {
                taxonomy: taxonomy.to_string(),
                id,
            })?;

        if let Some(name) = update.name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(StoreError::EmptyTermName);
            }
            term.name = name;
        }
        if let Some(description) = update.description {
            term.description = description;
        }
        Ok(term.clone())
    }

    fn list_terms(&self, taxonomy: &str, query: TermQuery) -> Result<Vec<Term>, StoreError> {
        self.ensure_taxonomy(taxonomy)?;

        let mut terms: Vec<Term> = self
            .terms
            .values()
            .filter(|t| t.taxonomy == taxonomy)
            .cloned()
            .collect();
        if query.order == TermOrder::Name {
            terms.sort_by_key(|t| (t.name.to_lowercase(), t.id));
        }
        if let Some(limit) = query.limit {
            terms.truncate(limit);
        }
        Ok(terms)
    }

    fn object_terms(&self, object: ObjectId, taxonomy: &str) -> Vec<Term> {
        self.relationships
            .get(&(object, taxonomy.to_string()))
            .map(|ids| ids.iter().filter_map(|id| self.terms.get(id).cloned()).collect())
            .unwrap_or_default()
    }

    fn set_object_terms(
        &mut self,
        object: ObjectId,
        taxonomy: &str,
        ids: &[TermId],
        append: bool,
    ) -> Result<Vec<TermId>, StoreError> {
        self.ensure_taxonomy(taxonomy)?;
        if let Some(missing) = ids
            .iter()
            .find(|id| self.get_term(taxonomy, TermLookup::Id(**id)).is_none())
        {
            return Err(StoreError::TermNotFound {
                taxonomy: taxonomy.to_string(),
                id: *missing,
            });
        }

        let key = (object, taxonomy.to_string());
        let previous = self.relationships.get(&key).cloned().unwrap_or_default();
        let mut assigned = if append { previous.clone() } else { Vec::new() };
        for id in ids {
            if !assigned.contains(id) {
                assigned.push(*id);
            }
        }

        if assigned.is_empty() {
            self.relationships.remove(&key);
        } else {
            self.relationships.insert(key, assigned.clone());
        }
        self.refresh_counts(previous.into_iter().chain(assigned.iter().copied()));
        Ok(assigned)
    }
}

#[cfg(test)]
mod tests {
    use content_api_core::terms::{PRODUCT_BRAND, PRODUCT_CAT};

    use super::*;

    fn store_with(names: &[&str]) -> (ContentStore, Vec<TermId>) {
        let mut store = ContentStore::new();
        let ids = names
            .iter()
            .map(|name| {
                store
                    .insert_term(PRODUCT_CAT, NewTerm::named(*name))
                    .unwrap()
                    .id
            })
            .collect();
        (store, ids)
    }

    #[test]
    fn insert_derives_slug_and_rejects_unknown_taxonomy() {
        let mut store = ContentStore::new();
        let term = store
            .insert_term(PRODUCT_CAT, NewTerm::named("  Running Shoes "))
            .unwrap();
        assert_eq!(term.name, "Running Shoes");
        assert_eq!(term.slug, "running-shoes");

        let err = store
            .insert_term("pa_color", NewTerm::named("Red"))
            .unwrap_err();
        assert_eq!(err, StoreError::UnknownTaxonomy("pa_color".to_string()));
    }

    #[test]
    fn same_name_under_different_parents_gets_suffixed_slug() {
        let (mut store, ids) = store_with(&["Men", "Women"]);
        let a = store
            .insert_term(
                PRODUCT_CAT,
                NewTerm {
                    parent: Some(ids[0]),
                    ..NewTerm::named("Shirts")
                },
            )
            .unwrap();
        let b = store
            .insert_term(
                PRODUCT_CAT,
                NewTerm {
                    parent: Some(ids[1]),
                    ..NewTerm::named("Shirts")
                },
            )
            .unwrap();
        assert_eq!(a.slug, "shirts");
        assert_eq!(b.slug, "shirts-2");

        let err = store
            .insert_term(
                PRODUCT_CAT,
                NewTerm {
                    parent: Some(ids[0]),
                    ..NewTerm::named("Shirts")
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTerm { .. }));
    }

    #[test]
    fn explicit_duplicate_slug_and_missing_parent_are_rejected() {
        let (mut store, _) = store_with(&["Shoes"]);
        let err = store
            .insert_term(
                PRODUCT_CAT,
                NewTerm {
                    slug: Some("shoes".to_string()),
                    ..NewTerm::named("Footwear")
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateTerm { .. }));

        let err = store
            .insert_term(
                PRODUCT_CAT,
                NewTerm {
                    parent: Some(999),
                    ..NewTerm::named("Orphan")
                },
            )
            .unwrap_err();
        assert_eq!(err, StoreError::InvalidParent(999));
    }

    #[test]
    fn lookups_are_scoped_to_taxonomy() {
        let (store, ids) = store_with(&["Acme"]);
        assert!(store.get_term(PRODUCT_CAT, TermLookup::Id(ids[0])).is_some());
        assert!(store.get_term(PRODUCT_BRAND, TermLookup::Id(ids[0])).is_none());
        assert!(store.get_term(PRODUCT_BRAND, TermLookup::Name("Acme")).is_none());
    }

    #[test]
    fn update_changes_name_and_description() {
        let (mut store, ids) = store_with(&["Shoes"]);
        let updated = store
            .update_term(
                PRODUCT_CAT,
                ids[0],
                TermUpdate {
                    name: Some("Footwear".to_string()),
                    description: Some("All shoes".to_string()),
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Footwear");
        assert_eq!(updated.slug, "shoes");
        assert_eq!(updated.description, "All shoes");

        let err = store
            .update_term(PRODUCT_BRAND, ids[0], TermUpdate::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::TermNotFound { .. }));
    }

    #[test]
    fn list_orders_by_name_case_insensitively_with_limit() {
        let (store, _) = store_with(&["beta", "Alpha", "gamma"]);
        let names: Vec<String> = store
            .list_terms(
                PRODUCT_CAT,
                TermQuery {
                    order: TermOrder::Name,
                    limit: Some(2),
                },
            )
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "beta"]);
    }

    #[test]
    fn set_object_terms_replaces_or_appends_and_tracks_counts() {
        let (mut store, ids) = store_with(&["A", "B", "C"]);

        let assigned = store
            .set_object_terms(10, PRODUCT_CAT, &[ids[0], ids[1], ids[0]], false)
            .unwrap();
        assert_eq!(assigned, vec![ids[0], ids[1]]);

        let assigned = store
            .set_object_terms(10, PRODUCT_CAT, &[ids[2], ids[0]], true)
            .unwrap();
        assert_eq!(assigned, vec![ids[0], ids[1], ids[2]]);

        store
            .set_object_terms(11, PRODUCT_CAT, &[ids[0]], false)
            .unwrap();
        assert_eq!(store.terms[&ids[0]].count, 2);

        let assigned = store
            .set_object_terms(10, PRODUCT_CAT, &[ids[2]], false)
            .unwrap();
        assert_eq!(assigned, vec![ids[2]]);
        assert_eq!(store.terms[&ids[0]].count, 1);
        assert_eq!(store.terms[&ids[1]].count, 0);

        let names: Vec<String> = store
            .object_terms(10, PRODUCT_CAT)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["C"]);
    }

    #[test]
    fn set_object_terms_rejects_foreign_ids() {
        let (mut store, ids) = store_with(&["A"]);
        let err = store
            .set_object_terms(1, PRODUCT_BRAND, &[ids[0]], false)
            .unwrap_err();
        assert!(matches!(err, StoreError::TermNotFound { id, .. } if id == ids[0]));
        assert!(store.object_terms(1, PRODUCT_BRAND).is_empty());
    }
}
