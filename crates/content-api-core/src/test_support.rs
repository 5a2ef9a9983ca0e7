//! Minimal in-crate catalog for unit tests of the term/attribute logic.

use std::collections::BTreeMap;

use crate::sanitize::sanitize_title;
use crate::store::{AttributeTaxonomy, ObjectId, StoreError, TaxonomyRegistry, TermStore};
use crate::terms::{NewTerm, Term, TermId, TermLookup, TermQuery, TermUpdate};

#[derive(Debug, Default)]
pub(crate) struct FakeCatalog {
    pub terms: Vec<Term>,
    pub taxonomies: BTreeMap<String, Option<AttributeTaxonomy>>,
    pub inserts: usize,
    /// Names whose insertion is rejected.
    pub reject: Vec<String>,
    pub reject_taxonomies: bool,
}

impl FakeCatalog {
    pub fn with_taxonomies(keys: &[&str]) -> Self {
        let mut catalog = Self::default();
        for key in keys {
            catalog.taxonomies.insert((*key).to_string(), None);
        }
        catalog
    }

    pub fn with_attribute(mut self, slug: &str) -> Self {
        let id = self.taxonomies.len() as u64 + 1;
        let taxonomy = AttributeTaxonomy {
            id,
            slug: slug.to_string(),
            label: slug.to_string(),
        };
        self.taxonomies.insert(taxonomy.key(), Some(taxonomy));
        self
    }

    pub fn names_in(&self, taxonomy: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter(|t| t.taxonomy == taxonomy)
            .map(|t| t.name.clone())
            .collect()
    }
}

impl TermStore for FakeCatalog {
    fn get_term(&self, taxonomy: &str, lookup: TermLookup<'_>) -> Option<Term> {
        self.terms
            .iter()
            .find(|t| {
                t.taxonomy == taxonomy
                    && match lookup {
                        TermLookup::Id(id) => t.id == id,
                        TermLookup::Slug(slug) => t.slug == slug,
                        TermLookup::Name(name) => t.name == name,
                    }
            })
            .cloned()
    }

    fn insert_term(&mut self, taxonomy: &str, term: NewTerm) -> Result<Term, StoreError> {
        if !self.taxonomies.contains_key(taxonomy) {
            return Err(StoreError::UnknownTaxonomy(taxonomy.to_string()));
        }
        if term.name.trim().is_empty() {
            return Err(StoreError::EmptyTermName);
        }
        if self.reject.contains(&term.name) {
            return Err(StoreError::DuplicateTerm {
                taxonomy: taxonomy.to_string(),
                slug: sanitize_title(&term.name),
            });
        }
        self.inserts += 1;
        let created = Term {
            id: self.terms.len() as TermId + 100,
            taxonomy: taxonomy.to_string(),
            slug: term.slug.unwrap_or_else(|| sanitize_title(&term.name)),
            name: term.name,
            parent: term.parent,
            description: term.description,
            count: 0,
        };
        self.terms.push(created.clone());
        Ok(created)
    }

    fn update_term(
        &mut self,
        taxonomy: &str,
        id: TermId,
        _update: TermUpdate,
    ) -> Result<Term, StoreError> {
        Err(StoreError::TermNotFound {
            taxonomy: taxonomy.to_string(),
            id,
        })
    }

    fn list_terms(&self, taxonomy: &str, _query: TermQuery) -> Result<Vec<Term>, StoreError> {
        Ok(self
            .terms
            .iter()
            .filter(|t| t.taxonomy == taxonomy)
            .cloned()
            .collect())
    }

    fn object_terms(&self, _object: ObjectId, _taxonomy: &str) -> Vec<Term> {
        Vec::new()
    }

    fn set_object_terms(
        &mut self,
        _object: ObjectId,
        _taxonomy: &str,
        ids: &[TermId],
        _append: bool,
    ) -> Result<Vec<TermId>, StoreError> {
        Ok(ids.to_vec())
    }
}

impl TaxonomyRegistry for FakeCatalog {
    fn taxonomy_exists(&self, key: &str) -> bool {
        self.taxonomies.contains_key(key)
    }

    fn attribute_taxonomy(&self, key: &str) -> Option<AttributeTaxonomy> {
        self.taxonomies.get(key).cloned().flatten()
    }

    fn attribute_taxonomies(&self) -> Vec<AttributeTaxonomy> {
        self.taxonomies.values().flatten().cloned().collect()
    }

    fn create_attribute_taxonomy(
        &mut self,
        slug: &str,
        label: &str,
    ) -> Result<AttributeTaxonomy, StoreError> {
        if self.reject_taxonomies {
            return Err(StoreError::InvalidAttributeSlug {
                slug: slug.to_string(),
                reason: "rejected".to_string(),
            });
        }
        let taxonomy = AttributeTaxonomy {
            id: self.taxonomies.len() as u64 + 1,
            slug: slug.to_string(),
            label: label.to_string(),
        };
        self.taxonomies.insert(taxonomy.key(), Some(taxonomy.clone()));
        Ok(taxonomy)
    }
}
