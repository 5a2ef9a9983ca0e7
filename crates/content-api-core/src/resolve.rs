//! Term lookups shared by the category, brand, tag and attribute flows.

use crate::sanitize::sanitize_title;
use crate::store::TermStore;
use crate::terms::{NewTerm, TermId, TermLookup};

/// Find the term named exactly `name` in `taxonomy`, creating it if absent.
///
/// Returns `None` (after logging) when the term cannot be created.
pub fn maybe_create_term<S>(store: &mut S, taxonomy: &str, name: &str) -> Option<TermId>
where
    S: TermStore + ?Sized,
{
    if let Some(term) = store.get_term(taxonomy, TermLookup::Name(name)) {
        return Some(term.id);
    }

    match store.insert_term(taxonomy, NewTerm::named(name)) {
        Ok(term) => {
            tracing::debug!(taxonomy, term_id = term.id, name, "created term");
            Some(term.id)
        }
        Err(error) => {
            tracing::warn!(taxonomy, name, error = %error, "term creation failed; skipping");
            None
        }
    }
}

/// Resolve a caller-supplied term reference.
///
/// Numeric references are term ids. Anything else is tried as a slug, then
/// as an exact name, and finally created when `allow_create` is set.
pub fn resolve_term_reference<S>(
    store: &mut S,
    taxonomy: &str,
    reference: &str,
    allow_create: bool,
) -> Option<TermId>
where
    S: TermStore + ?Sized,
{
    if let Ok(id) = reference.parse::<TermId>() {
        return store.get_term(taxonomy, TermLookup::Id(id)).map(|t| t.id);
    }

    let slug = sanitize_title(reference);
    if let Some(term) = store
        .get_term(taxonomy, TermLookup::Slug(&slug))
        .or_else(|| store.get_term(taxonomy, TermLookup::Name(reference)))
    {
        return Some(term.id);
    }

    if !allow_create {
        return None;
    }

    match store.insert_term(taxonomy, NewTerm::named(reference)) {
        Ok(term) => Some(term.id),
        Err(error) => {
            tracing::warn!(taxonomy, reference, error = %error, "term creation failed");
            None
        }
    }
}
