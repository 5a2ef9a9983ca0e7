//! Yoast SEO fields accepted on posts and products, and their post-meta keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sanitize::{sanitize_text_field, sanitize_url};

pub const META_TITLE: &str = "_yoast_wpseo_title";
pub const META_DESCRIPTION: &str = "_yoast_wpseo_metadesc";
pub const META_OPENGRAPH_TITLE: &str = "_yoast_wpseo_opengraph-title";
pub const META_OPENGRAPH_DESCRIPTION: &str = "_yoast_wpseo_opengraph-description";
pub const META_OPENGRAPH_IMAGE: &str = "_yoast_wpseo_opengraph-image";
pub const META_TWITTER_TITLE: &str = "_yoast_wpseo_twitter-title";
pub const META_TWITTER_DESCRIPTION: &str = "_yoast_wpseo_twitter-description";
pub const META_TWITTER_IMAGE: &str = "_yoast_wpseo_twitter-image";

/// Social card fields (Open Graph or X).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumMeta {
    pub social_appearance: Option<SocialMeta>,
    pub x: Option<SocialMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoMeta {
    pub title: Option<String>,
    pub description: Option<String>,
    pub premium: Option<PremiumMeta>,
}

impl SeoMeta {
    /// Sanitized `(meta key, value)` pairs for every field that was supplied.
    /// Text fields go through [`sanitize_text_field`], images through
    /// [`sanitize_url`].
    #[must_use]
    pub fn meta_entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = Vec::new();
        push_text(&mut entries, META_TITLE, self.title.as_deref());
        push_text(&mut entries, META_DESCRIPTION, self.description.as_deref());

        let premium = self.premium.as_ref();
        if let Some(social) = premium.and_then(|p| p.social_appearance.as_ref()) {
            push_social(
                &mut entries,
                social,
                [
                    META_OPENGRAPH_TITLE,
                    META_OPENGRAPH_DESCRIPTION,
                    META_OPENGRAPH_IMAGE,
                ],
            );
        }
        if let Some(x) = premium.and_then(|p| p.x.as_ref()) {
            push_social(
                &mut entries,
                x,
                [
                    META_TWITTER_TITLE,
                    META_TWITTER_DESCRIPTION,
                    META_TWITTER_IMAGE,
                ],
            );
        }
        entries
    }

    /// No field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meta_entries().is_empty()
    }

    /// Write [`Self::meta_entries`] into a meta map, overwriting existing keys.
    pub fn apply_to(&self, meta: &mut BTreeMap<String, String>) {
        for (key, value) in self.meta_entries() {
            meta.insert(key.to_string(), value);
        }
    }
}

fn push_text(entries: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        entries.push((key, sanitize_text_field(value)));
    }
}

fn push_social(
    entries: &mut Vec<(&'static str, String)>,
    social: &SocialMeta,
    [title, description, image]: [&'static str; 3],
) {
    push_text(entries, title, social.title.as_deref());
    push_text(entries, description, social.description.as_deref());
    if let Some(url) = social.image.as_deref() {
        entries.push((image, sanitize_url(url)));
    }
}
