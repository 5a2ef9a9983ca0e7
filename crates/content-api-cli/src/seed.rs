//! Seed file commands: validate a catalog seed and preview its category tree
//! without starting the server.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Subcommand;
use content_api_core::terms::PRODUCT_CAT;
use content_api_core::{build_tree, load_seed, CategoryNode, TermOrder, TermQuery, TermStore};
use content_api_store::{apply_seed, ContentStore, SeedSummary};

/// Sub-commands available under `seed`.
#[derive(Debug, Subcommand)]
pub enum SeedCommands {
    /// Load a seed into an empty store and print what it created
    Check {
        /// Path to the YAML seed file
        path: PathBuf,
    },
    /// Print the category tree a seed produces, as JSON
    Tree {
        /// Path to the YAML seed file
        path: PathBuf,
        /// Taxonomy to render
        #[arg(long, default_value = PRODUCT_CAT)]
        taxonomy: String,
    },
}

pub(crate) fn run(command: SeedCommands) -> anyhow::Result<()> {
    match command {
        SeedCommands::Check { path } => {
            let (_, summary) = seeded_store(&path)?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        SeedCommands::Tree { path, taxonomy } => {
            let (store, _) = seeded_store(&path)?;
            let tree = taxonomy_tree(&store, &taxonomy)?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
    }
    Ok(())
}

pub(crate) fn seeded_store(path: &Path) -> anyhow::Result<(ContentStore, SeedSummary)> {
    let seed = load_seed(path)?;
    let mut store = ContentStore::new();
    let summary = apply_seed(&mut store, &seed)
        .with_context(|| format!("seed {} could not be applied", path.display()))?;
    tracing::info!(
        path = %path.display(),
        categories = summary.categories,
        products = summary.products,
        "seed applied"
    );
    Ok((store, summary))
}

pub(crate) fn taxonomy_tree(
    store: &ContentStore,
    taxonomy: &str,
) -> anyhow::Result<Vec<CategoryNode>> {
    let terms = store.list_terms(
        taxonomy,
        TermQuery {
            order: TermOrder::Name,
            limit: None,
        },
    )?;
    Ok(build_tree(&terms)?)
}
