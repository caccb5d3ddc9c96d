//! Tag categories
//!
//! Known tags are grouped into fixed display categories. Any tag that no
//! category declares belongs to the implicit "Other" category. Both tag
//! grouping and tag filtering go through [`CategoryMap::category_of`], so the
//! two can never disagree about where a tag lives.

use std::collections::BTreeSet;

use serde::Serialize;

/// Name of the implicit catch-all category
pub const OTHER_CATEGORY: &str = "Other";

/// A named group of known tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub tags: BTreeSet<String>,
}

/// Tags grouped under a category name, for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagGroup {
    pub name: String,
    pub tags: Vec<String>,
}

/// Fixed mapping from category label to known tags
#[derive(Debug, Clone)]
pub struct CategoryMap {
    categories: Vec<Category>,
}

impl CategoryMap {
    /// Build a map from `(name, tags)` pairs.
    ///
    /// Categories keep their declaration order. A tag declared by more than
    /// one category belongs to the first one.
    pub fn new<N, T>(categories: Vec<(N, Vec<T>)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        let mut seen = BTreeSet::new();
        let categories = categories
            .into_iter()
            .map(|(name, tags)| Category {
                name: name.into(),
                tags: tags
                    .into_iter()
                    .map(|tag| -> String { tag.into() })
                    .filter(|tag| seen.insert(tag.clone()))
                    .collect(),
            })
            .collect();

        Self { categories }
    }

    #[cfg(test)]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// The category a tag belongs to, or [`OTHER_CATEGORY`]
    pub fn category_of(&self, tag: &str) -> &str {
        self.categories
            .iter()
            .find(|c| c.tags.contains(tag))
            .map(|c| c.name.as_str())
            .unwrap_or(OTHER_CATEGORY)
    }

    /// Split tags into per-category buckets.
    ///
    /// Buckets follow category declaration order with "Other" last; empty
    /// buckets are omitted. Duplicate input tags collapse.
    pub fn partition<'a, I>(&self, tags: I) -> Vec<TagGroup>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut buckets: Vec<BTreeSet<String>> = vec![BTreeSet::new(); self.categories.len() + 1];

        for tag in tags {
            let category = self.category_of(tag);
            let index = self
                .categories
                .iter()
                .position(|c| c.name == category)
                .unwrap_or(self.categories.len());
            buckets[index].insert(tag.to_string());
        }

        self.categories
            .iter()
            .map(|c| c.name.as_str())
            .chain(std::iter::once(OTHER_CATEGORY))
            .zip(buckets)
            .filter(|(_, tags)| !tags.is_empty())
            .map(|(name, tags)| TagGroup {
                name: name.to_string(),
                tags: tags.into_iter().collect(),
            })
            .collect()
    }
}

impl Default for CategoryMap {
    fn default() -> Self {
        Self::new(vec![
            (
                "Blockchains",
                vec![
                    "algorand", "avalanche", "bitcoin", "cardano", "cosmos", "ethereum", "hedera",
                    "ipfs", "layer2", "near", "polkadot", "solana", "stellar", "tezos",
                ],
            ),
            (
                "Languages",
                vec![
                    "c", "cpp", "elixir", "go", "haskell", "java", "javascript", "ocaml",
                    "python", "react", "rust", "solidity", "typescript",
                ],
            ),
            (
                "Domains",
                vec![
                    "analytics",
                    "consensus",
                    "core",
                    "defi",
                    "docs",
                    "explorer",
                    "framework",
                    "frontend",
                    "governance",
                    "identity",
                    "ide",
                    "indexing",
                    "infrastructure",
                    "interoperability",
                    "language",
                    "lightning",
                    "nft",
                    "oracles",
                    "privacy",
                    "security",
                    "smartcontracts",
                    "stablecoin",
                    "storage",
                    "tooling",
                    "wallet",
                ],
            ),
        ])
    }
}
