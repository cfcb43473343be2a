//! Static registry of Taiwan coffee chains.
//!
//! The resolver uses this to refuse cross-branch matches for
//! multi-location brands: two venues of the same chain a block apart
//! are different places even when their names are nearly identical.

use crate::text::fold_name;

/// A known chain: canonical brand, alias spellings, approximate store
/// count. The table is an ordered list, not a map; detection is
/// first-match-wins in declaration order.
struct ChainEntry {
    canonical: &'static str,
    aliases: &'static [&'static str],
    store_count: u32,
}

const CHAINS: &[ChainEntry] = &[
    ChainEntry {
        canonical: "路易莎咖啡",
        aliases: &["路易莎", "Louisa", "Louisa Coffee", "louisa", "louisa coffee"],
        store_count: 524,
    },
    ChainEntry {
        canonical: "星巴克",
        aliases: &["Starbucks", "Starbucks Coffee", "統一星巴克", "starbucks", "starbucks coffee"],
        store_count: 500,
    },
    ChainEntry {
        canonical: "85度C",
        aliases: &["85°C", "85度C咖啡蛋糕烘焙專賣店", "85度c", "85°c"],
        store_count: 435,
    },
    ChainEntry {
        canonical: "cama咖啡",
        aliases: &["cama", "cama cafe", "cama現烘咖啡", "CAMA", "CAMA CAFE"],
        store_count: 200,
    },
    ChainEntry {
        canonical: "丹堤咖啡",
        aliases: &["丹堤", "Dante", "dante", "丹堤 coffee"],
        store_count: 68,
    },
    ChainEntry {
        canonical: "黑沃咖啡",
        aliases: &["黑沃", "HWC", "hwc", "HWC Coffee", "hwc coffee"],
        store_count: 60,
    },
    ChainEntry {
        canonical: "伯朗咖啡館",
        aliases: &["伯朗", "Mr. Brown", "Mr. Brown Coffee", "mr. brown", "mr. brown coffee", "mr brown"],
        store_count: 30,
    },
    ChainEntry {
        canonical: "怡客咖啡",
        aliases: &["怡客", "Ikari", "ikari", "Ikari Coffee", "ikari coffee"],
        store_count: 20,
    },
    ChainEntry {
        canonical: "西雅圖極品咖啡",
        aliases: &["西雅圖", "Barista Coffee", "barista coffee", "Seattle Coffee"],
        store_count: 15,
    },
    ChainEntry {
        canonical: "Fika Fika Cafe",
        aliases: &["Fika Fika", "fika fika", "fika fika cafe"],
        store_count: 5,
    },
];

/// A detected chain brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainInfo {
    /// Canonical brand name.
    pub brand: String,
    /// Approximate number of stores in Taiwan.
    pub store_count: u32,
}

/// Brand/branch decomposition of a chain venue name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandBranch {
    pub brand: String,
    /// Location-specific trailing text; empty when the name is exactly
    /// the brand. Taken from the normalized name.
    pub branch: String,
}

fn alias_names(chain: &ChainEntry) -> impl Iterator<Item = &'static str> {
    std::iter::once(chain.canonical).chain(chain.aliases.iter().copied())
}

/// Detects whether a venue name belongs to a known chain.
///
/// The normalized name must equal an alias or start with an alias
/// followed by a space.
pub fn detect_chain(name: &str) -> Option<ChainInfo> {
    let normalized = fold_name(name);

    for chain in CHAINS {
        for alias in alias_names(chain) {
            let alias = fold_name(alias);
            if normalized == alias || normalized.starts_with(&format!("{alias} ")) {
                return Some(ChainInfo {
                    brand: chain.canonical.to_string(),
                    store_count: chain.store_count,
                });
            }
        }
    }

    None
}

/// Splits a chain venue name into brand + branch.
///
/// `路易莎咖啡 中山店` -> brand `路易莎咖啡`, branch `中山店`;
/// `路易莎咖啡` -> branch is empty. Returns `None` for non-chain names.
pub fn decompose_brand_branch(name: &str) -> Option<BrandBranch> {
    let normalized = fold_name(name);

    for chain in CHAINS {
        for alias in alias_names(chain) {
            let alias = fold_name(alias);
            if normalized == alias {
                return Some(BrandBranch {
                    brand: chain.canonical.to_string(),
                    branch: String::new(),
                });
            }
            if let Some(rest) = normalized.strip_prefix(&format!("{alias} ")) {
                return Some(BrandBranch {
                    brand: chain.canonical.to_string(),
                    branch: rest.trim().to_string(),
                });
            }
        }
    }

    None
}
