//! Fixed category set.
//!
//! Default categories always exist and can never be removed. User categories
//! are appended after them and compared by exact, case-sensitive match.

/// Built-in categories, in display order.
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Trabalho",
    "Estudos",
    "Pessoal",
    "Músicas",
    "Projetos",
    "Anotações",
];

/// Category assigned to new tasks created without one.
pub const FALLBACK_CATEGORY: &str = "Pessoal";

/// Returns the default category list as owned strings.
pub fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|name| (*name).to_string()).collect()
}

/// Returns whether `name` is one of the protected defaults.
pub fn is_default_category(name: &str) -> bool {
    DEFAULT_CATEGORIES.contains(&name)
}

/// Normalizes a loaded category list.
///
/// Drops blank and duplicate names (first occurrence wins) and restores any
/// missing default ahead of the remaining names, in default order.
pub fn normalize_categories(loaded: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(loaded.len() + DEFAULT_CATEGORIES.len());
    for name in loaded {
        let trimmed = name.trim();
        if trimmed.is_empty() || kept.iter().any(|existing| existing == trimmed) {
            continue;
        }
        kept.push(trimmed.to_string());
    }

    let missing: Vec<String> = DEFAULT_CATEGORIES
        .iter()
        .filter(|default| !kept.iter().any(|existing| existing == *default))
        .map(|default| (*default).to_string())
        .collect();

    if missing.is_empty() {
        return kept;
    }
    missing.into_iter().chain(kept).collect()
}
