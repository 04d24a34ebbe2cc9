//! # Key Registry
//!
//! Key validation and allocation within a single section.
//!
//! Keys are compared after trimming: `" title "` and `"title"` name the
//! same entry, and a key made only of whitespace is never valid.

use crate::mutations::MutationError;
use crate::path::KeyPath;
use crate::value::Fields;

/// Outcome of checking a rename before it is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenamePlan {
    /// New key equals the old key once trimmed
    Unchanged,
    /// Rename to this (trimmed) key
    Rename(String),
}

/// Non-empty after trimming
pub fn is_valid_key(candidate: &str) -> bool {
    !candidate.trim().is_empty()
}

/// True if no key other than `excluding` equals `candidate.trim()`
pub fn is_unique(section: &Fields, candidate: &str, excluding: Option<&str>) -> bool {
    let candidate = candidate.trim();
    !section
        .keys()
        .any(|key| key == candidate && Some(key.as_str()) != excluding)
}

/// `base` if unused, otherwise `base_1`, `base_2`, ... (first free suffix)
pub fn allocate_unique_key(section: &Fields, base: &str) -> String {
    if is_unique(section, base, None) {
        return base.trim().to_string();
    }

    let base = base.trim();
    let mut suffix = 1usize;
    loop {
        let candidate = format!("{}_{}", base, suffix);
        if is_unique(section, &candidate, None) {
            return candidate;
        }
        suffix += 1;
    }
}

/// Validate renaming `old_key` to `new_key` inside the section at `section_path`
pub fn plan_rename(
    section: &Fields,
    section_path: &KeyPath,
    old_key: &str,
    new_key: &str,
) -> Result<RenamePlan, MutationError> {
    if !section.contains_key(old_key) {
        return Err(MutationError::PathNotFound(section_path.child(old_key)));
    }

    let trimmed = new_key.trim();
    if trimmed.is_empty() {
        return Err(MutationError::InvalidKey {
            section: section_path.clone(),
            key: new_key.to_string(),
        });
    }

    if trimmed == old_key {
        return Ok(RenamePlan::Unchanged);
    }

    if !is_unique(section, trimmed, Some(old_key)) {
        return Err(MutationError::DuplicateKey {
            section: section_path.clone(),
            key: trimmed.to_string(),
        });
    }

    Ok(RenamePlan::Rename(trimmed.to_string()))
}

/// Replace `old_key` with `new_key` at the same position.
///
/// Returns false if `old_key` is absent. Callers validate uniqueness first.
pub fn rename_in_place(section: &mut Fields, old_key: &str, new_key: &str) -> bool {
    if !section.contains_key(old_key) {
        return false;
    }

    *section = std::mem::take(section)
        .into_iter()
        .map(|(key, value)| {
            if key == old_key {
                (new_key.to_string(), value)
            } else {
                (key, value)
            }
        })
        .collect();
    true
}
