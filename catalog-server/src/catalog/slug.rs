//! URL slug derivation and unique assignment
//!
//! Assignment is check-then-use and therefore racy; the partial unique index on
//! active product slugs is the real guarantee. Storage violations come back as
//! `ServiceError::SlugConflict` and the service retries them.

use std::future::Future;

use crate::error::{ServiceError, ServiceResult};

/// Existence checks performed before giving up
pub const MAX_SLUG_ATTEMPTS: usize = 5;

/// Random bytes appended on collision (rendered as hex)
const SUFFIX_BYTES: usize = 3;

/// Normalize a display name into a slug.
///
/// Diacritics and other non-ASCII text are transliterated, letters are
/// lowercased and every run of other characters becomes a single `-`.
pub fn slugify(name: &str) -> ServiceResult<String> {
    let ascii = deunicode::deunicode(name);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for ch in ascii.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    if slug.is_empty() {
        return Err(ServiceError::validation(format!(
            "name '{name}' has no characters usable in a slug"
        )));
    }
    Ok(slug)
}

/// `base` plus a `-` and six lowercase hex characters
fn with_random_suffix(base: &str) -> String {
    let bytes: [u8; SUFFIX_BYTES] = rand::random();
    format!("{base}-{}", hex::encode(bytes))
}

/// Derive a slug for `name` that `exists` reports as free.
///
/// The base slug is tried first, then suffixed candidates. Fails with
/// `SlugConflict` once `MAX_SLUG_ATTEMPTS` candidates have all collided.
pub async fn assign_unique_slug<F, Fut>(name: &str, mut exists: F) -> ServiceResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = ServiceResult<bool>>,
{
    let base = slugify(name)?;
    let mut candidate = base.clone();

    for attempt in 1..=MAX_SLUG_ATTEMPTS {
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
        tracing::debug!(slug = %candidate, attempt, "Slug taken, retrying with suffix");
        if attempt < MAX_SLUG_ATTEMPTS {
            candidate = with_random_suffix(&base);
        }
    }

    tracing::warn!(base = %base, "Slug attempts exhausted");
    Err(ServiceError::SlugConflict(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn is_suffixed(slug: &str, base: &str) -> bool {
        let Some(suffix) = slug.strip_prefix(base).and_then(|s| s.strip_prefix('-')) else {
            return false;
        };
        suffix.len() == SUFFIX_BYTES * 2
            && suffix.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Red Running Shoes").unwrap(), "red-running-shoes");
        assert_eq!(slugify("  --Hello,   World!!  ").unwrap(), "hello-world");
        assert_eq!(slugify("USB-C 3.1 Cable").unwrap(), "usb-c-3-1-cable");
    }

    #[test]
    fn test_slugify_folds_diacritics() {
        assert_eq!(slugify("Crème Brûlée Set").unwrap(), "creme-brulee-set");
        assert_eq!(slugify("Äpfel & Öl").unwrap(), "apfel-ol");
    }

    #[test]
    fn test_slugify_empty_rejected() {
        assert!(matches!(slugify("!!!"), Err(ServiceError::Validation(_))));
        assert!(matches!(slugify(""), Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_free_base_slug_first_attempt() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let slug = assign_unique_slug("Trail Runner X", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(false) }
        })
        .await
        .unwrap();

        assert_eq!(slug, "trail-runner-x");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_taken_base_gets_suffix() {
        let slug = assign_unique_slug("Red Running Shoes", |candidate| async move {
            Ok(candidate == "red-running-shoes")
        })
        .await
        .unwrap();

        assert_ne!(slug, "red-running-shoes");
        assert!(is_suffixed(&slug, "red-running-shoes"), "bad suffix: {slug}");
    }

    #[tokio::test]
    async fn test_exhaustion_fails() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let err = assign_unique_slug("Always Taken", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(true) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, ServiceError::SlugConflict(ref s) if is_suffixed(s, "always-taken")));
        assert_eq!(calls.load(Ordering::SeqCst), MAX_SLUG_ATTEMPTS);
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let err = assign_unique_slug("Broken Store", |_| async {
            Err(ServiceError::Timeout("slug_exists"))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Timeout(_)));
    }
}
