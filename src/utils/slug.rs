//! Random slug generation.

use rand::Rng;
use rand::distr::Alphanumeric;

/// Length of auto-generated slugs.
pub const GENERATED_SLUG_LEN: usize = 8;

/// Generates a random 8-character alphanumeric slug.
///
/// Generated slugs use only `[A-Za-z0-9]`; hyphens and underscores are
/// reserved for user-chosen slugs.
pub fn generate_slug() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_SLUG_LEN)
        .map(char::from)
        .collect()
}
