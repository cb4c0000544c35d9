use kanri_core::query::MAX_PER_PAGE;

/// Rows per page for list-style commands.
///
/// The command's own `--limit` beats the global one, which beats the
/// configured `general.default_limit`. A zero limit is skipped as if unset,
/// and the result never exceeds what a single page may hold.
#[must_use]
pub fn effective_limit(local: Option<u32>, global: Option<u32>, configured: u32) -> u32 {
    [local, global]
        .into_iter()
        .flatten()
        .find(|limit| *limit > 0)
        .unwrap_or(configured)
        .clamp(1, MAX_PER_PAGE)
}
