use tracing::debug;

use super::alphabet::TagEncoding;

/// Shortens `name` to fit an alphatag of `max_tag_len` units.
///
/// Returns `None` when the budget is unknown (`0`) or the name already
/// fits. The result is a plain char prefix.
pub fn truncate_name(name: &str, max_tag_len: usize) -> Option<String> {
    if max_tag_len == 0 {
        return None;
    }

    let budget = TagEncoding::of(name).char_budget(max_tag_len);
    if name.chars().count() <= budget {
        return None;
    }

    let truncated: String = name.chars().take(budget).collect();
    debug!(original = name, truncated = %truncated, "truncating name");
    Some(truncated)
}
