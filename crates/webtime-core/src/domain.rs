//! Domain canonicalization.
//!
//! Turns a raw URL into the key used by the aggregation store, or `None`
//! when the URL is not trackable (privileged browser pages, malformed
//! input). Not trackable is not an error; the session machine simply goes
//! idle.

use url::Url;

/// URL schemes that belong to the browser itself and are never tracked.
const PRIVILEGED_PREFIXES: &[&str] = &["chrome://", "chrome-extension://"];

/// Canonicalize a raw URL into a domain key.
///
/// Rules, applied in order:
/// 1. Privileged browser URLs and anything that fails to parse → `None`.
/// 2. The hostname is lower-cased.
/// 3. One leading `www.` label is stripped.
/// 4. If more than two dot-separated labels remain, only the last two are
///    kept. This is a naive heuristic and intentionally collapses
///    multi-part public suffixes (`news.bbc.co.uk` → `co.uk`); keys stay
///    compatible with historically recorded data.
///
/// Pure function; two URLs differing only in case or a leading `www.`
/// yield the same key.
pub fn canonical_domain(raw: &str) -> Option<String> {
    if raw.is_empty() || PRIVILEGED_PREFIXES.iter().any(|p| raw.starts_with(p)) {
        return None;
    }
    let url = Url::parse(raw).ok()?;
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    let labels: Vec<&str> = host.split('.').collect();
    if labels.is_empty() || labels.iter().any(|l| l.is_empty()) {
        return None;
    }
    let start = labels.len().saturating_sub(2);
    Some(labels[start..].join("."))
}
