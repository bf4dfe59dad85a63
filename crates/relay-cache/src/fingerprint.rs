use relay_core::CompletionRequest;
use sha2::{Digest, Sha256};

/// Compute the cache fingerprint for an ordered list of text fragments and
/// a logical service id.
///
/// Fragments are normalized before hashing: leading/trailing whitespace is
/// trimmed and internal whitespace runs collapse to a single space. Casing
/// is preserved. Identical fragments in identical order for the same service
/// always produce the same fingerprint; changing any fragment, the order, or
/// the service id produces a different one.
pub fn fingerprint<I, S>(parts: I, service: &str) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut hasher = Sha256::new();
    for part in parts {
        let normalized = normalize(part.as_ref());
        // Length-prefix each fragment so boundaries cannot be forged by
        // fragment content, whatever bytes it contains.
        hasher.update((normalized.len() as u64).to_be_bytes());
        hasher.update(normalized.as_bytes());
    }
    hasher.update(service.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Fingerprint a full completion request: each message contributes its role
/// and content as consecutive fragments, in message order.
pub fn fingerprint_request(request: &CompletionRequest, service: &str) -> String {
    let parts = request
        .messages
        .iter()
        .flat_map(|m| [m.role(), m.content()]);
    fingerprint(parts, service)
}

fn normalize(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_whitespace = false;
    for ch in fragment.trim().chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize("  a \t b\n\nc  "), "a b c");
    }

    #[test]
    fn normalize_preserves_case() {
        assert_eq!(normalize("Rust Engineer"), "Rust Engineer");
    }
}
