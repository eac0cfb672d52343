//! Content-based ids for archived results.

use sha2::{Digest, Sha256};

use crate::types::ResolvedResult;

/// Identical result content for the same flight and variant gives the same
/// id, so re-archiving a result is idempotent.
pub fn compute_result_id(result: &ResolvedResult, variant: &str) -> String {
    let mut hasher = Sha256::new();

    hasher.update(result.flight.path.as_bytes());
    hasher.update(variant.as_bytes());

    let result_json = serde_json::to_string(result).unwrap_or_default();
    hasher.update(result_json.as_bytes());

    let digest = hasher.finalize();
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_stability() {
        let result = ResolvedResult::failed("a/b", "missing tables", vec![], 0.0);
        let id1 = compute_result_id(&result, "baseline");
        let id2 = compute_result_id(&result, "baseline");
        assert_eq!(id1, id2);
        assert_eq!(id1.len(), 64);
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let a = ResolvedResult::failed("a/b", "missing tables", vec![], 0.0);
        let b = ResolvedResult::failed("a/c", "missing tables", vec![], 0.0);
        assert_ne!(compute_result_id(&a, "baseline"), compute_result_id(&b, "baseline"));
        assert_ne!(compute_result_id(&a, "baseline"), compute_result_id(&a, "bax_fixed"));
    }
}
