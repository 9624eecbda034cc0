//! Migration eligibility.

use super::config::MigrationDirection;
use super::pairing::SchemaPairing;

/// Whether a node with the given schema alias takes part in a run.
///
/// When changing types, nodes that already carry the target variant for the
/// direction are left alone, which makes repeated runs idempotent. Publish-only
/// runs ignore the alias; whether the node is published is checked when it is
/// processed.
pub fn is_eligible(
    pairing: &dyn SchemaPairing,
    alias: &str,
    direction: MigrationDirection,
    publish_only: bool,
) -> bool {
    if publish_only {
        return true;
    }

    let is_new = pairing.is_new_variant(alias);
    match direction {
        MigrationDirection::ToNew => !is_new,
        MigrationDirection::ToOld => is_new,
    }
}
