//! Retention decisions: which artifacts a deletion policy sweeps.

use tracing::warn;

use crate::constants::{DELETE_14_DAYS_MAX_AGE, KEEP_4_WEEKS_MAX_AGE};
use crate::temporal::age_days;
use crate::types::{Artifact, DeletionPolicy};

impl DeletionPolicy {
    /// Oldest age (in days) an artifact may reach and still be retained.
    /// `None` means nothing is ever deleted.
    pub fn max_age_days(&self) -> Option<i64> {
        match self {
            Self::Off | Self::Unrecognized(_) => None,
            Self::Delete14Days => Some(DELETE_14_DAYS_MAX_AGE),
            Self::Keep4Weeks => Some(KEEP_4_WEEKS_MAX_AGE),
        }
    }
}

/// Ids of the artifacts that `policy` deletes at `now_ms`.
///
/// An artifact is expired when its age is strictly greater than the policy's
/// maximum age. Unrecognized policies delete nothing.
pub fn expired_ids<'a, I>(artifacts: I, policy: &DeletionPolicy, now_ms: i64) -> Vec<String>
where
    I: IntoIterator<Item = &'a Artifact>,
{
    let Some(max_age) = policy.max_age_days() else {
        if let DeletionPolicy::Unrecognized(raw) = policy {
            warn!(policy = %raw, "unrecognized deletion policy, treating as off");
        }
        return Vec::new();
    };

    artifacts
        .into_iter()
        .filter(|a| age_days(a.ts, now_ms) > max_age)
        .map(|a| a.id.clone())
        .collect()
}
