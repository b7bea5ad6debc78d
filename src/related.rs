//! Related-artist recommendations.
//!
//! The actual nearest-neighbor model lives outside this crate; the
//! store and web layer only depend on this narrow interface.

use anyhow::Result;

/// Ranked neighbor ids for an entity, never including the queried id.
pub trait RelatedLookup: Send + Sync {
    fn related(&self, id: i64) -> Result<Vec<i64>>;
}

/// Stand-in used when no model artifact is configured.
pub struct NoRelated;

impl RelatedLookup for NoRelated {
    fn related(&self, _id: i64) -> Result<Vec<i64>> {
        Ok(Vec::new())
    }
}
