//! CreditsStore trait definition.
//!
//! Read-only catalog operations behind a trait so the web layer and its tests
//! can substitute a stub store. All operations are pure functions of current
//! database state; nothing in the query layer mutates rows.

use super::models::*;
use anyhow::Result;

pub trait CreditsStore: Send + Sync {
    // =========================================================================
    // Basic Entity Retrieval
    // =========================================================================

    /// Get a producer by id. An absent id is `Ok(None)`, not an error.
    fn get_producer(&self, id: i64) -> Result<Option<Producer>>;

    /// Get a performer by id.
    fn get_performer(&self, id: i64) -> Result<Option<Performer>>;

    /// Get a song by id.
    fn get_song(&self, id: i64) -> Result<Option<Song>>;

    /// Get an album by id.
    fn get_album(&self, id: i64) -> Result<Option<Album>>;

    // =========================================================================
    // Resolved Entity Retrieval
    // =========================================================================

    /// Get a producer with albums, their songs and those songs' producers
    /// eagerly resolved. Runs a bounded number of queries regardless of how
    /// many related rows exist.
    fn get_resolved_producer(&self, id: i64) -> Result<Option<ResolvedProducer>>;

    /// Get a performer with the same eagerly resolved album tree.
    fn get_resolved_performer(&self, id: i64) -> Result<Option<ResolvedPerformer>>;

    /// Get a song with its producers and performers.
    fn get_resolved_song(&self, id: i64) -> Result<Option<ResolvedSong>>;

    /// Get an album with its songs and performers.
    fn get_resolved_album(&self, id: i64) -> Result<Option<ResolvedAlbum>>;

    // =========================================================================
    // Listing and Search
    // =========================================================================

    /// Case-insensitive substring search over name/title per entity type,
    /// each group ordered lexicographically. An empty term returns empty
    /// results by policy, not "all rows".
    fn search(&self, term: &str) -> Result<SearchResults>;

    /// List producers ordered by name, one page at a time.
    fn list_producers(&self, request: PageRequest) -> Result<Page<Producer>>;

    /// List performers ordered by name.
    fn list_performers(&self, request: PageRequest) -> Result<Page<Performer>>;

    /// List songs ordered by title.
    fn list_songs(&self, request: PageRequest) -> Result<Page<Song>>;

    /// List albums ordered by title.
    fn list_albums(&self, request: PageRequest) -> Result<Page<Album>>;

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// For each performer linked to the producer, the number of production
    /// events between them, ordered by performer name.
    fn producer_performer_frequency(&self, producer_id: i64) -> Result<Vec<FrequencyRow>>;

    /// For each producer linked to the performer, the number of production
    /// events between them, ordered by producer name.
    fn performer_producer_frequency(&self, performer_id: i64) -> Result<Vec<FrequencyRow>>;

    /// Songs produced per release year, restricted to years strictly between
    /// 1900 and 2019 (data-quality filter on unreliable source years),
    /// ascending by year.
    fn producer_productivity(&self, producer_id: i64) -> Result<Vec<YearCount>>;

    /// Per producer who contributed to the album, display fields and the
    /// number of songs contributed, ordered by producer name.
    fn album_production_summary(&self, album_id: i64) -> Result<Vec<AlbumContribution>>;

    // =========================================================================
    // Counts
    // =========================================================================

    /// Row counts per table.
    fn counts(&self) -> Result<CatalogCounts>;
}
