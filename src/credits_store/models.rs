//! Catalog models for the SQLite-backed credits store.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Core Entities
// =============================================================================

/// Producer entity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Producer {
    pub id: i64,
    pub name: String,
    pub img_url: Option<String>,
    pub tag_url: Option<String>,
}

/// Performer entity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Performer {
    pub id: i64,
    pub name: String,
    pub img_url: Option<String>,
}

/// Song entity.
///
/// `release_year` is the raw token from the source data and is kept even when
/// `release_date` is also present; the year is trusted independently of the
/// full date.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Song {
    pub id: i64,
    pub title: String,
    pub player_url: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub release_year: Option<String>,
}

/// Album entity
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub cover_art_url: Option<String>,
    pub release_date: Option<NaiveDate>,
}

/// One production credit linking one producer, one performer and one song,
/// optionally within an album.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductionEvent {
    pub event_id: i64,
    pub producer_id: i64,
    pub performer_id: i64,
    pub song_id: i64,
    pub album_id: Option<i64>,
}

/// A production event as staged by the loader, before the store assigns
/// `event_id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewProductionEvent {
    pub producer_id: i64,
    pub performer_id: i64,
    pub song_id: i64,
    pub album_id: Option<i64>,
}

// =============================================================================
// Resolved/Composite Types (API Responses)
// =============================================================================

/// A song together with the producers credited on it.
#[derive(Clone, Debug, Serialize)]
pub struct SongWithProducers {
    pub song: Song,
    pub producers: Vec<Producer>,
}

/// An album with the songs a detail page lists under it.
#[derive(Clone, Debug, Serialize)]
pub struct AlbumWithSongs {
    pub album: Album,
    pub songs: Vec<SongWithProducers>,
}

/// Full producer with eagerly resolved relations.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedProducer {
    pub producer: Producer,
    pub albums: Vec<AlbumWithSongs>,
    /// Distinct album release years, descending.
    pub album_years: Vec<String>,
}

/// Full performer with eagerly resolved relations.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedPerformer {
    pub performer: Performer,
    pub albums: Vec<AlbumWithSongs>,
    /// Distinct album release years, descending.
    pub album_years: Vec<String>,
}

/// Song with its producers and performers.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedSong {
    pub song: Song,
    pub producers: Vec<Producer>,
    pub performers: Vec<Performer>,
}

/// Album with its songs and performers.
#[derive(Clone, Debug, Serialize)]
pub struct ResolvedAlbum {
    pub album: Album,
    pub songs: Vec<Song>,
    pub performers: Vec<Performer>,
}

// =============================================================================
// Listing / Search / Aggregation Results
// =============================================================================

/// A 1-based page request. `per_page` of zero yields empty pages.
#[derive(Clone, Copy, Debug)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.per_page)
    }
}

/// A page slice plus the total row count the pagination widget needs to
/// compute page links.
#[derive(Clone, Debug, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
}

/// Search results across all four entity types.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchResults {
    pub producers: Vec<Producer>,
    pub performers: Vec<Performer>,
    pub songs: Vec<Song>,
    pub albums: Vec<Album>,
}

/// One row of an entity-pair frequency aggregate: a related entity and the
/// number of production events linking it to the fixed one.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FrequencyRow {
    pub id: i64,
    pub name: String,
    pub img_url: Option<String>,
    pub events: i64,
}

/// One row of the producer productivity time series.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct YearCount {
    pub year: String,
    pub songs: i64,
}

/// One producer's contribution to an album.
#[derive(Clone, Debug, Serialize)]
pub struct AlbumContribution {
    pub producer: Producer,
    pub songs: i64,
}

/// Row counts logged at startup and exposed for reporting.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct CatalogCounts {
    pub producers: usize,
    pub performers: usize,
    pub songs: usize,
    pub albums: usize,
    pub events: usize,
}
