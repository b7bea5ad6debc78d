//! SQLite schema for the production-credits catalog.
//!
//! Five tables: the four entity tables plus `production_events`, the single
//! association table through which every pairwise relationship (producer to
//! song, performer to album, and so on) is derived at query time. Entity ids
//! come from the upstream data source, so they are text-free integer primary
//! keys rather than generated rowids.

use crate::sqlite_column;
use crate::sqlite_persistence::{
    Column, ForeignKey, ForeignKeyOnChange, SqlType, Table, VersionedSchema,
};

const PRODUCERS_TABLE: Table = Table {
    name: "producers",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("img_url", &SqlType::Text),
        sqlite_column!("tag_url", &SqlType::Text),
    ],
    indices: &[("idx_producers_name", "name")],
};

const PERFORMERS_TABLE: Table = Table {
    name: "performers",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("img_url", &SqlType::Text),
    ],
    indices: &[("idx_performers_name", "name")],
};

/// `release_year` is the raw 4-character token from the source data, kept
/// separately from `release_date` because the year is often known when the
/// full date is not.
const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("player_url", &SqlType::Text),
        sqlite_column!("release_date", &SqlType::Text), // ISO 'YYYY-MM-DD'
        sqlite_column!("release_year", &SqlType::Text),
    ],
    indices: &[("idx_songs_title", "title")],
};

const ALBUMS_TABLE: Table = Table {
    name: "albums",
    columns: &[
        sqlite_column!("id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("cover_art_url", &SqlType::Text),
        sqlite_column!("release_date", &SqlType::Text), // ISO 'YYYY-MM-DD'
    ],
    indices: &[("idx_albums_title", "title")],
};

const PRODUCER_FK: ForeignKey = ForeignKey {
    foreign_table: "producers",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const PERFORMER_FK: ForeignKey = ForeignKey {
    foreign_table: "performers",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const SONG_FK: ForeignKey = ForeignKey {
    foreign_table: "songs",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

const ALBUM_FK: ForeignKey = ForeignKey {
    foreign_table: "albums",
    foreign_column: "id",
    on_delete: ForeignKeyOnChange::Restrict,
};

/// One production credit: producer and performer made a song, optionally as
/// part of an album. A song with several performers has several event rows.
const PRODUCTION_EVENTS_TABLE: Table = Table {
    name: "production_events",
    columns: &[
        sqlite_column!(
            "event_id",
            &SqlType::Integer,
            is_primary_key = true,
            is_autoincrement = true
        ),
        sqlite_column!(
            "producer_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PRODUCER_FK)
        ),
        sqlite_column!(
            "performer_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&PERFORMER_FK)
        ),
        sqlite_column!(
            "song_id",
            &SqlType::Integer,
            non_null = true,
            foreign_key = Some(&SONG_FK)
        ),
        sqlite_column!("album_id", &SqlType::Integer, foreign_key = Some(&ALBUM_FK)),
    ],
    indices: &[
        ("idx_events_producer", "producer_id"),
        ("idx_events_performer", "performer_id"),
        ("idx_events_song", "song_id"),
        ("idx_events_album", "album_id"),
    ],
};

pub const CREDITS_VERSIONED_SCHEMAS: &[VersionedSchema] = &[VersionedSchema {
    version: 0,
    tables: &[
        PRODUCERS_TABLE,
        PERFORMERS_TABLE,
        SONGS_TABLE,
        ALBUMS_TABLE,
        PRODUCTION_EVENTS_TABLE,
    ],
    migration: None,
}];
