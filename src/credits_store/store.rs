//! SQLite-backed credits store implementation.
//!
//! Reads go through a small pool of read-only connections picked round-robin;
//! writes (the loader) go through a single write connection. All pairwise
//! entity relationships are computed by joining through `production_events`.

use super::models::*;
use super::schema::CREDITS_VERSIONED_SCHEMAS;
use super::trait_def::CreditsStore;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, types::Type, Connection};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

/// SQLite-backed store for the production-credits catalog.
#[derive(Clone)]
pub struct SqliteCreditsStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn create_or_validate(conn: &Connection) -> Result<()> {
    let latest_schema = &CREDITS_VERSIONED_SCHEMAS[CREDITS_VERSIONED_SCHEMAS.len() - 1];

    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!(
            "Creating credits db schema at version {}",
            latest_schema.version
        );
        latest_schema.create(conn)?;
        return Ok(());
    }

    latest_schema
        .validate(conn)
        .context("Existing credits database does not match the expected schema")
}

impl SqliteCreditsStore {
    /// Open (or create) the credits database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of connections for read operations
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_path_ref = db_path.as_ref();

        let write_conn = Connection::open_with_flags(
            db_path_ref,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI
                | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open credits database")?;

        create_or_validate(&write_conn)?;

        // foreign_keys is a per-connection pragma, the loader relies on it
        write_conn.pragma_update(None, "foreign_keys", "ON")?;
        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let mut read_pool = Vec::with_capacity(read_pool_size.max(1));
        for _ in 0..read_pool_size.max(1) {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY
                    | rusqlite::OpenFlags::SQLITE_OPEN_URI
                    | rusqlite::OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        let store = SqliteCreditsStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        };

        let counts = store.counts()?;
        info!(
            "Opened credits catalog: {} producers, {} performers, {} songs, {} albums, {} events",
            counts.producers, counts.performers, counts.songs, counts.albums, counts.events
        );

        Ok(store)
    }

    fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    // =========================================================================
    // Write Operations (loader only)
    // =========================================================================

    /// Begin a loader commit batch on the write connection.
    pub fn begin_batch(&self) -> rusqlite::Result<()> {
        self.write_conn
            .lock()
            .unwrap()
            .execute_batch("BEGIN IMMEDIATE")
    }

    /// Commit the staged rows of the current batch.
    pub fn commit_batch(&self) -> rusqlite::Result<()> {
        self.write_conn.lock().unwrap().execute_batch("COMMIT")
    }

    /// Discard the staged rows of the current batch.
    pub fn rollback_batch(&self) -> rusqlite::Result<()> {
        self.write_conn.lock().unwrap().execute_batch("ROLLBACK")
    }

    pub fn insert_producer(&self, producer: &Producer) -> rusqlite::Result<()> {
        self.write_conn.lock().unwrap().execute(
            "INSERT INTO producers (id, name, img_url, tag_url) VALUES (?1, ?2, ?3, ?4)",
            params![
                producer.id,
                producer.name,
                producer.img_url,
                producer.tag_url
            ],
        )?;
        Ok(())
    }

    pub fn insert_performer(&self, performer: &Performer) -> rusqlite::Result<()> {
        self.write_conn.lock().unwrap().execute(
            "INSERT INTO performers (id, name, img_url) VALUES (?1, ?2, ?3)",
            params![performer.id, performer.name, performer.img_url],
        )?;
        Ok(())
    }

    pub fn insert_song(&self, song: &Song) -> rusqlite::Result<()> {
        self.write_conn.lock().unwrap().execute(
            "INSERT INTO songs (id, title, player_url, release_date, release_year)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                song.id,
                song.title,
                song.player_url,
                song.release_date.map(|d| d.to_string()),
                song.release_year
            ],
        )?;
        Ok(())
    }

    pub fn insert_album(&self, album: &Album) -> rusqlite::Result<()> {
        self.write_conn.lock().unwrap().execute(
            "INSERT INTO albums (id, title, cover_art_url, release_date) VALUES (?1, ?2, ?3, ?4)",
            params![
                album.id,
                album.title,
                album.cover_art_url,
                album.release_date.map(|d| d.to_string())
            ],
        )?;
        Ok(())
    }

    pub fn insert_event(&self, event: &NewProductionEvent) -> rusqlite::Result<()> {
        self.write_conn.lock().unwrap().execute(
            "INSERT INTO production_events (producer_id, performer_id, song_id, album_id)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                event.producer_id,
                event.performer_id,
                event.song_id,
                event.album_id
            ],
        )?;
        Ok(())
    }

    // =========================================================================
    // Row Parsers
    // =========================================================================

    fn parse_date_column(
        row: &rusqlite::Row,
        index: usize,
    ) -> rusqlite::Result<Option<NaiveDate>> {
        match row.get::<_, Option<String>>(index)? {
            None => Ok(None),
            Some(text) => NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e))
                }),
        }
    }

    fn parse_producer_row(row: &rusqlite::Row) -> rusqlite::Result<Producer> {
        Ok(Producer {
            id: row.get(0)?,
            name: row.get(1)?,
            img_url: row.get(2)?,
            tag_url: row.get(3)?,
        })
    }

    fn parse_performer_row(row: &rusqlite::Row) -> rusqlite::Result<Performer> {
        Ok(Performer {
            id: row.get(0)?,
            name: row.get(1)?,
            img_url: row.get(2)?,
        })
    }

    fn parse_song_row(row: &rusqlite::Row) -> rusqlite::Result<Song> {
        Ok(Song {
            id: row.get(0)?,
            title: row.get(1)?,
            player_url: row.get(2)?,
            release_date: Self::parse_date_column(row, 3)?,
            release_year: row.get(4)?,
        })
    }

    fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
        Ok(Album {
            id: row.get(0)?,
            title: row.get(1)?,
            cover_art_url: row.get(2)?,
            release_date: Self::parse_date_column(row, 3)?,
        })
    }

    // =========================================================================
    // Resolved Fetch Helpers
    // =========================================================================

    /// Build the album tree for one side of the credit (a producer or a
    /// performer, chosen by `selector_column`). Three queries regardless of
    /// the number of related rows: the albums, their songs, those songs'
    /// producers.
    fn album_tree(
        conn: &Connection,
        selector_column: &str,
        selector_id: i64,
    ) -> Result<Vec<AlbumWithSongs>> {
        let albums_sql = format!(
            "SELECT DISTINCT a.id, a.title, a.cover_art_url, a.release_date
             FROM albums a
             INNER JOIN production_events e ON e.album_id = a.id
             WHERE e.{} = ?1
             ORDER BY a.title",
            selector_column
        );
        let mut albums_stmt = conn.prepare_cached(&albums_sql)?;
        let albums: Vec<Album> = albums_stmt
            .query_map(params![selector_id], Self::parse_album_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let album_filter = format!(
            "SELECT DISTINCT album_id FROM production_events
             WHERE {} = ?1 AND album_id IS NOT NULL",
            selector_column
        );

        let songs_sql = format!(
            "SELECT DISTINCT e.album_id, s.id, s.title, s.player_url, s.release_date, s.release_year
             FROM production_events e
             INNER JOIN songs s ON s.id = e.song_id
             WHERE e.album_id IN ({})
             ORDER BY e.album_id, s.title",
            album_filter
        );
        let mut songs_stmt = conn.prepare_cached(&songs_sql)?;
        let mut songs_by_album: HashMap<i64, Vec<Song>> = HashMap::new();
        let song_rows = songs_stmt.query_map(params![selector_id], |row| {
            let album_id: i64 = row.get(0)?;
            let song = Song {
                id: row.get(1)?,
                title: row.get(2)?,
                player_url: row.get(3)?,
                release_date: Self::parse_date_column(row, 4)?,
                release_year: row.get(5)?,
            };
            Ok((album_id, song))
        })?;
        for row in song_rows {
            let (album_id, song) = row?;
            songs_by_album.entry(album_id).or_default().push(song);
        }

        let producers_sql = format!(
            "SELECT DISTINCT e.song_id, p.id, p.name, p.img_url, p.tag_url
             FROM production_events e
             INNER JOIN producers p ON p.id = e.producer_id
             WHERE e.song_id IN (
                 SELECT DISTINCT song_id FROM production_events WHERE album_id IN ({})
             )
             ORDER BY e.song_id, p.name",
            album_filter
        );
        let mut producers_stmt = conn.prepare_cached(&producers_sql)?;
        let mut producers_by_song: HashMap<i64, Vec<Producer>> = HashMap::new();
        let producer_rows = producers_stmt.query_map(params![selector_id], |row| {
            let song_id: i64 = row.get(0)?;
            let producer = Producer {
                id: row.get(1)?,
                name: row.get(2)?,
                img_url: row.get(3)?,
                tag_url: row.get(4)?,
            };
            Ok((song_id, producer))
        })?;
        for row in producer_rows {
            let (song_id, producer) = row?;
            producers_by_song.entry(song_id).or_default().push(producer);
        }

        Ok(albums
            .into_iter()
            .map(|album| {
                let songs = songs_by_album
                    .remove(&album.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|song| {
                        let producers =
                            producers_by_song.get(&song.id).cloned().unwrap_or_default();
                        SongWithProducers { song, producers }
                    })
                    .collect();
                AlbumWithSongs { album, songs }
            })
            .collect())
    }

    /// Distinct album release years, descending.
    fn album_years(albums: &[AlbumWithSongs]) -> Vec<String> {
        let mut years: Vec<String> = albums
            .iter()
            .filter_map(|a| a.album.release_date)
            .map(|d| d.format("%Y").to_string())
            .collect();
        years.sort();
        years.dedup();
        years.reverse();
        years
    }

    fn page_query<T>(
        conn: &Connection,
        table: &str,
        columns: &str,
        order_column: &str,
        request: PageRequest,
        parse: fn(&rusqlite::Row) -> rusqlite::Result<T>,
    ) -> Result<Page<T>> {
        let total: usize = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table),
            [],
            |row| row.get::<_, i64>(0),
        )? as usize;

        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM {} ORDER BY {} LIMIT ?1 OFFSET ?2",
            columns, table, order_column
        ))?;
        // an out-of-range usize must not wrap to a negative bind, SQLite
        // reads a negative LIMIT as "no limit"
        let limit = i64::try_from(request.per_page).unwrap_or(i64::MAX);
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let items = stmt
            .query_map(params![limit, offset], parse)?
            .collect::<rusqlite::Result<Vec<T>>>()?;

        Ok(Page {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
        })
    }

    fn frequency_query(
        conn: &Connection,
        related_table: &str,
        related_fk: &str,
        selector_column: &str,
        selector_id: i64,
    ) -> Result<Vec<FrequencyRow>> {
        // Grouped by name so chart labels are unique even if two related
        // entities happen to share one.
        let sql = format!(
            "SELECT MIN(r.id), r.name, MIN(r.img_url), COUNT(e.song_id)
             FROM production_events e
             INNER JOIN {} r ON r.id = e.{}
             WHERE e.{} = ?1
             GROUP BY r.name
             ORDER BY r.name",
            related_table, related_fk, selector_column
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let rows = stmt
            .query_map(params![selector_id], |row| {
                Ok(FrequencyRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    img_url: row.get(2)?,
                    events: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

impl CreditsStore for SqliteCreditsStore {
    fn get_producer(&self, id: i64) -> Result<Option<Producer>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn
            .prepare_cached("SELECT id, name, img_url, tag_url FROM producers WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::parse_producer_row) {
            Ok(producer) => Ok(Some(producer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_performer(&self, id: i64) -> Result<Option<Performer>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt =
            conn.prepare_cached("SELECT id, name, img_url FROM performers WHERE id = ?1")?;
        match stmt.query_row(params![id], Self::parse_performer_row) {
            Ok(performer) => Ok(Some(performer)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_song(&self, id: i64) -> Result<Option<Song>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, player_url, release_date, release_year FROM songs WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], Self::parse_song_row) {
            Ok(song) => Ok(Some(song)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_album(&self, id: i64) -> Result<Option<Album>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, cover_art_url, release_date FROM albums WHERE id = ?1",
        )?;
        match stmt.query_row(params![id], Self::parse_album_row) {
            Ok(album) => Ok(Some(album)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_resolved_producer(&self, id: i64) -> Result<Option<ResolvedProducer>> {
        let producer = match self.get_producer(id)? {
            Some(p) => p,
            None => return Ok(None),
        };

        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let albums = Self::album_tree(&conn, "producer_id", id)?;
        let album_years = Self::album_years(&albums);

        Ok(Some(ResolvedProducer {
            producer,
            albums,
            album_years,
        }))
    }

    fn get_resolved_performer(&self, id: i64) -> Result<Option<ResolvedPerformer>> {
        let performer = match self.get_performer(id)? {
            Some(p) => p,
            None => return Ok(None),
        };

        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        let albums = Self::album_tree(&conn, "performer_id", id)?;
        let album_years = Self::album_years(&albums);

        Ok(Some(ResolvedPerformer {
            performer,
            albums,
            album_years,
        }))
    }

    fn get_resolved_song(&self, id: i64) -> Result<Option<ResolvedSong>> {
        let song = match self.get_song(id)? {
            Some(s) => s,
            None => return Ok(None),
        };

        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut producers_stmt = conn.prepare_cached(
            "SELECT DISTINCT p.id, p.name, p.img_url, p.tag_url
             FROM production_events e
             INNER JOIN producers p ON p.id = e.producer_id
             WHERE e.song_id = ?1
             ORDER BY p.name",
        )?;
        let producers = producers_stmt
            .query_map(params![id], Self::parse_producer_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut performers_stmt = conn.prepare_cached(
            "SELECT DISTINCT pf.id, pf.name, pf.img_url
             FROM production_events e
             INNER JOIN performers pf ON pf.id = e.performer_id
             WHERE e.song_id = ?1
             ORDER BY pf.name",
        )?;
        let performers = performers_stmt
            .query_map(params![id], Self::parse_performer_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(ResolvedSong {
            song,
            producers,
            performers,
        }))
    }

    fn get_resolved_album(&self, id: i64) -> Result<Option<ResolvedAlbum>> {
        let album = match self.get_album(id)? {
            Some(a) => a,
            None => return Ok(None),
        };

        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut songs_stmt = conn.prepare_cached(
            "SELECT DISTINCT s.id, s.title, s.player_url, s.release_date, s.release_year
             FROM production_events e
             INNER JOIN songs s ON s.id = e.song_id
             WHERE e.album_id = ?1
             ORDER BY s.title",
        )?;
        let songs = songs_stmt
            .query_map(params![id], Self::parse_song_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut performers_stmt = conn.prepare_cached(
            "SELECT DISTINCT pf.id, pf.name, pf.img_url
             FROM production_events e
             INNER JOIN performers pf ON pf.id = e.performer_id
             WHERE e.album_id = ?1
             ORDER BY pf.name",
        )?;
        let performers = performers_stmt
            .query_map(params![id], Self::parse_performer_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some(ResolvedAlbum {
            album,
            songs,
            performers,
        }))
    }

    fn search(&self, term: &str) -> Result<SearchResults> {
        // Empty term is empty results by policy, not "all rows".
        if term.is_empty() {
            return Ok(SearchResults::default());
        }

        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut producers_stmt = conn.prepare_cached(
            "SELECT id, name, img_url, tag_url FROM producers
             WHERE instr(lower(name), lower(?1)) > 0
             ORDER BY name",
        )?;
        let producers = producers_stmt
            .query_map(params![term], Self::parse_producer_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut performers_stmt = conn.prepare_cached(
            "SELECT id, name, img_url FROM performers
             WHERE instr(lower(name), lower(?1)) > 0
             ORDER BY name",
        )?;
        let performers = performers_stmt
            .query_map(params![term], Self::parse_performer_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut songs_stmt = conn.prepare_cached(
            "SELECT id, title, player_url, release_date, release_year FROM songs
             WHERE instr(lower(title), lower(?1)) > 0
             ORDER BY title",
        )?;
        let songs = songs_stmt
            .query_map(params![term], Self::parse_song_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut albums_stmt = conn.prepare_cached(
            "SELECT id, title, cover_art_url, release_date FROM albums
             WHERE instr(lower(title), lower(?1)) > 0
             ORDER BY title",
        )?;
        let albums = albums_stmt
            .query_map(params![term], Self::parse_album_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(SearchResults {
            producers,
            performers,
            songs,
            albums,
        })
    }

    fn list_producers(&self, request: PageRequest) -> Result<Page<Producer>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Self::page_query(
            &conn,
            "producers",
            "id, name, img_url, tag_url",
            "name",
            request,
            Self::parse_producer_row,
        )
    }

    fn list_performers(&self, request: PageRequest) -> Result<Page<Performer>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Self::page_query(
            &conn,
            "performers",
            "id, name, img_url",
            "name",
            request,
            Self::parse_performer_row,
        )
    }

    fn list_songs(&self, request: PageRequest) -> Result<Page<Song>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Self::page_query(
            &conn,
            "songs",
            "id, title, player_url, release_date, release_year",
            "title",
            request,
            Self::parse_song_row,
        )
    }

    fn list_albums(&self, request: PageRequest) -> Result<Page<Album>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Self::page_query(
            &conn,
            "albums",
            "id, title, cover_art_url, release_date",
            "title",
            request,
            Self::parse_album_row,
        )
    }

    fn producer_performer_frequency(&self, producer_id: i64) -> Result<Vec<FrequencyRow>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Self::frequency_query(&conn, "performers", "performer_id", "producer_id", producer_id)
    }

    fn performer_producer_frequency(&self, performer_id: i64) -> Result<Vec<FrequencyRow>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        Self::frequency_query(&conn, "producers", "producer_id", "performer_id", performer_id)
    }

    fn producer_productivity(&self, producer_id: i64) -> Result<Vec<YearCount>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        // Years outside (1900, 2019) come from unreliable upstream data and
        // are filtered here at report time, not at load time.
        let mut stmt = conn.prepare_cached(
            "SELECT s.release_year, COUNT(e.song_id)
             FROM production_events e
             INNER JOIN songs s ON s.id = e.song_id
             WHERE e.producer_id = ?1
               AND s.release_year IS NOT NULL
               AND CAST(s.release_year AS INTEGER) > 1900
               AND CAST(s.release_year AS INTEGER) < 2019
             GROUP BY s.release_year
             ORDER BY s.release_year",
        )?;
        let rows = stmt
            .query_map(params![producer_id], |row| {
                Ok(YearCount {
                    year: row.get(0)?,
                    songs: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn album_production_summary(&self, album_id: i64) -> Result<Vec<AlbumContribution>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached(
            "SELECT p.id, p.name, p.img_url, p.tag_url, COUNT(DISTINCT e.song_id)
             FROM production_events e
             INNER JOIN producers p ON p.id = e.producer_id
             WHERE e.album_id = ?1
             GROUP BY p.id
             ORDER BY p.name",
        )?;
        let rows = stmt
            .query_map(params![album_id], |row| {
                Ok(AlbumContribution {
                    producer: Producer {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        img_url: row.get(2)?,
                        tag_url: row.get(3)?,
                    },
                    songs: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    fn counts(&self) -> Result<CatalogCounts> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let count = |table: &str| -> Result<usize> {
            Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| {
                r.get::<_, i64>(0)
            })? as usize)
        };

        Ok(CatalogCounts {
            producers: count("producers")?,
            performers: count("performers")?,
            songs: count("songs")?,
            albums: count("albums")?,
            events: count("production_events")?,
        })
    }
}
