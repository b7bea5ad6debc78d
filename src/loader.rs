//! Bulk loader for the pipe-delimited catalog dump files.
//!
//! Files must be loaded in dependency order (producers, performers, songs,
//! albums, then production events) so that foreign keys resolve. Large files
//! are committed in batches to keep transactions bounded.

use crate::credits_store::{
    Album, NewProductionEvent, Performer, Producer, Song, SqliteCreditsStore,
};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const SONGS_BATCH_SIZE: usize = 1000;
const EVENTS_BATCH_SIZE: usize = 1000;
const ALBUMS_BATCH_SIZE: usize = 500;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path}:{line_number}: expected {expected} fields, got {actual}")]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        expected: usize,
        actual: usize,
    },
    #[error("{path}:{line_number}: invalid id \"{value}\"")]
    InvalidId {
        path: PathBuf,
        line_number: usize,
        value: String,
    },
    #[error("{path}:{line_number}: invalid release date \"{value}\"")]
    InvalidDate {
        path: PathBuf,
        line_number: usize,
        value: String,
    },
    #[error("{path}:{line_number}: storage error: {source}")]
    Storage {
        path: PathBuf,
        line_number: usize,
        #[source]
        source: rusqlite::Error,
    },
}

/// Paths to the five dump files of one catalog export.
#[derive(Debug, Clone)]
pub struct CreditFiles {
    pub producers: PathBuf,
    pub performers: PathBuf,
    pub songs: PathBuf,
    pub albums: PathBuf,
    pub events: PathBuf,
}

/// Row counts after a full load.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub producers: usize,
    pub performers: usize,
    pub songs: usize,
    pub albums: usize,
    pub events: usize,
}

/// The dumps encode absent values as an empty string or a literal
/// `None` (sometimes with a stray trailing quote).
fn optional_field(raw: &str) -> Option<String> {
    match raw {
        "" | "None" | "None\"" => None,
        other => Some(other.to_string()),
    }
}

/// A year is only trusted when it is present and exactly four characters.
fn valid_year(raw: &str) -> Option<String> {
    let year = optional_field(raw)?;
    if year.len() == 4 {
        Some(year)
    } else {
        None
    }
}

/// Month and day fields arrive both padded ("03") and unpadded ("3").
fn pad2(raw: &str) -> String {
    format!("{:0>2}", raw)
}

/// Release dates are absent when any of year, month or day is missing
/// after normalization. When all three are present, the combination must
/// be a real calendar date; anything else is fatal for the load rather
/// than silently stored without a date.
fn parse_release_date(
    year: &str,
    month: &str,
    day: &str,
) -> Result<Option<NaiveDate>, String> {
    let Some(year) = valid_year(year) else {
        return Ok(None);
    };
    let Some(month) = optional_field(month) else {
        return Ok(None);
    };
    let Some(day) = optional_field(day) else {
        return Ok(None);
    };
    let formatted = format!("{} {} {}", year, pad2(&month), pad2(&day));
    match NaiveDate::parse_from_str(&formatted, "%Y %m %d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => Err(formatted),
    }
}

fn parse_date(
    path: &Path,
    line_number: usize,
    year: &str,
    month: &str,
    day: &str,
) -> Result<Option<NaiveDate>, LoadError> {
    parse_release_date(year, month, day).map_err(|value| LoadError::InvalidDate {
        path: path.to_path_buf(),
        line_number,
        value,
    })
}

fn parse_id(path: &Path, line_number: usize, raw: &str) -> Result<i64, LoadError> {
    raw.trim().parse::<i64>().map_err(|_| LoadError::InvalidId {
        path: path.to_path_buf(),
        line_number,
        value: raw.to_string(),
    })
}

struct LineReader {
    path: PathBuf,
    lines: std::io::Lines<BufReader<File>>,
    line_number: usize,
}

impl LineReader {
    fn open(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(LineReader {
            path: path.to_path_buf(),
            lines: BufReader::new(file).lines(),
            line_number: 0,
        })
    }

    /// Next non-empty line, split on `|` and validated against the
    /// expected field count.
    fn next_fields(&mut self, expected: usize) -> Result<Option<Vec<String>>, LoadError> {
        loop {
            let line = match self.lines.next() {
                None => return Ok(None),
                Some(result) => result.map_err(|source| LoadError::Io {
                    path: self.path.clone(),
                    source,
                })?,
            };
            self.line_number += 1;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                continue;
            }
            let fields: Vec<String> = line.split('|').map(|f| f.to_string()).collect();
            if fields.len() != expected {
                return Err(LoadError::MalformedLine {
                    path: self.path.clone(),
                    line_number: self.line_number,
                    expected,
                    actual: fields.len(),
                });
            }
            return Ok(Some(fields));
        }
    }

    fn storage_error(&self, source: rusqlite::Error) -> LoadError {
        LoadError::Storage {
            path: self.path.clone(),
            line_number: self.line_number,
            source,
        }
    }
}

/// Run `work` inside loader transactions, committing every `batch_size`
/// rows; `None` loads the whole file in one transaction. `work` is
/// called once per line with the parsed fields.
fn load_batched<F>(
    store: &SqliteCreditsStore,
    path: &Path,
    field_count: usize,
    batch_size: Option<usize>,
    entity: &str,
    mut work: F,
) -> Result<usize, LoadError>
where
    F: FnMut(&Path, usize, Vec<String>) -> Result<rusqlite::Result<()>, LoadError>,
{
    let mut reader = LineReader::open(path)?;
    let mut loaded = 0usize;

    store
        .begin_batch()
        .map_err(|e| reader.storage_error(e))?;

    while let Some(fields) = reader.next_fields(field_count)? {
        let inserted = match work(&reader.path, reader.line_number, fields) {
            Ok(result) => result,
            Err(e) => {
                let _ = store.rollback_batch();
                return Err(e);
            }
        };
        if let Err(e) = inserted {
            let error = reader.storage_error(e);
            let _ = store.rollback_batch();
            return Err(error);
        }
        loaded += 1;
        if batch_size.is_some_and(|size| loaded % size == 0) {
            store
                .commit_batch()
                .and_then(|_| store.begin_batch())
                .map_err(|e| reader.storage_error(e))?;
            info!("Loaded {} {}", loaded, entity);
        }
    }

    store
        .commit_batch()
        .map_err(|e| reader.storage_error(e))?;
    info!("Finished loading {} {}", loaded, entity);
    Ok(loaded)
}

/// Producers: `id|name|img_url|tag_url`.
pub fn load_producers(store: &SqliteCreditsStore, path: &Path) -> Result<usize, LoadError> {
    load_batched(store, path, 4, None, "producers", |path, line, f| {
        let producer = Producer {
            id: parse_id(path, line, &f[0])?,
            name: f[1].clone(),
            img_url: optional_field(&f[2]),
            tag_url: optional_field(&f[3]),
        };
        Ok(store.insert_producer(&producer))
    })
}

/// Performers: `id|name|img_url`.
pub fn load_performers(store: &SqliteCreditsStore, path: &Path) -> Result<usize, LoadError> {
    load_batched(store, path, 3, None, "performers", |path, line, f| {
        let performer = Performer {
            id: parse_id(path, line, &f[0])?,
            name: f[1].clone(),
            img_url: optional_field(&f[2]),
        };
        Ok(store.insert_performer(&performer))
    })
}

/// Songs: `id|title|raw_date|year|month|day|player_url`. The pre-joined
/// raw date field is untrustworthy and ignored; the date is rebuilt from
/// the split fields.
pub fn load_songs(store: &SqliteCreditsStore, path: &Path) -> Result<usize, LoadError> {
    load_batched(store, path, 7, Some(SONGS_BATCH_SIZE), "songs", |path, line, f| {
        let song = Song {
            id: parse_id(path, line, &f[0])?,
            title: f[1].clone(),
            player_url: optional_field(&f[6]),
            release_date: parse_date(path, line, &f[3], &f[4], &f[5])?,
            release_year: valid_year(&f[3]),
        };
        Ok(store.insert_song(&song))
    })
}

/// Albums: `id|title|cover_art_url|year|month|day`.
pub fn load_albums(store: &SqliteCreditsStore, path: &Path) -> Result<usize, LoadError> {
    load_batched(store, path, 6, Some(ALBUMS_BATCH_SIZE), "albums", |path, line, f| {
        let album = Album {
            id: parse_id(path, line, &f[0])?,
            title: f[1].clone(),
            cover_art_url: optional_field(&f[2]),
            release_date: parse_date(path, line, &f[3], &f[4], &f[5])?,
        };
        Ok(store.insert_album(&album))
    })
}

/// Production events: `producer_id|performer_id|song_id|album_id`, where
/// the album field may be empty for single releases.
pub fn load_events(store: &SqliteCreditsStore, path: &Path) -> Result<usize, LoadError> {
    load_batched(store, path, 4, Some(EVENTS_BATCH_SIZE), "events", |path, line, f| {
        let album_id = match optional_field(&f[3]) {
            None => None,
            Some(raw) => Some(parse_id(path, line, &raw)?),
        };
        let event = NewProductionEvent {
            producer_id: parse_id(path, line, &f[0])?,
            performer_id: parse_id(path, line, &f[1])?,
            song_id: parse_id(path, line, &f[2])?,
            album_id,
        };
        Ok(store.insert_event(&event))
    })
}

/// Load a full catalog export in dependency order.
pub fn load_all(store: &SqliteCreditsStore, files: &CreditFiles) -> Result<LoadSummary, LoadError> {
    Ok(LoadSummary {
        producers: load_producers(store, &files.producers)?,
        performers: load_performers(store, &files.performers)?,
        songs: load_songs(store, &files.songs)?,
        albums: load_albums(store, &files.albums)?,
        events: load_events(store, &files.events)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credits_store::CreditsStore;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    fn test_store() -> (tempfile::TempDir, SqliteCreditsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteCreditsStore::new(dir.path().join("credits.db"), 1).unwrap();
        (dir, store)
    }

    #[test]
    fn test_optional_field_sentinels() {
        assert_eq!(optional_field(""), None);
        assert_eq!(optional_field("None"), None);
        assert_eq!(optional_field("None\""), None);
        assert_eq!(optional_field("none"), Some("none".to_string()));
        assert_eq!(
            optional_field("http://img.example/x.jpg"),
            Some("http://img.example/x.jpg".to_string())
        );
    }

    #[test]
    fn test_year_must_be_four_characters() {
        assert_eq!(valid_year("2003"), Some("2003".to_string()));
        assert_eq!(valid_year("03"), None);
        assert_eq!(valid_year(""), None);
        assert_eq!(valid_year("20031"), None);
        // four characters, but still a sentinel
        assert_eq!(valid_year("None"), None);
    }

    #[test]
    fn test_release_date_from_split_fields() {
        assert_eq!(
            parse_release_date("2020", "03", "05"),
            Ok(NaiveDate::from_ymd_opt(2020, 3, 5))
        );
        // unpadded month and day get zero padded
        assert_eq!(
            parse_release_date("1999", "7", "4"),
            Ok(NaiveDate::from_ymd_opt(1999, 7, 4))
        );
        // missing pieces mean no date
        assert_eq!(parse_release_date("2020", "", "05"), Ok(None));
        assert_eq!(parse_release_date("2020", "03", "None"), Ok(None));
        assert_eq!(parse_release_date("20", "03", "05"), Ok(None));
    }

    #[test]
    fn test_impossible_date_combination_is_an_error() {
        // all three tokens present but not a real calendar date
        assert_eq!(
            parse_release_date("2020", "13", "05"),
            Err("2020 13 05".to_string())
        );
        assert_eq!(
            parse_release_date("2019", "02", "30"),
            Err("2019 02 30".to_string())
        );
    }

    #[test]
    fn test_load_song_line() {
        let (_tmp, store) = test_store();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "songs.txt",
            "101|Test Song|2020 03 05|2020|03|05|http://x\n102|No Date|None|99|None|None|None\n",
        );

        assert_eq!(load_songs(&store, &path).unwrap(), 2);

        let song = store.get_song(101).unwrap().unwrap();
        assert_eq!(song.title, "Test Song");
        assert_eq!(song.release_date, NaiveDate::from_ymd_opt(2020, 3, 5));
        assert_eq!(song.release_year, Some("2020".to_string()));
        assert_eq!(song.player_url, Some("http://x".to_string()));

        let undated = store.get_song(102).unwrap().unwrap();
        assert_eq!(undated.release_date, None);
        assert_eq!(undated.release_year, None);
        assert_eq!(undated.player_url, None);
    }

    #[test]
    fn test_load_event_with_empty_album() {
        let (_tmp, store) = test_store();
        let dir = tempfile::tempdir().unwrap();

        let producers = write_file(dir.path(), "producers.txt", "5|Prod|None|None\n");
        let performers = write_file(dir.path(), "performers.txt", "9|Perf|None\n");
        let songs = write_file(
            dir.path(),
            "songs.txt",
            "101|Test Song|2020 03 05|2020|03|05|http://x\n",
        );
        let albums = write_file(dir.path(), "albums.txt", "");
        let events = write_file(dir.path(), "events.txt", "5|9|101|\n");

        let summary = load_all(
            &store,
            &CreditFiles {
                producers,
                performers,
                songs,
                albums,
                events,
            },
        )
        .unwrap();

        assert_eq!(
            summary,
            LoadSummary {
                producers: 1,
                performers: 1,
                songs: 1,
                albums: 0,
                events: 1,
            }
        );

        let resolved = store.get_resolved_song(101).unwrap().unwrap();
        assert_eq!(resolved.producers[0].name, "Prod");
        assert_eq!(resolved.performers[0].name, "Perf");
    }

    #[test]
    fn test_bad_date_combination_aborts_song_load() {
        let (_tmp, store) = test_store();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "songs.txt",
            "100|Fine|2020 03 05|2020|03|05|http://x\n\
             101|Bad Date|2020 13 05|2020|13|05|http://x\n",
        );

        let error = load_songs(&store, &path).unwrap_err();
        match error {
            LoadError::InvalidDate {
                line_number, value, ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(value, "2020 13 05");
            }
            other => panic!("unexpected error: {other}"),
        }
        // the rejected file loads nothing
        assert_eq!(store.counts().unwrap().songs, 0);
    }

    #[test]
    fn test_malformed_line_reports_location() {
        let (_tmp, store) = test_store();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "producers.txt", "1|Good|None|None\n2|Short\n");

        let error = load_producers(&store, &path).unwrap_err();
        match error {
            LoadError::MalformedLine {
                line_number,
                expected,
                actual,
                ..
            } => {
                assert_eq!(line_number, 2);
                assert_eq!(expected, 4);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_event_with_unknown_song_fails() {
        let (_tmp, store) = test_store();
        let dir = tempfile::tempdir().unwrap();

        let producers = write_file(dir.path(), "producers.txt", "5|Prod|None|None\n");
        let performers = write_file(dir.path(), "performers.txt", "9|Perf|None\n");
        let events = write_file(dir.path(), "events.txt", "5|9|404|\n");

        load_producers(&store, &producers).unwrap();
        load_performers(&store, &performers).unwrap();
        assert!(matches!(
            load_events(&store, &events).unwrap_err(),
            LoadError::Storage { .. }
        ));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let (_tmp, store) = test_store();
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "producers.txt",
            "1|First|None|None\n1|Again|None|None\n",
        );

        assert!(matches!(
            load_producers(&store, &path).unwrap_err(),
            LoadError::Storage { .. }
        ));
        // the failed batch is rolled back as a whole
        assert_eq!(store.counts().unwrap().producers, 0);
    }
}
