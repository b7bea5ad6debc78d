//! End-to-end tests for the dump-file import path: files on disk,
//! loaded through the loader, then queried back through the store.

mod common;

use chrono::NaiveDate;
use common::TestCatalog;
use credits_catalog_server::credits_store::PageRequest;
use credits_catalog_server::CreditsStore;

#[test]
fn test_full_import_counts() {
    let catalog = TestCatalog::load();

    assert_eq!(catalog.summary.producers, 3);
    assert_eq!(catalog.summary.performers, 3);
    assert_eq!(catalog.summary.songs, 5);
    assert_eq!(catalog.summary.albums, 3);
    assert_eq!(catalog.summary.events, 6);

    let counts = catalog.store.counts().unwrap();
    assert_eq!(counts.producers, 3);
    assert_eq!(counts.events, 6);
}

#[test]
fn test_optional_fields_normalized_on_import() {
    let catalog = TestCatalog::load();

    // explicit urls survive
    let alchemist = catalog.store.get_producer(1).unwrap().unwrap();
    assert_eq!(
        alchemist.img_url.as_deref(),
        Some("http://img.example/alchemist.jpg")
    );

    // literal None and empty fields are both absent
    let metro = catalog.store.get_producer(2).unwrap().unwrap();
    assert!(metro.img_url.is_none());
    let rubin = catalog.store.get_producer(3).unwrap().unwrap();
    assert!(rubin.img_url.is_none());

    // the stray-quote variant too
    let cash = catalog.store.get_performer(12).unwrap().unwrap();
    assert!(cash.img_url.is_none());
}

#[test]
fn test_dates_rebuilt_from_split_fields() {
    let catalog = TestCatalog::load();

    // padded and unpadded month both parse
    let song = catalog.store.get_song(100).unwrap().unwrap();
    assert_eq!(song.release_date, NaiveDate::from_ymd_opt(2020, 5, 29));
    let unpadded = catalog.store.get_song(104).unwrap().unwrap();
    assert_eq!(unpadded.release_date, NaiveDate::from_ymd_opt(2020, 5, 29));

    // year alone keeps the year but not a date
    let partial = catalog.store.get_song(103).unwrap().unwrap();
    assert_eq!(partial.release_year.as_deref(), Some("2020"));
    assert!(partial.release_date.is_none());
}

#[test]
fn test_event_relations_derived_through_join() {
    let catalog = TestCatalog::load();

    // song 104 was produced by two producers
    let song = catalog.store.get_resolved_song(104).unwrap().unwrap();
    let producer_names: Vec<&str> = song.producers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(producer_names, vec!["Alchemist", "Metro Boomin"]);

    // album 200 carries the three Alchemist songs
    let album = catalog.store.get_resolved_album(200).unwrap().unwrap();
    let titles: Vec<&str> = album.songs.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["1985", "Frank Lucas", "Scottie Beam"]);
}

#[test]
fn test_resolved_producer_discography() {
    let catalog = TestCatalog::load();

    let resolved = catalog.store.get_resolved_producer(2).unwrap().unwrap();
    assert_eq!(resolved.producer.name, "Metro Boomin");

    // only the FUTURE album has an album-linked Metro event
    assert_eq!(resolved.albums.len(), 1);
    assert_eq!(resolved.albums[0].album.title, "FUTURE");
    assert_eq!(resolved.album_years, vec!["2017"]);
}

#[test]
fn test_search_after_import() {
    let catalog = TestCatalog::load();

    let results = catalog.store.search("fu").unwrap();
    let performer_names: Vec<&str> =
        results.performers.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(performer_names, vec!["Future"]);
    let album_titles: Vec<&str> = results.albums.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(album_titles, vec!["FUTURE"]);

    assert!(catalog.store.search("").unwrap().songs.is_empty());
}

#[test]
fn test_pagination_after_import() {
    let catalog = TestCatalog::load();

    let page = catalog
        .store
        .list_songs(PageRequest {
            page: 2,
            per_page: 3,
        })
        .unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 2);

    let empty = catalog
        .store
        .list_songs(PageRequest {
            page: 9,
            per_page: 3,
        })
        .unwrap();
    assert!(empty.items.is_empty());
}

#[test]
fn test_frequency_counts_sum_to_events() {
    let catalog = TestCatalog::load();

    let rows = catalog.store.producer_performer_frequency(1).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Freddie Gibbs");
    assert_eq!(rows[0].events, 3);

    let rows = catalog.store.producer_performer_frequency(2).unwrap();
    let total: i64 = rows.iter().map(|r| r.events).sum();
    assert_eq!(total, 2);
}
