//! Shared fixtures for integration tests: a small catalog export on
//! disk, loaded into a fresh SQLite database.

use credits_catalog_server::loader::{load_all, CreditFiles, LoadSummary};
use credits_catalog_server::server::{make_app, ServerConfig, ServerState};
use credits_catalog_server::{NoRelated, SqliteCreditsStore};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

pub const PRODUCERS: &str = "\
1|Alchemist|http://img.example/alchemist.jpg|http://tags.example/alchemist
2|Metro Boomin|None|None
3|Rick Rubin||
";

pub const PERFORMERS: &str = "\
10|Freddie Gibbs|http://img.example/gibbs.jpg
11|Future|None
12|Johnny Cash|None\"
";

pub const SONGS: &str = "\
100|1985|2020 05 29|2020|05|29|http://play.example/100
101|Mask Off|2017 02 17|2017|02|17|http://play.example/101
102|Hurt|2002 11 04|2002|11|04|None
103|Frank Lucas|None|2020|None|None|None
104|Scottie Beam|2020 05 29|2020|5|29|http://play.example/104
";

pub const ALBUMS: &str = "\
200|Alfredo|http://img.example/alfredo.jpg|2020|05|29
201|FUTURE|None|2017|02|17
202|American IV|None|2002|11|04
";

pub const EVENTS: &str = "\
1|10|100|200
1|10|103|200
1|10|104|200
2|11|101|201
3|12|102|202
2|10|104|
";

pub const NETWORK: &str = "\
Alchemist,Freddie Gibbs
Freddie Gibbs,Metro Boomin
Metro Boomin,Future
";

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    path
}

pub struct TestCatalog {
    pub dir: TempDir,
    pub store: SqliteCreditsStore,
    pub summary: LoadSummary,
}

impl TestCatalog {
    /// Write the fixture dump files and load them into a new database.
    pub fn load() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteCreditsStore::new(dir.path().join("credits.db"), 2).unwrap();

        let files = CreditFiles {
            producers: write_file(dir.path(), "producers.txt", PRODUCERS),
            performers: write_file(dir.path(), "performers.txt", PERFORMERS),
            songs: write_file(dir.path(), "songs.txt", SONGS),
            albums: write_file(dir.path(), "albums.txt", ALBUMS),
            events: write_file(dir.path(), "events.txt", EVENTS),
        };
        let summary = load_all(&store, &files).unwrap();

        TestCatalog {
            dir,
            store,
            summary,
        }
    }

    /// Router over the loaded catalog, with the network csv wired in.
    pub fn app(&self) -> axum::Router {
        let network_csv = write_file(self.dir.path(), "network.csv", NETWORK);
        make_app(ServerState {
            config: ServerConfig {
                port: 0,
                per_page: 100,
                network_csv: Some(network_csv),
            },
            store: Arc::new(self.store.clone()),
            related: Arc::new(NoRelated),
        })
    }
}
