use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{DirectoryError, EntityKind, Result};
use crate::models::{
    join_genres, Artist, Booking, NewArtist, NewShow, NewVenue, Show, Venue, VenueGroup,
};
use crate::utils;

/// Persistence interface consumed by the query engine and the write path.
pub trait Directory {
    /// Every venue, grouped by `(city, state)`. Groups are ordered by city then
    /// state, venues within a group by id.
    fn venues_grouped_by_location(&self) -> Result<Vec<VenueGroup>>;
    /// Case-insensitive substring match on the name. An empty term matches all.
    fn venues_by_name(&self, term: &str) -> Result<Vec<Venue>>;
    fn artists_by_name(&self, term: &str) -> Result<Vec<Artist>>;
    fn all_artists(&self) -> Result<Vec<Artist>>;
    fn venue(&self, id: i64) -> Result<Option<Venue>>;
    fn artist(&self, id: i64) -> Result<Option<Artist>>;
    fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<Booking>>;
    fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<Booking>>;
    fn all_shows(&self) -> Result<Vec<Booking>>;

    fn insert_venue(&self, venue: &NewVenue) -> Result<i64>;
    fn update_venue(&self, id: i64, venue: &NewVenue) -> Result<()>;
    /// Removes the venue and, by cascade, its shows.
    fn delete_venue(&self, id: i64) -> Result<()>;
    fn insert_artist(&self, artist: &NewArtist) -> Result<i64>;
    fn update_artist(&self, id: i64, artist: &NewArtist) -> Result<()>;
    /// Removes the artist and, by cascade, its shows.
    fn delete_artist(&self, id: i64) -> Result<()>;
    fn insert_show(&self, show: &NewShow) -> Result<i64>;
}

const VENUE_COLUMNS: &str = "id, name, city, state, address, phone, website, facebook_link,
    image_link, genres, seeking_talent, seeking_description";

const ARTIST_COLUMNS: &str = "id, name, city, state, phone, website, facebook_link,
    image_link, genres, seeking_venue, seeking_description";

const BOOKING_SELECT: &str = "SELECT s.id, s.venue_id, s.artist_id, s.start_time,
        v.name, v.image_link, a.name, a.image_link
     FROM shows s
     JOIN venues v ON v.id = s.venue_id
     JOIN artists a ON a.id = s.artist_id";

pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        utils::ensure_parent(path);
        let conn = Connection::open(path)?;
        // WAL lets a reader keep its snapshot while another connection writes.
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> rusqlite::Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS venues(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                address TEXT,
                phone TEXT,
                website TEXT,
                facebook_link TEXT,
                image_link TEXT,
                genres TEXT,
                seeking_talent INTEGER NOT NULL DEFAULT 0,
                seeking_description TEXT
            );
            CREATE TABLE IF NOT EXISTS artists(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                city TEXT NOT NULL,
                state TEXT NOT NULL,
                phone TEXT,
                website TEXT,
                facebook_link TEXT,
                image_link TEXT,
                genres TEXT,
                seeking_venue INTEGER NOT NULL DEFAULT 0,
                seeking_description TEXT
            );
            CREATE TABLE IF NOT EXISTS shows(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                venue_id INTEGER NOT NULL REFERENCES venues(id) ON DELETE CASCADE,
                artist_id INTEGER NOT NULL REFERENCES artists(id) ON DELETE CASCADE,
                start_time TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS shows_venue_idx ON shows(venue_id);
            CREATE INDEX IF NOT EXISTS shows_artist_idx ON shows(artist_id);",
        )?;
        Ok(())
    }

    /// Loads the demo directory when no venue exists yet. Show times are
    /// relative to `now` so both partitions stay populated.
    pub fn seed_if_empty(&self, now: DateTime<Utc>) -> Result<bool> {
        self.in_transaction(|store| store.seed_demo(now))
    }

    /// Runs `op` inside one transaction: every read sees the same snapshot and
    /// writes commit together or not at all.
    pub fn in_transaction<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&Store) -> Result<T>,
    {
        let tx = self.conn.unchecked_transaction()?;
        let out = op(self)?;
        tx.commit()?;
        Ok(out)
    }

    fn seed_demo(&self, now: DateTime<Utc>) -> Result<bool> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM venues", [], |row| row.get(0))?;
        if count > 0 {
            return Ok(false);
        }

        let musical_hop = self.insert_venue(&sample_venue(
            "The Musical Hop",
            "San Francisco",
            "CA",
            "1015 Folsom Street",
            &["Jazz", "Reggae", "Swing", "Classical", "Folk"],
            true,
        ))?;
        let dueling_pianos = self.insert_venue(&sample_venue(
            "The Dueling Pianos Bar",
            "New York",
            "NY",
            "335 Delancey Street",
            &["Classical", "R&B", "Hip-Hop"],
            false,
        ))?;
        let park_square = self.insert_venue(&sample_venue(
            "Park Square Live Music & Coffee",
            "San Francisco",
            "CA",
            "34 Whiskey Moore Ave",
            &["Rock n Roll", "Jazz", "Classical", "Folk"],
            false,
        ))?;

        let guns_n_petals = self.insert_artist(&sample_artist(
            "Guns N Petals",
            "San Francisco",
            "CA",
            &["Rock n Roll"],
            true,
        ))?;
        let matt_quevedo = self.insert_artist(&sample_artist(
            "Matt Quevedo",
            "New York",
            "NY",
            &["Jazz"],
            false,
        ))?;
        let wild_sax = self.insert_artist(&sample_artist(
            "The Wild Sax Band",
            "San Francisco",
            "CA",
            &["Jazz", "Classical"],
            false,
        ))?;

        let shows = [
            (musical_hop, guns_n_petals, now - Duration::days(30)),
            (park_square, matt_quevedo, now - Duration::days(7)),
            (park_square, wild_sax, now + Duration::days(7)),
            (park_square, wild_sax, now + Duration::days(14)),
            (park_square, wild_sax, now + Duration::days(21)),
            (dueling_pianos, guns_n_petals, now + Duration::days(3)),
        ];
        for (venue_id, artist_id, start_time) in shows {
            self.insert_show(&NewShow {
                venue_id,
                artist_id,
                start_time,
            })?;
        }

        Ok(true)
    }

    fn query_venues(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<Venue>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, venue_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn query_artists(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<Artist>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, artist_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn query_bookings(&self, filter: &str, args: impl rusqlite::Params) -> Result<Vec<Booking>> {
        let sql = format!("{BOOKING_SELECT} {filter} ORDER BY s.start_time, s.id");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(args, booking_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> &Connection {
        &self.conn
    }

    fn exists(&self, table: &str, id: i64) -> Result<bool> {
        let sql = format!("SELECT 1 FROM {table} WHERE id = ?1");
        let found = self
            .conn
            .query_row(&sql, params![id], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }
}

impl Directory for Store {
    fn venues_grouped_by_location(&self) -> Result<Vec<VenueGroup>> {
        let venues = self.query_venues(
            &format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY city, state, id"),
            [],
        )?;

        let mut groups: Vec<VenueGroup> = Vec::new();
        for venue in venues {
            match groups.last_mut() {
                Some(group) if group.city == venue.city && group.state == venue.state => {
                    group.venues.push(venue);
                }
                _ => groups.push(VenueGroup {
                    city: venue.city.clone(),
                    state: venue.state.clone(),
                    venues: vec![venue],
                }),
            }
        }
        Ok(groups)
    }

    fn venues_by_name(&self, term: &str) -> Result<Vec<Venue>> {
        let venues = self.query_venues(
            &format!("SELECT {VENUE_COLUMNS} FROM venues ORDER BY id"),
            [],
        )?;
        Ok(venues
            .into_iter()
            .filter(|venue| name_matches(&venue.name, term))
            .collect())
    }

    fn artists_by_name(&self, term: &str) -> Result<Vec<Artist>> {
        let artists = self.all_artists()?;
        Ok(artists
            .into_iter()
            .filter(|artist| name_matches(&artist.name, term))
            .collect())
    }

    fn all_artists(&self) -> Result<Vec<Artist>> {
        self.query_artists(
            &format!("SELECT {ARTIST_COLUMNS} FROM artists ORDER BY id"),
            [],
        )
    }

    fn venue(&self, id: i64) -> Result<Option<Venue>> {
        let venue = self
            .conn
            .query_row(
                &format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1"),
                params![id],
                venue_from_row,
            )
            .optional()?;
        Ok(venue)
    }

    fn artist(&self, id: i64) -> Result<Option<Artist>> {
        let artist = self
            .conn
            .query_row(
                &format!("SELECT {ARTIST_COLUMNS} FROM artists WHERE id = ?1"),
                params![id],
                artist_from_row,
            )
            .optional()?;
        Ok(artist)
    }

    fn shows_for_venue(&self, venue_id: i64) -> Result<Vec<Booking>> {
        self.query_bookings("WHERE s.venue_id = ?1", params![venue_id])
    }

    fn shows_for_artist(&self, artist_id: i64) -> Result<Vec<Booking>> {
        self.query_bookings("WHERE s.artist_id = ?1", params![artist_id])
    }

    fn all_shows(&self) -> Result<Vec<Booking>> {
        self.query_bookings("", [])
    }

    fn insert_venue(&self, venue: &NewVenue) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO venues (name, city, state, address, phone, website, facebook_link,
                image_link, genres, seeking_talent, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                venue.website,
                venue.facebook_link,
                venue.image_link,
                join_genres(&venue.genres),
                venue.seeking_talent,
                venue.seeking_description
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_venue(&self, id: i64, venue: &NewVenue) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE venues SET name = ?2, city = ?3, state = ?4, address = ?5, phone = ?6,
                website = ?7, facebook_link = ?8, image_link = ?9, genres = ?10,
                seeking_talent = ?11, seeking_description = ?12
             WHERE id = ?1",
            params![
                id,
                venue.name,
                venue.city,
                venue.state,
                venue.address,
                venue.phone,
                venue.website,
                venue.facebook_link,
                venue.image_link,
                join_genres(&venue.genres),
                venue.seeking_talent,
                venue.seeking_description
            ],
        )?;
        if changed == 0 {
            return Err(DirectoryError::not_found(EntityKind::Venue, id));
        }
        Ok(())
    }

    fn delete_venue(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM venues WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DirectoryError::not_found(EntityKind::Venue, id));
        }
        Ok(())
    }

    fn insert_artist(&self, artist: &NewArtist) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO artists (name, city, state, phone, website, facebook_link,
                image_link, genres, seeking_venue, seeking_description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                artist.website,
                artist.facebook_link,
                artist.image_link,
                join_genres(&artist.genres),
                artist.seeking_venue,
                artist.seeking_description
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update_artist(&self, id: i64, artist: &NewArtist) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE artists SET name = ?2, city = ?3, state = ?4, phone = ?5, website = ?6,
                facebook_link = ?7, image_link = ?8, genres = ?9, seeking_venue = ?10,
                seeking_description = ?11
             WHERE id = ?1",
            params![
                id,
                artist.name,
                artist.city,
                artist.state,
                artist.phone,
                artist.website,
                artist.facebook_link,
                artist.image_link,
                join_genres(&artist.genres),
                artist.seeking_venue,
                artist.seeking_description
            ],
        )?;
        if changed == 0 {
            return Err(DirectoryError::not_found(EntityKind::Artist, id));
        }
        Ok(())
    }

    fn delete_artist(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM artists WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(DirectoryError::not_found(EntityKind::Artist, id));
        }
        Ok(())
    }

    fn insert_show(&self, show: &NewShow) -> Result<i64> {
        if !self.exists("venues", show.venue_id)? {
            return Err(DirectoryError::not_found(EntityKind::Venue, show.venue_id));
        }
        if !self.exists("artists", show.artist_id)? {
            return Err(DirectoryError::not_found(EntityKind::Artist, show.artist_id));
        }
        self.conn.execute(
            "INSERT INTO shows (venue_id, artist_id, start_time) VALUES (?1, ?2, ?3)",
            params![show.venue_id, show.artist_id, show.start_time],
        )?;
        Ok(self.conn.last_insert_rowid())
    }
}

fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.to_lowercase())
}

fn venue_from_row(row: &Row<'_>) -> rusqlite::Result<Venue> {
    Ok(Venue {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        address: row.get(4)?,
        phone: row.get(5)?,
        website: row.get(6)?,
        facebook_link: row.get(7)?,
        image_link: row.get(8)?,
        genres: row.get(9)?,
        seeking_talent: row.get(10)?,
        seeking_description: row.get(11)?,
    })
}

fn artist_from_row(row: &Row<'_>) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        city: row.get(2)?,
        state: row.get(3)?,
        phone: row.get(4)?,
        website: row.get(5)?,
        facebook_link: row.get(6)?,
        image_link: row.get(7)?,
        genres: row.get(8)?,
        seeking_venue: row.get(9)?,
        seeking_description: row.get(10)?,
    })
}

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    Ok(Booking {
        show: Show {
            id: row.get(0)?,
            venue_id: row.get(1)?,
            artist_id: row.get(2)?,
            start_time: row.get(3)?,
        },
        venue_name: row.get(4)?,
        venue_image_link: row.get(5)?,
        artist_name: row.get(6)?,
        artist_image_link: row.get(7)?,
    })
}

fn sample_venue(
    name: &str,
    city: &str,
    state: &str,
    address: &str,
    genres: &[&str],
    seeking_talent: bool,
) -> NewVenue {
    NewVenue {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        address: Some(address.to_string()),
        phone: Some("123-123-1234".to_string()),
        website: None,
        facebook_link: None,
        image_link: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        seeking_talent,
        seeking_description: seeking_talent
            .then(|| "We are on the lookout for a local artist to play every two weeks.".to_string()),
    }
}

fn sample_artist(
    name: &str,
    city: &str,
    state: &str,
    genres: &[&str],
    seeking_venue: bool,
) -> NewArtist {
    NewArtist {
        name: name.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        phone: Some("326-123-5000".to_string()),
        website: None,
        facebook_link: None,
        image_link: None,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        seeking_venue,
        seeking_description: seeking_venue
            .then(|| "Looking for shows to perform at in the San Francisco Bay Area!".to_string()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn venue(name: &str, city: &str, state: &str) -> NewVenue {
        NewVenue {
            name: name.to_string(),
            city: city.to_string(),
            state: state.to_string(),
            address: Some("1 Main St".to_string()),
            genres: vec!["Jazz".to_string()],
            ..NewVenue::default()
        }
    }

    pub(crate) fn artist(name: &str) -> NewArtist {
        NewArtist {
            name: name.to_string(),
            city: "San Francisco".to_string(),
            state: "CA".to_string(),
            genres: vec!["Rock n Roll".to_string()],
            ..NewArtist::default()
        }
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn stores_and_reads_back_venue() {
        let store = Store::open_in_memory().expect("open store");
        let id = store
            .insert_venue(&venue("The Musical Hop", "San Francisco", "CA"))
            .expect("insert venue");

        let stored = store.venue(id).expect("read venue").expect("venue exists");
        assert_eq!(stored.name, "The Musical Hop");
        assert_eq!(stored.genres.as_deref(), Some("Jazz"));
        assert!(!stored.seeking_talent);
        assert!(store.venue(id + 1).expect("read venue").is_none());
    }

    #[test]
    fn groups_venues_by_city_and_state() {
        let store = Store::open_in_memory().expect("open store");
        store.insert_venue(&venue("B", "Oakland", "CA")).expect("insert");
        store.insert_venue(&venue("A", "Nashville", "TN")).expect("insert");
        store.insert_venue(&venue("C", "Oakland", "CA")).expect("insert");

        let groups = store.venues_grouped_by_location().expect("group venues");
        assert_eq!(groups.len(), 2);
        assert_eq!((groups[0].city.as_str(), groups[0].state.as_str()), ("Nashville", "TN"));
        assert_eq!(groups[0].venues.len(), 1);
        assert_eq!(groups[1].city, "Oakland");
        let names: Vec<&str> = groups[1].venues.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn name_search_ignores_case() {
        let store = Store::open_in_memory().expect("open store");
        store
            .insert_venue(&venue("The Musical Hop", "San Francisco", "CA"))
            .expect("insert");
        store
            .insert_venue(&venue("Park Square Live Music & Coffee", "San Francisco", "CA"))
            .expect("insert");

        assert_eq!(store.venues_by_name("MUSICAL").expect("search").len(), 1);
        assert_eq!(store.venues_by_name("music").expect("search").len(), 2);
        assert_eq!(store.venues_by_name("").expect("search").len(), 2);
        assert!(store.venues_by_name("opera").expect("search").is_empty());
    }

    #[test]
    fn bookings_carry_both_parents_in_start_order() {
        let store = Store::open_in_memory().expect("open store");
        let venue_id = store.insert_venue(&venue("Hop", "Oakland", "CA")).expect("insert");
        let artist_id = store.insert_artist(&artist("Guns N Petals")).expect("insert");
        for hour in [21, 19] {
            store
                .insert_show(&NewShow {
                    venue_id,
                    artist_id,
                    start_time: at(hour),
                })
                .expect("insert show");
        }

        let shows = store.shows_for_venue(venue_id).expect("venue shows");
        assert_eq!(shows.len(), 2);
        assert_eq!(shows[0].show.start_time, at(19));
        assert_eq!(shows[0].artist_name, "Guns N Petals");
        assert_eq!(shows[0].venue_name, "Hop");
        assert_eq!(store.shows_for_artist(artist_id).expect("artist shows").len(), 2);
        assert_eq!(store.all_shows().expect("all shows").len(), 2);
    }

    #[test]
    fn show_for_missing_artist_is_not_found() {
        let store = Store::open_in_memory().expect("open store");
        let venue_id = store.insert_venue(&venue("Hop", "Oakland", "CA")).expect("insert");
        let err = store
            .insert_show(&NewShow {
                venue_id,
                artist_id: 42,
                start_time: at(20),
            })
            .expect_err("missing artist");
        assert!(matches!(
            err,
            DirectoryError::NotFound {
                kind: EntityKind::Artist,
                id: 42
            }
        ));
        assert!(store.all_shows().expect("all shows").is_empty());
    }

    #[test]
    fn deleting_venue_cascades_to_its_shows() {
        let store = Store::open_in_memory().expect("open store");
        let kept = store.insert_venue(&venue("Kept", "Oakland", "CA")).expect("insert");
        let doomed = store.insert_venue(&venue("Doomed", "Oakland", "CA")).expect("insert");
        let artist_id = store.insert_artist(&artist("Matt Quevedo")).expect("insert");
        for venue_id in [kept, doomed] {
            store
                .insert_show(&NewShow {
                    venue_id,
                    artist_id,
                    start_time: at(20),
                })
                .expect("insert show");
        }

        store.delete_venue(doomed).expect("delete venue");
        assert!(store.venue(doomed).expect("read").is_none());
        let remaining = store.shows_for_artist(artist_id).expect("artist shows");
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].show.venue_id, kept);

        assert!(matches!(
            store.delete_venue(doomed),
            Err(DirectoryError::NotFound { .. })
        ));
    }

    #[test]
    fn update_rewrites_fields_and_reports_missing_ids() {
        let store = Store::open_in_memory().expect("open store");
        let id = store.insert_artist(&artist("Wild Sax")).expect("insert");
        let mut changed = artist("The Wild Sax Band");
        changed.genres = vec!["Jazz".to_string(), "Classical".to_string()];
        changed.seeking_venue = true;
        store.update_artist(id, &changed).expect("update artist");

        let stored = store.artist(id).expect("read").expect("artist exists");
        assert_eq!(stored.name, "The Wild Sax Band");
        assert_eq!(stored.genres.as_deref(), Some("Jazz,Classical"));
        assert!(stored.seeking_venue);

        assert!(matches!(
            store.update_artist(id + 10, &changed),
            Err(DirectoryError::NotFound {
                kind: EntityKind::Artist,
                ..
            })
        ));
    }

    #[test]
    fn seeds_demo_data_only_once() {
        let store = Store::open_in_memory().expect("open store");
        let now = at(12);
        assert!(store.seed_if_empty(now).expect("seed"));
        assert!(!store.seed_if_empty(now).expect("seed again"));
        assert_eq!(store.venues_by_name("").expect("venues").len(), 3);
        assert_eq!(store.all_artists().expect("artists").len(), 3);
        assert_eq!(store.all_shows().expect("shows").len(), 6);
    }

    #[test]
    fn whitespace_term_is_matched_literally() {
        let store = Store::open_in_memory().expect("open store");
        store.insert_venue(&venue("TheHop", "Oakland", "CA")).expect("insert");
        store
            .insert_venue(&venue("The Musical Hop", "San Francisco", "CA"))
            .expect("insert");

        let hits = store.venues_by_name("   ").expect("search");
        assert!(hits.is_empty());
        let hits = store.venues_by_name("Musical ").expect("search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "The Musical Hop");
        assert!(store.venues_by_name("hop ").expect("search").is_empty());
    }

    #[test]
    fn failed_transaction_leaves_no_rows() {
        let store = Store::open_in_memory().expect("open store");
        let result: Result<()> = store.in_transaction(|store| {
            store.insert_venue(&venue("Half Seeded", "Oakland", "CA"))?;
            Err(DirectoryError::not_found(EntityKind::Artist, 1))
        });
        assert!(result.is_err());
        assert!(store.venues_by_name("").expect("venues").is_empty());

        assert!(store.seed_if_empty(at(12)).expect("seed"));
        assert_eq!(store.all_shows().expect("shows").len(), 6);
    }

    #[test]
    fn reads_in_one_transaction_share_a_snapshot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("directory.sqlite");
        let reader = Store::open(&path).expect("open reader");
        let writer = Store::open(&path).expect("open writer");
        let venue_id = writer.insert_venue(&venue("Hop", "Oakland", "CA")).expect("insert");
        let artist_id = writer.insert_artist(&artist("Matt Quevedo")).expect("insert");
        writer
            .insert_show(&NewShow {
                venue_id,
                artist_id,
                start_time: at(20),
            })
            .expect("insert show");

        let (venue, shows) = reader
            .in_transaction(|store| {
                let venue = store.venue(venue_id)?;
                writer.delete_venue(venue_id)?;
                Ok((venue, store.shows_for_venue(venue_id)?))
            })
            .expect("snapshot read");
        assert!(venue.is_some());
        assert_eq!(shows.len(), 1);

        assert!(reader.venue(venue_id).expect("read").is_none());
        assert!(reader.shows_for_venue(venue_id).expect("read").is_empty());
    }
}
