//! Read paths of the directory: grouped listings, name search and detail
//! pages with their past/upcoming show breakdown.
//!
//! Every operation takes the `now` snapshot from its caller and partitions all
//! shows of one response against it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::Directory;
use crate::error::{DirectoryError, EntityKind, Result};
use crate::models::{split_genres, Booking};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VenueSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistSummary {
    pub id: i64,
    pub name: String,
    pub num_upcoming_shows: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LocationGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<VenueSummary>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}

impl<T> SearchResults<T> {
    fn new(data: Vec<T>) -> Self {
        Self {
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistListItem {
    pub id: i64,
    pub name: String,
}

/// One show on a venue page, seen from the artist side.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistAppearance {
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

/// One show on an artist page, seen from the venue side.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VenueAppearance {
    pub venue_id: i64,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VenueDetail {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    pub address: Option<String>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<ArtistAppearance>,
    pub upcoming_shows: Vec<ArtistAppearance>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ArtistDetail {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genres: Option<Vec<String>>,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
    pub image_link: Option<String>,
    pub past_shows: Vec<VenueAppearance>,
    pub upcoming_shows: Vec<VenueAppearance>,
    pub past_shows_count: usize,
    pub upcoming_shows_count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ShowListing {
    pub venue_id: i64,
    pub venue_name: String,
    pub artist_id: i64,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
    pub start_time: DateTime<Utc>,
}

pub fn venues_by_location<D>(dir: &D, now: DateTime<Utc>) -> Result<Vec<LocationGroup>>
where
    D: Directory + ?Sized,
{
    let mut out = Vec::new();
    for group in dir.venues_grouped_by_location()? {
        let mut venues = Vec::with_capacity(group.venues.len());
        for venue in group.venues {
            let shows = dir.shows_for_venue(venue.id)?;
            venues.push(VenueSummary {
                id: venue.id,
                name: venue.name,
                num_upcoming_shows: count_upcoming(&shows, now),
            });
        }
        out.push(LocationGroup {
            city: group.city,
            state: group.state,
            venues,
        });
    }
    Ok(out)
}

pub fn search_venues<D>(dir: &D, term: &str, now: DateTime<Utc>) -> Result<SearchResults<VenueSummary>>
where
    D: Directory + ?Sized,
{
    let mut data = Vec::new();
    for venue in dir.venues_by_name(term)? {
        let shows = dir.shows_for_venue(venue.id)?;
        data.push(VenueSummary {
            id: venue.id,
            name: venue.name,
            num_upcoming_shows: count_upcoming(&shows, now),
        });
    }
    Ok(SearchResults::new(data))
}

pub fn search_artists<D>(
    dir: &D,
    term: &str,
    now: DateTime<Utc>,
) -> Result<SearchResults<ArtistSummary>>
where
    D: Directory + ?Sized,
{
    let mut data = Vec::new();
    for artist in dir.artists_by_name(term)? {
        let shows = dir.shows_for_artist(artist.id)?;
        data.push(ArtistSummary {
            id: artist.id,
            name: artist.name,
            num_upcoming_shows: count_upcoming(&shows, now),
        });
    }
    Ok(SearchResults::new(data))
}

pub fn list_artists<D>(dir: &D) -> Result<Vec<ArtistListItem>>
where
    D: Directory + ?Sized,
{
    Ok(dir
        .all_artists()?
        .into_iter()
        .map(|artist| ArtistListItem {
            id: artist.id,
            name: artist.name,
        })
        .collect())
}

pub fn venue_detail<D>(dir: &D, id: i64, now: DateTime<Utc>) -> Result<VenueDetail>
where
    D: Directory + ?Sized,
{
    let venue = dir
        .venue(id)?
        .ok_or_else(|| DirectoryError::not_found(EntityKind::Venue, id))?;
    let (past, upcoming) = partition(dir.shows_for_venue(id)?, now);
    let appearance = |booking: Booking| ArtistAppearance {
        artist_id: booking.show.artist_id,
        artist_name: booking.artist_name,
        artist_image_link: booking.artist_image_link,
        start_time: booking.show.start_time,
    };
    let past_shows: Vec<_> = past.into_iter().map(appearance).collect();
    let upcoming_shows: Vec<_> = upcoming.into_iter().map(appearance).collect();

    Ok(VenueDetail {
        id: venue.id,
        name: venue.name,
        genres: split_genres(venue.genres.as_deref()),
        address: venue.address,
        city: venue.city,
        state: venue.state,
        phone: venue.phone,
        website: venue.website,
        facebook_link: venue.facebook_link,
        seeking_talent: venue.seeking_talent,
        seeking_description: venue.seeking_description,
        image_link: venue.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

pub fn artist_detail<D>(dir: &D, id: i64, now: DateTime<Utc>) -> Result<ArtistDetail>
where
    D: Directory + ?Sized,
{
    let artist = dir
        .artist(id)?
        .ok_or_else(|| DirectoryError::not_found(EntityKind::Artist, id))?;
    let (past, upcoming) = partition(dir.shows_for_artist(id)?, now);
    let appearance = |booking: Booking| VenueAppearance {
        venue_id: booking.show.venue_id,
        venue_name: booking.venue_name,
        venue_image_link: booking.venue_image_link,
        start_time: booking.show.start_time,
    };
    let past_shows: Vec<_> = past.into_iter().map(appearance).collect();
    let upcoming_shows: Vec<_> = upcoming.into_iter().map(appearance).collect();

    Ok(ArtistDetail {
        id: artist.id,
        name: artist.name,
        genres: split_genres(artist.genres.as_deref()),
        city: artist.city,
        state: artist.state,
        phone: artist.phone,
        website: artist.website,
        facebook_link: artist.facebook_link,
        seeking_venue: artist.seeking_venue,
        seeking_description: artist.seeking_description,
        image_link: artist.image_link,
        past_shows_count: past_shows.len(),
        upcoming_shows_count: upcoming_shows.len(),
        past_shows,
        upcoming_shows,
    })
}

pub fn list_shows<D>(dir: &D) -> Result<Vec<ShowListing>>
where
    D: Directory + ?Sized,
{
    Ok(dir
        .all_shows()?
        .into_iter()
        .map(|booking| ShowListing {
            venue_id: booking.show.venue_id,
            venue_name: booking.venue_name,
            artist_id: booking.show.artist_id,
            artist_name: booking.artist_name,
            artist_image_link: booking.artist_image_link,
            start_time: booking.show.start_time,
        })
        .collect())
}

fn count_upcoming(shows: &[Booking], now: DateTime<Utc>) -> usize {
    shows.iter().filter(|b| b.show.is_upcoming(now)).count()
}

/// Splits into `(past, upcoming)`, keeping the incoming order in both halves.
fn partition(shows: Vec<Booking>, now: DateTime<Utc>) -> (Vec<Booking>, Vec<Booking>) {
    let (upcoming, past): (Vec<_>, Vec<_>) =
        shows.into_iter().partition(|b| b.show.is_upcoming(now));
    (past, upcoming)
}
