use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Venue {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub genres: Option<String>, // comma separated, see `split_genres`
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Artist {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub genres: Option<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Show {
    pub id: i64,
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

impl Show {
    /// Upcoming means strictly after `now`; a show starting exactly at `now`
    /// is already past.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.start_time > now
    }
}

/// A show joined with the display fields of both parents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Booking {
    pub show: Show,
    pub venue_name: String,
    pub venue_image_link: Option<String>,
    pub artist_name: String,
    pub artist_image_link: Option<String>,
}

/// All venues sharing one `(city, state)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VenueGroup {
    pub city: String,
    pub state: String,
    pub venues: Vec<Venue>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewVenue {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewArtist {
    pub name: String,
    pub city: String,
    pub state: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub seeking_venue: bool,
    pub seeking_description: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewShow {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: DateTime<Utc>,
}

/// Splits a stored genre column. `None` stays `None` so callers can omit the
/// field instead of rendering an empty list.
pub fn split_genres(raw: Option<&str>) -> Option<Vec<String>> {
    raw.map(|text| {
        text.split(',')
            .map(str::trim)
            .filter(|genre| !genre.is_empty())
            .map(str::to_string)
            .collect()
    })
}

pub fn join_genres(genres: &[String]) -> String {
    genres
        .iter()
        .map(|genre| genre.trim())
        .filter(|genre| !genre.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn splits_and_trims_genres() {
        assert_eq!(
            split_genres(Some("jazz, blues")),
            Some(vec!["jazz".to_string(), "blues".to_string()])
        );
        assert_eq!(
            split_genres(Some(" Rock n Roll ,, Folk ")),
            Some(vec!["Rock n Roll".to_string(), "Folk".to_string()])
        );
    }

    #[test]
    fn null_genres_stay_absent() {
        assert_eq!(split_genres(None), None);
        assert_eq!(split_genres(Some("")), Some(Vec::new()));
    }

    #[test]
    fn joined_genres_split_back_unchanged() {
        let genres = vec!["Jazz".to_string(), " Reggae".to_string(), "Swing".to_string()];
        let stored = join_genres(&genres);
        assert_eq!(stored, "Jazz,Reggae,Swing");
        assert_eq!(
            split_genres(Some(&stored)),
            Some(vec![
                "Jazz".to_string(),
                "Reggae".to_string(),
                "Swing".to_string()
            ])
        );
    }

    #[test]
    fn show_starting_now_is_past() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 20, 0, 0).unwrap();
        let mut show = Show {
            id: 1,
            venue_id: 1,
            artist_id: 1,
            start_time: now,
        };
        assert!(!show.is_upcoming(now));
        show.start_time = now + Duration::seconds(1);
        assert!(show.is_upcoming(now));
    }
}
