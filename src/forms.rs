use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::ValidationErrors;
use crate::models::{NewArtist, NewShow, NewVenue};

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ().\-]{7,20}$").expect("valid phone regex"));
static URL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("valid url regex"));

pub const STATES: [&str; 51] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MT", "NE", "NV", "NH", "NJ", "NM", "NY", "NC", "ND", "OH",
    "OK", "OR", "MD", "MA", "MI", "MN", "MS", "MO", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

pub const GENRES: [&str; 19] = [
    "Alternative",
    "Blues",
    "Classical",
    "Country",
    "Electronic",
    "Folk",
    "Funk",
    "Hip-Hop",
    "Heavy Metal",
    "Instrumental",
    "Jazz",
    "Musical Theatre",
    "Pop",
    "Punk",
    "R&B",
    "Reggae",
    "Rock n Roll",
    "Soul",
    "Other",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VenueForm {
    pub name: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub facebook_link: Option<String>,
    pub image_link: Option<String>,
    pub genres: Vec<String>,
    pub seeking_talent: bool,
    pub seeking_description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ArtistForm {
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

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShowForm {
    pub venue_id: i64,
    pub artist_id: i64,
    pub start_time: String,
}

impl VenueForm {
    pub fn validate(self) -> Result<NewVenue, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = required(&mut errors, "name", &self.name);
        let city = required(&mut errors, "city", &self.city);
        let state = state_code(&mut errors, &self.state);
        let address = required(&mut errors, "address", &self.address);
        let phone = phone(&mut errors, self.phone.as_deref());
        let website = link(&mut errors, "website", self.website.as_deref());
        let facebook_link = link(&mut errors, "facebook_link", self.facebook_link.as_deref());
        let image_link = link(&mut errors, "image_link", self.image_link.as_deref());
        let genres = genres(&mut errors, &self.genres);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewVenue {
            name,
            city,
            state,
            address: Some(address),
            phone,
            website,
            facebook_link,
            image_link,
            genres,
            seeking_talent: self.seeking_talent,
            seeking_description: optional(self.seeking_description.as_deref()),
        })
    }
}

impl ArtistForm {
    pub fn validate(self) -> Result<NewArtist, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = required(&mut errors, "name", &self.name);
        let city = required(&mut errors, "city", &self.city);
        let state = state_code(&mut errors, &self.state);
        let phone = phone(&mut errors, self.phone.as_deref());
        let website = link(&mut errors, "website", self.website.as_deref());
        let facebook_link = link(&mut errors, "facebook_link", self.facebook_link.as_deref());
        let image_link = link(&mut errors, "image_link", self.image_link.as_deref());
        let genres = genres(&mut errors, &self.genres);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewArtist {
            name,
            city,
            state,
            phone,
            website,
            facebook_link,
            image_link,
            genres,
            seeking_venue: self.seeking_venue,
            seeking_description: optional(self.seeking_description.as_deref()),
        })
    }
}

impl ShowForm {
    pub fn validate(self) -> Result<NewShow, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.venue_id <= 0 {
            errors.push("venue_id", "a venue is required");
        }
        if self.artist_id <= 0 {
            errors.push("artist_id", "an artist is required");
        }
        let start_time = parse_start_time(&self.start_time);
        if start_time.is_none() {
            errors.push(
                "start_time",
                "expected RFC 3339 or YYYY-MM-DD HH:MM:SS (UTC)",
            );
        }

        match start_time {
            Some(start_time) if errors.is_empty() => Ok(NewShow {
                venue_id: self.venue_id,
                artist_id: self.artist_id,
                start_time,
            }),
            _ => Err(errors),
        }
    }
}

pub fn parse_start_time(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

fn required(errors: &mut ValidationErrors, field: &'static str, value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, "this field is required");
    }
    value.to_string()
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn state_code(errors: &mut ValidationErrors, value: &str) -> String {
    let code = value.trim().to_ascii_uppercase();
    if !STATES.contains(&code.as_str()) {
        errors.push("state", format!("unknown state {:?}", value.trim()));
    }
    code
}

fn phone(errors: &mut ValidationErrors, value: Option<&str>) -> Option<String> {
    let phone = optional(value)?;
    if !PHONE_RE.is_match(&phone) {
        errors.push("phone", "invalid phone number");
    }
    Some(phone)
}

fn link(errors: &mut ValidationErrors, field: &'static str, value: Option<&str>) -> Option<String> {
    let url = optional(value)?;
    if !URL_RE.is_match(&url) {
        errors.push(field, "expected an http(s) URL");
    }
    Some(url)
}

fn genres(errors: &mut ValidationErrors, values: &[String]) -> Vec<String> {
    let picked: Vec<String> = values
        .iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect();
    if picked.is_empty() {
        errors.push("genres", "pick at least one genre");
    }
    for genre in &picked {
        if !GENRES.contains(&genre.as_str()) {
            errors.push("genres", format!("unknown genre {genre:?}"));
        }
    }
    picked
}
