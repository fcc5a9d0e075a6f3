use std::{collections::BTreeMap, fmt};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::entities::movie;

pub const DEFAULT_SKIP: u64 = 0;
pub const DEFAULT_TAKE: u64 = 10;
pub const RECENT_LIMIT: u64 = 5;

/// A persisted movie as it travels over the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub director: String,
    pub budget: String,
    pub location: String,
    pub duration: String,
    pub year_time: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

impl From<movie::Model> for Movie {
    fn from(m: movie::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            kind: m.kind,
            director: m.director,
            budget: m.budget,
            location: m.location,
            duration: m.duration,
            year_time: m.year_time,
            image_url: m.image_url,
            created_at: Timestamp::from_millisecond(m.created_at).unwrap_or(Timestamp::UNIX_EPOCH),
        }
    }
}

impl Movie {
    /// The editable fields of this movie, ready to be sent back in an update.
    pub fn to_input(&self) -> MovieInput {
        MovieInput {
            title: self.title.clone(),
            kind: self.kind.clone(),
            director: self.director.clone(),
            budget: self.budget.clone(),
            location: self.location.clone(),
            duration: self.duration.clone(),
            year_time: self.year_time.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// Client-supplied movie fields for create and update. `id` and `createdAt`
/// are owned by the server and ignored if sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub budget: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub year_time: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    #[serde(rename = "type")]
    Kind,
    Director,
    Budget,
    Location,
    Duration,
    YearTime,
    ImageUrl,
}

impl Field {
    /// Text fields that must be non-empty, in form order.
    pub const REQUIRED: [Field; 7] = [
        Field::Title,
        Field::Kind,
        Field::Director,
        Field::Budget,
        Field::Location,
        Field::Duration,
        Field::YearTime,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Kind => "type",
            Field::Director => "director",
            Field::Budget => "budget",
            Field::Location => "location",
            Field::Duration => "duration",
            Field::YearTime => "yearTime",
            Field::ImageUrl => "imageUrl",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Kind => "Type",
            Field::Director => "Director",
            Field::Budget => "Budget",
            Field::Location => "Location",
            Field::Duration => "Duration",
            Field::YearTime => "Year/Time",
            Field::ImageUrl => "Image URL",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Field::Kind => "Type (e.g., Movie, TV Show)",
            other => other.label(),
        }
    }

    pub fn required_message(self) -> String {
        format!("{} is required", self.label())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-field validation messages, keyed by wire name when serialized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn remove(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

impl MovieInput {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Title => Some(&self.title),
            Field::Kind => Some(&self.kind),
            Field::Director => Some(&self.director),
            Field::Budget => Some(&self.budget),
            Field::Location => Some(&self.location),
            Field::Duration => Some(&self.duration),
            Field::YearTime => Some(&self.year_time),
            Field::ImageUrl => self.image_url.as_deref(),
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Title => self.title = value,
            Field::Kind => self.kind = value,
            Field::Director => self.director = value,
            Field::Budget => self.budget = value,
            Field::Location => self.location = value,
            Field::Duration => self.duration = value,
            Field::YearTime => self.year_time = value,
            Field::ImageUrl => self.image_url = (!value.is_empty()).then_some(value),
        }
    }

    /// True when any required text field holds more than whitespace.
    pub fn has_any_text(&self) -> bool {
        Field::REQUIRED
            .iter()
            .any(|f| self.get(*f).is_some_and(|v| !v.trim().is_empty()))
    }

    pub fn validate_field(&self, field: Field) -> Option<String> {
        match field {
            Field::ImageUrl => {
                let raw = self.image_url.as_deref()?;
                match url::Url::parse(raw) {
                    Ok(u) if matches!(u.scheme(), "http" | "https") => None,
                    _ => Some("Image URL must be an absolute http(s) URL".to_string()),
                }
            },
            required => self
                .get(required)
                .is_none_or(|v| v.trim().is_empty())
                .then(|| required.required_message()),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        for field in Field::REQUIRED.into_iter().chain([Field::ImageUrl]) {
            if let Some(message) = self.validate_field(field) {
                errors.insert(field, message);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Raw `skip`/`take` query values. Kept as text so that garbage falls back to
/// the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<String>,
    pub take: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub take: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: DEFAULT_SKIP, take: DEFAULT_TAKE }
    }
}

impl PageQuery {
    pub fn resolve(&self, max_take: u64) -> Page {
        let skip = parse_count(self.skip.as_deref()).unwrap_or(DEFAULT_SKIP);
        let take = parse_count(self.take.as_deref())
            .filter(|t| *t > 0)
            .unwrap_or(DEFAULT_TAKE)
            .min(max_take.max(1));
        Page { skip, take }
    }
}

fn parse_count(raw: Option<&str>) -> Option<u64> {
    raw?.trim().parse::<i64>().ok().and_then(|n| u64::try_from(n).ok())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DbInfo {
    pub total_movies: u64,
    pub recent_movies: Vec<Movie>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub image_url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
