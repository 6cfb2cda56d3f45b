//! Validating decode of upstream JSON into catalog records.
//!
//! Required fields fail with a [`DecodeError`]; optional fields that are
//! `null`, absent or empty strings become `None`.

use chrono::NaiveDate;
use serde_json::Value;

use crate::DecodeError;
use crate::types::{
    CastMember, CatalogItem, Genre, MediaKind, Page, TitleDetail, TrailerVideo, VideoType,
    playable_trailers,
};

const CAST_LIMIT: usize = 10;

/// Decode one list entry. `fallback` is used when the entry has no `media_type`
/// (single-kind endpoints such as `discover/movie`).
pub fn item(v: &Value, fallback: Option<MediaKind>) -> Result<CatalogItem, DecodeError> {
    let kind = match v.get("media_type") {
        Some(Value::String(s)) => {
            MediaKind::from_media_type(s).ok_or_else(|| DecodeError::UnsupportedKind(s.clone()))?
        }
        Some(Value::Null) | None => fallback.ok_or(DecodeError::MissingField("media_type"))?,
        Some(_) => {
            return Err(DecodeError::InvalidField {
                field: "media_type",
                expected: "a string",
            });
        }
    };

    let (title_field, alt_field) = match kind {
        MediaKind::Movie => ("title", "name"),
        MediaKind::Series => ("name", "title"),
    };
    let title = optional_str(v, title_field)?
        .or(optional_str(v, alt_field)?)
        .ok_or(DecodeError::MissingField(title_field))?;

    let date_field = match kind {
        MediaKind::Movie => "release_date",
        MediaKind::Series => "first_air_date",
    };

    Ok(CatalogItem {
        id: required_u64(v, "id")?,
        kind,
        title,
        poster_path: optional_str(v, "poster_path")?,
        backdrop_path: optional_str(v, "backdrop_path")?,
        vote_average: vote_average(v)?,
        release_date: optional_date(v, date_field)?,
        genre_ids: id_list(v, "genre_ids")?,
    })
}

/// Decode a paginated envelope. `entry` returns `Ok(None)` to drop an entry
/// without failing the page; counts stay as upstream reported them.
pub fn page<T>(
    v: &Value,
    mut entry: impl FnMut(&Value) -> Result<Option<T>, DecodeError>,
) -> Result<Page<T>, DecodeError> {
    let results = v
        .get("results")
        .ok_or(DecodeError::MissingField("results"))?
        .as_array()
        .ok_or(DecodeError::InvalidField {
            field: "results",
            expected: "an array",
        })?;

    let mut items = Vec::with_capacity(results.len());
    for r in results {
        if let Some(decoded) = entry(r)? {
            items.push(decoded);
        }
    }

    let page_number = optional_u32(v, "page")?.unwrap_or(1);
    let total_pages = optional_u32(v, "total_pages")?.unwrap_or(0);
    if page_number == 0 {
        return Err(DecodeError::InvalidField {
            field: "page",
            expected: "a page number of at least 1",
        });
    }
    if total_pages > 0 && page_number > total_pages {
        return Err(DecodeError::InvalidField {
            field: "page",
            expected: "a page number within total_pages",
        });
    }

    Ok(Page {
        items,
        page_number,
        total_pages,
        total_results: optional_u64(v, "total_results")?.unwrap_or(0),
    })
}

/// Page of single-kind items.
pub fn item_page(v: &Value, kind: MediaKind) -> Result<Page<CatalogItem>, DecodeError> {
    page(v, |r| item(r, Some(kind)).map(Some))
}

/// Page of a multi-kind listing with anything that isn't a movie or series dropped.
pub fn media_page(v: &Value) -> Result<Page<CatalogItem>, DecodeError> {
    page(v, |r| {
        let is_media = r["media_type"]
            .as_str()
            .and_then(MediaKind::from_media_type)
            .is_some();
        if is_media { item(r, None).map(Some) } else { Ok(None) }
    })
}

pub fn genre(v: &Value) -> Result<Genre, DecodeError> {
    Ok(Genre {
        id: required_u64(v, "id")?,
        name: required_str(v, "name")?,
    })
}

/// `{ "genres": [...] }` as returned by `genre/{kind}/list`.
pub fn genre_list(v: &Value) -> Result<Vec<Genre>, DecodeError> {
    array(v, "genres")?.iter().map(genre).collect()
}

pub fn video(v: &Value) -> Result<TrailerVideo, DecodeError> {
    Ok(TrailerVideo {
        key: required_str(v, "key")?,
        site: required_str(v, "site")?,
        video_type: VideoType::parse(&required_str(v, "type")?),
        name: required_str(v, "name")?,
    })
}

/// `{ "results": [...] }` as returned by `{kind}/{id}/videos`.
pub fn video_list(v: &Value) -> Result<Vec<TrailerVideo>, DecodeError> {
    match v.get("results") {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(_) => array(v, "results")?.iter().map(video).collect(),
    }
}

pub fn cast_member(v: &Value) -> Result<CastMember, DecodeError> {
    Ok(CastMember {
        id: required_u64(v, "id")?,
        name: required_str(v, "name")?,
        character: optional_str(v, "character")?,
        profile_path: optional_str(v, "profile_path")?,
        order: optional_u32(v, "order")?.unwrap_or(u32::MAX),
    })
}

/// Decode `movie/{id}` or `tv/{id}` fetched with `append_to_response=videos,credits`.
pub fn title_detail(v: &Value, kind: MediaKind) -> Result<TitleDetail, DecodeError> {
    let item = item(v, Some(kind))?;

    let genres = match v.get("genres") {
        Some(Value::Null) | None => Vec::new(),
        Some(_) => genre_list(v)?,
    };

    let runtime = match kind {
        MediaKind::Movie => optional_u32(v, "runtime")?,
        MediaKind::Series => v["episode_run_time"]
            .as_array()
            .and_then(|a| a.first())
            .and_then(Value::as_u64)
            .map(|m| narrow("episode_run_time", m))
            .transpose()?,
    };

    let mut cast = match v.get("credits").and_then(|c| c.get("cast")) {
        Some(Value::Array(members)) => members
            .iter()
            .map(cast_member)
            .collect::<Result<Vec<_>, _>>()?,
        _ => Vec::new(),
    };
    cast.sort_by_key(|c| c.order);
    cast.truncate(CAST_LIMIT);

    let trailers = match v.get("videos") {
        Some(videos) if !videos.is_null() => playable_trailers(video_list(videos)?),
        _ => Vec::new(),
    };

    Ok(TitleDetail {
        item,
        overview: optional_str(v, "overview")?,
        tagline: optional_str(v, "tagline")?,
        runtime_minutes: runtime.filter(|m| *m > 0),
        genres,
        status: optional_str(v, "status")?,
        original_language: optional_str(v, "original_language")?,
        number_of_seasons: optional_u32(v, "number_of_seasons")?,
        number_of_episodes: optional_u32(v, "number_of_episodes")?,
        cast,
        trailers,
    })
}

fn array<'a>(v: &'a Value, field: &'static str) -> Result<&'a Vec<Value>, DecodeError> {
    v.get(field)
        .ok_or(DecodeError::MissingField(field))?
        .as_array()
        .ok_or(DecodeError::InvalidField {
            field,
            expected: "an array",
        })
}

fn required_u64(v: &Value, field: &'static str) -> Result<u64, DecodeError> {
    optional_u64(v, field)?.ok_or(DecodeError::MissingField(field))
}

fn optional_u64(v: &Value, field: &'static str) -> Result<Option<u64>, DecodeError> {
    match v.get(field) {
        Some(Value::Null) | None => Ok(None),
        Some(n) => n.as_u64().map(Some).ok_or(DecodeError::InvalidField {
            field,
            expected: "a non-negative integer",
        }),
    }
}

fn optional_u32(v: &Value, field: &'static str) -> Result<Option<u32>, DecodeError> {
    optional_u64(v, field)?.map(|n| narrow(field, n)).transpose()
}

fn narrow(field: &'static str, n: u64) -> Result<u32, DecodeError> {
    u32::try_from(n).map_err(|_| DecodeError::InvalidField {
        field,
        expected: "an integer that fits in 32 bits",
    })
}

fn required_str(v: &Value, field: &'static str) -> Result<String, DecodeError> {
    optional_str(v, field)?.ok_or(DecodeError::MissingField(field))
}

fn optional_str(v: &Value, field: &'static str) -> Result<Option<String>, DecodeError> {
    match v.get(field) {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(DecodeError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn optional_date(v: &Value, field: &'static str) -> Result<Option<NaiveDate>, DecodeError> {
    match optional_str(v, field)? {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| DecodeError::InvalidDate { field, value: s }),
    }
}

fn id_list(v: &Value, field: &'static str) -> Result<Vec<u64>, DecodeError> {
    match v.get(field) {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(Value::Array(ids)) => ids
            .iter()
            .map(|id| {
                id.as_u64().ok_or(DecodeError::InvalidField {
                    field,
                    expected: "an array of integers",
                })
            })
            .collect(),
        Some(_) => Err(DecodeError::InvalidField {
            field,
            expected: "an array of integers",
        }),
    }
}

// Unrated titles come back as 0.0 with no votes.
fn vote_average(v: &Value) -> Result<Option<f64>, DecodeError> {
    let score = match v.get("vote_average") {
        Some(Value::Null) | None => return Ok(None),
        Some(n) => n.as_f64().ok_or(DecodeError::InvalidField {
            field: "vote_average",
            expected: "a number",
        })?,
    };
    if score == 0.0 && v["vote_count"].as_u64() == Some(0) {
        return Ok(None);
    }
    Ok(Some(score.clamp(0.0, 10.0)))
}
