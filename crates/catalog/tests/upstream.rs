use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::{Path, Query, RawQuery, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use cinefeed_catalog::{
    CatalogConfig, CatalogError, CatalogSource, Params, SearchEngine, SectionLoader, SectionState,
    TmdbClient, TransportError, fetch_trailers, genre_shelves,
};
use cinefeed_core::types::MediaKind;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

const API_KEY: &str = "test-key";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_test_writer()
        .try_init();
}

/// Fake catalog API on an ephemeral port. Returns its base URL and a hit counter.
async fn spawn_upstream() -> (String, Arc<AtomicUsize>) {
    init_tracing();
    let hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route("/3/echo", get(echo))
        .route("/3/search/multi", get(search_multi))
        .route("/3/genre/movie/list", get(movie_genres))
        .route("/3/discover/movie", get(discover_movie))
        .route("/3/trending/movie/week", get(trending))
        .route("/3/tv/{id}/videos", get(tv_videos))
        .route("/3/movie/{id}", get(movie_detail))
        .layer(middleware::from_fn_with_state(hits.clone(), count_hits));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/3"), hits)
}

async fn count_hits(State(hits): State<Arc<AtomicUsize>>, req: Request, next: Next) -> Response {
    hits.fetch_add(1, Ordering::SeqCst);
    next.run(req).await
}

async fn echo(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!({ "query": query }))
}

async fn search_multi(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "page": 1,
        "total_pages": 2,
        "total_results": 31,
        "results": [
            { "id": 3894, "media_type": "person", "name": "Christian Bale" },
            {
                "id": 155,
                "media_type": "movie",
                "title": format!("The Dark Knight ({})", q["query"]),
                "release_date": "2008-07-16",
                "vote_average": 8.5
            },
            {
                "id": 2098,
                "media_type": "tv",
                "name": "Batman: The Animated Series",
                "first_air_date": "1992-09-05"
            },
            { "id": 880, "media_type": "person", "name": "Ben Affleck" }
        ]
    }))
}

async fn movie_genres() -> Json<Value> {
    Json(json!({
        "genres": [
            { "id": 28, "name": "Action" },
            { "id": 99, "name": "Documentary" },
            { "id": 35, "name": "Comedy" }
        ]
    }))
}

async fn discover_movie(
    Query(q): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    let genre: u64 = q
        .get("with_genres")
        .and_then(|g| g.parse().ok())
        .ok_or(StatusCode::BAD_REQUEST)?;
    if genre == 99 {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    let results: Vec<Value> = (0..20)
        .map(|i| {
            json!({
                "id": genre * 1000 + i,
                "title": format!("Genre {genre} #{i}"),
                "genre_ids": [genre]
            })
        })
        .collect();
    Ok(Json(json!({
        "page": 1,
        "total_pages": 50,
        "total_results": 1000,
        "results": results
    })))
}

async fn trending(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let page: u64 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let results: Vec<Value> = (0..20)
        .map(|i| {
            json!({
                "id": page * 100 + i,
                "title": format!("Trending {page}.{i}"),
                "media_type": "movie"
            })
        })
        .collect();
    Json(json!({ "page": page, "total_pages": 2, "total_results": 40, "results": results }))
}

async fn tv_videos(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({
        "id": id,
        "results": [
            {
                "key": "HhesaQXLuRY",
                "site": "YouTube",
                "type": "Trailer",
                "name": "Official Trailer"
            },
            { "key": "1234", "site": "Vimeo", "type": "Trailer", "name": "Vimeo Trailer" },
            { "key": "clip1", "site": "YouTube", "type": "Clip", "name": "Cold Open" }
        ]
    }))
}

async fn movie_detail(Path(id): Path<u64>) -> Json<Value> {
    if id == 13 {
        return Json(json!({ "id": 13 }));
    }
    Json(json!({
        "id": id,
        "title": "Fight Club",
        "release_date": "1999-10-15",
        "runtime": 139,
        "vote_average": 8.4,
        "genres": [{ "id": 18, "name": "Drama" }],
        "credits": {
            "cast": [{ "id": 819, "name": "Edward Norton", "character": "Narrator", "order": 0 }]
        },
        "videos": {
            "results": [
                { "key": "qtRKdVHc-cE", "site": "YouTube", "type": "Trailer", "name": "Trailer" }
            ]
        }
    }))
}

fn client(base_url: &str, api_key: Option<&str>) -> TmdbClient {
    TmdbClient::new(CatalogConfig {
        base_url: base_url.to_string(),
        api_key: api_key.map(str::to_string),
        ..Default::default()
    })
    .unwrap()
}

fn query_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter_map(|pair| pair.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[tokio::test]
async fn credential_is_sent_once_and_cannot_be_overridden() {
    let (base, _) = spawn_upstream().await;
    let client = client(&base, Some(API_KEY));

    let params = Params::new()
        .with("api_key", "caller-key")
        .with("page", 2u32)
        .with("include_adult", false)
        .with("with_genres", vec![28u64, 12]);
    let body = client.request("echo", &params).await.unwrap();
    let pairs = query_pairs(body["query"].as_str().unwrap());

    let keys: Vec<&(String, String)> = pairs.iter().filter(|(k, _)| k == "api_key").collect();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0].1, API_KEY);
    assert!(pairs.contains(&("page".to_string(), "2".to_string())));
    assert!(pairs.contains(&("include_adult".to_string(), "false".to_string())));
    assert!(pairs.contains(&("with_genres".to_string(), "28%2C12".to_string())));
}

#[tokio::test]
async fn missing_credential_never_reaches_the_network() {
    let (base, hits) = spawn_upstream().await;
    let client = client(&base, None);

    let err = client.request("echo", &Params::new()).await.unwrap_err();
    assert!(matches!(err, TransportError::MissingCredential));
    let err = client.genres(MediaKind::Movie).await.unwrap_err();
    assert!(matches!(err, CatalogError::Transport(TransportError::MissingCredential)));
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let (base, _) = spawn_upstream().await;
    let client = client(&base, Some(API_KEY));

    let err = client.request("person/1", &Params::new()).await.unwrap_err();
    match err {
        TransportError::Status(status) => assert_eq!(status.as_u16(), 404),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_upstream_is_a_network_error() {
    let client = client("http://127.0.0.1:1/3", Some(API_KEY));
    let err = client.request("echo", &Params::new()).await.unwrap_err();
    assert!(matches!(err, TransportError::Network(_)));
}

#[tokio::test]
async fn incomplete_record_fails_decode() {
    let (base, _) = spawn_upstream().await;
    let client = client(&base, Some(API_KEY));

    let err = client.title_detail(MediaKind::Movie, 13).await.unwrap_err();
    assert!(matches!(err, CatalogError::Decode(_)));
}

#[tokio::test]
async fn title_detail_end_to_end() {
    let (base, _) = spawn_upstream().await;
    let client = client(&base, Some(API_KEY));

    let detail = client.title_detail(MediaKind::Movie, 550).await.unwrap();
    assert_eq!(detail.item.title, "Fight Club");
    assert_eq!(detail.runtime_minutes, Some(139));
    assert_eq!(detail.cast[0].name, "Edward Norton");
    assert_eq!(detail.trailers.len(), 1);
}

#[tokio::test]
async fn search_drops_people_and_keeps_upstream_totals() {
    let (base, _) = spawn_upstream().await;
    let engine = SearchEngine::new(Arc::new(client(&base, Some(API_KEY))));

    let page = engine.search("batman", 1).await;
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].title, "The Dark Knight (batman)");
    assert_eq!(page.items[1].kind, MediaKind::Series);
    assert_eq!(page.total_results, 31);
    assert_eq!(page.total_pages, 2);
}

#[tokio::test]
async fn search_failure_is_an_empty_page() {
    let engine = SearchEngine::new(Arc::new(client("http://127.0.0.1:1/3", Some(API_KEY))));
    let page = engine.search("batman", 1).await;
    assert!(page.items.is_empty());
    assert_eq!(page.page_number, 1);
    assert_eq!(page.total_pages, 0);
}

#[tokio::test]
async fn genre_shelves_mask_a_failing_genre() {
    let (base, hits) = spawn_upstream().await;
    let client = client(&base, Some(API_KEY));

    let shelves = genre_shelves(&client, MediaKind::Movie, 10).await;
    assert_eq!(
        shelves.names().collect::<Vec<_>>(),
        ["Action", "Documentary", "Comedy"]
    );
    assert_eq!(shelves.get("Action").unwrap().len(), 10);
    assert_eq!(shelves.get("Action").unwrap()[0].id, 28_000);
    assert!(shelves.get("Documentary").unwrap().is_empty());
    assert_eq!(shelves.get("Comedy").unwrap().len(), 10);
    // genre list + one discover per genre
    assert_eq!(hits.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn trending_section_pages_until_exhausted() {
    let (base, hits) = spawn_upstream().await;
    let mut section = SectionLoader::new(
        Arc::new(client(&base, Some(API_KEY))),
        "trending/movie/week",
        MediaKind::Movie,
    );

    section.load_first_page().await.unwrap();
    assert_eq!(section.state(), SectionState::Loaded);
    assert_eq!(section.items().len(), 6);

    assert_eq!(section.load_next_page().await.unwrap(), 6);
    assert_eq!(section.state(), SectionState::Exhausted);
    assert_eq!(section.items()[6].id, 200);

    assert_eq!(section.load_next_page().await.unwrap(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn tv_trailers_are_filtered_to_playable() {
    let (base, _) = spawn_upstream().await;
    let client = client(&base, Some(API_KEY));

    let trailers = fetch_trailers(&client, MediaKind::Series, 1396).await;
    assert_eq!(trailers.len(), 1);
    assert_eq!(trailers[0].key, "HhesaQXLuRY");
}
