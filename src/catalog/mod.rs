//! Catalog persistence for movies, TV shows, albums, and the
//! not-available registry.
//!
//! Uses SQLx with SQLite for lightweight, embedded storage. Top-level
//! entities upsert keyed by their external provider id; deletes are keyed
//! by `fs_path` and are idempotent (deleting an absent row is a no-op).
//! Nested entities (genres, seasons, songs, ...) are upserted by their own
//! external ids inside the same transaction as their owning entity.

use std::collections::HashSet;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};

use crate::enrichment::domain::{EnrichedAlbum, EnrichedMovie, EnrichedTvShow};
use crate::model::{Album, Artist, Episode, MediaKind, Movie, NotAvailable, Season, Song, TvShow};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "media_minder.db";

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist, establishes a connection
/// pool with up to 5 connections, and runs all pending migrations. Foreign
/// keys are enabled on every connection; join rows and nested entities
/// cascade when their owner is deleted.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the connection cannot be
/// established, or a migration fails.
pub async fn init_db(db_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(db_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

// ============================================================================
// Path listings
// ============================================================================

/// All `fs_path` values known to the catalog, across movies, episodes, and
/// songs. This is the "catalogKnown" universe of a reconciliation pass.
pub async fn list_catalog_paths(pool: &SqlitePool) -> sqlx::Result<HashSet<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT fs_path FROM movies
        UNION ALL
        SELECT fs_path FROM episodes WHERE fs_path IS NOT NULL
        UNION ALL
        SELECT fs_path FROM songs WHERE fs_path IS NOT NULL
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(p,)| p).collect())
}

/// All paths currently flagged not-available.
pub async fn list_not_available_paths(pool: &SqlitePool) -> sqlx::Result<HashSet<String>> {
    let rows: Vec<(String,)> = sqlx::query_as("SELECT fs_path FROM not_available")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(p,)| p).collect())
}

/// Full not-available entries, for operator listings.
pub async fn list_not_available(pool: &SqlitePool) -> sqlx::Result<Vec<NotAvailable>> {
    sqlx::query_as::<_, NotAvailable>("SELECT fs_path, kind FROM not_available ORDER BY fs_path")
        .fetch_all(pool)
        .await
}

// ============================================================================
// Not-available registry
// ============================================================================

/// Record a path whose enrichment failed. Idempotent upsert keyed by path.
pub async fn upsert_not_available(
    pool: &SqlitePool,
    kind: MediaKind,
    fs_path: &str,
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO not_available (fs_path, kind)
        VALUES (?, ?)
        ON CONFLICT(fs_path) DO UPDATE SET kind = excluded.kind
        "#,
    )
    .bind(fs_path)
    .bind(kind.as_str())
    .execute(pool)
    .await?;
    Ok(())
}

/// Remove a path from the registry. Returns whether a row existed.
pub async fn delete_not_available(pool: &SqlitePool, fs_path: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM not_available WHERE fs_path = ?")
        .bind(fs_path)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Movie upsert/delete
// ============================================================================

/// Insert or update a movie and its nested collections.
///
/// Runs in one transaction: the movie row is keyed by tmdb_id, nested
/// genres/companies/credits/similar are upserted by their own external ids,
/// and the movie's links to them are refreshed to match the record.
pub async fn upsert_movie(pool: &SqlitePool, movie: &EnrichedMovie) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO movies (tmdb_id, title, overview, release_date, runtime,
                            poster_path, backdrop_path, fs_path, added_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(tmdb_id) DO UPDATE SET
            title = excluded.title,
            overview = excluded.overview,
            release_date = excluded.release_date,
            runtime = excluded.runtime,
            poster_path = excluded.poster_path,
            backdrop_path = excluded.backdrop_path,
            fs_path = excluded.fs_path
        "#,
    )
    .bind(movie.tmdb_id)
    .bind(&movie.title)
    .bind(&movie.overview)
    .bind(&movie.release_date)
    .bind(movie.runtime)
    .bind(&movie.poster_path)
    .bind(&movie.backdrop_path)
    .bind(&movie.fs_path)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?;

    upsert_shared_refs(&mut tx, movie.tmdb_id, "movie", &movie.genres, &movie.companies,
        &movie.credits, &movie.similar).await?;

    tx.commit().await
}

/// Delete a movie by path. Returns whether a row existed.
pub async fn delete_movie_by_path(pool: &SqlitePool, fs_path: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM movies WHERE fs_path = ?")
        .bind(fs_path)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// TV show upsert/delete
// ============================================================================

/// Insert or update a TV show, its nested collections, and its seasons and
/// episodes, in one transaction.
///
/// Episode rows never lose an existing fs_path: syncing one episode file
/// upserts the whole season's episode list, and the other episodes on disk
/// keep the paths recorded when they were enriched.
pub async fn upsert_tv_show(pool: &SqlitePool, show: &EnrichedTvShow) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO tv_shows (tmdb_id, name, overview, first_air_date,
                              poster_path, backdrop_path, added_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(tmdb_id) DO UPDATE SET
            name = excluded.name,
            overview = excluded.overview,
            first_air_date = excluded.first_air_date,
            poster_path = excluded.poster_path,
            backdrop_path = excluded.backdrop_path
        "#,
    )
    .bind(show.tmdb_id)
    .bind(&show.name)
    .bind(&show.overview)
    .bind(&show.first_air_date)
    .bind(&show.poster_path)
    .bind(&show.backdrop_path)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?;

    upsert_shared_refs(&mut tx, show.tmdb_id, "show", &show.genres, &show.companies,
        &show.credits, &show.similar).await?;

    for season in &show.seasons {
        sqlx::query(
            r#"
            INSERT INTO seasons (tmdb_id, show_tmdb_id, season_number, name, overview, poster_path)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(tmdb_id) DO UPDATE SET
                season_number = excluded.season_number,
                name = excluded.name,
                overview = excluded.overview,
                poster_path = excluded.poster_path
            "#,
        )
        .bind(season.tmdb_id)
        .bind(show.tmdb_id)
        .bind(season.season_number)
        .bind(&season.name)
        .bind(&season.overview)
        .bind(&season.poster_path)
        .execute(&mut *tx)
        .await?;

        for episode in &season.episodes {
            sqlx::query(
                r#"
                INSERT INTO episodes (tmdb_id, season_tmdb_id, episode_number, name,
                                      overview, air_date, still_path, fs_path)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(tmdb_id) DO UPDATE SET
                    episode_number = excluded.episode_number,
                    name = excluded.name,
                    overview = excluded.overview,
                    air_date = excluded.air_date,
                    still_path = excluded.still_path,
                    fs_path = COALESCE(excluded.fs_path, episodes.fs_path)
                "#,
            )
            .bind(episode.tmdb_id)
            .bind(season.tmdb_id)
            .bind(episode.episode_number)
            .bind(&episode.name)
            .bind(&episode.overview)
            .bind(&episode.air_date)
            .bind(&episode.still_path)
            .bind(&episode.fs_path)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await
}

/// Delete an episode by path. Returns whether a row existed.
///
/// Only the episode row goes; the show and season survive until their last
/// episode on disk is gone (they carry no fs_path, so they never appear in
/// a diff's delete set).
pub async fn delete_episode_by_path(pool: &SqlitePool, fs_path: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM episodes WHERE fs_path = ?")
        .bind(fs_path)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Album upsert/delete
// ============================================================================

/// Insert or update an album, its artists, and its songs, in one
/// transaction. Song rows keep an existing fs_path like episode rows do.
pub async fn upsert_album(pool: &SqlitePool, album: &EnrichedAlbum) -> sqlx::Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO albums (spotify_id, name, release_date, total_tracks, image_url, added_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(spotify_id) DO UPDATE SET
            name = excluded.name,
            release_date = excluded.release_date,
            total_tracks = excluded.total_tracks,
            image_url = excluded.image_url
        "#,
    )
    .bind(&album.spotify_id)
    .bind(&album.name)
    .bind(&album.release_date)
    .bind(album.total_tracks)
    .bind(&album.image_url)
    .bind(chrono::Utc::now().to_rfc3339())
    .execute(&mut *tx)
    .await?;

    sqlx::query("DELETE FROM album_artists WHERE album_spotify_id = ?")
        .bind(&album.spotify_id)
        .execute(&mut *tx)
        .await?;

    for artist in &album.artists {
        sqlx::query(
            r#"
            INSERT INTO artists (spotify_id, name, image_url)
            VALUES (?, ?, ?)
            ON CONFLICT(spotify_id) DO UPDATE SET
                name = excluded.name,
                image_url = COALESCE(excluded.image_url, artists.image_url)
            "#,
        )
        .bind(&artist.spotify_id)
        .bind(&artist.name)
        .bind(&artist.image_url)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT OR IGNORE INTO album_artists (album_spotify_id, artist_spotify_id) VALUES (?, ?)")
            .bind(&album.spotify_id)
            .bind(&artist.spotify_id)
            .execute(&mut *tx)
            .await?;
    }

    for song in &album.songs {
        sqlx::query(
            r#"
            INSERT INTO songs (spotify_id, album_spotify_id, name, track_number, duration_ms, fs_path)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(spotify_id) DO UPDATE SET
                name = excluded.name,
                track_number = excluded.track_number,
                duration_ms = excluded.duration_ms,
                fs_path = COALESCE(excluded.fs_path, songs.fs_path)
            "#,
        )
        .bind(&song.spotify_id)
        .bind(&album.spotify_id)
        .bind(&song.name)
        .bind(song.track_number)
        .bind(song.duration_ms)
        .bind(&song.fs_path)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// Delete a song by path. Returns whether a row existed.
pub async fn delete_song_by_path(pool: &SqlitePool, fs_path: &str) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM songs WHERE fs_path = ?")
        .bind(fs_path)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Typed reads
// ============================================================================

/// Look up a movie by its file path.
pub async fn get_movie_by_path(pool: &SqlitePool, fs_path: &str) -> sqlx::Result<Option<Movie>> {
    sqlx::query_as::<_, Movie>(
        "SELECT tmdb_id, title, overview, release_date, runtime, poster_path, backdrop_path,
                fs_path, added_at
         FROM movies WHERE fs_path = ?",
    )
    .bind(fs_path)
    .fetch_optional(pool)
    .await
}

/// Look up a show by its TMDB id.
pub async fn get_show(pool: &SqlitePool, tmdb_id: i64) -> sqlx::Result<Option<TvShow>> {
    sqlx::query_as::<_, TvShow>(
        "SELECT tmdb_id, name, overview, first_air_date, poster_path, backdrop_path, added_at
         FROM tv_shows WHERE tmdb_id = ?",
    )
    .bind(tmdb_id)
    .fetch_optional(pool)
    .await
}

/// All seasons of a show, in season order.
pub async fn list_show_seasons(pool: &SqlitePool, show_tmdb_id: i64) -> sqlx::Result<Vec<Season>> {
    sqlx::query_as::<_, Season>(
        "SELECT tmdb_id, show_tmdb_id, season_number, name, overview, poster_path
         FROM seasons WHERE show_tmdb_id = ? ORDER BY season_number",
    )
    .bind(show_tmdb_id)
    .fetch_all(pool)
    .await
}

/// Look up an episode by its file path.
pub async fn get_episode_by_path(
    pool: &SqlitePool,
    fs_path: &str,
) -> sqlx::Result<Option<Episode>> {
    sqlx::query_as::<_, Episode>(
        "SELECT tmdb_id, season_tmdb_id, episode_number, name, overview, air_date, still_path,
                fs_path
         FROM episodes WHERE fs_path = ?",
    )
    .bind(fs_path)
    .fetch_optional(pool)
    .await
}

/// Look up an album by its Spotify id.
pub async fn get_album(pool: &SqlitePool, spotify_id: &str) -> sqlx::Result<Option<Album>> {
    sqlx::query_as::<_, Album>(
        "SELECT spotify_id, name, release_date, total_tracks, image_url, added_at
         FROM albums WHERE spotify_id = ?",
    )
    .bind(spotify_id)
    .fetch_optional(pool)
    .await
}

/// The artists credited on an album.
pub async fn list_album_artists(
    pool: &SqlitePool,
    album_spotify_id: &str,
) -> sqlx::Result<Vec<Artist>> {
    sqlx::query_as::<_, Artist>(
        "SELECT a.spotify_id, a.name, a.image_url
         FROM artists a
         JOIN album_artists aa ON aa.artist_spotify_id = a.spotify_id
         WHERE aa.album_spotify_id = ?
         ORDER BY a.name",
    )
    .bind(album_spotify_id)
    .fetch_all(pool)
    .await
}

/// Look up a song by its file path.
pub async fn get_song_by_path(pool: &SqlitePool, fs_path: &str) -> sqlx::Result<Option<Song>> {
    sqlx::query_as::<_, Song>(
        "SELECT spotify_id, album_spotify_id, name, track_number, duration_ms, fs_path
         FROM songs WHERE fs_path = ?",
    )
    .bind(fs_path)
    .fetch_optional(pool)
    .await
}

// ============================================================================
// Counts (for the status command)
// ============================================================================

/// Row counts per catalog table: (movies, shows, episodes on disk, albums,
/// songs on disk, not available).
pub async fn catalog_counts(pool: &SqlitePool) -> sqlx::Result<CatalogCounts> {
    let (movies,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies")
        .fetch_one(pool)
        .await?;
    let (shows,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tv_shows")
        .fetch_one(pool)
        .await?;
    let (episodes,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM episodes WHERE fs_path IS NOT NULL")
            .fetch_one(pool)
            .await?;
    let (albums,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM albums")
        .fetch_one(pool)
        .await?;
    let (songs,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM songs WHERE fs_path IS NOT NULL")
        .fetch_one(pool)
        .await?;
    let (not_available,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM not_available")
        .fetch_one(pool)
        .await?;

    Ok(CatalogCounts {
        movies,
        shows,
        episodes,
        albums,
        songs,
        not_available,
    })
}

/// Aggregate row counts for operator reporting.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogCounts {
    pub movies: i64,
    pub shows: i64,
    pub episodes: i64,
    pub albums: i64,
    pub songs: i64,
    pub not_available: i64,
}

// ============================================================================
// Shared nested-entity helpers
// ============================================================================

/// Upsert the four shared collections (genres, companies, credits, similar
/// titles) and refresh the owner's join rows. `owner` selects the join
/// table prefix ("movie" or "show").
async fn upsert_shared_refs(
    tx: &mut Transaction<'_, Sqlite>,
    owner_id: i64,
    owner: &str,
    genres: &[crate::enrichment::domain::GenreRef],
    companies: &[crate::enrichment::domain::CompanyRef],
    credits: &[crate::enrichment::domain::CreditRef],
    similar: &[crate::enrichment::domain::SimilarTitle],
) -> sqlx::Result<()> {
    let (genre_join, company_join, credit_join, similar_join, owner_col) = match owner {
        "movie" => (
            "movie_genres",
            "movie_companies",
            "movie_credits",
            "movie_similar",
            "movie_tmdb_id",
        ),
        _ => (
            "show_genres",
            "show_companies",
            "show_credits",
            "show_similar",
            "show_tmdb_id",
        ),
    };

    for table in [genre_join, company_join, credit_join, similar_join] {
        sqlx::query(&format!("DELETE FROM {table} WHERE {owner_col} = ?"))
            .bind(owner_id)
            .execute(&mut **tx)
            .await?;
    }

    for genre in genres {
        sqlx::query(
            "INSERT INTO genres (tmdb_id, name) VALUES (?, ?)
             ON CONFLICT(tmdb_id) DO UPDATE SET name = excluded.name",
        )
        .bind(genre.tmdb_id)
        .bind(&genre.name)
        .execute(&mut **tx)
        .await?;
        sqlx::query(&format!(
            "INSERT OR IGNORE INTO {genre_join} ({owner_col}, genre_tmdb_id) VALUES (?, ?)"
        ))
        .bind(owner_id)
        .bind(genre.tmdb_id)
        .execute(&mut **tx)
        .await?;
    }

    for company in companies {
        sqlx::query(
            "INSERT INTO companies (tmdb_id, name, logo_path) VALUES (?, ?, ?)
             ON CONFLICT(tmdb_id) DO UPDATE SET
                 name = excluded.name,
                 logo_path = COALESCE(excluded.logo_path, companies.logo_path)",
        )
        .bind(company.tmdb_id)
        .bind(&company.name)
        .bind(&company.logo_path)
        .execute(&mut **tx)
        .await?;
        sqlx::query(&format!(
            "INSERT OR IGNORE INTO {company_join} ({owner_col}, company_tmdb_id) VALUES (?, ?)"
        ))
        .bind(owner_id)
        .bind(company.tmdb_id)
        .execute(&mut **tx)
        .await?;
    }

    for credit in credits {
        sqlx::query(
            "INSERT INTO credits (credit_id, name, character, profile_path) VALUES (?, ?, ?, ?)
             ON CONFLICT(credit_id) DO UPDATE SET
                 name = excluded.name,
                 character = excluded.character,
                 profile_path = excluded.profile_path",
        )
        .bind(&credit.credit_id)
        .bind(&credit.name)
        .bind(&credit.character)
        .bind(&credit.profile_path)
        .execute(&mut **tx)
        .await?;
        sqlx::query(&format!(
            "INSERT OR IGNORE INTO {credit_join} ({owner_col}, credit_id) VALUES (?, ?)"
        ))
        .bind(owner_id)
        .bind(&credit.credit_id)
        .execute(&mut **tx)
        .await?;
    }

    for title in similar {
        sqlx::query(
            "INSERT INTO similar_titles (tmdb_id, title, poster_path) VALUES (?, ?, ?)
             ON CONFLICT(tmdb_id) DO UPDATE SET
                 title = excluded.title,
                 poster_path = COALESCE(excluded.poster_path, similar_titles.poster_path)",
        )
        .bind(title.tmdb_id)
        .bind(&title.title)
        .bind(&title.poster_path)
        .execute(&mut **tx)
        .await?;
        sqlx::query(&format!(
            "INSERT OR IGNORE INTO {similar_join} ({owner_col}, similar_tmdb_id) VALUES (?, ?)"
        ))
        .bind(owner_id)
        .bind(title.tmdb_id)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{sample_album, sample_movie, sample_show, temp_db};

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let (pool, dir) = temp_db().await;
        assert!(dir.path().join("test.db").exists());

        let paths = list_catalog_paths(&pool).await.unwrap();
        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn test_movie_upsert_and_path_listing() {
        let (pool, _dir) = temp_db().await;

        let movie = sample_movie(949, "/movies/Heat (1995).mkv");
        upsert_movie(&pool, &movie).await.unwrap();

        let paths = list_catalog_paths(&pool).await.unwrap();
        assert!(paths.contains("/movies/Heat (1995).mkv"));

        // re-upsert with changed metadata keeps one row
        let mut updated = movie.clone();
        updated.title = "Heat (Director's Cut)".to_string();
        upsert_movie(&pool, &updated).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movies")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);

        let row = get_movie_by_path(&pool, "/movies/Heat (1995).mkv")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.tmdb_id, 949);
        assert_eq!(row.title, "Heat (Director's Cut)");
    }

    #[tokio::test]
    async fn test_movie_delete_is_idempotent() {
        let (pool, _dir) = temp_db().await;
        upsert_movie(&pool, &sample_movie(1, "/movies/a.mkv"))
            .await
            .unwrap();

        assert!(delete_movie_by_path(&pool, "/movies/a.mkv").await.unwrap());
        // second delete is a no-op, not an error
        assert!(!delete_movie_by_path(&pool, "/movies/a.mkv").await.unwrap());
    }

    #[tokio::test]
    async fn test_movie_delete_drops_join_rows() {
        let (pool, _dir) = temp_db().await;
        upsert_movie(&pool, &sample_movie(1, "/movies/a.mkv"))
            .await
            .unwrap();
        delete_movie_by_path(&pool, "/movies/a.mkv").await.unwrap();

        let (links,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM movie_genres")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(links, 0);
        // the shared genre rows survive
        let (genres,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM genres")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(genres > 0);
    }

    #[tokio::test]
    async fn test_show_upsert_preserves_sibling_episode_paths() {
        let (pool, _dir) = temp_db().await;

        // first sync: episode 1 on disk
        let show = sample_show(10, 1, "/tv/Show/S01E01.mkv");
        upsert_tv_show(&pool, &show).await.unwrap();

        // second sync: episode 2 on disk; episode 1's stored path must survive
        let show = sample_show(10, 2, "/tv/Show/S01E02.mkv");
        upsert_tv_show(&pool, &show).await.unwrap();

        let paths = list_catalog_paths(&pool).await.unwrap();
        assert!(paths.contains("/tv/Show/S01E01.mkv"));
        assert!(paths.contains("/tv/Show/S01E02.mkv"));

        let row = get_show(&pool, 10).await.unwrap().unwrap();
        assert_eq!(row.name, "Show 10");
        let seasons = list_show_seasons(&pool, 10).await.unwrap();
        assert_eq!(seasons.len(), 1);
        assert_eq!(seasons[0].season_number, 1);

        let episode = get_episode_by_path(&pool, "/tv/Show/S01E02.mkv")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(episode.episode_number, 2);
        assert_eq!(episode.season_tmdb_id, seasons[0].tmdb_id);
    }

    #[tokio::test]
    async fn test_album_upsert_and_song_delete() {
        let (pool, _dir) = temp_db().await;

        let album = sample_album("al1", "/music/Artist/Album/01 - One.flac");
        upsert_album(&pool, &album).await.unwrap();

        let paths = list_catalog_paths(&pool).await.unwrap();
        assert!(paths.contains("/music/Artist/Album/01 - One.flac"));

        let row = get_album(&pool, "al1").await.unwrap().unwrap();
        assert_eq!(row.name, "Album al1");
        let artists = list_album_artists(&pool, "al1").await.unwrap();
        assert_eq!(artists.len(), 1);
        assert_eq!(artists[0].name, "Test Artist");

        let song = get_song_by_path(&pool, "/music/Artist/Album/01 - One.flac")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(song.track_number, Some(1));

        assert!(
            delete_song_by_path(&pool, "/music/Artist/Album/01 - One.flac")
                .await
                .unwrap()
        );
        let paths = list_catalog_paths(&pool).await.unwrap();
        assert!(paths.is_empty());
    }

    #[tokio::test]
    async fn test_not_available_registry_round_trip() {
        let (pool, _dir) = temp_db().await;

        upsert_not_available(&pool, MediaKind::Movie, "/movies/x.mkv")
            .await
            .unwrap();
        // idempotent re-record
        upsert_not_available(&pool, MediaKind::Movie, "/movies/x.mkv")
            .await
            .unwrap();

        let entries = list_not_available(&pool).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].fs_path, "/movies/x.mkv");
        assert_eq!(entries[0].kind, "movie");

        assert!(delete_not_available(&pool, "/movies/x.mkv").await.unwrap());
        assert!(!delete_not_available(&pool, "/movies/x.mkv").await.unwrap());
    }

    #[tokio::test]
    async fn test_catalog_counts() {
        let (pool, _dir) = temp_db().await;
        upsert_movie(&pool, &sample_movie(1, "/movies/a.mkv"))
            .await
            .unwrap();
        upsert_not_available(&pool, MediaKind::Song, "/music/b.flac")
            .await
            .unwrap();

        let counts = catalog_counts(&pool).await.unwrap();
        assert_eq!(counts.movies, 1);
        assert_eq!(counts.not_available, 1);
        assert_eq!(counts.albums, 0);
    }
}
