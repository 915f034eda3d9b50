//! Convert Spotify DTOs into domain types.

use super::dto;
use crate::enrichment::domain::{EnrichedAlbum, EnrichedArtist, EnrichedSong};
use crate::enrichment::naming::AlbumQuery;

/// Build an [`EnrichedAlbum`] from an album record, attaching `fs_path` to
/// the song that matches the file.
///
/// Matching prefers the parsed track number, falling back to a
/// case-insensitive title comparison. Returns `None` when no song matches;
/// the caller treats that as NotFound.
pub fn to_enriched_album(
    details: dto::AlbumDetails,
    query: &AlbumQuery,
    fs_path: &str,
) -> Option<EnrichedAlbum> {
    let matched_id = match_song(&details.tracks.items, query)?;

    let songs = details
        .tracks
        .items
        .into_iter()
        .map(|t| {
            let fs_path = (t.id == matched_id).then(|| fs_path.to_string());
            EnrichedSong {
                spotify_id: t.id,
                name: t.name,
                track_number: t.track_number,
                duration_ms: t.duration_ms,
                fs_path,
            }
        })
        .collect();

    Some(EnrichedAlbum {
        spotify_id: details.id,
        name: details.name,
        release_date: details.release_date,
        total_tracks: details.total_tracks,
        image_url: details.images.first().map(|i| i.url.clone()),
        artists: details
            .artists
            .into_iter()
            .map(|a| EnrichedArtist {
                spotify_id: a.id,
                name: a.name,
                image_url: None,
            })
            .collect(),
        songs,
    })
}

fn match_song(tracks: &[dto::TrackDto], query: &AlbumQuery) -> Option<String> {
    if let Some(number) = query.track_number {
        if let Some(t) = tracks.iter().find(|t| t.track_number == Some(number)) {
            return Some(t.id.clone());
        }
    }

    let wanted = query.track_title.to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    tracks
        .iter()
        .find(|t| {
            let name = t.name.to_lowercase();
            name == wanted || wanted.contains(&name) || name.contains(&wanted)
        })
        .map(|t| t.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn album_details() -> dto::AlbumDetails {
        serde_json::from_str(
            r#"{
                "id": "album1",
                "name": "Low",
                "release_date": "1977-01-14",
                "total_tracks": 2,
                "images": [{"url": "https://img/low", "width": 640, "height": 640}],
                "artists": [{"id": "artist1", "name": "David Bowie"}],
                "tracks": {"items": [
                    {"id": "t1", "name": "Speed of Life", "track_number": 1, "duration_ms": 166000},
                    {"id": "t2", "name": "Breaking Glass", "track_number": 2, "duration_ms": 112000}
                ]}
            }"#,
        )
        .unwrap()
    }

    fn query(number: Option<i64>, title: &str) -> AlbumQuery {
        AlbumQuery {
            artist: Some("David Bowie".to_string()),
            album: "Low".to_string(),
            track_number: number,
            track_title: title.to_string(),
        }
    }

    #[test]
    fn test_match_by_track_number() {
        let album = to_enriched_album(
            album_details(),
            &query(Some(2), "whatever"),
            "/music/Bowie/Low/02 - Breaking Glass.flac",
        )
        .unwrap();

        assert_eq!(album.spotify_id, "album1");
        assert_eq!(album.artists[0].name, "David Bowie");
        assert_eq!(album.songs[0].fs_path, None);
        assert_eq!(
            album.songs[1].fs_path.as_deref(),
            Some("/music/Bowie/Low/02 - Breaking Glass.flac")
        );
    }

    #[test]
    fn test_match_by_title_fallback() {
        let album = to_enriched_album(
            album_details(),
            &query(None, "speed of life"),
            "/music/Bowie/Low/Speed of Life.flac",
        )
        .unwrap();
        assert!(album.songs[0].fs_path.is_some());
    }

    #[test]
    fn test_no_match_is_none() {
        let album = to_enriched_album(
            album_details(),
            &query(Some(9), "Station to Station"),
            "/music/Bowie/Low/09.flac",
        );
        assert!(album.is_none());
    }
}
