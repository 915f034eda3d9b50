//! Filename and directory-layout parsing for provider lookups.
//!
//! Providers search by text, so the first step of every lookup is turning a
//! file path into search terms. Conventions handled:
//!
//! - Movies: `Title (Year).mkv`, `Title.Year.1080p.x264.mkv`
//! - TV: `Show - S01E02 - Name.mkv`, `Show/Season 01/S01E02.mkv`, `Show 1x02.mkv`
//! - Music: `Artist/Album/01 - Track.flac`
//!
//! Pure functions, no I/O.

use std::path::Path;

/// Search terms extracted from a movie filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub title: String,
    pub year: Option<i32>,
}

/// Search terms extracted from a TV episode path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeQuery {
    pub show: String,
    pub season: i64,
    pub episode: i64,
}

/// Search terms extracted from a music file path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumQuery {
    pub artist: Option<String>,
    pub album: String,
    /// Track number parsed from a leading `NN` in the filename
    pub track_number: Option<i64>,
    /// Track title remainder of the filename
    pub track_title: String,
}

/// Release-tag tokens that end the useful part of a movie title.
const NOISE_TOKENS: &[&str] = &[
    "1080p", "720p", "2160p", "480p", "x264", "x265", "h264", "h265", "hevc", "bluray", "brrip",
    "bdrip", "webrip", "webdl", "web-dl", "hdtv", "dvdrip", "remux", "hdr", "proper", "repack",
    "extended", "unrated", "remastered",
];

/// Parse movie search terms from a filename.
///
/// Returns `None` only for pathless inputs; an unparseable stem still
/// yields a best-effort title so the provider search gets a chance.
pub fn movie_query(path: &Path) -> Option<MovieQuery> {
    let stem = path.file_stem()?.to_str()?;
    let cleaned = clean_separators(stem);
    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    // Prefer a parenthesized (Year); otherwise the last bare year token,
    // as long as it isn't the whole title ("2012.mkv").
    let mut year = None;
    let mut title_end = tokens.len();
    for (i, tok) in tokens.iter().enumerate() {
        if let Some(y) = parse_year(tok.trim_matches(|c| c == '(' || c == ')')) {
            let parenthesized = tok.starts_with('(');
            if parenthesized || i > 0 {
                year = Some(y);
                title_end = i;
            }
        }
    }

    // Cut at the first release-noise token as well.
    for (i, tok) in tokens.iter().enumerate().take(title_end) {
        if NOISE_TOKENS.contains(&tok.to_lowercase().as_str()) {
            title_end = i;
            break;
        }
    }

    let title = tokens[..title_end.max(1)].join(" ");
    Some(MovieQuery { title, year })
}

/// Parse TV episode search terms from a path.
///
/// Returns `None` when no `SxxEyy` / `NxNN` marker is present anywhere in
/// the filename.
pub fn episode_query(path: &Path) -> Option<EpisodeQuery> {
    let stem = path.file_stem()?.to_str()?;
    let (marker_start, season, episode) = find_episode_marker(stem)?;

    let prefix = clean_separators(&stem[..marker_start]);
    let prefix = prefix.trim().trim_end_matches('-').trim();

    let show = if prefix.is_empty() {
        show_from_ancestors(path)?
    } else {
        prefix.to_string()
    };

    Some(EpisodeQuery {
        show,
        season,
        episode,
    })
}

/// Parse album search terms from a `Artist/Album/NN Track.ext` layout.
pub fn album_query(path: &Path) -> Option<AlbumQuery> {
    let stem = path.file_stem()?.to_str()?;
    let album_dir = path.parent()?.file_name()?.to_str()?.to_string();
    let artist = path
        .parent()
        .and_then(|p| p.parent())
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(|s| s.to_string());

    let cleaned = clean_separators(stem);
    let trimmed = cleaned.trim();

    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    let (track_number, rest) = if digits.is_empty() {
        (None, trimmed)
    } else {
        (digits.parse::<i64>().ok(), trimmed[digits.len()..].trim())
    };
    let track_title = rest.trim_start_matches('-').trim().to_string();

    Some(AlbumQuery {
        artist,
        album: album_dir,
        track_number,
        track_title,
    })
}

/// Replace dot/underscore separators with spaces, collapsing runs.
fn clean_separators(s: &str) -> String {
    let replaced: String = s
        .chars()
        .map(|c| if c == '.' || c == '_' { ' ' } else { c })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_year(tok: &str) -> Option<i32> {
    if tok.len() == 4 && tok.chars().all(|c| c.is_ascii_digit()) {
        let y: i32 = tok.parse().ok()?;
        (1900..=2099).contains(&y).then_some(y)
    } else {
        None
    }
}

/// Locate an `SxxEyy` or `NxNN` marker; returns (byte offset, season, episode).
///
/// ASCII-lowercases the stem so the returned offset indexes the original
/// string unchanged (Unicode lowercasing can alter byte lengths).
fn find_episode_marker(stem: &str) -> Option<(usize, i64, i64)> {
    let lower = stem.to_ascii_lowercase();
    let bytes = lower.as_bytes();

    for i in 0..bytes.len() {
        // SxxEyy
        if bytes[i] == b's' {
            if let Some((season, after)) = take_digits(bytes, i + 1) {
                if after < bytes.len() && bytes[after] == b'e' {
                    if let Some((episode, _)) = take_digits(bytes, after + 1) {
                        return Some((i, season, episode));
                    }
                }
            }
        }
        // NxNN (digit boundary on the left so "2x03" in "Show 2x03" matches)
        if bytes[i].is_ascii_digit() && (i == 0 || !bytes[i - 1].is_ascii_digit()) {
            if let Some((season, after)) = take_digits(bytes, i) {
                if after < bytes.len() && bytes[after] == b'x' {
                    if let Some((episode, _)) = take_digits(bytes, after + 1) {
                        return Some((i, season, episode));
                    }
                }
            }
        }
    }
    None
}

/// Parse a run of up to 4 digits starting at `start`; returns (value, end).
fn take_digits(bytes: &[u8], start: usize) -> Option<(i64, usize)> {
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() && end - start < 4 {
        end += 1;
    }
    if end == start {
        return None;
    }
    let value = std::str::from_utf8(&bytes[start..end]).ok()?.parse().ok()?;
    Some((value, end))
}

/// Derive the show name from the directory layout when the filename is bare
/// (`Show/Season 01/S01E02.mkv`): skip a `Season NN`-style parent.
fn show_from_ancestors(path: &Path) -> Option<String> {
    let parent = path.parent()?.file_name()?.to_str()?;
    let looks_like_season = parent.to_lowercase().starts_with("season")
        || parent.chars().all(|c| c.is_ascii_digit());
    if looks_like_season {
        path.parent()?
            .parent()?
            .file_name()?
            .to_str()
            .map(|s| s.to_string())
    } else {
        Some(parent.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_with_parenthesized_year() {
        let q = movie_query(Path::new("/movies/Heat (1995).mkv")).unwrap();
        assert_eq!(q.title, "Heat");
        assert_eq!(q.year, Some(1995));
    }

    #[test]
    fn test_movie_with_dotted_release_name() {
        let q = movie_query(Path::new("/movies/The.Thing.1982.1080p.BluRay.x264.mkv")).unwrap();
        assert_eq!(q.title, "The Thing");
        assert_eq!(q.year, Some(1982));
    }

    #[test]
    fn test_movie_noise_cut_without_year() {
        let q = movie_query(Path::new("/movies/Some.Film.1080p.WEBRip.mkv")).unwrap();
        assert_eq!(q.title, "Some Film");
        assert_eq!(q.year, None);
    }

    #[test]
    fn test_movie_title_that_is_a_year() {
        let q = movie_query(Path::new("/movies/2012.mkv")).unwrap();
        assert_eq!(q.title, "2012");
        assert_eq!(q.year, None);
    }

    #[test]
    fn test_episode_with_inline_show_name() {
        let q = episode_query(Path::new("/tv/Severance - S02E05 - Trojan's Horse.mkv")).unwrap();
        assert_eq!(q.show, "Severance");
        assert_eq!(q.season, 2);
        assert_eq!(q.episode, 5);
    }

    #[test]
    fn test_episode_from_directory_layout() {
        let q = episode_query(Path::new("/tv/The Wire/Season 03/S03E11.mkv")).unwrap();
        assert_eq!(q.show, "The Wire");
        assert_eq!(q.season, 3);
        assert_eq!(q.episode, 11);
    }

    #[test]
    fn test_episode_nxnn_marker() {
        let q = episode_query(Path::new("/tv/Deadwood 2x03.mkv")).unwrap();
        assert_eq!(q.show, "Deadwood");
        assert_eq!(q.season, 2);
        assert_eq!(q.episode, 3);
    }

    #[test]
    fn test_non_episode_returns_none() {
        assert!(episode_query(Path::new("/tv/Making Of.mkv")).is_none());
    }

    #[test]
    fn test_episode_with_non_ascii_show_name() {
        let q = episode_query(Path::new("/tv/Les Revenants - S01E03.mkv")).unwrap();
        assert_eq!(q.show, "Les Revenants");

        let q = episode_query(Path::new("/tv/Für Elise - S01E01.mkv")).unwrap();
        assert_eq!(q.show, "Für Elise");
        assert_eq!(q.season, 1);
    }

    #[test]
    fn test_album_layout() {
        let q = album_query(Path::new("/music/Bowie/Low/01 - Speed of Life.flac")).unwrap();
        assert_eq!(q.artist.as_deref(), Some("Bowie"));
        assert_eq!(q.album, "Low");
        assert_eq!(q.track_number, Some(1));
        assert_eq!(q.track_title, "Speed of Life");
    }

    #[test]
    fn test_album_without_track_number() {
        let q = album_query(Path::new("/music/Bowie/Low/Speed of Life.flac")).unwrap();
        assert_eq!(q.track_number, None);
        assert_eq!(q.track_title, "Speed of Life");
    }
}
