//! Library root configuration and path classification.
//!
//! The three watched roots (movies, TV, music) must be pairwise distinct
//! and must not nest inside one another; this is validated once at startup
//! and lets `fs_path` double as a media-kind discriminator everywhere else.

use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::MediaKind;

/// The validated set of library roots.
///
/// Construction fails if any two roots are equal or one contains another,
/// so [`classify`](MediaRoots::classify) has at most one match per path.
#[derive(Debug, Clone)]
pub struct MediaRoots {
    movies: PathBuf,
    tv: PathBuf,
    music: PathBuf,
}

impl MediaRoots {
    /// Validate and build the root set. Fatal on overlap.
    pub fn new(
        movies: impl Into<PathBuf>,
        tv: impl Into<PathBuf>,
        music: impl Into<PathBuf>,
    ) -> Result<Self> {
        let movies = normalize(movies.into());
        let tv = normalize(tv.into());
        let music = normalize(music.into());

        let labelled = [("movies", &movies), ("tv", &tv), ("music", &music)];
        for (i, (name_a, a)) in labelled.iter().enumerate() {
            for (name_b, b) in labelled.iter().skip(i + 1) {
                if a == b {
                    return Err(Error::config(format!(
                        "{name_a} root and {name_b} root are the same directory: {}",
                        a.display()
                    )));
                }
                if a.starts_with(b) || b.starts_with(a) {
                    return Err(Error::config(format!(
                        "{name_a} root {} and {name_b} root {} must not nest",
                        a.display(),
                        b.display()
                    )));
                }
            }
        }

        Ok(Self { movies, tv, music })
    }

    /// Classify a path by which root it falls under.
    ///
    /// Pure prefix match; returns `None` for paths outside all three roots,
    /// which the engine silently excludes from processing.
    pub fn classify(&self, path: &Path) -> Option<MediaKind> {
        let path = normalize(path.to_path_buf());
        if path.starts_with(&self.movies) {
            Some(MediaKind::Movie)
        } else if path.starts_with(&self.tv) {
            Some(MediaKind::TvEpisode)
        } else if path.starts_with(&self.music) {
            Some(MediaKind::Song)
        } else {
            None
        }
    }

    /// The root directory for a given kind.
    pub fn root_for(&self, kind: MediaKind) -> &Path {
        match kind {
            MediaKind::Movie => &self.movies,
            MediaKind::TvEpisode => &self.tv,
            MediaKind::Song => &self.music,
        }
    }

    /// All three roots, for watcher registration.
    pub fn all(&self) -> [&Path; 3] {
        [&self.movies, &self.tv, &self.music]
    }
}

/// Strip `.` components and trailing separators so prefix checks compare
/// like with like. Does not touch the filesystem (no symlink resolution).
fn normalize(path: PathBuf) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
