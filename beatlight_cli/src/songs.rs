// On-disk song layout.
//
// Beat timelines live in `beats/TimeLine_<song>.json` and generated programs
// go to `effects/TimeLine_<song>.json`. A hand-annotated reference program,
// when there is one, sits in the working directory as
// `TimeLine_<song>_groundtruth.json`.

use std::io;
use std::path::{Path, PathBuf};

const PREFIX: &str = "TimeLine_";
const SUFFIX: &str = ".json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongLayout {
    pub beats_dir: PathBuf,
    pub effects_dir: PathBuf,
}

impl Default for SongLayout {
    fn default() -> Self {
        SongLayout {
            beats_dir: PathBuf::from("beats"),
            effects_dir: PathBuf::from("effects"),
        }
    }
}

fn file_name(song: &str) -> String {
    format!("{PREFIX}{song}{SUFFIX}")
}

impl SongLayout {
    pub fn beats_path(&self, song: &str) -> PathBuf {
        self.beats_dir.join(file_name(song))
    }

    pub fn effects_path(&self, song: &str) -> PathBuf {
        self.effects_dir.join(file_name(song))
    }

    /// Every song with a timeline in the beats folder, sorted by name.
    pub fn discover(&self) -> io::Result<Vec<String>> {
        let mut songs = Vec::new();
        for entry in std::fs::read_dir(&self.beats_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(song) = entry.file_name().to_str().and_then(song_name) {
                songs.push(song.to_string());
            }
        }
        songs.sort();
        Ok(songs)
    }
}

/// Default location of a song's reference program.
pub fn groundtruth_path(song: &str) -> PathBuf {
    PathBuf::from(format!("{PREFIX}{song}_groundtruth{SUFFIX}"))
}

/// Song name from a `TimeLine_<song>.json` file name.
pub fn song_name(file_name: &str) -> Option<&str> {
    let song = file_name.strip_prefix(PREFIX)?.strip_suffix(SUFFIX)?;
    (!song.is_empty()).then_some(song)
}

/// Song name from a path, falling back to the file stem.
pub fn song_name_of(path: &Path) -> String {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    match song_name(name) {
        Some(song) => song.to_string(),
        None => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}
