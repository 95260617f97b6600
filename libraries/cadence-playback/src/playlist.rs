//! Ordered playlist with wrap-around navigation

use cadence_core::Song;

/// Ordered, index-addressable list of songs
///
/// Owned by the engine; consumers only ever see `&[Song]`.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    songs: Vec<Song>,
}

impl Playlist {
    pub fn new(songs: Vec<Song>) -> Self {
        Self { songs }
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn get(&self, index: usize) -> Option<&Song> {
        self.songs.get(index)
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn push(&mut self, song: Song) {
        self.songs.push(song);
    }

    /// Remove by index, returning the removed song
    pub fn remove(&mut self, index: usize) -> Option<Song> {
        (index < self.songs.len()).then(|| self.songs.remove(index))
    }

    /// Index after `index`, wrapping to the start
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let len = self.songs.len();
        (len > 0).then(|| (index % len + 1) % len)
    }

    /// Index before `index`, wrapping to the end
    pub fn previous_index(&self, index: usize) -> Option<usize> {
        let len = self.songs.len();
        (len > 0).then(|| (index % len + len - 1) % len)
    }

    /// Locate `song` in the playlist
    ///
    /// An id match anywhere in the list wins. Only when no entry shares the
    /// probe's id does the case-insensitive name+artist match apply, and only
    /// against entries where one side lacks an id.
    pub fn position_of(&self, song: &Song) -> Option<usize> {
        if let Some(id) = song.id() {
            if let Some(index) = self.songs.iter().position(|s| s.id() == Some(id)) {
                return Some(index);
            }
        }
        self.songs.iter().position(|s| s.is_same_track(song))
    }
}
