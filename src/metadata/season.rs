//! Season ordering and the de-duplicating season container
//!
//! Seasons are identified, compared and de-duplicated by the pair
//! `(id, episode_count)` only. `SeasonSet` keeps its members sorted by
//! [`Season::compare`] and uses the very same comparator to reject duplicates.

use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;

/// A numbered season of a show together with its episode count.
#[derive(Debug, Clone, Copy)]
pub struct Season {
    /// The season number (0 is used by TMDB for specials)
    pub id: u32,
    /// Number of episodes in this season
    pub episode_count: u32,
}

impl Season {
    /// Creates a new season value
    pub fn new(id: u32, episode_count: u32) -> Self {
        Self { id, episode_count }
    }

    /// Structural equality on `(id, episode_count)`.
    pub fn equals(&self, other: &Season) -> bool {
        self.id == other.id && self.episode_count == other.episode_count
    }

    /// Three-way comparison: higher id first, then higher episode count first.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::cmp::Ordering;
    /// use tmdb_probe::Season;
    ///
    /// assert_eq!(Season::new(5, 16).compare(&Season::new(1, 8)), Ordering::Less);
    /// assert_eq!(Season::new(2, 13).compare(&Season::new(2, 7)), Ordering::Less);
    /// ```
    pub fn compare(&self, other: &Season) -> Ordering {
        if self.id == other.id {
            other.episode_count.cmp(&self.episode_count)
        } else {
            other.id.cmp(&self.id)
        }
    }
}

impl PartialEq for Season {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Season {}

impl PartialOrd for Season {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for Season {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

/// Sorted set of seasons, unique under [`Season::compare`].
///
/// Iteration always follows the comparator order, independent of the
/// order in which seasons were inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeasonSet {
    seasons: Vec<Season>,
}

impl SeasonSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a season at its sorted position.
    ///
    /// Returns `false` and leaves the set untouched if a season comparing
    /// equal is already present.
    pub fn insert(&mut self, season: Season) -> bool {
        match self
            .seasons
            .binary_search_by(|probe| probe.compare(&season))
        {
            Ok(_) => false,
            Err(position) => {
                self.seasons.insert(position, season);
                true
            }
        }
    }

    /// Number of distinct seasons
    pub fn len(&self) -> usize {
        self.seasons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }

    /// Iterates in comparator order (highest season number first)
    pub fn iter(&self) -> std::slice::Iter<'_, Season> {
        self.seasons.iter()
    }

    /// Returns the first season with the given number.
    pub fn get(&self, id: u32) -> Option<&Season> {
        self.seasons.iter().find(|season| season.id == id)
    }
}

impl FromIterator<Season> for SeasonSet {
    fn from_iter<I: IntoIterator<Item = Season>>(iter: I) -> Self {
        let mut set = SeasonSet::new();
        for season in iter {
            set.insert(season);
        }
        set
    }
}

impl IntoIterator for SeasonSet {
    type Item = Season;
    type IntoIter = std::vec::IntoIter<Season>;

    fn into_iter(self) -> Self::IntoIter {
        self.seasons.into_iter()
    }
}

impl<'a> IntoIterator for &'a SeasonSet {
    type Item = &'a Season;
    type IntoIter = std::slice::Iter<'a, Season>;

    fn into_iter(self) -> Self::IntoIter {
        self.seasons.iter()
    }
}

impl<'de> Deserialize<'de> for SeasonSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let seasons = Vec::<super::tmdb_types::TmdbSeason>::deserialize(deserializer)?;
        Ok(seasons.into_iter().map(Season::from).collect())
    }
}
