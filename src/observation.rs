//! Synthetic observations and the rolling window that holds them

use chrono::{DateTime, SecondsFormat, Utc};
use rand::prelude::*;
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

/// Most recent observations kept by a window
pub const WINDOW_CAPACITY: usize = 51;

/// Country labels an observation can carry
pub const COUNTRIES: [&str; 7] = ["USA", "UK", "France", "Germany", "Japan", "Russia", "Ukraine"];

const ID_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 11;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Cui,
    Secret,
    TopSecret,
    Unclassified,
}

impl Classification {
    pub const ALL: [Classification; 4] = [
        Classification::Cui,
        Classification::Secret,
        Classification::TopSecret,
        Classification::Unclassified,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Cui => "cui",
            Classification::Secret => "secret",
            Classification::TopSecret => "topsecret",
            Classification::Unclassified => "unclassified",
        }
    }

    /// Uppercase badge text
    pub fn label(self) -> &'static str {
        match self {
            Classification::Cui => "CUI",
            Classification::Secret => "SECRET",
            Classification::TopSecret => "TOPSECRET",
            Classification::Unclassified => "UNCLASSIFIED",
        }
    }

    /// Position in `ALL`, also the lane index under the classification policy
    pub fn index(self) -> usize {
        match self {
            Classification::Cui => 0,
            Classification::Secret => 1,
            Classification::TopSecret => 2,
            Classification::Unclassified => 3,
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Observation {
    pub id: String,
    pub country: &'static str,
    pub coordinates: Coordinates,
    pub classification: Classification,
    pub timestamp: String,
}

/// Produces one random observation per call
pub struct ObservationGenerator {
    rng: StdRng,
}

impl ObservationGenerator {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        Self::new(rng)
    }

    pub fn generate(&mut self) -> Observation {
        self.generate_at(Utc::now())
    }

    pub fn generate_at(&mut self, now: DateTime<Utc>) -> Observation {
        let id: String = (0..ID_LEN)
            .map(|_| ID_ALPHABET[self.rng.gen_range(0..ID_ALPHABET.len())] as char)
            .collect();
        let country = COUNTRIES[self.rng.gen_range(0..COUNTRIES.len())];
        let coordinates = Coordinates {
            lat: self.rng.gen_range(-90.0..=90.0),
            long: self.rng.gen_range(-180.0..=180.0),
        };
        let classification = Classification::ALL[self.rng.gen_range(0..Classification::ALL.len())];

        Observation {
            id,
            country,
            coordinates,
            classification,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Bounded, insertion-ordered history of observations
#[derive(Default)]
pub struct RollingWindow {
    entries: VecDeque<Observation>,
    pushed: u64,
}

impl RollingWindow {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(WINDOW_CAPACITY),
            pushed: 0,
        }
    }

    pub fn push(&mut self, obs: Observation) {
        while self.entries.len() >= WINDOW_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(obs);
        self.pushed += 1;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Observation> {
        self.entries.iter()
    }

    pub fn iter_recent_first(&self) -> impl Iterator<Item = &Observation> {
        self.entries.iter().rev()
    }

    pub fn latest(&self) -> Option<&Observation> {
        self.entries.back()
    }

    /// Observations ever pushed, including evicted ones
    pub fn total_pushed(&self) -> u64 {
        self.pushed
    }

    /// Entries pushed after `seen` total pushes, oldest first.
    ///
    /// Anything already evicted is skipped.
    pub fn arrived_since(&self, seen: u64) -> impl Iterator<Item = &Observation> {
        let fresh = self.pushed.saturating_sub(seen).min(self.entries.len() as u64) as usize;
        self.entries.iter().skip(self.entries.len() - fresh)
    }

    pub fn count(&self, class: Classification) -> usize {
        self.entries.iter().filter(|o| o.classification == class).count()
    }
}
