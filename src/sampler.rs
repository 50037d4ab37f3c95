/*!
# Sampler
Draws the requested number of records from each subtype's candidate list, uniformly at random and without replacement.
Draws for different subtypes are independent; the union of all draws is the set of records kept in the output.
*/
use indexmap::IndexMap;
use log::{debug, info};
use rand::Rng;
use rustc_hash::FxHashSet as HashSet;

use crate::catalogue::Catalogue;
use crate::data_types::event_subtype::{EventSubtype, SelectionRequest};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SamplingError {
    #[error("too few events of type {subtype}: requested {requested}, found {available}")]
    InsufficientEvents { subtype: EventSubtype, requested: usize, available: usize },
    #[error("{subtype} was requested but is missing from the catalogue")]
    MissingSubtype { subtype: EventSubtype }
}

/// The outcome of drawing from a single subtype
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubtypeDraw {
    /// Number of candidates that were available
    available: usize,
    /// The drawn record indices, sorted ascending
    selected: Vec<usize>
}

impl SubtypeDraw {
    // getters
    pub fn available(&self) -> usize {
        self.available
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }
}

/// All draws, in request order, along with the union of the selected record indices
#[derive(Clone, Debug, Default)]
pub struct Selection {
    /// Per-subtype draws
    draws: IndexMap<EventSubtype, SubtypeDraw>,
    /// Union of every drawn index, used for membership checks in the output pass
    selected_indices: HashSet<usize>
}

impl Selection {
    /// Returns true if the record at `record_index` was selected
    pub fn contains(&self, record_index: usize) -> bool {
        self.selected_indices.contains(&record_index)
    }

    /// Total number of selected records
    pub fn len(&self) -> usize {
        self.selected_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_indices.is_empty()
    }

    /// Iterates over (subtype, draw) in request order
    pub fn draws(&self) -> impl Iterator<Item = (&EventSubtype, &SubtypeDraw)> {
        self.draws.iter()
    }
}

/// Picks `count` distinct entries from `candidates`, each combination equally likely.
/// Repeatedly draws a random position in the remaining list and moves that entry into the output.
/// The returned entries are sorted ascending.
/// # Arguments
/// * `candidates` - the pool to draw from; consumed
/// * `count` - number of entries to draw, must be <= `candidates.len()`
/// * `rng` - the random number generator
/// # Panics
/// * if `count` is larger than the candidate pool
pub fn sample_without_replacement<R: Rng>(mut candidates: Vec<usize>, count: usize, rng: &mut R) -> Vec<usize> {
    assert!(count <= candidates.len(), "cannot draw {count} entries from {}", candidates.len());
    let mut selected = Vec::with_capacity(count);
    for _ in 0..count {
        let position = rng.gen_range(0..candidates.len());
        // remaining order is irrelevant, so the O(1) removal is fine
        selected.push(candidates.swap_remove(position));
    }
    selected.sort_unstable();
    selected
}

/// Draws the requested number of records for each request.
/// The catalogue is consumed since each candidate list is drawn down in place.
/// # Arguments
/// * `catalogue` - candidate indices per subtype from the classification pass
/// * `requests` - the subtypes and counts to draw
/// * `rng` - the random number generator
/// # Errors
/// * if any subtype has fewer candidates than requested; nothing is drawn in that case
pub fn sample_catalogue<R: Rng>(catalogue: Catalogue, requests: &[SelectionRequest], rng: &mut R) -> Result<Selection, SamplingError> {
    let mut candidates = catalogue.into_candidates();

    // check everything up front so a failure never leaves a half-made selection behind
    for request in requests.iter() {
        let subtype = *request.subtype();
        let available = candidates.get(&subtype)
            .ok_or(SamplingError::MissingSubtype { subtype })?
            .len();
        if available < request.count() {
            return Err(SamplingError::InsufficientEvents { subtype, requested: request.count(), available });
        }
    }

    let mut selection = Selection::default();
    for request in requests.iter() {
        let subtype = *request.subtype();
        let pool = candidates.swap_remove(&subtype)
            .ok_or(SamplingError::MissingSubtype { subtype })?;
        let available = pool.len();
        let selected = sample_without_replacement(pool, request.count(), rng);
        info!("Selected {} of {available} for {subtype}", selected.len());
        debug!("\tIndices: {selected:?}");

        selection.selected_indices.extend(selected.iter().copied());
        selection.draws.insert(subtype, SubtypeDraw { available, selected });
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_types::events::{EventKind, EventRecord};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn request(kind: EventKind, min: usize, max: usize, count: usize) -> SelectionRequest {
        SelectionRequest::new(EventSubtype::new(kind, min, max).unwrap(), count).unwrap()
    }

    /// Builds a catalogue from a list of (kind, size) records
    fn mock_catalogue(requests: &[SelectionRequest], records: &[(EventKind, usize)]) -> Catalogue {
        let mut catalogue = Catalogue::new(requests);
        for (i, &(kind, size)) in records.iter().enumerate() {
            catalogue.add_record(i, &EventRecord::new(kind, size).unwrap());
        }
        catalogue
    }

    #[test]
    fn test_sample_distinct() {
        let mut rng = SmallRng::seed_from_u64(0);
        let candidates: Vec<usize> = (100..120).collect();
        for count in 0..=candidates.len() {
            let selected = sample_without_replacement(candidates.clone(), count, &mut rng);
            assert_eq!(selected.len(), count);
            let unique: HashSet<usize> = selected.iter().copied().collect();
            assert_eq!(unique.len(), count);
            assert!(selected.iter().all(|i| candidates.contains(i)));
            assert!(selected.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn test_sample_all() {
        let mut rng = SmallRng::seed_from_u64(1);
        let selected = sample_without_replacement(vec![9, 3, 7, 1], 4, &mut rng);
        assert_eq!(selected, vec![1, 3, 7, 9]);
    }

    #[test]
    fn test_sample_uniform() {
        let mut rng = SmallRng::seed_from_u64(42);
        let n = 10;
        let k = 3;
        let trials = 20000;
        let mut counts = vec![0usize; n];
        for _ in 0..trials {
            for i in sample_without_replacement((0..n).collect(), k, &mut rng) {
                counts[i] += 1;
            }
        }

        let expected = k as f64 / n as f64;
        for (i, &c) in counts.iter().enumerate() {
            let frequency = c as f64 / trials as f64;
            assert!((frequency - expected).abs() < 0.02, "index {i}: {frequency} vs {expected}");
        }
    }

    #[test]
    fn test_sample_reproducible() {
        let candidates: Vec<usize> = (0..1000).collect();
        let first = sample_without_replacement(candidates.clone(), 10, &mut SmallRng::seed_from_u64(7));
        let second = sample_without_replacement(candidates, 10, &mut SmallRng::seed_from_u64(7));
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_catalogue() {
        let requests = vec![
            request(EventKind::Insertion, 1, 5, 2),
            request(EventKind::Deletion, 1, 5, 1),
        ];
        let records = vec![
            (EventKind::Insertion, 3),
            (EventKind::Deletion, 4),
            (EventKind::Insertion, 3),
            (EventKind::Unknown, 1),
            (EventKind::Insertion, 3),
            (EventKind::Deletion, 4),
        ];
        let catalogue = mock_catalogue(&requests, &records);
        let mut rng = SmallRng::seed_from_u64(3);
        let selection = sample_catalogue(catalogue, &requests, &mut rng).unwrap();

        assert_eq!(selection.len(), 3);
        let draws: Vec<(&EventSubtype, &SubtypeDraw)> = selection.draws().collect();
        assert_eq!(draws[0].0, requests[0].subtype());
        assert_eq!(draws[0].1.available(), 3);
        assert!(draws[0].1.selected().iter().all(|i| [0, 2, 4].contains(i)));
        assert_eq!(draws[1].1.available(), 2);
        assert!(draws[1].1.selected().iter().all(|i| [1, 5].contains(i)));
        assert!(!selection.contains(3));
    }

    #[test]
    fn test_insufficient_events() {
        let requests = vec![request(EventKind::Insertion, 1, 5, 3)];
        let catalogue = mock_catalogue(&requests, &[(EventKind::Insertion, 2), (EventKind::Insertion, 5), (EventKind::Insertion, 6)]);
        let mut rng = SmallRng::seed_from_u64(0);
        let result = sample_catalogue(catalogue, &requests, &mut rng);
        assert_eq!(result.unwrap_err(), SamplingError::InsufficientEvents {
            subtype: *requests[0].subtype(), requested: 3, available: 2
        });
    }

    #[test]
    fn test_missing_subtype() {
        let requests = vec![request(EventKind::Insertion, 1, 5, 1)];
        let other = vec![request(EventKind::Deletion, 1, 5, 1)];
        let catalogue = mock_catalogue(&other, &[(EventKind::Deletion, 2)]);
        let mut rng = SmallRng::seed_from_u64(0);
        assert!(matches!(sample_catalogue(catalogue, &requests, &mut rng), Err(SamplingError::MissingSubtype { .. })));
    }
}
