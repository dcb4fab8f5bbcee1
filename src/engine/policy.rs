//! Question selection policies.
//!
//! When several faults remain and several questions are still unasked, the
//! engine delegates the choice to a [`QuestionPolicy`]. The default picks
//! uniformly at random; it does not weigh questions by how well they split
//! the candidates.

use crate::knowledge::KnowledgeBase;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Mutex, PoisonError};

/// Chooses the next question to ask.
pub trait QuestionPolicy: Send + Sync {
    /// Pick one tag from `unasked`, which is never empty and sorted.
    ///
    /// Returning `None` ends questioning; the engine then reports the
    /// remaining candidates as ambiguous.
    fn select<'a>(
        &self,
        catalog: &KnowledgeBase,
        candidates: &[usize],
        unasked: &[&'a str],
    ) -> Option<&'a str>;
}

impl<P: QuestionPolicy + ?Sized> QuestionPolicy for Box<P> {
    fn select<'a>(
        &self,
        catalog: &KnowledgeBase,
        candidates: &[usize],
        unasked: &[&'a str],
    ) -> Option<&'a str> {
        (**self).select(catalog, candidates, unasked)
    }
}

/// Uniform random choice among unasked questions.
#[derive(Debug, Default)]
pub struct RandomQuestionPolicy {
    seeded: Option<Mutex<StdRng>>,
}

impl RandomQuestionPolicy {
    /// Draw from the thread-local generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw from a generator seeded with `seed`, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            seeded: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }
}

impl QuestionPolicy for RandomQuestionPolicy {
    fn select<'a>(
        &self,
        _catalog: &KnowledgeBase,
        _candidates: &[usize],
        unasked: &[&'a str],
    ) -> Option<&'a str> {
        match &self.seeded {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(PoisonError::into_inner);
                unasked.choose(&mut *rng).copied()
            }
            None => unasked.choose(&mut rand::thread_rng()).copied(),
        }
    }
}

/// Always asks the first unasked question in tag order.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderedQuestionPolicy;

impl QuestionPolicy for OrderedQuestionPolicy {
    fn select<'a>(
        &self,
        _catalog: &KnowledgeBase,
        _candidates: &[usize],
        unasked: &[&'a str],
    ) -> Option<&'a str> {
        unasked.first().copied()
    }
}
