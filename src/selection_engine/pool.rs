//! A puzzle pool shared between concurrent callers.
//!
//! Filtering, drawing and marking happen under one lock, so two callers can
//! never both receive the same puzzle.

use std::sync::Arc;

use parking_lot::Mutex;
use rand::Rng;

use crate::selection_engine::{
    error::SelectionError,
    models::{validate_pool, Puzzle, ThemeRatings},
    orchestrator::Selector,
};

#[derive(Debug, Clone, Default)]
pub struct SharedPuzzlePool {
    inner: Arc<Mutex<Vec<Puzzle>>>,
}

impl SharedPuzzlePool {
    /// Wrap a validated pool.
    pub fn new(puzzles: Vec<Puzzle>) -> Result<Self, SelectionError> {
        validate_pool(&puzzles)?;
        Ok(Self {
            inner: Arc::new(Mutex::new(puzzles)),
        })
    }

    pub fn next_puzzle<R: Rng + ?Sized>(
        &self,
        selector: &Selector,
        ratings: &ThemeRatings,
        rng: &mut R,
    ) -> Result<Option<Puzzle>, SelectionError> {
        let mut pool = self.inner.lock();
        selector.next_puzzle(ratings, &mut pool, rng)
    }

    pub fn pick_for_theme<R: Rng + ?Sized>(
        &self,
        selector: &Selector,
        theme: &str,
        ratings: &ThemeRatings,
        rng: &mut R,
    ) -> Result<Option<Puzzle>, SelectionError> {
        let mut pool = self.inner.lock();
        selector.pick_for_theme(theme, &mut pool, ratings, rng)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Number of puzzles not yet handed out.
    pub fn available(&self) -> usize {
        self.inner.lock().iter().filter(|p| !p.used).count()
    }

    /// Make every puzzle selectable again.
    pub fn reset_used(&self) {
        for puzzle in self.inner.lock().iter_mut() {
            puzzle.used = false;
        }
    }

    /// Copy of the current pool, used flags included, for persisting.
    pub fn snapshot(&self) -> Vec<Puzzle> {
        self.inner.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn clones_share_used_flags() {
        let pool = SharedPuzzlePool::new(vec![Puzzle::new("a", 1500, 0.5, ["fork"]).unwrap()]).unwrap();
        let other = pool.clone();
        let ratings: ThemeRatings = [("fork".to_string(), 1500)].into_iter().collect();
        let mut rng = StdRng::seed_from_u64(1);

        assert!(pool.next_puzzle(&Selector::default(), &ratings, &mut rng).unwrap().is_some());
        assert_eq!(other.available(), 0);
        assert!(other.next_puzzle(&Selector::default(), &ratings, &mut rng).unwrap().is_none());

        other.reset_used();
        assert_eq!(pool.available(), 1);
        assert_eq!(pool.len(), 1);
        assert!(!pool.is_empty());
    }

    #[test]
    fn rejects_invalid_records() {
        let mut bad = Puzzle::new("a", 1500, 0.5, ["fork"]).unwrap();
        bad.popularity = -1.0;
        assert!(SharedPuzzlePool::new(vec![bad]).is_err());
    }
}
