//! ## vigil-core::select
//! **First-responsive-candidate selection**
//!
//! A prioritized list of resources (camera devices today, any other evidence
//! source tomorrow) is walked in order. Absent candidates are skipped
//! without an attempt; present ones are tried until one yields a value.

use std::fmt::Debug;
use std::path::PathBuf;

use tracing::{debug, trace};

/// A resource that can be checked for presence before it is used.
pub trait Candidate: Debug {
    fn is_present(&self) -> bool;
}

impl Candidate for PathBuf {
    fn is_present(&self) -> bool {
        self.exists()
    }
}

/// Ordered candidates, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList<C> {
    candidates: Vec<C>,
}

impl<C: Candidate> CandidateList<C> {
    pub fn new(candidates: impl IntoIterator<Item = C>) -> Self {
        Self {
            candidates: candidates.into_iter().collect(),
        }
    }

    /// Try each present candidate in order and return the first success.
    ///
    /// `attempt` is only invoked for candidates that report themselves
    /// present, and never again once one has succeeded.
    pub fn first_responsive<T, F>(&self, mut attempt: F) -> Option<T>
    where
        F: FnMut(&C) -> Option<T>,
    {
        for candidate in &self.candidates {
            if !candidate.is_present() {
                trace!(?candidate, "Candidate not present, skipping");
                continue;
            }
            debug!(?candidate, "Trying candidate");
            if let Some(value) = attempt(candidate) {
                return Some(value);
            }
        }
        None
    }
}
