//! Scan session state machine.
//!
//! # Overview
//!
//! One [`ScanSession`] is the sole owner of scan-to-verdict sequencing for
//! a screen: it accepts decode events from the capture surface, enforces
//! at-most-one-in-flight validation, applies the allow-list lookup result,
//! and exposes `{phase, last_code, verdict, failure}` as observable state
//! for the presentation layer. Every physical scan produces exactly one
//! verdict or one failure, never both, never more than one concurrent
//! lookup.
//!
//! # State machine
//!
//! ```text
//! Idle --on_decode--> Scanning --lookup_issued--> Validating
//!                         \                          |
//!                          \----on_lookup_complete---+--> Resolved
//!                                                           |
//! Idle <----------------------reset-------------------------+
//! ```
//!
//! Decode events arriving while the session is busy (any phase other than
//! `Idle`) are discarded silently; that is the deduplication guarantee for
//! a continuous scan burst. `reset` is idempotent and callable from any
//! phase.
//!
//! # Stale completions
//!
//! Lookups run asynchronously, so a completion can arrive after the
//! session has moved on (reset, or already re-armed for a newer code).
//! Each accepted decode and each reset bumps a generation counter, and
//! every lookup request carries the generation it was issued under. A
//! completion is applied only when its generation is current *and* a
//! lookup is actually outstanding; everything else is dropped without a
//! trace in the observable state.
//!
//! # Example
//!
//! ```
//! use scangate::session::{Phase, ScanSession};
//! use scangate::store::Snapshot;
//!
//! let mut session = ScanSession::new();
//! let request = session.on_decode("BAG-20250001").expect("idle session accepts decodes");
//! session.lookup_issued(request.generation);
//!
//! let snapshot: Snapshot = ["BAG-20250001"].into_iter().collect();
//! session.on_lookup_complete(request.generation, Ok(snapshot));
//!
//! assert_eq!(session.phase(), Phase::Resolved);
//! assert_eq!(session.verdict(), Some(true));
//!
//! session.reset();
//! assert_eq!(session.phase(), Phase::Idle);
//! ```

use crate::link::{LinkOpener, OpenError};
use crate::store::{Snapshot, StoreError};

/// Phase of the scan session.
///
/// Transitions are explicit through [`ScanSession`] method calls; the
/// presentation layer only ever reads the phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Waiting for a decode event. Initial phase, and the phase after every reset.
    #[default]
    Idle,
    /// A decode was accepted; the lookup request is being handed to the driver.
    Scanning,
    /// The allow-list lookup is in flight.
    Validating,
    /// The lookup finished: exactly one of verdict or failure is set.
    Resolved,
}

impl Phase {
    /// Whether the session will accept a decode event in this phase.
    #[must_use]
    pub fn accepts_decode(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a lookup is outstanding (issued but not yet resolved).
    #[must_use]
    pub fn lookup_outstanding(self) -> bool {
        matches!(self, Self::Scanning | Self::Validating)
    }

    /// Whether the session has reached a result.
    #[must_use]
    pub fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// A lookup request handed to the driver when a decode is accepted.
///
/// The driver fetches the allow-list snapshot however it likes (worker
/// thread, inline call) and reports back via
/// [`ScanSession::on_lookup_complete`] with the same generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    /// The decoded payload the lookup was issued for.
    pub code: String,
    /// Session generation at issue time; completions quote it back.
    pub generation: u64,
}

/// The scan session: capture events in, verdicts out.
///
/// Constructed at screen mount, reset between physical scans, dropped at
/// unmount. Not thread-safe on purpose: all events reach it through the
/// single-threaded UI event loop, and the asynchronous part (the fetch)
/// lives outside, connected only by [`LookupRequest`] and the completion
/// call.
#[derive(Debug, Clone, Default)]
pub struct ScanSession {
    phase: Phase,
    last_code: Option<String>,
    verdict: Option<bool>,
    failure: Option<StoreError>,
    generation: u64,
}

impl ScanSession {
    /// Create a session in the `Idle` phase with no recorded scan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Observable State ====================

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The most recently decoded payload, if any.
    #[must_use]
    pub fn last_code(&self) -> Option<&str> {
        self.last_code.as_deref()
    }

    /// The validity verdict of a completed lookup.
    ///
    /// `Some(true)` valid, `Some(false)` invalid, `None` when not resolved
    /// or when the lookup failed.
    #[must_use]
    pub fn verdict(&self) -> Option<bool> {
        self.verdict
    }

    /// The lookup failure, when validation could not be completed.
    ///
    /// Distinct from an invalid verdict: this is infrastructure trouble,
    /// not a real answer.
    #[must_use]
    pub fn failure(&self) -> Option<&StoreError> {
        self.failure.as_ref()
    }

    /// Current generation counter. Bumped by every accepted decode and
    /// every reset.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the session is anywhere but `Idle`.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.phase.accepts_decode()
    }

    // ==================== Capture Surface ====================

    /// Handle a decode event from the capture surface.
    ///
    /// Accepts the event only when the session is `Idle` and the payload is
    /// non-empty; everything else is discarded silently. On acceptance the
    /// code is recorded, the phase moves to `Scanning`, and the returned
    /// [`LookupRequest`] must be dispatched by the driver.
    pub fn on_decode(&mut self, text: &str) -> Option<LookupRequest> {
        if text.is_empty() {
            log::trace!("discarding empty decode event");
            return None;
        }
        if self.is_busy() {
            log::trace!("discarding decode event while busy ({:?})", self.phase);
            return None;
        }

        self.generation += 1;
        self.last_code = Some(text.to_string());
        self.set_phase(Phase::Scanning);

        Some(LookupRequest {
            code: text.to_string(),
            generation: self.generation,
        })
    }

    /// Driver acknowledgment that the lookup for `generation` was dispatched.
    ///
    /// Moves `Scanning` to `Validating`. Acknowledgments for any other
    /// generation (a request obsoleted by a reset in between) are ignored.
    pub fn lookup_issued(&mut self, generation: u64) {
        if self.phase == Phase::Scanning && generation == self.generation {
            self.set_phase(Phase::Validating);
        } else {
            log::trace!(
                "ignoring lookup_issued for generation {} (current {}, phase {:?})",
                generation,
                self.generation,
                self.phase
            );
        }
    }

    /// Apply a lookup completion.
    ///
    /// The completion is applied only when `generation` is current and a
    /// lookup is outstanding; otherwise it is a stale response and is
    /// discarded, returning `false`. On success the verdict is the set
    /// membership of the recorded code; on failure the error descriptor is
    /// recorded instead. Either way the phase becomes `Resolved`.
    pub fn on_lookup_complete(
        &mut self,
        generation: u64,
        result: Result<Snapshot, StoreError>,
    ) -> bool {
        if generation != self.generation || !self.phase.lookup_outstanding() {
            log::debug!(
                "discarding stale lookup completion (generation {}, current {}, phase {:?})",
                generation,
                self.generation,
                self.phase
            );
            return false;
        }

        match result {
            Ok(snapshot) => {
                let code = self.last_code.as_deref().unwrap_or_default();
                let valid = snapshot.contains(code);
                log::info!(
                    "lookup resolved: code {:?} is {} ({} codes in snapshot)",
                    code,
                    if valid { "valid" } else { "invalid" },
                    snapshot.len()
                );
                self.verdict = Some(valid);
                self.failure = None;
            }
            Err(err) => {
                log::warn!("lookup failed: {}", err);
                self.verdict = None;
                self.failure = Some(err);
            }
        }

        debug_assert!(self.verdict.is_some() != self.failure.is_some());
        self.set_phase(Phase::Resolved);
        true
    }

    // ==================== User Commands ====================

    /// Reset to `Idle`, clearing the recorded code, verdict, and failure.
    ///
    /// Idempotent and callable from any phase. Resetting while a lookup is
    /// outstanding does not cancel the fetch; the generation bump makes its
    /// eventual completion a no-op.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.last_code = None;
        self.verdict = None;
        self.failure = None;
        self.set_phase(Phase::Idle);
    }

    /// Whether the open-result command is currently available.
    ///
    /// Requires a resolved-valid verdict and a non-empty recorded code.
    #[must_use]
    pub fn can_open_result(&self) -> bool {
        self.verdict == Some(true) && self.last_code.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// Open the validated code as a link via the given opener capability.
    ///
    /// The opener's syntactic probe runs first; if it rejects the code, the
    /// opener is never invoked and [`OpenError::NotOpenable`] is returned
    /// for inline display. The session phase is not affected in any case.
    ///
    /// # Errors
    ///
    /// [`OpenError::NoResult`] without a resolved-valid verdict,
    /// [`OpenError::NotOpenable`] when the probe rejects the code, and
    /// [`OpenError::Launch`] when the platform handler cannot be spawned.
    pub fn open_result(&self, opener: &dyn LinkOpener) -> Result<(), OpenError> {
        if !self.can_open_result() {
            return Err(OpenError::NoResult);
        }

        // Guard above guarantees the code is present.
        let code = self.last_code.as_deref().unwrap_or_default();
        if !opener.can_open(code) {
            log::debug!("open rejected by capability probe: {:?}", code);
            return Err(OpenError::NotOpenable(code.to_string()));
        }

        opener.open(code)
    }

    // ==================== Internals ====================

    fn set_phase(&mut self, phase: Phase) {
        log::debug!("phase transition: {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
    }
}
