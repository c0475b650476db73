//! Background lookup driver.
//!
//! The allow-list fetch is blocking I/O, so it runs on a short-lived
//! worker thread. The only things crossing the thread boundary are the
//! [`LookupRequest`] going out and a generation-tagged [`SessionEvent`]
//! coming back over an mpsc channel; the session itself stays on the UI
//! thread. A reset while the worker is in flight simply orphans the
//! completion, which the session then discards by generation.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::session::LookupRequest;
use crate::store::{AllowListStore, Snapshot, StoreError};

/// Message from the lookup worker back to the UI event loop.
#[derive(Debug)]
pub enum SessionEvent {
    /// The lookup issued under `generation` finished.
    LookupDone {
        generation: u64,
        result: Result<Snapshot, StoreError>,
    },
}

/// Spawn a worker thread that fetches the allow-list snapshot and reports
/// the completion on `tx`.
///
/// The thread is detached from the caller's point of view; the returned
/// handle exists for tests that want deterministic completion. If the
/// receiver is gone by the time the fetch finishes (the screen was torn
/// down), the completion is dropped quietly.
pub fn spawn_lookup(
    store: Arc<dyn AllowListStore>,
    request: LookupRequest,
    tx: Sender<SessionEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        log::debug!(
            "lookup worker started for code {:?} (generation {})",
            request.code,
            request.generation
        );

        let result = store.fetch();

        let sent = tx.send(SessionEvent::LookupDone {
            generation: request.generation,
            result,
        });

        if sent.is_err() {
            log::debug!("lookup completion dropped, receiver is gone");
        }
    })
}
