//! Shared session with tick subscribers
//!
//! Lets a stream-reader thread feed snapshots while render threads read the
//! session. Each ingest runs to completion under the write lock before any
//! observer sees its report. Updates are serialized by a separate ordering
//! lock held through notification, so observers receive reports in tick order
//! while readers stay unblocked during callbacks.

use crate::session::{StreamSnapshot, TickReport, WorkspaceSession};
use crate::tree::FileNode;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Receives a report after every processed tick or user selection
pub trait SessionObserver: Send + Sync {
    fn on_tick(&self, report: &TickReport);
}

impl<F> SessionObserver for F
where
    F: Fn(&TickReport) + Send + Sync,
{
    fn on_tick(&self, report: &TickReport) {
        self(report)
    }
}

/// Thread-safe handle to a [`WorkspaceSession`]
#[derive(Clone)]
pub struct SharedSession {
    session: Arc<RwLock<WorkspaceSession>>,
    observers: Arc<RwLock<Vec<Arc<dyn SessionObserver>>>>,
    update_order: Arc<Mutex<()>>,
}

impl SharedSession {
    pub fn new(session: WorkspaceSession) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            observers: Arc::new(RwLock::new(Vec::new())),
            update_order: Arc::new(Mutex::new(())),
        }
    }

    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.write().push(observer);
    }

    /// Process a snapshot, then notify observers outside the session lock.
    ///
    /// Observers must not call back into `ingest` or `select`.
    pub fn ingest(&self, snapshot: StreamSnapshot) -> TickReport {
        let _order = self.update_order.lock();
        let report = {
            let mut session = self.session.write();
            session.ingest(snapshot)
        };
        self.notify(&report);
        report
    }

    /// User selection; observers are notified only when the path exists.
    pub fn select(&self, path: &str) -> Option<Arc<FileNode>> {
        let _order = self.update_order.lock();
        let (selected, report) = {
            let mut session = self.session.write();
            let selected = session.set_selected_node(path);
            (selected, session.current_report())
        };
        if selected.is_some() {
            self.notify(&report);
        }
        selected
    }

    /// Run `f` with shared read access to the session.
    pub fn read<R>(&self, f: impl FnOnce(&WorkspaceSession) -> R) -> R {
        let session = self.session.read();
        f(&session)
    }

    fn notify(&self, report: &TickReport) {
        let observers: Vec<Arc<dyn SessionObserver>> = self.observers.read().clone();
        for observer in observers {
            observer.on_tick(report);
        }
    }
}
