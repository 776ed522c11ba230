//! Single-writer access to one inventory from many callers.
//!
//! [`SharedInventory::spawn`] moves an [`InventoryStore`] onto its own
//! thread. Callers hold cloneable [`InventoryHandle`]s; each call is a
//! request on a channel with its own reply channel, so mutations are applied
//! one at a time in arrival order and each reply is sent only after the
//! snapshot write has been issued.

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};

use super::{InventoryError, InventoryStore};
use crate::health::HealthMap;
use crate::part::{Part, PartDraft, PartId};

type Reply<T> = Sender<T>;
type MutationResult = Result<Part, InventoryError>;

/// Requests served by the writer thread.
pub enum InventoryRequest {
    Add {
        draft: PartDraft,
        response_tx: Reply<MutationResult>,
    },
    Edit {
        id: PartId,
        draft: PartDraft,
        response_tx: Reply<MutationResult>,
    },
    CloneDraft {
        source: PartId,
        response_tx: Reply<Result<PartDraft, InventoryError>>,
    },
    ClonePart {
        source: PartId,
        draft: PartDraft,
        response_tx: Reply<MutationResult>,
    },
    Replace {
        id: PartId,
        response_tx: Reply<MutationResult>,
    },
    List {
        response_tx: Reply<Vec<Part>>,
    },
    Health {
        response_tx: Reply<HealthMap>,
    },
    Flush {
        response_tx: Reply<Result<(), InventoryError>>,
    },
}

/// Owner of the writer thread.
pub struct SharedInventory {
    handle: InventoryHandle,
    worker: JoinHandle<InventoryStore>,
}

impl SharedInventory {
    /// Start the writer thread for `store`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn spawn(store: InventoryStore) -> std::io::Result<Self> {
        let (tx, rx) = unbounded();
        let worker = thread::Builder::new()
            .name("partlife-writer".to_string())
            .spawn(move || run_writer_loop(rx, store))?;
        Ok(Self {
            handle: InventoryHandle { sender: tx },
            worker,
        })
    }

    #[must_use]
    pub fn handle(&self) -> InventoryHandle {
        self.handle.clone()
    }

    /// Stop accepting requests once every handle is dropped and give the
    /// store back.
    ///
    /// Blocks until all outstanding handles are gone.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::WriterStopped` if the writer thread panicked.
    pub fn shutdown(self) -> Result<InventoryStore, InventoryError> {
        drop(self.handle);
        self.worker.join().map_err(|_| InventoryError::WriterStopped)
    }
}

/// The writer thread entrypoint.
pub fn run_writer_loop(rx: Receiver<InventoryRequest>, mut store: InventoryStore) -> InventoryStore {
    while let Ok(request) = rx.recv() {
        match request {
            InventoryRequest::Add { draft, response_tx } => {
                let _ = response_tx.send(store.add(draft));
            }
            InventoryRequest::Edit { id, draft, response_tx } => {
                let _ = response_tx.send(store.edit(&id, draft));
            }
            InventoryRequest::CloneDraft { source, response_tx } => {
                let _ = response_tx.send(store.clone_draft(&source));
            }
            InventoryRequest::ClonePart { source, draft, response_tx } => {
                let _ = response_tx.send(store.clone_part(&source, draft));
            }
            InventoryRequest::Replace { id, response_tx } => {
                let _ = response_tx.send(store.replace(&id));
            }
            InventoryRequest::List { response_tx } => {
                let _ = response_tx.send(store.list().to_vec());
            }
            InventoryRequest::Health { response_tx } => {
                let _ = response_tx.send(store.health());
            }
            InventoryRequest::Flush { response_tx } => {
                let result = store
                    .flush()
                    .map_err(|e| InventoryError::Persistence(e.to_string()));
                let _ = response_tx.send(result);
            }
        }
    }
    log::debug!("Inventory writer stopped");
    store
}

/// Cloneable client of the writer thread.
#[derive(Clone)]
pub struct InventoryHandle {
    sender: Sender<InventoryRequest>,
}

impl InventoryHandle {
    fn call<T>(&self, build: impl FnOnce(Reply<T>) -> InventoryRequest) -> Result<T, InventoryError> {
        let (response_tx, response_rx) = bounded(1);
        self.sender
            .send(build(response_tx))
            .map_err(|_| InventoryError::WriterStopped)?;
        response_rx.recv().map_err(|_| InventoryError::WriterStopped)
    }

    /// See [`InventoryStore::add`].
    ///
    /// # Errors
    ///
    /// As `InventoryStore::add`, plus `WriterStopped`.
    pub fn add(&self, draft: PartDraft) -> MutationResult {
        self.call(|response_tx| InventoryRequest::Add { draft, response_tx })?
    }

    /// See [`InventoryStore::edit`].
    ///
    /// # Errors
    ///
    /// As `InventoryStore::edit`, plus `WriterStopped`.
    pub fn edit(&self, id: &PartId, draft: PartDraft) -> MutationResult {
        let id = id.clone();
        self.call(|response_tx| InventoryRequest::Edit { id, draft, response_tx })?
    }

    /// See [`InventoryStore::clone_draft`].
    ///
    /// # Errors
    ///
    /// As `InventoryStore::clone_draft`, plus `WriterStopped`.
    pub fn clone_draft(&self, source: &PartId) -> Result<PartDraft, InventoryError> {
        let source = source.clone();
        self.call(|response_tx| InventoryRequest::CloneDraft { source, response_tx })?
    }

    /// See [`InventoryStore::clone_part`].
    ///
    /// # Errors
    ///
    /// As `InventoryStore::clone_part`, plus `WriterStopped`.
    pub fn clone_part(&self, source: &PartId, draft: PartDraft) -> MutationResult {
        let source = source.clone();
        self.call(|response_tx| InventoryRequest::ClonePart { source, draft, response_tx })?
    }

    /// See [`InventoryStore::replace`].
    ///
    /// # Errors
    ///
    /// As `InventoryStore::replace`, plus `WriterStopped`.
    pub fn replace(&self, id: &PartId) -> MutationResult {
        let id = id.clone();
        self.call(|response_tx| InventoryRequest::Replace { id, response_tx })?
    }

    /// Snapshot of the parts in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `WriterStopped` if the writer thread is gone.
    pub fn list(&self) -> Result<Vec<Part>, InventoryError> {
        self.call(|response_tx| InventoryRequest::List { response_tx })
    }

    /// Health of every part at the writer's clock.
    ///
    /// # Errors
    ///
    /// Returns `WriterStopped` if the writer thread is gone.
    pub fn health(&self) -> Result<HealthMap, InventoryError> {
        self.call(|response_tx| InventoryRequest::Health { response_tx })
    }

    /// Retry the snapshot write.
    ///
    /// # Errors
    ///
    /// Returns `Persistence` if the write fails again, or `WriterStopped` if
    /// the writer thread is gone.
    pub fn flush(&self) -> Result<(), InventoryError> {
        self.call(|response_tx| InventoryRequest::Flush { response_tx })?
    }
}
