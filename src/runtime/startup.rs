use std::sync::mpsc::{self, Receiver};
use std::thread;

use crate::catalog::{self, Catalog};

/// Load the catalog off the UI thread. The receiver yields exactly one
/// catalog, empty when loading failed.
pub fn spawn_catalog_loader(source: String) -> Receiver<Catalog> {
    let (tx, rx) = mpsc::channel::<Catalog>();
    thread::spawn(move || {
        let catalog = catalog::load_or_empty(&source);
        tracing::info!(%source, tracks = catalog.len(), "catalog loaded");
        let _ = tx.send(catalog);
    });
    rx
}
