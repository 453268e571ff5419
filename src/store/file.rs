use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use crate::error::{StoreError, StoreResult};

use super::codec::{decode, encode};
use super::records::Store;

/// Read and decode the data file into a new store.
///
/// The caller's store is not involved at all, so a missing file, an I/O error
/// or a single malformed line leaves whatever is loaded in memory untouched.
pub fn read_store(path: &Path) -> StoreResult<Store> {
    let text = fs::read_to_string(path).map_err(|err| StoreError::io(path, err))?;
    let store = decode(&text)?;
    info!(
        "loaded {} lectures, {} students, {} grades from {}",
        store.lectures().len(),
        store.students().len(),
        store.grades().len(),
        path.display()
    );
    Ok(store)
}

/// Load the data file into `store`, replacing its contents only when the
/// whole file decoded cleanly.
pub fn load_into(store: &mut Store, path: &Path) -> StoreResult<()> {
    let loaded = read_store(path)?;
    store.replace_with(loaded);
    Ok(())
}

/// Like [`read_store`], but a missing file yields an empty store. Used at
/// startup, before the user has saved anything.
pub fn read_store_or_default(path: &Path) -> StoreResult<Store> {
    match read_store(path) {
        Err(StoreError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
            info!("no data file at {}, starting empty", path.display());
            Ok(Store::new())
        }
        other => other,
    }
}

/// Encode the store and write it to `path`.
///
/// The text goes to a temporary file next to the destination which is then
/// renamed over it, so an interrupted save never leaves a half-written data
/// file behind.
pub fn save_store(store: &Store, path: &Path) -> StoreResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|err| StoreError::io(dir, err))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|err| StoreError::io(dir, err))?;
    tmp.write_all(encode(store).as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|err| StoreError::io(tmp.path(), err))?;
    tmp.persist(path)
        .map_err(|err| StoreError::io(path, err.error))?;

    info!(
        "saved {} lectures, {} students, {} grades to {}",
        store.lectures().len(),
        store.students().len(),
        store.grades().len(),
        path.display()
    );
    Ok(())
}
