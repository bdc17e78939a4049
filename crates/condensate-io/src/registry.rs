// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Output File Registry
// ─────────────────────────────────────────────────────────────────────
//! Name → file handle registry shared by parallel output workers.
//!
//! Each named output is a singleton: the first access creates the file,
//! later accesses reuse the handle while it stays open. Complete writes
//! truncate on reopen; appends reopen in append mode, so rows already
//! written survive a failed append. Inserting a new
//! name happens inside the map lock, so two workers racing on the same
//! first access open the file exactly once. Writing only holds the
//! per-name lock, so different names proceed in parallel.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use condensate_types::{CondensateError, CondensateResult};

/// Lifecycle of one named output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Open,
    Closed,
    Failed,
}

enum Slot {
    Open(BufWriter<File>),
    Closed,
    Failed(String),
}

impl Slot {
    fn open(name: &str, path: &Path) -> Self {
        Self::from_result(name, path, File::create(path))
    }

    fn reopen_for_append(name: &str, path: &Path) -> Self {
        let file = OpenOptions::new().create(true).append(true).open(path);
        Self::from_result(name, path, file)
    }

    fn from_result(name: &str, path: &Path, file: io::Result<File>) -> Self {
        match file {
            Ok(file) => Slot::Open(BufWriter::new(file)),
            Err(e) => {
                log::error!("Couldn't open {} for '{name}': {e}", path.display());
                Slot::Failed(e.to_string())
            }
        }
    }

    fn state(&self) -> SlotState {
        match self {
            Slot::Open(_) => SlotState::Open,
            Slot::Closed => SlotState::Closed,
            Slot::Failed(_) => SlotState::Failed,
        }
    }
}

/// Thread-safe registry of named output files.
///
/// The map is guarded by a `parking_lot::Mutex`; each slot has its own.
#[derive(Default)]
pub struct FileRegistry {
    slots: Mutex<HashMap<String, Arc<Mutex<Slot>>>>,
}

impl FileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or open the slot for `name`. Single critical section.
    fn slot(&self, name: &str, path: &Path) -> Arc<Mutex<Slot>> {
        let mut slots = self.slots.lock();
        slots
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Slot::open(name, path))))
            .clone()
    }

    /// Run `write` against the open handle for `name`, reopening a
    /// closed one. Returns the writer so the caller decides whether to
    /// keep it.
    fn with_writer<R>(
        &self,
        name: &str,
        path: &Path,
        keep_open: bool,
        write: impl FnOnce(&mut BufWriter<File>) -> io::Result<R>,
    ) -> CondensateResult<R> {
        let slot = self.slot(name, path);
        let mut guard = slot.lock();

        if matches!(*guard, Slot::Closed) {
            *guard = if keep_open {
                Slot::reopen_for_append(name, path)
            } else {
                Slot::open(name, path)
            };
        }
        let mut writer = match std::mem::replace(&mut *guard, Slot::Closed) {
            Slot::Open(writer) => writer,
            failed => {
                *guard = failed;
                return Err(CondensateError::UnopenedFileWrite {
                    name: name.to_string(),
                });
            }
        };

        let result = write(&mut writer).and_then(|r| writer.flush().map(|()| r));
        if keep_open && result.is_ok() {
            *guard = Slot::Open(writer);
        }
        result.map_err(CondensateError::from)
    }

    /// Write a complete file for `name`, then flush and close it.
    /// The next write to the same name truncates and starts over.
    pub fn write_and_close<R>(
        &self,
        name: &str,
        path: &Path,
        write: impl FnOnce(&mut BufWriter<File>) -> io::Result<R>,
    ) -> CondensateResult<R> {
        self.with_writer(name, path, false, write)
    }

    /// Append to the handle for `name`, keeping it open. A handle
    /// dropped by a failed write is reopened without truncation.
    pub fn append<R>(
        &self,
        name: &str,
        path: &Path,
        write: impl FnOnce(&mut BufWriter<File>) -> io::Result<R>,
    ) -> CondensateResult<R> {
        self.with_writer(name, path, true, write)
    }

    /// Flush and close `name` if it is open.
    pub fn close(&self, name: &str) {
        let slot = self.slots.lock().get(name).cloned();
        if let Some(slot) = slot {
            let mut guard = slot.lock();
            if let Slot::Open(writer) = &mut *guard {
                if let Err(e) = writer.flush() {
                    log::warn!("Flushing '{name}' failed: {e}");
                }
                *guard = Slot::Closed;
            }
        }
    }

    /// Close every open handle.
    pub fn close_all(&self) {
        let names: Vec<String> = self.slots.lock().keys().cloned().collect();
        for name in names {
            self.close(&name);
        }
    }

    pub fn state(&self, name: &str) -> Option<SlotState> {
        let slot = self.slots.lock().get(name).cloned()?;
        let state = slot.lock().state();
        Some(state)
    }

    /// Failure reason recorded for `name`, if its open failed.
    pub fn failure(&self, name: &str) -> Option<String> {
        let slot = self.slots.lock().get(name).cloned()?;
        let guard = slot.lock();
        match &*guard {
            Slot::Failed(reason) => Some(reason.clone()),
            _ => None,
        }
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for FileRegistry {
    fn drop(&mut self) {
        self.close_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_close() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.txt");
        let registry = FileRegistry::new();
        registry
            .write_and_close("a", &path, |w| writeln!(w, "hello"))
            .unwrap();
        assert_eq!(registry.state("a"), Some(SlotState::Closed));
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_reopen_truncates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.txt");
        let registry = FileRegistry::new();
        registry.write_and_close("a", &path, |w| writeln!(w, "first")).unwrap();
        registry.write_and_close("a", &path, |w| writeln!(w, "second")).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second\n");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_append_reuses_handle() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("max.txt");
        let registry = FileRegistry::new();
        registry.append("max", &path, |w| writeln!(w, "0 1")).unwrap();
        assert_eq!(registry.state("max"), Some(SlotState::Open));
        registry.append("max", &path, |w| writeln!(w, "1 2")).unwrap();
        registry.close("max");
        assert_eq!(fs::read_to_string(&path).unwrap(), "0 1\n1 2\n");
    }

    #[test]
    fn test_append_after_failed_write_keeps_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("max.txt");
        let registry = FileRegistry::new();
        registry.append("max", &path, |w| writeln!(w, "0 1")).unwrap();
        registry.append("max", &path, |w| writeln!(w, "1 2")).unwrap();

        let failed = registry.append("max", &path, |_| -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        });
        assert!(matches!(failed, Err(CondensateError::Io(_))));
        assert_eq!(registry.state("max"), Some(SlotState::Closed));

        registry.append("max", &path, |w| writeln!(w, "3 4")).unwrap();
        registry.close("max");
        assert_eq!(fs::read_to_string(&path).unwrap(), "0 1\n1 2\n3 4\n");
    }

    #[test]
    fn test_failed_open_is_isolated() {
        let tmp = TempDir::new().unwrap();
        let bad = tmp.path().join("missing_dir").join("x.txt");
        let good = tmp.path().join("y.txt");
        let registry = FileRegistry::new();

        let err = registry
            .write_and_close("x", &bad, |w| writeln!(w, "lost"))
            .unwrap_err();
        assert!(matches!(err, CondensateError::UnopenedFileWrite { .. }));
        assert_eq!(registry.state("x"), Some(SlotState::Failed));
        assert!(registry.failure("x").is_some());

        registry.write_and_close("y", &good, |w| writeln!(w, "kept")).unwrap();
        assert_eq!(fs::read_to_string(&good).unwrap(), "kept\n");
    }

    #[test]
    fn test_concurrent_first_access_opens_once() {
        let tmp = TempDir::new().unwrap();
        let registry = Arc::new(FileRegistry::new());
        let names = ["Psi_plus", "Psi_minus", "n_plus", "n_minus"];

        std::thread::scope(|s| {
            for t in 0..8 {
                let registry = Arc::clone(&registry);
                let dir = tmp.path();
                s.spawn(move || {
                    for name in names {
                        let path = dir.join(format!("{name}.txt"));
                        registry
                            .append(name, &path, |w| writeln!(w, "{t}"))
                            .unwrap();
                    }
                });
            }
        });
        registry.close_all();

        assert_eq!(registry.len(), names.len());
        for name in names {
            let text = fs::read_to_string(tmp.path().join(format!("{name}.txt"))).unwrap();
            assert_eq!(text.lines().count(), 8, "{name} lost writes");
        }
    }
}
