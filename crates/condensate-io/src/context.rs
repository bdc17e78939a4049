// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Output Context
// ─────────────────────────────────────────────────────────────────────
//! Paths plus file registry: everything a writer needs to place a file.

use std::path::{Path, PathBuf};

use condensate_types::{CondensateResult, RunConfig};

use crate::codec::{write_matrix_to, MatrixLayout, MatrixValue, MatrixWindow};
use crate::paths::OutputPaths;
use crate::registry::FileRegistry;

/// Shared output state for one run.
pub struct OutputContext {
    paths: OutputPaths,
    registry: FileRegistry,
}

impl OutputContext {
    /// Wrap `paths` without touching the filesystem.
    pub fn new(paths: OutputPaths) -> Self {
        Self {
            paths,
            registry: FileRegistry::new(),
        }
    }

    /// Build from a run configuration and create the output
    /// directories. Directory failures are logged, not returned.
    pub fn create(config: &RunConfig) -> Self {
        let paths = OutputPaths::from_config(config);
        paths.create_directories(config.history.enabled);
        Self::new(paths)
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.paths.path_for(name)
    }

    /// Write `buffer` to `name` as a complete file and close it.
    /// Returns the number of cells written.
    pub fn write_matrix<T: MatrixValue>(
        &self,
        name: &str,
        buffer: &[T],
        layout: &MatrixLayout,
        window: &MatrixWindow,
    ) -> CondensateResult<usize> {
        let path = self.paths.path_for(name);
        self.write_matrix_at(name, &path, buffer, layout, window)
    }

    /// Like `write_matrix`, with the registry key and path given
    /// explicitly.
    pub fn write_matrix_at<T: MatrixValue>(
        &self,
        key: &str,
        path: &Path,
        buffer: &[T],
        layout: &MatrixLayout,
        window: &MatrixWindow,
    ) -> CondensateResult<usize> {
        let count = self
            .registry
            .write_and_close(key, path, |w| write_matrix_to(w, buffer, layout, window))?;
        log::info!("Output {count} elements to {}.", path.display());
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::read_matrix;
    use condensate_types::CondensateError;
    use tempfile::TempDir;

    #[test]
    fn test_write_matrix_full() {
        let tmp = TempDir::new().unwrap();
        let ctx = OutputContext::new(OutputPaths::new(tmp.path(), "run", tmp.path()));
        let layout = MatrixLayout::square(3, 1.0, 1.0);
        let buffer: Vec<f64> = (0..9).map(f64::from).collect();

        let count = ctx
            .write_matrix("n_plus", &buffer, &layout, &MatrixWindow::full(&layout))
            .unwrap();
        assert_eq!(count, 9);

        let path = tmp.path().join("run_n_plus.txt");
        let mut back = vec![0.0; 9];
        assert_eq!(read_matrix(&path, &mut back), 9);
        assert_eq!(back, buffer);
    }

    #[test]
    fn test_rewrite_replaces_file() {
        let tmp = TempDir::new().unwrap();
        let ctx = OutputContext::new(OutputPaths::new(tmp.path(), "", tmp.path()));
        let layout = MatrixLayout::square(2, 1.0, 1.0);
        let window = MatrixWindow::full(&layout);
        ctx.write_matrix("m", &[1.0; 4], &layout, &window).unwrap();
        ctx.write_matrix("m", &[2.0; 4], &layout, &window).unwrap();

        let mut back = vec![0.0; 8];
        assert_eq!(read_matrix(&tmp.path().join("m.txt"), &mut back), 4);
        assert_eq!(&back[..4], &[2.0; 4]);
    }

    #[test]
    fn test_missing_directory_is_reported() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("absent");
        let ctx = OutputContext::new(OutputPaths::new(&dir, "", &dir));
        let layout = MatrixLayout::square(1, 1.0, 1.0);
        let err = ctx
            .write_matrix("m", &[0.0], &layout, &MatrixWindow::full(&layout))
            .unwrap_err();
        assert!(matches!(err, CondensateError::UnopenedFileWrite { .. }));
    }

    #[test]
    fn test_create_makes_directories() {
        let tmp = TempDir::new().unwrap();
        let mut config = RunConfig::default();
        config.output_path = format!("{}/out/", tmp.path().display());
        config.history.enabled = true;
        let ctx = OutputContext::create(&config);
        assert!(ctx.paths().output_dir().is_dir());
        assert!(ctx.paths().time_output_dir().is_dir());
    }
}
