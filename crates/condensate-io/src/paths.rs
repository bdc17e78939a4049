// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Output Paths
// ─────────────────────────────────────────────────────────────────────

use std::fs;
use std::path::{Path, PathBuf};

use condensate_types::RunConfig;

/// Subdirectory for time-resolved matrix output.
pub const TIME_OUTPUT_DIR: &str = "timeoutput";

/// Deterministic naming of output and input files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    output_dir: PathBuf,
    output_name: String,
    load_dir: PathBuf,
}

impl OutputPaths {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        output_name: impl Into<String>,
        load_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_name: output_name.into(),
            load_dir: load_dir.into(),
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            &config.output_path,
            config.output_name.clone(),
            config.load_dir(),
        )
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn load_dir(&self) -> &Path {
        &self.load_dir
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// `output_dir/[output_name_]name.txt`.
    pub fn path_for(&self, name: &str) -> PathBuf {
        let file = if self.output_name.is_empty() {
            format!("{name}.txt")
        } else {
            format!("{}_{name}.txt", self.output_name)
        };
        self.output_dir.join(file)
    }

    /// `output_dir/timeoutput/[output_name_]name_t.txt`.
    pub fn time_path_for(&self, name: &str, t: f64) -> PathBuf {
        let file = if self.output_name.is_empty() {
            format!("{name}_{t}.txt")
        } else {
            format!("{}_{name}_{t}.txt", self.output_name)
        };
        self.time_output_dir().join(file)
    }

    /// `load_dir/name.txt`. Loaded files carry no run-name prefix.
    pub fn load_path_for(&self, name: &str) -> PathBuf {
        self.load_dir.join(format!("{name}.txt"))
    }

    pub fn time_output_dir(&self) -> PathBuf {
        self.output_dir.join(TIME_OUTPUT_DIR)
    }

    /// Create the output directory, and `timeoutput/` when requested.
    ///
    /// Failures are logged; writes into a missing directory later
    /// surface per file.
    pub fn create_directories(&self, with_time_output: bool) {
        let mut dirs = vec![self.output_dir.clone()];
        if with_time_output {
            dirs.push(self.time_output_dir());
        }
        for dir in dirs {
            match fs::create_dir_all(&dir) {
                Ok(()) => log::info!("Created directory {}", dir.display()),
                Err(e) => log::error!("Error creating directory {}: {e}", dir.display()),
            }
        }
    }
}
