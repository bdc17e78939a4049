// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Run Configuration
// ─────────────────────────────────────────────────────────────────────

use serde::{Deserialize, Serialize};

use crate::args::ArgList;
use crate::error::{CondensateError, CondensateResult};

/// Grid request resolved into a domain decomposition before the solver starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Cells along x.
    pub n_x: usize,
    /// Cells along y.
    pub n_y: usize,
    /// Half-width of the physical domain along x (grid spans [-l_x, l_x]).
    pub l_x: f64,
    /// Half-width of the physical domain along y.
    pub l_y: f64,
    /// Subgrid tiles per axis.
    pub subgrids: usize,
    /// Ghost cells per subgrid edge. Signed so negative requests can be reported.
    pub halo_size: i64,
    pub periodic_x: bool,
    pub periodic_y: bool,
    /// Evolve both polarization components.
    pub twin_mode: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            n_x: 400,
            n_y: 400,
            l_x: 100.0,
            l_y: 100.0,
            subgrids: 1,
            halo_size: 1,
            periodic_x: false,
            periodic_y: false,
            twin_mode: false,
        }
    }
}

/// Half-open index range of the time-resolved matrix window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpan {
    pub start: usize,
    pub end: usize,
}

/// Down-sampled time-history output.
///
/// Besides the cut row, an enabled history writes a strided sub-window
/// of the field into `timeoutput/` every `every`-th output step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub enabled: bool,
    /// Grid row recorded every output step. Defaults to the y = 0 row.
    pub cut_row: Option<usize>,
    pub max_time_samples: usize,
    pub max_space_samples: usize,
    /// Frames before this simulation time are not recorded.
    pub start_time: f64,
    /// Window columns; `None` is the full grid width.
    pub window_cols: Option<IndexSpan>,
    /// Window rows; `None` is the full grid height.
    pub window_rows: Option<IndexSpan>,
    /// Index stride inside the window.
    pub increment: usize,
    /// Write the window on every n-th output step.
    pub every: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cut_row: None,
            max_time_samples: 200,
            max_space_samples: 200,
            start_time: 0.0,
            window_cols: None,
            window_rows: None,
            increment: 1,
            every: 1,
        }
    }
}

/// Run-wide configuration: output locations, timing, grid, history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Output directory, always ending in '/'.
    pub output_path: String,
    /// Optional prefix for every output file.
    pub output_name: String,
    /// Directory initial matrices are loaded from. `None` means `output_path`.
    pub load_path: Option<String>,
    /// Output selection keys (`mat`, `scalar`, `psi_plus`, ...).
    pub output_keys: Vec<String>,
    pub t_max: f64,
    pub dt: f64,
    /// Simulation time between outputs.
    pub output_every: f64,
    pub grid: GridConfig,
    pub history: HistoryConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_path: "data/".to_string(),
            output_name: String::new(),
            load_path: None,
            output_keys: vec!["mat".to_string(), "scalar".to_string()],
            t_max: 1000.0,
            dt: 0.01,
            output_every: 100.0,
            grid: GridConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

fn with_trailing_slash(mut path: String) -> String {
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

fn parse_boundary(name: &str, token: &str) -> CondensateResult<bool> {
    match token {
        "periodic" => Ok(true),
        "zero" => Ok(false),
        other => Err(CondensateError::UnknownToken {
            kind: "boundary",
            token: format!("{other} (for {name})"),
        }),
    }
}

impl RunConfig {
    /// Build a configuration from an argument vector on top of the defaults.
    pub fn from_args(args: &ArgList) -> CondensateResult<Self> {
        let mut cfg = Self::default();

        if let Some(mut i) = args.value_cursor("--path") {
            cfg.output_path = args.next_str("path", &mut i)?.to_string();
        }
        cfg.output_path = with_trailing_slash(cfg.output_path);

        if let Some(mut i) = args.value_cursor("--name") {
            cfg.output_name = args.next_str("name", &mut i)?.to_string();
        }
        if let Some(mut i) = args.value_cursor("--loadFrom") {
            cfg.load_path = Some(with_trailing_slash(
                args.next_str("loadFrom", &mut i)?.to_string(),
            ));
        }
        if let Some(mut i) = args.value_cursor("--output") {
            cfg.output_keys = args
                .next_str("output", &mut i)?
                .split(',')
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Some(mut i) = args.value_cursor("--tmax") {
            cfg.t_max = args.next_f64("tmax", &mut i)?;
        }
        if let Some(mut i) = args.value_cursor("--tstep") {
            cfg.dt = args.next_f64("tstep", &mut i)?;
        }
        if let Some(mut i) = args.value_cursor("--outEvery") {
            cfg.output_every = args.next_f64("outEvery", &mut i)?;
        }

        if let Some(mut i) = args.value_cursor("--N") {
            cfg.grid.n_x = args.next_usize("N_x", &mut i)?;
            cfg.grid.n_y = args.next_usize("N_y", &mut i)?;
        }
        if let Some(mut i) = args.value_cursor("--L") {
            cfg.grid.l_x = args.next_f64("L_x", &mut i)?;
            cfg.grid.l_y = args.next_f64("L_y", &mut i)?;
        }
        if let Some(mut i) = args.value_cursor("--subgrids") {
            cfg.grid.subgrids = args.next_usize("subgrids", &mut i)?;
        }
        if let Some(mut i) = args.value_cursor("--halo") {
            cfg.grid.halo_size = args.next_i64("halo", &mut i)?;
        }
        if let Some(mut i) = args.value_cursor("--boundary") {
            cfg.grid.periodic_x = parse_boundary("x", args.next_str("boundary_x", &mut i)?)?;
            cfg.grid.periodic_y = parse_boundary("y", args.next_str("boundary_y", &mut i)?)?;
        }
        cfg.grid.twin_mode = args.has("--tetm");

        if let Some(mut i) = args.value_cursor("--historyMatrix") {
            cfg.history.enabled = true;
            // Optional: start_x end_x start_y end_y increment
            if args.peek(i).is_some_and(|v| v.parse::<usize>().is_ok()) {
                cfg.history.window_cols = Some(IndexSpan {
                    start: args.next_usize("historyMatrix_start_x", &mut i)?,
                    end: args.next_usize("historyMatrix_end_x", &mut i)?,
                });
                cfg.history.window_rows = Some(IndexSpan {
                    start: args.next_usize("historyMatrix_start_y", &mut i)?,
                    end: args.next_usize("historyMatrix_end_y", &mut i)?,
                });
                cfg.history.increment = args.next_usize("historyMatrix_increment", &mut i)?;
            }
        }
        if let Some(mut i) = args.value_cursor("--historyEvery") {
            cfg.history.every = args.next_usize("historyEvery", &mut i)?;
        }
        if let Some(mut i) = args.value_cursor("--historyCut") {
            cfg.history.cut_row = Some(args.next_usize("historyCut", &mut i)?);
        }
        if let Some(mut i) = args.value_cursor("--historyStart") {
            cfg.history.start_time = args.next_f64("historyStart", &mut i)?;
        }

        Ok(cfg)
    }

    /// Load from JSON string.
    pub fn from_json(json: &str) -> CondensateResult<Self> {
        let mut cfg: Self = serde_json::from_str(json)
            .map_err(|e| CondensateError::Config(format!("JSON parse error: {e}")))?;
        cfg.output_path = with_trailing_slash(cfg.output_path);
        cfg.load_path = cfg.load_path.map(with_trailing_slash);
        Ok(cfg)
    }

    /// Validate configuration parameters.
    ///
    /// Grid tiling and halo checks belong to the domain decomposition.
    pub fn validate(&self) -> CondensateResult<()> {
        if self.output_path.is_empty() {
            return Err(CondensateError::Config("output_path must not be empty".into()));
        }
        if !(self.t_max > 0.0) {
            return Err(CondensateError::Config(format!(
                "t_max must be > 0, got {}",
                self.t_max
            )));
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(CondensateError::Config(format!(
                "dt must be finite and > 0, got {}",
                self.dt
            )));
        }
        if self.output_every < 0.0 {
            return Err(CondensateError::Config(format!(
                "output_every must be >= 0, got {}",
                self.output_every
            )));
        }
        if self.grid.n_x == 0 || self.grid.n_y == 0 {
            return Err(CondensateError::Config(format!(
                "grid must have at least one cell, got {}x{}",
                self.grid.n_x, self.grid.n_y
            )));
        }
        if !(self.grid.l_x > 0.0) || !(self.grid.l_y > 0.0) {
            return Err(CondensateError::Config(format!(
                "domain extents must be > 0, got {} x {}",
                self.grid.l_x, self.grid.l_y
            )));
        }
        if self.history.max_time_samples == 0 || self.history.max_space_samples == 0 {
            return Err(CondensateError::Config(
                "history sample limits must be >= 1".to_string(),
            ));
        }
        if self.history.increment == 0 || self.history.every == 0 {
            return Err(CondensateError::Config(
                "history increment and interval must be >= 1".to_string(),
            ));
        }
        let spans = [
            ("column", self.history.window_cols, self.grid.n_x),
            ("row", self.history.window_rows, self.grid.n_y),
        ];
        for (axis, span, n) in spans {
            if let Some(span) = span {
                if span.start >= span.end || span.end > n {
                    return Err(CondensateError::Config(format!(
                        "history {axis} window {}..{} outside grid of {n}",
                        span.start, span.end
                    )));
                }
            }
        }
        if let Some(row) = self.history.cut_row {
            if row >= self.grid.n_y {
                return Err(CondensateError::Config(format!(
                    "history cut row {row} outside grid of {} rows",
                    self.grid.n_y
                )));
            }
        }
        Ok(())
    }

    /// Directory initial matrices are loaded from.
    pub fn load_dir(&self) -> &str {
        self.load_path.as_deref().unwrap_or(&self.output_path)
    }

    /// True if any of `keys` was requested for output.
    pub fn does_output(&self, keys: &[&str]) -> bool {
        keys.iter()
            .any(|k| self.output_keys.iter().any(|o| o == k))
    }

    /// History cut row, defaulting to the middle (y = 0) row.
    pub fn history_cut_row(&self) -> usize {
        self.history.cut_row.unwrap_or(self.grid.n_y / 2)
    }
}
