// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Time History
// ─────────────────────────────────────────────────────────────────────
//! Cut-row history and peak-magnitude series, cached during the run and
//! written once at the end.
//!
//! History files hold `frame space value...` rows with a blank line per
//! frame, down-sampled so neither axis exceeds its sample limit.

use std::io::{self, Write};

use num_complex::Complex64;

use condensate_field::Component;
use condensate_types::{CondensateResult, HistoryConfig};

use crate::codec::{MatrixLayout, MatrixValue};
use crate::context::OutputContext;
use crate::state::{ComponentPair, FieldState};

/// Time-ordered frames of one spatial cut.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord<T> {
    frames: Vec<Vec<T>>,
}

impl<T> Default for HistoryRecord<T> {
    fn default() -> Self {
        Self { frames: Vec::new() }
    }
}

impl<T> HistoryRecord<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, frame: Vec<T>) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[Vec<T>] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Samples per frame, taken from the first frame.
    pub fn space_len(&self) -> usize {
        self.frames.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn stride(len: usize, max_samples: usize) -> usize {
    len.div_ceil(max_samples.max(1)).max(1)
}

/// Stream a down-sampled history. Returns the number of value rows.
pub fn write_history_to<W, T>(
    out: &mut W,
    record: &HistoryRecord<T>,
    max_time: usize,
    max_space: usize,
) -> io::Result<usize>
where
    W: Write,
    T: MatrixValue,
{
    let time_stride = stride(record.frame_count(), max_time);
    let space_stride = stride(record.space_len(), max_space);
    let mut rows = 0;
    for (frame, values) in record.frames().iter().enumerate().step_by(time_stride) {
        for (space, value) in values.iter().enumerate().step_by(space_stride) {
            write!(out, "{frame} {space}")?;
            value.write_columns(out)?;
            writeln!(out)?;
            rows += 1;
        }
        writeln!(out)?;
    }
    Ok(rows)
}

/// Write `record` to the output named `name`.
pub fn write_history<T: MatrixValue>(
    ctx: &OutputContext,
    name: &str,
    record: &HistoryRecord<T>,
    max_time: usize,
    max_space: usize,
) -> CondensateResult<usize> {
    let path = ctx.path_for(name);
    let rows = ctx
        .registry()
        .write_and_close(name, &path, |w| write_history_to(w, record, max_time, max_space))?;
    log::info!(
        "Wrote history {name}: {rows} samples from {} frames",
        record.frame_count()
    );
    Ok(rows)
}

/// Stream the peak series: header `t Psi_Plus [Psi_Minus]`, then one
/// `index plus [minus]` row per recorded frame.
pub fn write_scalar_series_to<W: Write>(
    out: &mut W,
    series: &ComponentPair<f64>,
) -> io::Result<usize> {
    write!(out, "t Psi_Plus")?;
    if series.is_twin() {
        write!(out, " Psi_Minus")?;
    }
    writeln!(out)?;
    for (i, plus) in series.plus.iter().enumerate() {
        write!(out, "{i} {plus}")?;
        if let Some(minus) = series.minus.as_ref().and_then(|m| m.get(i)) {
            write!(out, " {minus}")?;
        }
        writeln!(out)?;
    }
    Ok(series.plus.len())
}

pub fn write_scalar_series(
    ctx: &OutputContext,
    name: &str,
    series: &ComponentPair<f64>,
) -> CondensateResult<usize> {
    let path = ctx.path_for(name);
    let rows = ctx
        .registry()
        .write_and_close(name, &path, |w| write_scalar_series_to(w, series))?;
    log::info!("Wrote {rows} scalar samples to {}", path.display());
    Ok(rows)
}

/// Copy one grid row of `buffer`; an out-of-range row yields an empty
/// frame.
pub fn record_cut<T: Copy>(buffer: &[T], layout: &MatrixLayout, row: usize) -> Vec<T> {
    let start = row * layout.n_x;
    buffer
        .get(start..start + layout.n_x)
        .map(<[T]>::to_vec)
        .unwrap_or_default()
}

/// Caches the cut row and peak magnitude of each component per output
/// step.
#[derive(Debug, Clone)]
pub struct HistoryRecorder {
    cut_row: usize,
    start_time: f64,
    record_cuts: bool,
    cut_plus: HistoryRecord<Complex64>,
    cut_minus: Option<HistoryRecord<Complex64>>,
    peaks: ComponentPair<f64>,
}

impl HistoryRecorder {
    pub fn new(config: &HistoryConfig, cut_row: usize, twin: bool) -> Self {
        Self {
            cut_row,
            start_time: config.start_time,
            record_cuts: config.enabled,
            cut_plus: HistoryRecord::new(),
            cut_minus: twin.then(HistoryRecord::new),
            peaks: ComponentPair {
                plus: Vec::new(),
                minus: twin.then(Vec::new),
            },
        }
    }

    /// Record one frame at simulation time `t`. Frames before the start
    /// time are ignored. Returns whether the frame was recorded.
    pub fn record(&mut self, state: &FieldState, layout: &MatrixLayout, t: f64) -> bool {
        if t < self.start_time {
            return false;
        }
        for component in [Component::Plus, Component::Minus] {
            let Some(buffer) = state.wavefunction.get(component) else {
                continue;
            };
            let peak = buffer.iter().map(|v| v.norm()).fold(0.0, f64::max);
            let (peaks, cut) = match component {
                Component::Plus => (Some(&mut self.peaks.plus), Some(&mut self.cut_plus)),
                Component::Minus => (self.peaks.minus.as_mut(), self.cut_minus.as_mut()),
            };
            if let Some(peaks) = peaks {
                peaks.push(peak);
            }
            if let (true, Some(cut)) = (self.record_cuts, cut) {
                cut.push(record_cut(buffer, layout, self.cut_row));
            }
        }
        true
    }

    pub fn cut(&self, component: Component) -> Option<&HistoryRecord<Complex64>> {
        match component {
            Component::Plus => Some(&self.cut_plus),
            Component::Minus => self.cut_minus.as_ref(),
        }
    }

    pub fn peaks(&self) -> &ComponentPair<f64> {
        &self.peaks
    }

    pub fn frame_count(&self) -> usize {
        self.peaks.plus.len()
    }

    /// Write `max` when requested, and `history_plus` / `history_minus`
    /// when cuts are recorded. Failures are logged per file.
    pub fn write_all(&self, ctx: &OutputContext, write_max: bool, limits: &HistoryConfig) {
        if write_max {
            if let Err(e) = write_scalar_series(ctx, "max", &self.peaks) {
                log::warn!("Writing max failed: {e}");
            }
        }
        if !self.record_cuts {
            return;
        }
        for component in [Component::Plus, Component::Minus] {
            let Some(record) = self.cut(component) else {
                continue;
            };
            let name = format!("history_{}", component.suffix());
            if let Err(e) = write_history(
                ctx,
                &name,
                record,
                limits.max_time_samples,
                limits.max_space_samples,
            ) {
                log::warn!("Writing {name} failed: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::OutputPaths;
    use crate::state::HostState;
    use condensate_field::DomainDecomposition;
    use condensate_types::GridConfig;
    use std::fs;
    use tempfile::TempDir;

    fn record(frames: usize, space: usize) -> HistoryRecord<f64> {
        let mut r = HistoryRecord::new();
        for f in 0..frames {
            r.push((0..space).map(|s| (f * space + s) as f64).collect());
        }
        r
    }

    fn write_to_string<T: MatrixValue>(
        r: &HistoryRecord<T>,
        max_t: usize,
        max_s: usize,
    ) -> (usize, String) {
        let mut out = Vec::new();
        let rows = write_history_to(&mut out, r, max_t, max_s).unwrap();
        (rows, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_small_history_written_whole() {
        let (rows, text) = write_to_string(&record(2, 3), 200, 200);
        assert_eq!(rows, 6);
        assert_eq!(text, "0 0 0\n0 1 1\n0 2 2\n\n1 0 3\n1 1 4\n1 2 5\n\n");
    }

    #[test]
    fn test_history_is_bounded() {
        for (frames, space) in [(1000, 400), (201, 201), (199, 1), (5000, 3)] {
            let r = record(frames, space);
            let (rows, text) = write_to_string(&r, 200, 200);
            let written_frames = text.split("\n\n").filter(|b| !b.is_empty()).count();
            assert!(written_frames <= 200, "{frames} frames -> {written_frames}");
            assert!(rows <= 200 * 200);
            assert!(rows / written_frames <= 200);
        }
    }

    #[test]
    fn test_stride_uses_ceiling() {
        // 201 frames with a limit of 200 gives stride 2, so 101 frames.
        let (rows, _) = write_to_string(&record(201, 1), 200, 200);
        assert_eq!(rows, 101);
    }

    #[test]
    fn test_empty_history_writes_nothing() {
        let (rows, text) = write_to_string(&HistoryRecord::<f64>::new(), 200, 200);
        assert_eq!(rows, 0);
        assert!(text.is_empty());
    }

    #[test]
    fn test_scalar_series_format() {
        let twin = ComponentPair {
            plus: vec![1.0, 2.5],
            minus: Some(vec![0.5, 0.0]),
        };
        let mut out = Vec::new();
        write_scalar_series_to(&mut out, &twin).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "t Psi_Plus Psi_Minus\n0 1 0.5\n1 2.5 0\n");

        let single = ComponentPair {
            plus: vec![3.0],
            minus: None,
        };
        let mut out = Vec::new();
        write_scalar_series_to(&mut out, &single).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "t Psi_Plus\n0 3\n");
    }

    #[test]
    fn test_record_cut_row() {
        let layout = MatrixLayout::square(3, 1.0, 1.0);
        let buffer: Vec<f64> = (0..9).map(f64::from).collect();
        assert_eq!(record_cut(&buffer, &layout, 1), vec![3.0, 4.0, 5.0]);
        assert!(record_cut(&buffer, &layout, 3).is_empty());
    }

    #[test]
    fn test_recorder_respects_start_time() {
        let domain = DomainDecomposition::resolve(&GridConfig {
            n_x: 4,
            n_y: 4,
            twin_mode: true,
            ..GridConfig::default()
        })
        .unwrap();
        let layout = MatrixLayout::from(&domain);
        let mut state = HostState::zeros(&domain);
        state.current.wavefunction.plus[9] = Complex64::new(3.0, 4.0);

        let config = HistoryConfig {
            enabled: true,
            start_time: 10.0,
            ..HistoryConfig::default()
        };
        let mut recorder = HistoryRecorder::new(&config, 2, true);
        assert!(!recorder.record(&state.current, &layout, 5.0));
        assert!(recorder.record(&state.current, &layout, 10.0));

        assert_eq!(recorder.frame_count(), 1);
        assert_eq!(recorder.peaks().plus, vec![5.0]);
        assert_eq!(recorder.peaks().minus, Some(vec![0.0]));
        let cut = recorder.cut(Component::Plus).unwrap();
        assert_eq!(cut.frames()[0][1], Complex64::new(3.0, 4.0));
        assert_eq!(recorder.cut(Component::Minus).unwrap().frame_count(), 1);
    }

    #[test]
    fn test_write_all() {
        let tmp = TempDir::new().unwrap();
        let ctx = OutputContext::new(OutputPaths::new(tmp.path(), "", tmp.path()));
        let domain = DomainDecomposition::resolve(&GridConfig {
            n_x: 2,
            n_y: 2,
            ..GridConfig::default()
        })
        .unwrap();
        let layout = MatrixLayout::from(&domain);
        let state = HostState::zeros(&domain);
        let config = HistoryConfig {
            enabled: true,
            ..HistoryConfig::default()
        };
        let mut recorder = HistoryRecorder::new(&config, 1, false);
        recorder.record(&state.current, &layout, 0.0);
        recorder.write_all(&ctx, true, &config);

        let max = fs::read_to_string(tmp.path().join("max.txt")).unwrap();
        assert_eq!(max, "t Psi_Plus\n0 0\n");
        let history = fs::read_to_string(tmp.path().join("history_plus.txt")).unwrap();
        assert_eq!(history, "0 0 0 0\n0 1 0 0\n\n");
        assert!(!tmp.path().join("history_minus.txt").exists());
    }
}
