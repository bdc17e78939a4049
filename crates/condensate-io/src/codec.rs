// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Matrix Text Codec
// ─────────────────────────────────────────────────────────────────────
//! Dense matrices as whitespace-separated text, one cell per line:
//!
//!   r c value        (real)
//!   r c re im        (complex)
//!
//! where `r` is the physical coordinate of the cell's row and `c` that
//! of its column, with a blank line after every grid row (gnuplot block
//! format, first column constant within a block).
//! Values are written in shortest round-trip form, so reading a file
//! back reproduces the buffer exactly.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::ops::Range;
use std::path::Path;

use num_complex::Complex64;

use condensate_field::DomainDecomposition;
use condensate_types::{CondensateError, CondensateResult};

/// A cell value with a fixed number of text columns.
pub trait MatrixValue: Copy + Send + Sync {
    /// Lines no longer than this are treated as blank.
    const MIN_LINE_LEN: usize;

    fn write_columns<W: Write>(&self, out: &mut W) -> io::Result<()>;

    fn parse_columns<'a, I>(fields: I) -> Option<Self>
    where
        I: Iterator<Item = &'a str>;
}

impl MatrixValue for f64 {
    const MIN_LINE_LEN: usize = 2;

    fn write_columns<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, " {self}")
    }

    fn parse_columns<'a, I>(mut fields: I) -> Option<Self>
    where
        I: Iterator<Item = &'a str>,
    {
        fields.next()?.parse().ok()
    }
}

impl MatrixValue for Complex64 {
    const MIN_LINE_LEN: usize = 3;

    fn write_columns<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, " {} {}", self.re, self.im)
    }

    fn parse_columns<'a, I>(mut fields: I) -> Option<Self>
    where
        I: Iterator<Item = &'a str>,
    {
        let re = fields.next()?.parse().ok()?;
        let im = fields.next()?.parse().ok()?;
        Some(Complex64::new(re, im))
    }
}

/// Geometry of a row-major buffer: `n_x` columns, `n_y` rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixLayout {
    pub n_x: usize,
    pub n_y: usize,
    /// Half-extents; coordinates run from -l.
    pub l_x: f64,
    pub l_y: f64,
    pub dx: f64,
    pub dy: f64,
}

impl MatrixLayout {
    /// Square N×N grid starting at -extent with the given spacing.
    pub fn square(n: usize, extent: f64, spacing: f64) -> Self {
        Self {
            n_x: n,
            n_y: n,
            l_x: extent,
            l_y: extent,
            dx: spacing,
            dy: spacing,
        }
    }

    pub fn len(&self) -> usize {
        self.n_x * self.n_y
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&DomainDecomposition> for MatrixLayout {
    fn from(d: &DomainDecomposition) -> Self {
        Self {
            n_x: d.n_x(),
            n_y: d.n_y(),
            l_x: d.l_x(),
            l_y: d.l_y(),
            dx: d.dx(),
            dy: d.dy(),
        }
    }
}

/// Sub-rectangle and stride of a matrix write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixWindow {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
    pub stride: usize,
}

impl MatrixWindow {
    pub fn full(layout: &MatrixLayout) -> Self {
        Self {
            rows: 0..layout.n_y,
            cols: 0..layout.n_x,
            stride: 1,
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = stride;
        self
    }

    /// Window clipped to the layout, stride at least 1.
    fn clamp(&self, layout: &MatrixLayout) -> Self {
        let clip = |r: &Range<usize>, n: usize| r.start.min(n)..r.end.min(n);
        Self {
            rows: clip(&self.rows, layout.n_y),
            cols: clip(&self.cols, layout.n_x),
            stride: self.stride.max(1),
        }
    }
}

/// Stream `buffer` as text rows. Returns the number of cells written.
pub fn write_matrix_to<W, T>(
    out: &mut W,
    buffer: &[T],
    layout: &MatrixLayout,
    window: &MatrixWindow,
) -> io::Result<usize>
where
    W: Write,
    T: MatrixValue,
{
    if buffer.len() < layout.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!(
                "buffer holds {} cells, layout needs {}",
                buffer.len(),
                layout.len()
            ),
        ));
    }

    let window = window.clamp(layout);
    let mut count = 0;
    for row in window.rows.clone().step_by(window.stride) {
        let r = -layout.l_y + row as f64 * layout.dy;
        for col in window.cols.clone().step_by(window.stride) {
            let c = -layout.l_x + col as f64 * layout.dx;
            write!(out, "{r} {c}")?;
            buffer[col + row * layout.n_x].write_columns(out)?;
            writeln!(out)?;
            count += 1;
        }
        writeln!(out)?;
    }
    Ok(count)
}

/// Read text rows into `buffer` in file order. Returns the number of
/// cells stored.
///
/// Short lines are skipped as blank; malformed lines are skipped with a
/// warning; reading stops once `buffer` is full.
pub fn read_matrix_from<R, T>(reader: R, buffer: &mut [T], source: &str) -> usize
where
    R: BufRead,
    T: MatrixValue,
{
    let mut count = 0;
    for (line_no, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("Stopped reading {source} at line {}: {e}", line_no + 1);
                break;
            }
        };
        if line.len() <= T::MIN_LINE_LEN {
            continue;
        }
        let mut fields = line.split_whitespace();
        let coords_ok = fields.next().is_some() && fields.next().is_some();
        let value = if coords_ok {
            T::parse_columns(fields)
        } else {
            None
        };
        let Some(value) = value else {
            log::warn!("Skipping malformed line {} in {source}", line_no + 1);
            continue;
        };
        if count == buffer.len() {
            log::warn!(
                "{source} holds more than {} elements; ignoring the rest",
                buffer.len()
            );
            break;
        }
        buffer[count] = value;
        count += 1;
    }
    count
}

/// Load a matrix file into `buffer`, failing with `MissingFile` when it
/// cannot be opened.
pub fn load_matrix<T: MatrixValue>(path: &Path, buffer: &mut [T]) -> CondensateResult<usize> {
    let file = File::open(path).map_err(|_| CondensateError::MissingFile {
        path: path.display().to_string(),
    })?;
    let source = path.display().to_string();
    let count = read_matrix_from(BufReader::new(file), buffer, &source);
    log::info!("Loaded {count} elements from {source}");
    Ok(count)
}

/// Tolerant loader: a missing file logs a warning and loads nothing.
pub fn read_matrix<T: MatrixValue>(path: &Path, buffer: &mut [T]) -> usize {
    match load_matrix(path, buffer) {
        Ok(count) => count,
        Err(e) => {
            log::warn!("Warning: {e}");
            0
        }
    }
}
