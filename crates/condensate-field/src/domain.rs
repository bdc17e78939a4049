// ─────────────────────────────────────────────────────────────────────
// Condensate Field Kit — Domain Decomposition
// ─────────────────────────────────────────────────────────────────────
//! Grid / subgrid / halo descriptor consumed by the solver to partition
//! work.
//!
//! Invariants of a resolved descriptor:
//!   - `subgrids_x * subgrid_n_x == n_x` and likewise for y (exact tiling)
//!   - `subgrids_x == subgrids_y`
//!   - `halo_size <= min(subgrid_n_x, subgrid_n_y)`
//!
//! The descriptor is immutable once resolved.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use condensate_types::{CondensateError, CondensateResult, GridConfig};

use crate::flags::Component;

/// Interior index ranges of one subgrid in global grid coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubgridBounds {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

/// Validated domain decomposition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainDecomposition {
    n_x: usize,
    n_y: usize,
    l_x: f64,
    l_y: f64,
    dx: f64,
    dy: f64,
    halo_size: usize,
    subgrid_n_x: usize,
    subgrid_n_y: usize,
    subgrids_x: usize,
    subgrids_y: usize,
    periodic_boundary_x: bool,
    periodic_boundary_y: bool,
    use_twin_mode: bool,
}

/// Spacing of `n` points spanning [-l, l].
fn spacing(l: f64, n: usize) -> f64 {
    if n > 1 {
        2.0 * l / (n - 1) as f64
    } else {
        0.0
    }
}

impl DomainDecomposition {
    /// Validate a grid request and derive the subgrid layout.
    pub fn resolve(grid: &GridConfig) -> CondensateResult<Self> {
        let subgrids = grid.subgrids;
        let non_tiling = || CondensateError::NonTilingGrid {
            n_x: grid.n_x,
            n_y: grid.n_y,
            subgrids,
        };

        if grid.n_x == 0 || grid.n_y == 0 || subgrids == 0 {
            return Err(non_tiling());
        }
        if grid.n_x % subgrids != 0 || grid.n_y % subgrids != 0 {
            return Err(non_tiling());
        }
        if !(grid.l_x > 0.0 && grid.l_y > 0.0) {
            return Err(CondensateError::Config(format!(
                "domain extents must be > 0, got {} x {}",
                grid.l_x, grid.l_y
            )));
        }

        let subgrid_n_x = grid.n_x / subgrids;
        let subgrid_n_y = grid.n_y / subgrids;
        let max_halo = subgrid_n_x.min(subgrid_n_y);
        let halo_size = usize::try_from(grid.halo_size)
            .ok()
            .filter(|h| *h <= max_halo)
            .ok_or(CondensateError::InvalidHalo {
                halo: grid.halo_size,
                max: max_halo,
            })?;

        let descriptor = Self {
            n_x: grid.n_x,
            n_y: grid.n_y,
            l_x: grid.l_x,
            l_y: grid.l_y,
            dx: spacing(grid.l_x, grid.n_x),
            dy: spacing(grid.l_y, grid.n_y),
            halo_size,
            subgrid_n_x,
            subgrid_n_y,
            subgrids_x: subgrids,
            subgrids_y: subgrids,
            periodic_boundary_x: grid.periodic_x,
            periodic_boundary_y: grid.periodic_y,
            use_twin_mode: grid.twin_mode,
        };
        log::info!(
            "Domain {}x{} split into {}x{} subgrids of {}x{} (halo {})",
            descriptor.n_x,
            descriptor.n_y,
            subgrids,
            subgrids,
            subgrid_n_x,
            subgrid_n_y,
            halo_size
        );
        Ok(descriptor)
    }

    pub fn n_x(&self) -> usize {
        self.n_x
    }

    pub fn n_y(&self) -> usize {
        self.n_y
    }

    /// Total cell count.
    pub fn n2(&self) -> usize {
        self.n_x * self.n_y
    }

    pub fn l_x(&self) -> f64 {
        self.l_x
    }

    pub fn l_y(&self) -> f64 {
        self.l_y
    }

    pub fn dx(&self) -> f64 {
        self.dx
    }

    pub fn dy(&self) -> f64 {
        self.dy
    }

    pub fn halo_size(&self) -> usize {
        self.halo_size
    }

    pub fn subgrid_n_x(&self) -> usize {
        self.subgrid_n_x
    }

    pub fn subgrid_n_y(&self) -> usize {
        self.subgrid_n_y
    }

    /// Interior cells per subgrid.
    pub fn subgrid_n2(&self) -> usize {
        self.subgrid_n_x * self.subgrid_n_y
    }

    /// Subgrid extents including the halo on both edges.
    pub fn padded_subgrid_n_x(&self) -> usize {
        self.subgrid_n_x + 2 * self.halo_size
    }

    pub fn padded_subgrid_n_y(&self) -> usize {
        self.subgrid_n_y + 2 * self.halo_size
    }

    /// Cells per subgrid buffer including the halo.
    pub fn padded_subgrid_n2(&self) -> usize {
        self.padded_subgrid_n_x() * self.padded_subgrid_n_y()
    }

    pub fn subgrids_x(&self) -> usize {
        self.subgrids_x
    }

    pub fn subgrids_y(&self) -> usize {
        self.subgrids_y
    }

    pub fn subgrid_count(&self) -> usize {
        self.subgrids_x * self.subgrids_y
    }

    pub fn periodic_boundary_x(&self) -> bool {
        self.periodic_boundary_x
    }

    pub fn periodic_boundary_y(&self) -> bool {
        self.periodic_boundary_y
    }

    pub fn use_twin_mode(&self) -> bool {
        self.use_twin_mode
    }

    /// Evolved components: plus only, or plus and minus in twin mode.
    pub fn components(&self) -> &'static [Component] {
        if self.use_twin_mode {
            &[Component::Plus, Component::Minus]
        } else {
            &[Component::Plus]
        }
    }

    /// Interior bounds of subgrid (sx, sy), `None` if out of range.
    pub fn subgrid_bounds(&self, sx: usize, sy: usize) -> Option<SubgridBounds> {
        if sx >= self.subgrids_x || sy >= self.subgrids_y {
            return None;
        }
        let col0 = sx * self.subgrid_n_x;
        let row0 = sy * self.subgrid_n_y;
        Some(SubgridBounds {
            rows: row0..row0 + self.subgrid_n_y,
            cols: col0..col0 + self.subgrid_n_x,
        })
    }

    /// Physical x of column `col`.
    pub fn coordinate_x(&self, col: usize) -> f64 {
        -self.l_x + col as f64 * self.dx
    }

    /// Physical y of row `row`.
    pub fn coordinate_y(&self, row: usize) -> f64 {
        -self.l_y + row as f64 * self.dy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n_x: usize, n_y: usize, subgrids: usize, halo: i64) -> GridConfig {
        GridConfig {
            n_x,
            n_y,
            subgrids,
            halo_size: halo,
            ..GridConfig::default()
        }
    }

    #[test]
    fn test_resolve_400_by_4() {
        let d = DomainDecomposition::resolve(&grid(400, 400, 4, 2)).unwrap();
        assert_eq!(d.subgrid_n_x(), 100);
        assert_eq!(d.subgrid_n_y(), 100);
        assert_eq!(d.subgrids_x(), d.subgrids_y());
        assert_eq!(d.subgrids_x() * d.subgrid_n_x(), d.n_x());
        assert_eq!(d.subgrid_count(), 16);
        assert_eq!(d.padded_subgrid_n2(), 104 * 104);
    }

    #[test]
    fn test_non_tiling_rejected() {
        let err = DomainDecomposition::resolve(&grid(401, 400, 4, 2)).unwrap_err();
        assert!(matches!(err, CondensateError::NonTilingGrid { n_x: 401, .. }));
        assert!(DomainDecomposition::resolve(&grid(400, 402, 4, 2)).is_err());
        assert!(DomainDecomposition::resolve(&grid(400, 400, 0, 0)).is_err());
        assert!(DomainDecomposition::resolve(&grid(0, 400, 1, 0)).is_err());
    }

    #[test]
    fn test_invalid_halo() {
        assert!(matches!(
            DomainDecomposition::resolve(&grid(400, 400, 4, -1)),
            Err(CondensateError::InvalidHalo { halo: -1, .. })
        ));
        assert!(matches!(
            DomainDecomposition::resolve(&grid(400, 400, 4, 101)),
            Err(CondensateError::InvalidHalo { max: 100, .. })
        ));
        assert!(DomainDecomposition::resolve(&grid(400, 400, 4, 100)).is_ok());
        assert!(DomainDecomposition::resolve(&grid(400, 400, 4, 0)).is_ok());
    }

    #[test]
    fn test_rectangular_grid() {
        let d = DomainDecomposition::resolve(&grid(200, 100, 2, 1)).unwrap();
        assert_eq!(d.subgrid_n_x(), 100);
        assert_eq!(d.subgrid_n_y(), 50);
        let b = d.subgrid_bounds(1, 1).unwrap();
        assert_eq!(b.cols, 100..200);
        assert_eq!(b.rows, 50..100);
        assert!(d.subgrid_bounds(2, 0).is_none());
    }

    #[test]
    fn test_coordinates_span_domain() {
        let d = DomainDecomposition::resolve(&grid(5, 5, 1, 0)).unwrap();
        assert!((d.coordinate_x(0) + 100.0).abs() < 1e-12);
        assert!((d.coordinate_x(4) - 100.0).abs() < 1e-12);
        assert!((d.dx() - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_cell_grid() {
        let d = DomainDecomposition::resolve(&grid(1, 1, 1, 0)).unwrap();
        assert_eq!(d.dx(), 0.0);
        assert_eq!(d.n2(), 1);
    }

    #[test]
    fn test_components_follow_twin_mode() {
        let mut g = grid(10, 10, 1, 0);
        assert_eq!(
            DomainDecomposition::resolve(&g).unwrap().components(),
            &[Component::Plus]
        );
        g.twin_mode = true;
        g.periodic_x = true;
        let d = DomainDecomposition::resolve(&g).unwrap();
        assert_eq!(d.components().len(), 2);
        assert!(d.periodic_boundary_x());
        assert!(!d.periodic_boundary_y());
    }
}
