use serde::Deserialize;
use std::ops::Range;

/// Which voxels of the 3x3x3 neighborhood count as adjacent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// Shared faces only.
    #[default]
    Face6,
    /// Faces and edges.
    Edge18,
    /// Faces, edges and corners.
    Vertex26,
}

impl Connectivity {
    /// Max number of nonzero axis deltas a neighbor may have.
    fn max_axes(self) -> i32 {
        match self {
            Connectivity::Face6 => 1,
            Connectivity::Edge18 => 2,
            Connectivity::Vertex26 => 3,
        }
    }
}

/// Signed offsets into a row-major linear voxel buffer.
///
/// Applying a step is unchecked by contract: the table knows nothing about the
/// volume it will be used on, and steps wrap across rows and slices. Callers pad
/// the volume so every wrapped read lands on background.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepTable {
    offsets: Vec<isize>,
    min_step: isize,
    max_step: isize,
}

impl StepTable {
    pub fn new(offsets: Vec<isize>) -> Self {
        let min_step = offsets.iter().copied().min().unwrap_or(0);
        let max_step = offsets.iter().copied().max().unwrap_or(0);
        Self {
            offsets,
            min_step,
            max_step,
        }
    }

    /// The 1-ring of `conn` for a volume `w` wide and `h` high. The center is excluded.
    pub fn for_connectivity(conn: Connectivity, w: usize, h: usize) -> Self {
        let max_axes = conn.max_axes();
        let sy = w as isize;
        let sz = (w * h) as isize;

        let mut offsets = Vec::with_capacity(26);
        for z in -1..=1_isize {
            for y in -1..=1_isize {
                for x in -1..=1_isize {
                    let n_axes = (x != 0) as i32 + (y != 0) as i32 + (z != 0) as i32;
                    if n_axes == 0 || n_axes > max_axes {
                        continue;
                    }
                    offsets.push(z * sz + y * sy + x);
                }
            }
        }
        Self::new(offsets)
    }

    /// The 2-ring: every step reachable by one or two applications of this table, minus the center.
    pub fn dilated(&self) -> Self {
        let mut offsets: Vec<isize> = self.offsets.clone();
        for &a in &self.offsets {
            for &b in &self.offsets {
                let s = a + b;
                if s != 0 {
                    offsets.push(s);
                }
            }
        }
        offsets.sort_unstable();
        offsets.dedup();
        Self::new(offsets)
    }

    #[inline(always)]
    pub fn offsets(&self) -> &[isize] {
        &self.offsets
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn min_step(&self) -> isize {
        self.min_step
    }

    pub fn max_step(&self) -> isize {
        self.max_step
    }

    /// Voxel range over which every step stays inside a buffer of `n_voxels`.
    pub fn scan_range(&self, n_voxels: usize) -> Range<usize> {
        let lo = self.min_step.min(0).unsigned_abs();
        let hi = n_voxels.saturating_sub(self.max_step.max(0).unsigned_abs());
        lo..hi.max(lo)
    }
}
