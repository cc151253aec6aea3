use crate::error::{RagError, RagResult};

/// An undirected adjacency between two distinct nonzero labels, stored with `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    /// Canonical edge for two labels, or `None` for a self-edge or background.
    #[inline(always)]
    pub fn new(l0: u32, l1: u32) -> Option<Self> {
        if l0 == 0 || l1 == 0 || l0 == l1 {
            return None;
        }
        Some(Self {
            a: l0.min(l1),
            b: l0.max(l1),
        })
    }
}

/// One edge and the linear indices of the voxels forming its boundary, from both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeBorder {
    pub label: u32,
    pub neighbor: u32,
    pub voxels: Vec<usize>,
}

impl EdgeBorder {
    pub fn new(edge: Edge) -> Self {
        Self {
            label: edge.a,
            neighbor: edge.b,
            voxels: Vec::new(),
        }
    }

    pub fn edge(&self) -> Edge {
        Edge {
            a: self.label,
            b: self.neighbor,
        }
    }
}

/// One empty record per edge, positionally aligned with `edges`.
pub fn seed_border_records(edges: &[Edge]) -> Vec<EdgeBorder> {
    edges.iter().map(|&e| EdgeBorder::new(e)).collect()
}

// Flat buffer interchange
// -----------------------------------------------------------------------------

/// Edges as a row-major `[count, 2]` buffer.
pub fn edges_to_flat(edges: &[Edge]) -> Vec<u32> {
    let mut out = Vec::with_capacity(edges.len() * 2);
    for e in edges {
        out.push(e.a);
        out.push(e.b);
    }
    out
}

/// Write edges into a caller-provisioned `[capacity, 2]` buffer; returns the edge count.
pub fn write_edges(edges: &[Edge], out: &mut [u32]) -> RagResult<usize> {
    let capacity = out.len() / 2;
    if edges.len() > capacity {
        return Err(RagError::CapacityExceeded {
            what: "edge buffer",
            needed: edges.len(),
            capacity,
        });
    }
    for (row, e) in out.chunks_exact_mut(2).zip(edges) {
        row[0] = e.a;
        row[1] = e.b;
    }
    Ok(edges.len())
}

pub fn edges_from_flat(flat: &[u32]) -> Vec<Edge> {
    flat.chunks_exact(2)
        .map(|row| Edge {
            a: row[0],
            b: row[1],
        })
        .collect()
}

/// Fixed-stride border rows: `[label, neighbor, count, voxel...]`, zero-filled past `count`.
pub fn borders_to_flat(borders: &[EdgeBorder], stride: usize) -> RagResult<Vec<u32>> {
    if stride < 3 && !borders.is_empty() {
        return Err(RagError::CapacityExceeded {
            what: "border record",
            needed: 3,
            capacity: stride,
        });
    }
    let slots = stride.saturating_sub(3);
    let mut out = vec![0u32; borders.len() * stride];
    for (row, rec) in out.chunks_exact_mut(stride.max(1)).zip(borders) {
        if rec.voxels.len() > slots {
            return Err(RagError::CapacityExceeded {
                what: "border record",
                needed: rec.voxels.len() + 3,
                capacity: stride,
            });
        }
        row[0] = rec.label;
        row[1] = rec.neighbor;
        row[2] = rec.voxels.len() as u32;
        for (dst, &v) in row[3..].iter_mut().zip(&rec.voxels) {
            *dst = u32::try_from(v).map_err(|_| RagError::VoxelIndexOverflow(v))?;
        }
    }
    Ok(out)
}

pub fn borders_from_flat(flat: &[u32], stride: usize) -> RagResult<Vec<EdgeBorder>> {
    if stride < 3 {
        return Err(RagError::CapacityExceeded {
            what: "border record",
            needed: 3,
            capacity: stride,
        });
    }
    if flat.len() % stride != 0 {
        return Err(RagError::ShapeMismatch {
            expected: flat.len() - flat.len() % stride,
            actual: flat.len(),
        });
    }

    let mut out = Vec::with_capacity(flat.len() / stride);
    for row in flat.chunks_exact(stride) {
        let count = row[2] as usize;
        if count > stride - 3 {
            return Err(RagError::CapacityExceeded {
                what: "border record",
                needed: count + 3,
                capacity: stride,
            });
        }
        out.push(EdgeBorder {
            label: row[0],
            neighbor: row[1],
            voxels: row[3..3 + count].iter().map(|&v| v as usize).collect(),
        });
    }
    Ok(out)
}

/// Symmetric `n x n` 0/1 adjacency matrix; row and column `label - 1`.
pub fn adjacency_matrix(edges: &[Edge], n_supervoxels: u32) -> RagResult<Vec<u8>> {
    let n = n_supervoxels as usize;
    let mut mat = vec![0u8; n * n];
    for e in edges {
        for label in [e.a, e.b] {
            if label == 0 || label > n_supervoxels {
                return Err(RagError::LabelOutOfRange {
                    voxel: 0,
                    label,
                    n_supervoxels,
                });
            }
        }
        let (a, b) = (e.a as usize - 1, e.b as usize - 1);
        mat[a * n + b] = 1;
        mat[b * n + a] = 1;
    }
    Ok(mat)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_new_canonicalizes_and_rejects_self_and_background() {
        assert_eq!(Edge::new(5, 2), Some(Edge { a: 2, b: 5 }));
        assert_eq!(Edge::new(2, 5), Some(Edge { a: 2, b: 5 }));
        assert_eq!(Edge::new(3, 3), None);
        assert_eq!(Edge::new(0, 3), None);
    }

    #[test]
    fn write_edges_checks_capacity() {
        let edges = [Edge { a: 1, b: 2 }, Edge { a: 1, b: 3 }];

        let mut small = [0u32; 2];
        let err = write_edges(&edges, &mut small).unwrap_err();
        assert!(matches!(
            err,
            RagError::CapacityExceeded {
                needed: 2,
                capacity: 1,
                ..
            }
        ));

        let mut buf = [0u32; 6];
        assert_eq!(write_edges(&edges, &mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2, 1, 3, 0, 0]);
        assert_eq!(edges_from_flat(&buf[..4]), edges.to_vec());
    }

    #[test]
    fn borders_flat_layout_and_capacity() {
        let borders = vec![
            EdgeBorder {
                label: 1,
                neighbor: 2,
                voxels: vec![4, 9],
            },
            EdgeBorder {
                label: 2,
                neighbor: 7,
                voxels: vec![],
            },
        ];

        let flat = borders_to_flat(&borders, 6).unwrap();
        assert_eq!(flat, vec![1, 2, 2, 4, 9, 0, 2, 7, 0, 0, 0, 0]);
        assert_eq!(borders_from_flat(&flat, 6).unwrap(), borders);

        let err = borders_to_flat(&borders, 4).unwrap_err();
        assert!(matches!(err, RagError::CapacityExceeded { needed: 5, .. }));
    }

    #[test]
    fn borders_to_flat_rejects_wide_voxel_index() {
        let borders = vec![EdgeBorder {
            label: 1,
            neighbor: 2,
            voxels: vec![u32::MAX as usize + 1],
        }];
        assert!(matches!(
            borders_to_flat(&borders, 4),
            Err(RagError::VoxelIndexOverflow(_))
        ));
    }

    #[test]
    fn adjacency_matrix_is_symmetric() {
        let edges = [Edge { a: 1, b: 3 }, Edge { a: 2, b: 3 }];
        let mat = adjacency_matrix(&edges, 3).unwrap();
        assert_eq!(mat, vec![0, 0, 1, 0, 0, 1, 1, 1, 0]);

        assert!(adjacency_matrix(&[Edge { a: 1, b: 4 }], 3).is_err());
    }
}
