//! Chunked region-adjacency construction over a dense scratch bitmap.
//!
//! The label space `1..=n` is cut into chunks of `label_jump` labels. Each chunk
//! rescans the whole volume and only looks at voxels whose label falls in the
//! chunk, so the scratch bitmap needs `label_jump x n` cells instead of `n x n`.
//! Edges are only taken in the increasing-label direction, which makes every
//! discovered edge canonical and halves the work.

use crate::edge::Edge;
use crate::error::{RagError, RagResult};
use crate::stamp_bitmap::StampBitmap;
use crate::steps::StepTable;
use crate::vol::LabelVol;
use std::ops::Range;
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseRagBuilder {
    /// Width of each label chunk. The scratch bitmap costs `min(label_jump, n) * n` bytes.
    pub label_jump: u32,
    /// Suppress duplicate edges inside a chunk with the scratch bitmap. Without it every
    /// voxel-level discovery is collected and only the final sort/dedup removes repeats.
    pub adjacency_matrix: bool,
    /// Max number of distinct edges the caller is prepared to receive.
    pub edge_capacity: Option<usize>,
}

impl Default for DenseRagBuilder {
    fn default() -> Self {
        Self {
            label_jump: 1024,
            adjacency_matrix: true,
            edge_capacity: None,
        }
    }
}

/// Label chunks `[1, 1+j), [1+j, 1+2j), ...` covering `1..=n_supervoxels`.
pub fn label_chunks(n_supervoxels: u32, label_jump: u32) -> impl Iterator<Item = Range<u32>> {
    let jump = label_jump.max(1);
    (1..=n_supervoxels)
        .step_by(jump as usize)
        .map(move |start| start..start.saturating_add(jump))
}

/// Reject chunk sizes whose dense index `(label - start) * n + neighbor` could leave 32 bits.
pub fn check_label_jump(n_supervoxels: u32, label_jump: u32) -> RagResult<()> {
    if label_jump == 0 {
        return Err(RagError::ZeroLabelJump);
    }
    let limit = u32::MAX / n_supervoxels.max(1);
    if label_jump >= limit {
        return Err(RagError::LabelJumpOverflow {
            label_jump,
            n_supervoxels,
            limit,
        });
    }
    Ok(())
}

impl DenseRagBuilder {
    /// Sorted, deduplicated edges of `vol` under `steps`.
    ///
    /// Neighbor reads that leave the buffer are ignored; reads that wrap across rows
    /// are not, so pad the volume to at least the step radius.
    pub fn build(&self, vol: &LabelVol, n_supervoxels: u32, steps: &StepTable) -> RagResult<Vec<Edge>> {
        check_label_jump(n_supervoxels, self.label_jump)?;

        // Any label above `n` would index past the scratch rows.
        if let Some(vox) = vol.arr.iter().position(|&l| l > n_supervoxels) {
            return Err(RagError::LabelOutOfRange {
                voxel: vox,
                label: vol.arr[vox],
                n_supervoxels,
            });
        }

        let t_start = Instant::now();
        let n = n_supervoxels as usize;
        let chunk_rows = (self.label_jump as usize).min(n);
        let mut seen = if self.adjacency_matrix {
            Some(StampBitmap::new(n, chunk_rows))
        } else {
            None
        };

        let mut edges: Vec<Edge> = Vec::new();
        let mut n_chunks = 0usize;
        for chunk in label_chunks(n_supervoxels, self.label_jump) {
            if let Some(bm) = seen.as_mut() {
                bm.clear();
            }

            for (vox, &label) in vol.arr.iter().enumerate() {
                if label == 0 || !chunk.contains(&label) {
                    continue;
                }

                for &step in steps.offsets() {
                    let Some(neighbor) = vol.get_offset(vox, step) else {
                        continue;
                    };
                    if neighbor <= label {
                        continue;
                    }

                    let fresh = match seen.as_mut() {
                        Some(bm) => bm.test_and_set(
                            neighbor as usize - 1,
                            (label - chunk.start) as usize,
                        ),
                        None => true,
                    };
                    if fresh {
                        edges.push(Edge { a: label, b: neighbor });
                    }
                }
            }

            log::debug!(
                "dense rag chunk [{}, {}): {} edges so far",
                chunk.start,
                chunk.end,
                edges.len()
            );
            n_chunks += 1;
        }

        // Within a chunk the bitmap already removed repeats, but with the bitmap off
        // every voxel-level hit is still here.
        edges.sort_unstable();
        edges.dedup();

        if let Some(capacity) = self.edge_capacity {
            if edges.len() > capacity {
                return Err(RagError::CapacityExceeded {
                    what: "edge buffer",
                    needed: edges.len(),
                    capacity,
                });
            }
        }

        log::info!(
            target: "perf",
            "dense rag: {} edges over {} chunks in {} ms",
            edges.len(),
            n_chunks,
            t_start.elapsed().as_millis()
        );
        Ok(edges)
    }
}
