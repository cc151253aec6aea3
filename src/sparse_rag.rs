//! Single-pass region-adjacency construction with per-edge borders.
//!
//! Every label owns a short list of the smaller labels it touches, kept in
//! descending order, and every such entry owns the sorted set of voxels on both
//! sides of that boundary. RAGs are very sparse, so a linear scan of the owning
//! list is cheaper than a dense matrix.

use crate::edge::{Edge, EdgeBorder};
use crate::error::{RagError, RagResult};
use crate::steps::StepTable;
use crate::vol::LabelVol;
use std::time::Instant;

#[derive(Debug, Clone)]
struct AdjEntry {
    /// The smaller label of the edge; the owning list belongs to the larger one.
    value: u32,
    border: Vec<usize>,
    /// Position of the most recent local-side insertion into `border`.
    last_border: usize,
}

#[derive(Debug, Clone)]
pub struct SparseRag {
    n_supervoxels: u32,
    nalloc_borders: usize,
    adj: Vec<Vec<AdjEntry>>,
    n_edges: usize,
}

impl SparseRag {
    /// `nalloc_rag` and `nalloc_borders` are reservation hints for each label's list and each
    /// edge's border set. Both grow past them as needed.
    pub fn new(n_supervoxels: u32, nalloc_rag: usize, nalloc_borders: usize) -> Self {
        let adj = (0..n_supervoxels)
            .map(|_| Vec::with_capacity(nalloc_rag))
            .collect();
        Self {
            n_supervoxels,
            nalloc_borders,
            adj,
            n_edges: 0,
        }
    }

    pub fn n_edges(&self) -> usize {
        self.n_edges
    }

    /// Record that voxel `vox` (labeled `label`) touches voxel `cvox` (labeled `neighbor`).
    ///
    /// Precondition: across calls, `vox` never decreases. The local-side border insert
    /// resumes from the position of the previous one on the same edge rather than from
    /// the start of the set, which is only correct while `vox` is monotonic. A reordered
    /// or parallel scan must not call this.
    pub fn add_adjacency(&mut self, vox: usize, cvox: usize, label: u32, neighbor: u32) -> RagResult<()> {
        let Some(edge) = Edge::new(label, neighbor) else {
            return Ok(());
        };
        let n_supervoxels = self.n_supervoxels;
        let out_of_range = |voxel: usize, label: u32| RagError::LabelOutOfRange {
            voxel,
            label,
            n_supervoxels,
        };
        if label > n_supervoxels {
            return Err(out_of_range(vox, label));
        }
        if neighbor > n_supervoxels {
            return Err(out_of_range(cvox, neighbor));
        }

        // Only the lower triangle is stored: the larger label owns the entry.
        let (owner, cvalue) = (edge.b, edge.a);
        let entries = &mut self.adj[owner as usize - 1];

        // Descending order scans faster here, likely because of C-order combined with
        // the watershed's labeling order.
        let pos = entries
            .iter()
            .position(|e| e.value <= cvalue)
            .unwrap_or(entries.len());
        if pos == entries.len() || entries[pos].value != cvalue {
            entries.insert(
                pos,
                AdjEntry {
                    value: cvalue,
                    border: Vec::with_capacity(self.nalloc_borders),
                    last_border: 0,
                },
            );
            self.n_edges += 1;
        }

        let entry = &mut entries[pos];
        let at = insert_sorted_from(&mut entry.border, entry.last_border, vox);
        entry.last_border = at;

        // The neighbor side has no cursor. Forward neighbors can only land at or after
        // the local voxel; backward ones need a scan from the start.
        let from = if cvox >= vox { at } else { 0 };
        insert_sorted_from(&mut entry.border, from, cvox);
        Ok(())
    }

    /// Flatten to one record per edge: owners in ascending label order, and within an owner
    /// the neighbors in descending order. Each record is `(smaller, larger)`.
    pub fn into_edge_borders(self) -> Vec<EdgeBorder> {
        let mut out = Vec::with_capacity(self.n_edges);
        for (i, entries) in self.adj.into_iter().enumerate() {
            let owner = i as u32 + 1;
            for e in entries {
                out.push(EdgeBorder {
                    label: e.value,
                    neighbor: owner,
                    voxels: e.border,
                });
            }
        }
        out
    }
}

/// Insert `v` into the ascending, duplicate-free `set`, searching from `from`.
/// Every element before `from` must be smaller than `v`. Returns the position of `v`.
fn insert_sorted_from(set: &mut Vec<usize>, from: usize, v: usize) -> usize {
    debug_assert!(from <= set.len());
    debug_assert!(set[..from].iter().all(|&x| x < v));
    let pos = set[from..]
        .iter()
        .position(|&x| x >= v)
        .map_or(set.len(), |p| from + p);
    if pos == set.len() || set[pos] != v {
        set.insert(pos, v);
    }
    pos
}

/// Build the RAG and every edge's border set in one increasing-index scan of `vol`.
///
/// The scan skips a margin at each end of the buffer so that no step leaves it
/// (see `StepTable::scan_range`); pad the volume so those margins are background.
pub fn build_rag_sparse(
    vol: &LabelVol,
    n_supervoxels: u32,
    steps: &StepTable,
    nalloc_rag: usize,
    nalloc_borders: usize,
) -> RagResult<Vec<EdgeBorder>> {
    let t_start = Instant::now();
    let mut rag = SparseRag::new(n_supervoxels, nalloc_rag, nalloc_borders);

    for vox in steps.scan_range(vol.len()) {
        let label = vol.arr[vox];
        if label == 0 {
            continue;
        }
        for &step in steps.offsets() {
            // In range by construction of scan_range.
            let cvox = vox.wrapping_add_signed(step);
            let neighbor = vol.arr[cvox];
            rag.add_adjacency(vox, cvox, label, neighbor)?;
        }
    }

    log::info!(
        target: "perf",
        "sparse rag: {} edges in {} ms",
        rag.n_edges(),
        t_start.elapsed().as_millis()
    );
    Ok(rag.into_edge_borders())
}

/// Just the edges of a sparse build, in the same order as its border records.
pub fn edges_of(borders: &[EdgeBorder]) -> Vec<Edge> {
    borders.iter().map(EdgeBorder::edge).collect()
}
