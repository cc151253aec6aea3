//! Border extraction by two-ring dilation intersection.
//!
//! For a voxel `v` of label `a` and a voxel `u` of a larger label `b` within the
//! 2-ring of `v`, the voxels lying in both 1-ring dilations (around `u` and around
//! `v`) and labeled `a` or `b` form part of the `(a, b)` boundary. The edge list
//! produced by a RAG build is used as the index of which `(a, b)` pairs exist.
//! Directly touching `(a, b)` pairs are recorded too, so every border holds at
//! least the voxels that touch across the edge.

use crate::edge::{Edge, EdgeBorder, seed_border_records};
use crate::error::{RagError, RagResult};
use crate::steps::StepTable;
use crate::vol::LabelVol;
use serde::Deserialize;
use std::ops::Range;
use std::time::Instant;

/// What to do when the edge list or the border records contradict the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Abort the extraction with an error.
    #[default]
    FailFast,
    /// Warn and skip the offending adjacency.
    LogAndSkip,
}

#[derive(Debug, Clone)]
pub struct DilationExtractor {
    pub ring1: StepTable,
    pub ring2: StepTable,
    pub policy: MismatchPolicy,
}

/// Scratch for one intersection: the 1-ring around each of the two centers.
struct DilationScratch {
    around_u: Vec<Option<usize>>,
    around_v: Vec<Option<usize>>,
}

impl DilationScratch {
    fn new(ring_len: usize) -> Self {
        Self {
            around_u: vec![None; ring_len],
            around_v: vec![None; ring_len],
        }
    }

    /// Append every voxel adjacent to both `u` and `v` that carries one of `pair` to
    /// `voxels`, skipping ones already present.
    ///
    /// The pairwise O(ring^2) comparison and the linear presence scan are faster than
    /// hashed lookups at these ring sizes.
    fn intersect_into(
        &mut self,
        vol: &LabelVol,
        ring1: &StepTable,
        (u, v): (usize, usize),
        pair: (u32, u32),
        voxels: &mut Vec<usize>,
    ) {
        for (k, &step) in ring1.offsets().iter().enumerate() {
            self.around_u[k] = vol.offset_index(u, step);
            self.around_v[k] = vol.offset_index(v, step);
        }

        for &du in &self.around_u {
            let Some(du) = du else { continue };
            for &dv in &self.around_v {
                if Some(du) != dv {
                    continue;
                }
                let l = vol.arr[du];
                if l == pair.0 || l == pair.1 {
                    push_unique(voxels, du);
                }
            }
        }
    }
}

#[inline(always)]
fn push_unique(voxels: &mut Vec<usize>, v: usize) {
    if !voxels.contains(&v) {
        voxels.push(v);
    }
}

/// Position range of the first contiguous run of edges whose smaller label is `label`.
///
/// A linear rescan of the whole list, done once per label change during the volume scan.
fn edge_run(edges: &[Edge], label: u32) -> Range<usize> {
    let Some(start) = edges.iter().position(|e| e.a == label) else {
        return 0..0;
    };
    let len = edges[start..].iter().take_while(|e| e.a == label).count();
    start..start + len
}

impl DilationExtractor {
    pub fn new(ring1: StepTable, policy: MismatchPolicy) -> Self {
        let ring2 = ring1.dilated();
        Self {
            ring1,
            ring2,
            policy,
        }
    }

    /// One border record per edge of `edges` (same order), voxels sorted ascending.
    ///
    /// `edges` must be grouped by smaller label, as a dense build returns them.
    pub fn extract(&self, vol: &LabelVol, edges: &[Edge]) -> RagResult<Vec<EdgeBorder>> {
        let mut records = seed_border_records(edges);
        self.extract_into(vol, edges, &mut records)?;
        Ok(records)
    }

    /// Like `extract`, but fills caller-provided records, which must be positionally
    /// aligned with `edges`. Voxels already in a record are kept.
    pub fn extract_into(&self, vol: &LabelVol, edges: &[Edge], records: &mut [EdgeBorder]) -> RagResult<()> {
        if records.len() < edges.len() {
            return Err(RagError::CapacityExceeded {
                what: "border records",
                needed: edges.len(),
                capacity: records.len(),
            });
        }

        let t_start = Instant::now();
        let mut scratch = DilationScratch::new(self.ring1.len());
        let mut prev_label: Option<u32> = None;
        let mut run: Range<usize> = 0..0;
        let mut n_skipped = 0usize;

        for (vox, &label) in vol.arr.iter().enumerate() {
            if label == 0 {
                continue;
            }
            if prev_label != Some(label) {
                run = edge_run(edges, label);
                prev_label = Some(label);
            }

            // Boundary voxels two steps out, restricted to edges this label owns.
            if !run.is_empty() {
                for &step in self.ring2.offsets() {
                    let Some(u) = vol.offset_index(vox, step) else {
                        continue;
                    };
                    let neighbor = vol.arr[u];
                    if neighbor <= label {
                        continue;
                    }
                    let Some(p) = edges[run.clone()].iter().position(|e| e.b == neighbor) else {
                        continue;
                    };
                    if let Some(rec) = self.checked_record(records, run.start + p, vox, label, neighbor)? {
                        scratch.intersect_into(vol, &self.ring1, (u, vox), (label, neighbor), &mut rec.voxels);
                    } else {
                        n_skipped += 1;
                    }
                }
            }

            // Direct neighbors, which the two-ring pass can miss.
            for &step in self.ring1.offsets() {
                let Some(u) = vol.offset_index(vox, step) else {
                    continue;
                };
                let neighbor = vol.arr[u];
                if neighbor <= label {
                    continue;
                }
                let Some(p) = edges[run.clone()].iter().position(|e| e.b == neighbor) else {
                    self.violation(RagError::EdgeNotIndexed {
                        voxel: vox,
                        label,
                        neighbor,
                    })?;
                    n_skipped += 1;
                    continue;
                };
                if let Some(rec) = self.checked_record(records, run.start + p, vox, label, neighbor)? {
                    // The touching pair itself is in neither 1-ring.
                    push_unique(&mut rec.voxels, vox);
                    push_unique(&mut rec.voxels, u);
                    scratch.intersect_into(vol, &self.ring1, (u, vox), (label, neighbor), &mut rec.voxels);
                } else {
                    n_skipped += 1;
                }
            }
        }

        for rec in records.iter_mut() {
            rec.voxels.sort_unstable();
        }

        if n_skipped > 0 {
            log::warn!("dilation borders: skipped {n_skipped} inconsistent adjacencies");
        }
        log::info!(
            target: "perf",
            "dilation borders: {} records in {} ms",
            edges.len(),
            t_start.elapsed().as_millis()
        );
        Ok(())
    }

    /// The record at `i` if it carries `(label, neighbor)`; otherwise apply the policy.
    fn checked_record<'r>(
        &self,
        records: &'r mut [EdgeBorder],
        i: usize,
        vox: usize,
        label: u32,
        neighbor: u32,
    ) -> RagResult<Option<&'r mut EdgeBorder>> {
        let (found_label, found_neighbor) = (records[i].label, records[i].neighbor);
        if found_label == label && found_neighbor == neighbor {
            return Ok(Some(&mut records[i]));
        }
        self.violation(RagError::RecordMismatch {
            record: i,
            label,
            neighbor,
            found_label,
            found_neighbor,
        })?;
        log::debug!("dilation borders: record {i} mismatched at voxel {vox}");
        Ok(None)
    }

    fn violation(&self, err: RagError) -> RagResult<()> {
        match self.policy {
            MismatchPolicy::FailFast => Err(err),
            MismatchPolicy::LogAndSkip => {
                log::warn!("{err}");
                Ok(())
            }
        }
    }
}
