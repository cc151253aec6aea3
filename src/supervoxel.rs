//! Supervoxel bookkeeping around a RAG build: compacting labels so the
//! supervoxel count is tight, merging supervoxels into one label, and voting a
//! per-supervoxel type from per-voxel types.

use crate::error::{RagError, RagResult};
use crate::vol::{LabelVol, Vol};
use std::collections::HashMap;

/// Relabel so labels are `1..=n` in first-seen scan order. Background stays 0.
/// Returns the relabeled volume and `n`.
pub fn relabel_sequential(vol: &LabelVol) -> (LabelVol, u32) {
    let mut out = LabelVol::new(vol.w, vol.h, vol.d);
    let mut new_by_old: HashMap<u32, u32> = HashMap::new();
    let mut next = 1u32;

    for (dst, &src) in out.arr.iter_mut().zip(&vol.arr) {
        if src == 0 {
            continue;
        }
        *dst = *new_by_old.entry(src).or_insert_with(|| {
            let id = next;
            next += 1;
            id
        });
    }

    (out, next - 1)
}

/// Write `new_label` into `out` wherever `vol` carries one of `to_merge`. Other voxels of
/// `out` are left untouched.
pub fn merge_supervoxels(vol: &LabelVol, to_merge: &[u32], new_label: u32, out: &mut LabelVol) -> RagResult<()> {
    if out.len() != vol.len() {
        return Err(RagError::ShapeMismatch {
            expected: vol.len(),
            actual: out.len(),
        });
    }

    let mut merge = to_merge.to_vec();
    merge.sort_unstable();
    merge.dedup();

    for (dst, &src) in out.arr.iter_mut().zip(&vol.arr) {
        if merge.binary_search(&src).is_ok() {
            *dst = new_label;
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeVote {
    /// Winning type per supervoxel, indexed by `label - 1`.
    pub supervoxel_types: Vec<u8>,
    /// Each labeled voxel's supervoxel type; background voxels are 0.
    pub voxel_types: Vol<u8>,
}

/// Majority vote of `voxel_types` within each supervoxel.
///
/// Voxel types `>= num_types` do not vote. Ties go to the higher type, and a supervoxel
/// with no votes gets the highest type.
pub fn type_components(
    labels: &LabelVol,
    voxel_types: &Vol<u8>,
    num_types: u8,
    n_supervoxels: u32,
) -> RagResult<TypeVote> {
    if voxel_types.len() != labels.len() {
        return Err(RagError::ShapeMismatch {
            expected: labels.len(),
            actual: voxel_types.len(),
        });
    }

    let n = n_supervoxels as usize;
    let n_types = num_types as usize;
    let mut counts = vec![0u64; n_types * n];
    for (vox, (&label, &ty)) in labels.arr.iter().zip(&voxel_types.arr).enumerate() {
        if label == 0 || ty >= num_types {
            continue;
        }
        if label > n_supervoxels {
            return Err(RagError::LabelOutOfRange {
                voxel: vox,
                label,
                n_supervoxels,
            });
        }
        counts[ty as usize * n + label as usize - 1] += 1;
    }

    let supervoxel_types: Vec<u8> = (0..n)
        .map(|sv| {
            let mut best = 0u8;
            let mut best_count = 0u64;
            for ty in 0..n_types {
                let c = counts[ty * n + sv];
                if c >= best_count {
                    best_count = c;
                    best = ty as u8;
                }
            }
            best
        })
        .collect();

    let mut out = Vol::<u8>::new(labels.w, labels.h, labels.d);
    for (vox, &label) in labels.arr.iter().enumerate() {
        if label == 0 {
            continue;
        }
        // The range check above only covered voxels that voted.
        let Some(&ty) = supervoxel_types.get(label as usize - 1) else {
            return Err(RagError::LabelOutOfRange {
                voxel: vox,
                label,
                n_supervoxels,
            });
        };
        out.arr[vox] = ty;
    }

    Ok(TypeVote {
        supervoxel_types,
        voxel_types: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::vol_from_ascii;

    #[test]
    fn relabel_sequential_compacts_in_scan_order() {
        let vol = vol_from_ascii(&["
            0770
            2290
        "]);
        let (out, n) = relabel_sequential(&vol);
        assert_eq!(n, 3);
        assert_eq!(out.arr, vec![0, 1, 1, 0, 2, 2, 3, 0]);
    }

    #[test]
    fn relabel_sequential_of_background_is_empty() {
        let (out, n) = relabel_sequential(&LabelVol::new(2, 2, 2));
        assert_eq!(n, 0);
        assert!(out.arr.iter().all(|&v| v == 0));
    }

    #[test]
    fn merge_supervoxels_overwrites_only_members() {
        let vol = vol_from_ascii(&["1234"]);
        let mut out = vol.clone();
        merge_supervoxels(&vol, &[4, 2], 9, &mut out).unwrap();
        assert_eq!(out.arr, vec![1, 9, 3, 9]);

        let mut wrong = LabelVol::new(3, 1, 1);
        assert!(merge_supervoxels(&vol, &[1], 9, &mut wrong).is_err());
    }

    #[test]
    fn type_components_majority_with_high_tie_break() {
        let labels = vol_from_ascii(&["11122"]);
        let types = Vol::<u8>::from_vec(5, 1, 1, vec![0, 1, 1, 0, 1]).unwrap();
        let vote = type_components(&labels, &types, 2, 2).unwrap();
        assert_eq!(vote.supervoxel_types, vec![1, 1]);
        assert_eq!(vote.voxel_types.arr, vec![1, 1, 1, 1, 1]);
    }

    #[test]
    fn type_components_ignores_out_of_range_types_and_background() {
        let labels = vol_from_ascii(&["0112"]);
        let types = Vol::<u8>::from_vec(4, 1, 1, vec![1, 0, 7, 7]).unwrap();
        let vote = type_components(&labels, &types, 2, 2).unwrap();
        // Label 1 has one vote for type 0; label 2 has none and falls to the highest type.
        assert_eq!(vote.supervoxel_types, vec![0, 1]);
        assert_eq!(vote.voxel_types.arr, vec![0, 0, 0, 1]);
    }
}
