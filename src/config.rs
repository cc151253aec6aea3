use crate::dense_rag::DenseRagBuilder;
use crate::dilation_borders::MismatchPolicy;
use crate::error::RagResult;
use crate::steps::Connectivity;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderKind {
    Dense,
    #[default]
    Sparse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorderKind {
    None,
    Dilation,
    #[default]
    Nearest,
}

/// Where the label volume comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VolumeDesc {
    /// Axis-aligned blocks of `block` voxels, each its own label.
    Synthetic {
        w: usize,
        h: usize,
        d: usize,
        block: usize,
    },
    /// One PNG per z slice, in order.
    Slices { paths: Vec<PathBuf> },
}

impl Default for VolumeDesc {
    fn default() -> Self {
        VolumeDesc::Synthetic {
            w: 64,
            h: 64,
            d: 64,
            block: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    pub volume: VolumeDesc,
    pub connectivity: Connectivity,
    /// Computed by sequential relabeling when absent.
    pub n_supervoxels: Option<u32>,
    pub builder: BuilderKind,
    pub borders: BorderKind,
    /// Background border added around the volume before any scan.
    pub pad: usize,

    pub label_jump: u32,
    pub adjacency_matrix: bool,
    pub edge_capacity: Option<usize>,

    pub nalloc_rag: usize,
    pub nalloc_borders: usize,

    /// Row width of the flat border export, including the 3 header fields.
    pub border_stride: Option<usize>,
    pub mismatch_policy: MismatchPolicy,
}

impl Default for RagConfig {
    fn default() -> Self {
        let dense = DenseRagBuilder::default();
        Self {
            volume: VolumeDesc::default(),
            connectivity: Connectivity::default(),
            n_supervoxels: None,
            builder: BuilderKind::default(),
            borders: BorderKind::default(),
            pad: 2,
            label_jump: dense.label_jump,
            adjacency_matrix: dense.adjacency_matrix,
            edge_capacity: dense.edge_capacity,
            nalloc_rag: 8,
            nalloc_borders: 64,
            border_stride: None,
            mismatch_policy: MismatchPolicy::default(),
        }
    }
}

impl RagConfig {
    pub fn dense_builder(&self) -> DenseRagBuilder {
        DenseRagBuilder {
            label_jump: self.label_jump,
            adjacency_matrix: self.adjacency_matrix,
            edge_capacity: self.edge_capacity,
        }
    }
}

pub fn parse_rag_config_json(json_text: &str) -> RagResult<RagConfig> {
    Ok(serde_json::from_str(json_text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RagError;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = parse_rag_config_json("{}").unwrap();
        assert_eq!(cfg.builder, BuilderKind::Sparse);
        assert_eq!(cfg.borders, BorderKind::Nearest);
        assert_eq!(cfg.connectivity, Connectivity::Face6);
        assert_eq!(cfg.mismatch_policy, MismatchPolicy::FailFast);
        assert_eq!(cfg.volume, VolumeDesc::default());
        assert_eq!(cfg.dense_builder(), DenseRagBuilder::default());
    }

    #[test]
    fn full_config_parses() {
        let cfg = parse_rag_config_json(
            r#"
            {
                "volume": { "kind": "slices", "paths": ["a.png", "b.png"] },
                "connectivity": "vertex26",
                "n_supervoxels": 500,
                "builder": "dense",
                "borders": "dilation",
                "pad": 2,
                "label_jump": 100,
                "adjacency_matrix": false,
                "edge_capacity": 10000,
                "border_stride": 4096,
                "mismatch_policy": "log_and_skip"
            }
            "#,
        )
        .unwrap();

        assert_eq!(
            cfg.volume,
            VolumeDesc::Slices {
                paths: vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
            }
        );
        assert_eq!(cfg.connectivity, Connectivity::Vertex26);
        assert_eq!(cfg.n_supervoxels, Some(500));
        assert_eq!(cfg.builder, BuilderKind::Dense);
        assert_eq!(cfg.borders, BorderKind::Dilation);
        assert_eq!(cfg.border_stride, Some(4096));
        assert_eq!(cfg.mismatch_policy, MismatchPolicy::LogAndSkip);

        let dense = cfg.dense_builder();
        assert_eq!(dense.label_jump, 100);
        assert!(!dense.adjacency_matrix);
        assert_eq!(dense.edge_capacity, Some(10000));
    }

    #[test]
    fn bad_enum_value_is_a_config_error() {
        let err = parse_rag_config_json(r#"{ "builder": "quadtree" }"#).unwrap_err();
        assert!(matches!(err, RagError::Config(_)));
    }
}
