/// Every way a RAG build or border extraction can refuse its inputs.
///
/// These are caller-contract violations (buffers sized too small, edge lists
/// that are not grouped by label, chunk sizes that overflow the dense index).
/// None of them are recoverable inside a single call.
#[derive(Debug, thiserror::Error)]
pub enum RagError {
    /// A result did not fit the capacity the caller provisioned.
    #[error("{what} capacity exceeded: need {needed}, have {capacity}")]
    CapacityExceeded {
        what: &'static str,
        needed: usize,
        capacity: usize,
    },

    /// `label_jump * n_supervoxels` would not fit a 32-bit dense index.
    #[error(
        "label_jump {label_jump} overflows the dense index for {n_supervoxels} supervoxels (must be < {limit})"
    )]
    LabelJumpOverflow {
        label_jump: u32,
        n_supervoxels: u32,
        limit: u32,
    },

    #[error("label_jump must be at least 1")]
    ZeroLabelJump,

    #[error("voxel {voxel} has label {label}, outside 1..={n_supervoxels}")]
    LabelOutOfRange {
        voxel: usize,
        label: u32,
        n_supervoxels: u32,
    },

    /// The edge list has no entry for an adjacency seen in the volume, inside
    /// the contiguous run of edges for `label`.
    #[error("edge ({label}, {neighbor}) seen at voxel {voxel} is missing from the edge run of label {label}")]
    EdgeNotIndexed {
        voxel: usize,
        label: u32,
        neighbor: u32,
    },

    /// A border record does not carry the edge its position claims.
    #[error(
        "border record {record} holds edge ({found_label}, {found_neighbor}), expected ({label}, {neighbor})"
    )]
    RecordMismatch {
        record: usize,
        label: u32,
        neighbor: u32,
        found_label: u32,
        found_neighbor: u32,
    },

    #[error("shape mismatch: expected {expected} elements, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("voxel index {0} does not fit in 32 bits")]
    VoxelIndexOverflow(usize),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "vol-io")]
    #[error("image io: {0}")]
    Image(#[from] image::ImageError),
}

pub type RagResult<T> = Result<T, RagError>;
