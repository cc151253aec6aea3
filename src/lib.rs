// Library crate root.
//
// Region-adjacency graphs over labeled 3D volumes, plus per-edge border voxels.
// The binary (src/main.rs) is a thin driver over these modules.

pub mod config;
pub mod dense_rag;
pub mod dilation_borders;
pub mod edge;
pub mod error;
pub mod nearest_borders;
pub mod sparse_rag;
pub mod stamp_bitmap;
pub mod steps;
pub mod supervoxel;
pub mod vol;

pub use dense_rag::DenseRagBuilder;
pub use dilation_borders::{DilationExtractor, MismatchPolicy};
pub use edge::{Edge, EdgeBorder};
pub use error::{RagError, RagResult};
pub use nearest_borders::extract_nearest_borders;
pub use sparse_rag::{SparseRag, build_rag_sparse};
pub use steps::{Connectivity, StepTable};
pub use vol::{LabelVol, Vol};

#[cfg(test)]
pub mod test_helpers;
