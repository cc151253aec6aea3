use std::process::ExitCode;
use std::time::Instant;
use svrag::config::{BorderKind, BuilderKind, RagConfig, VolumeDesc, parse_rag_config_json};
use svrag::edge::{Edge, EdgeBorder, borders_to_flat};
use svrag::sparse_rag::edges_of;
use svrag::supervoxel::relabel_sequential;
use svrag::{
    DilationExtractor, LabelVol, RagError, RagResult, StepTable, build_rag_sparse,
    extract_nearest_borders,
};

const DEFAULT_CONFIG_JSON: &str = r#"
    {
        "volume": { "kind": "synthetic", "w": 96, "h": 96, "d": 48, "block": 6 },
        "connectivity": "face6",
        "builder": "dense",
        "borders": "dilation",
        "pad": 2,
        "label_jump": 512,
        "adjacency_matrix": true,
        "nalloc_rag": 8,
        "nalloc_borders": 64,
        "border_stride": 8192,
        "mismatch_policy": "fail_fast"
    }
"#;

/// Axis-aligned blocks, each with its own label, in scan order.
fn synthetic_block_vol(w: usize, h: usize, d: usize, block: usize) -> LabelVol {
    let block = block.max(1);
    let (bw, bh) = (w.div_ceil(block), h.div_ceil(block));
    let mut vol = LabelVol::new(w, h, d);
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                let b = ((z / block) * bh + y / block) * bw + x / block;
                let i = vol.idx(x, y, z);
                vol.arr[i] = b as u32 + 1;
            }
        }
    }
    vol
}

fn load_volume(desc: &VolumeDesc) -> RagResult<LabelVol> {
    match desc {
        VolumeDesc::Synthetic { w, h, d, block } => Ok(synthetic_block_vol(*w, *h, *d, *block)),
        #[cfg(feature = "vol-io")]
        VolumeDesc::Slices { paths } => LabelVol::load_png_slices(paths),
        #[cfg(not(feature = "vol-io"))]
        VolumeDesc::Slices { .. } => Err(RagError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "PNG slices need the vol-io feature",
        ))),
    }
}

fn run(cfg: &RagConfig) -> RagResult<()> {
    let raw = load_volume(&cfg.volume)?;
    let (raw, n_supervoxels) = match cfg.n_supervoxels {
        Some(n) => (raw, n),
        None => relabel_sequential(&raw),
    };
    println!(
        "volume {}x{}x{}, {} supervoxels, pad {}",
        raw.w, raw.h, raw.d, n_supervoxels, cfg.pad
    );

    let vol = raw.padded(cfg.pad);
    let steps = StepTable::for_connectivity(cfg.connectivity, vol.w, vol.h);

    let t_start = Instant::now();
    let (edges, borders): (Vec<Edge>, Option<Vec<EdgeBorder>>) = match cfg.builder {
        BuilderKind::Dense => {
            let edges = cfg.dense_builder().build(&vol, n_supervoxels, &steps)?;
            let borders = match cfg.borders {
                BorderKind::None => None,
                BorderKind::Nearest => Some(extract_nearest_borders(&vol, &steps)),
                BorderKind::Dilation => Some(
                    DilationExtractor::new(steps.clone(), cfg.mismatch_policy).extract(&vol, &edges)?,
                ),
            };
            (edges, borders)
        }
        BuilderKind::Sparse => {
            let sparse = build_rag_sparse(&vol, n_supervoxels, &steps, cfg.nalloc_rag, cfg.nalloc_borders)?;
            let mut edges = edges_of(&sparse);
            let borders = match cfg.borders {
                BorderKind::None => None,
                // Same single-ring contact rule, already computed by the sparse scan.
                BorderKind::Nearest => Some(sparse),
                BorderKind::Dilation => {
                    // The extractor needs edges grouped by smaller label.
                    edges.sort_unstable();
                    Some(DilationExtractor::new(steps.clone(), cfg.mismatch_policy).extract(&vol, &edges)?)
                }
            };
            (edges, borders)
        }
    };
    let elapsed_ms = t_start.elapsed().as_millis();

    println!("{:?} builder: {} edges", cfg.builder, edges.len());
    if let Some(borders) = &borders {
        let n_voxels: usize = borders.iter().map(|b| b.voxels.len()).sum();
        let widest = borders.iter().map(|b| b.voxels.len()).max().unwrap_or(0);
        println!(
            "{:?} borders: {} records, {} voxels, widest {}",
            cfg.borders,
            borders.len(),
            n_voxels,
            widest
        );

        if let Some(stride) = cfg.border_stride {
            let flat = borders_to_flat(borders, stride)?;
            println!("flat border buffer: {} x {} u32", flat.len() / stride.max(1), stride);
        }
    }
    println!("total {elapsed_ms} ms");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let cfg_text = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("cannot read config {path}: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_CONFIG_JSON.to_string(),
    };

    let result = parse_rag_config_json(&cfg_text).and_then(|cfg| run(&cfg));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ RagError::Config(_)) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
