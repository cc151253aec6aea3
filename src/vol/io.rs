use super::core::Vol;
use crate::error::{RagError, RagResult};
use std::path::{Path, PathBuf};

// Helpers for u32 PNG packing/unpacking
// -----------------------------------------------------------------------------
fn dim_mismatch_err() -> image::ImageError {
    image::ImageError::Parameter(image::error::ParameterError::from_kind(
        image::error::ParameterErrorKind::DimensionMismatch,
    ))
}

fn pack_u32_as_rgba8(labels: &[u32]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::with_capacity(labels.len() * 4);
    for v in labels {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

fn unpack_rgba8_as_u32(raw_rgba: &[u8]) -> Result<Vec<u32>, image::ImageError> {
    if raw_rgba.len() % 4 != 0 {
        return Err(dim_mismatch_err());
    }

    let mut out: Vec<u32> = Vec::with_capacity(raw_rgba.len() / 4);
    for px in raw_rgba.chunks_exact(4) {
        out.push(u32::from_le_bytes([px[0], px[1], px[2], px[3]]));
    }
    Ok(out)
}

// PNG slice stacks
// -----------------------------------------------------------------------------
impl Vol<u32> {
    // PNG has no 32-bit single-channel integer format, so each label is packed
    // losslessly into the four RGBA8 bytes (little-endian).
    /// Write one PNG per z slice into `dir` as `{stem}_{z:04}.png`, returning the paths in z order.
    pub fn save_png_slices<P: AsRef<Path>>(&self, dir: P, stem: &str) -> RagResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let slice_len = self.w * self.h;
        let mut paths = Vec::with_capacity(self.d);
        for z in 0..self.d {
            let slice = &self.arr[z * slice_len..(z + 1) * slice_len];
            let img = image::RgbaImage::from_raw(
                self.w as u32,
                self.h as u32,
                pack_u32_as_rgba8(slice),
            )
            .ok_or_else(dim_mismatch_err)?;

            let path = dir.join(format!("{stem}_{z:04}.png"));
            img.save_with_format(&path, image::ImageFormat::Png)?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Stack PNG slices (in the given order) into a volume. All slices must share one size.
    pub fn load_png_slices<P: AsRef<Path>>(paths: &[P]) -> RagResult<Self> {
        let mut w = 0usize;
        let mut h = 0usize;
        let mut arr: Vec<u32> = Vec::new();

        for (z, path) in paths.iter().enumerate() {
            let img = image::open(path)?.into_rgba8();
            let (sw, sh) = (img.width() as usize, img.height() as usize);
            if z == 0 {
                w = sw;
                h = sh;
                arr.reserve(w * h * paths.len());
            } else if sw != w || sh != h {
                return Err(RagError::ShapeMismatch {
                    expected: w * h,
                    actual: sw * sh,
                });
            }

            let raw = img.into_raw();
            if raw.len() != w * h * 4 {
                return Err(dim_mismatch_err().into());
            }
            arr.extend(unpack_rgba8_as_u32(&raw)?);
        }

        Vol::from_vec(w, h, paths.len(), arr)
    }
}

// Tests
// -----------------------------------------------------------------------------
