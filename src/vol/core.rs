use crate::error::{RagError, RagResult};

/// A dense 3D volume, row-major: `x` is fastest, then `y`, then `z`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vol<T> {
    pub w: usize,
    pub h: usize,
    pub d: usize,
    pub arr: Vec<T>,
}

pub type LabelVol = Vol<u32>;

// Constructor
// -----------------------------------------------------------------------------
impl<T: Copy + Default> Vol<T> {
    pub fn new(w: usize, h: usize, d: usize) -> Self {
        let arr = vec![T::default(); w * h * d];
        Self { w, h, d, arr }
    }

    /// Wrap an existing buffer; its length must be exactly `w * h * d`.
    pub fn from_vec(w: usize, h: usize, d: usize, arr: Vec<T>) -> RagResult<Self> {
        let expected = w * h * d;
        if arr.len() != expected {
            return Err(RagError::ShapeMismatch {
                expected,
                actual: arr.len(),
            });
        }
        Ok(Self { w, h, d, arr })
    }

    /// Copy into a larger volume with a `pad`-voxel border of `T::default()` on every face.
    ///
    /// Step tables wrap across rows and slices of the linear buffer, so the pad must
    /// be at least the radius of the widest step table that will run over the result.
    pub fn padded(&self, pad: usize) -> Self {
        let mut out = Self::new(self.w + 2 * pad, self.h + 2 * pad, self.d + 2 * pad);
        for z in 0..self.d {
            for y in 0..self.h {
                let src = self.idx(0, y, z);
                let dst = out.idx(pad, y + pad, z + pad);
                out.arr[dst..dst + self.w].copy_from_slice(&self.arr[src..src + self.w]);
            }
        }
        out
    }
}

impl<T> Vol<T> {
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.arr.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.arr.is_empty()
    }

    #[inline(always)]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (z * self.h + y) * self.w + x
    }

    /// Inverse of `idx`.
    #[inline(always)]
    pub fn coords(&self, i: usize) -> (usize, usize, usize) {
        let x = i % self.w;
        let y = (i / self.w) % self.h;
        let z = i / (self.w * self.h);
        (x, y, z)
    }

    /// Linear index of `i + step`, or `None` when it falls outside the buffer.
    #[inline(always)]
    pub fn offset_index(&self, i: usize, step: isize) -> Option<usize> {
        let j = i.checked_add_signed(step)?;
        (j < self.arr.len()).then_some(j)
    }

    /// Map an index of a volume produced by `padded(pad)` back to this (unpadded) shape.
    /// Returns `None` for voxels that lie in the pad.
    pub fn unpad_index(&self, padded_i: usize, pad: usize) -> Option<usize> {
        let pw = self.w + 2 * pad;
        let ph = self.h + 2 * pad;
        let x = padded_i % pw;
        let y = (padded_i / pw) % ph;
        let z = padded_i / (pw * ph);
        if x < pad || y < pad || z < pad {
            return None;
        }
        let (x, y, z) = (x - pad, y - pad, z - pad);
        if x >= self.w || y >= self.h || z >= self.d {
            return None;
        }
        Some(self.idx(x, y, z))
    }
}

impl<T: Copy> Vol<T> {
    /// Value at `i + step`, or `None` when that lands outside the buffer.
    #[inline(always)]
    pub fn get_offset(&self, i: usize, step: isize) -> Option<T> {
        self.offset_index(i, step).map(|j| self.arr[j])
    }
}
