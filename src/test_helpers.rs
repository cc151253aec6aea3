use crate::vol::LabelVol;

/// Build a volume from ASCII z slices, one digit per voxel. All slices must share one shape.
pub fn vol_from_ascii(slices: &[&str]) -> LabelVol {
    assert!(!slices.is_empty(), "need at least one slice");

    let mut w = 0usize;
    let mut h = 0usize;
    let mut arr: Vec<u32> = Vec::new();
    for (z, grid) in slices.iter().enumerate() {
        let rows: Vec<&str> = grid
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        assert!(!rows.is_empty(), "slice {z} has no rows");
        if z == 0 {
            w = rows[0].len();
            h = rows.len();
        }
        assert_eq!(rows.len(), h, "slice {z} height mismatch");
        for r in &rows {
            assert_eq!(r.len(), w, "all rows must have equal length");
            for ch in r.chars() {
                let v = ch
                    .to_digit(10)
                    .unwrap_or_else(|| panic!("invalid label char '{ch}', expected digit"));
                arr.push(v);
            }
        }
    }

    LabelVol::from_vec(w, h, slices.len(), arr).unwrap()
}

/// `vol_from_ascii` with a one-voxel background pad on every face.
pub fn padded_vol_from_ascii(slices: &[&str]) -> LabelVol {
    vol_from_ascii(slices).padded(1)
}

/// A 3x3x3 cube, padded by 1, with label 1 where `x < 1` and label 2 elsewhere.
/// Also returns the sorted padded indices of the voxels on either side of the `x=0/x=1` face.
pub fn two_halves_vol() -> (LabelVol, Vec<usize>) {
    let mut cube = LabelVol::new(3, 3, 3);
    for z in 0..3 {
        for y in 0..3 {
            for x in 0..3 {
                let i = cube.idx(x, y, z);
                cube.arr[i] = if x < 1 { 1 } else { 2 };
            }
        }
    }

    let vol = cube.padded(1);
    let mut expected = Vec::new();
    for z in 1..4 {
        for y in 1..4 {
            expected.push(vol.idx(1, y, z));
            expected.push(vol.idx(2, y, z));
        }
    }
    expected.sort_unstable();
    (vol, expected)
}

/// xorshift64*, enough for reproducible fixtures.
pub struct Rng(u64);

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.0 = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    pub fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// Unpadded volume of random 2x2x2 blocks labeled `0..=n_labels` (0 is background,
/// about one block in eight).
pub fn random_blocky_vol(w: usize, h: usize, d: usize, n_labels: u32, seed: u64) -> LabelVol {
    let mut rng = Rng::new(seed);
    let (bw, bh, bd) = (w.div_ceil(2), h.div_ceil(2), d.div_ceil(2));
    let blocks: Vec<u32> = (0..bw * bh * bd)
        .map(|_| {
            if rng.below(8) == 0 {
                0
            } else {
                1 + rng.below(n_labels as u64) as u32
            }
        })
        .collect();

    let mut vol = LabelVol::new(w, h, d);
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                let b = ((z / 2) * bh + y / 2) * bw + x / 2;
                let i = vol.idx(x, y, z);
                vol.arr[i] = blocks[b];
            }
        }
    }
    vol
}
