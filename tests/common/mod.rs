#![allow(dead_code)]

use svrag::LabelVol;

/// Deterministic blocky label volume: 2x2x2 blocks, labels `1..=n_labels`, some background.
pub fn blocky_vol(w: usize, h: usize, d: usize, n_labels: u32, seed: u64) -> LabelVol {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    let (bw, bh, bd) = (w.div_ceil(2), h.div_ceil(2), d.div_ceil(2));
    let blocks: Vec<u32> = (0..bw * bh * bd)
        .map(|_| {
            let r = next();
            if r % 9 == 0 { 0 } else { 1 + (r / 9 % n_labels as u64) as u32 }
        })
        .collect();

    let mut vol = LabelVol::new(w, h, d);
    for z in 0..d {
        for y in 0..h {
            for x in 0..w {
                let i = vol.idx(x, y, z);
                vol.arr[i] = blocks[((z / 2) * bh + y / 2) * bw + x / 2];
            }
        }
    }
    vol
}
