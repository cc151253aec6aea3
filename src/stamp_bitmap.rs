/// Dense `h x w` bitmap that clears in O(1).
///
/// Each cell stores the generation in which it was last set. A cell reads as set
/// only if its stamp equals the current generation, so starting a new generation
/// clears every cell at once. Stamps are one byte, the same footprint as a plain
/// byte-per-cell scratch; the backing array is zero-filled once every 255 clears,
/// when the counter wraps.
#[derive(Debug, Clone)]
pub struct StampBitmap {
    pub w: usize,
    pub h: usize,
    pub s: usize, // stride: elements per row
    arr: Vec<u8>,
    generation: u8,
}

impl StampBitmap {
    pub fn new(w: usize, h: usize) -> Self {
        let s = w;
        let arr = vec![0; s * h];
        // Stamp 0 means "never set", so live generations start at 1.
        Self {
            w,
            h,
            s,
            arr,
            generation: 1,
        }
    }

    /// Logically clear every cell.
    pub fn clear(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.arr.fill(0);
            self.generation = 1;
        }
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.arr[y * self.s + x] == self.generation
    }

    /// Set `(x, y)`; returns true if it was not already set in this generation.
    #[inline(always)]
    pub fn test_and_set(&mut self, x: usize, y: usize) -> bool {
        let cell = &mut self.arr[y * self.s + x];
        if *cell == self.generation {
            return false;
        }
        *cell = self.generation;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_and_set_reports_first_visit_only() {
        let mut bm = StampBitmap::new(4, 2);
        assert!(bm.test_and_set(3, 1));
        assert!(!bm.test_and_set(3, 1));
        assert!(bm.get(3, 1));
        assert!(!bm.get(2, 1));
    }

    #[test]
    fn clear_forgets_previous_generation() {
        let mut bm = StampBitmap::new(3, 3);
        bm.test_and_set(0, 0);
        bm.test_and_set(2, 2);
        bm.clear();
        assert!(!bm.get(0, 0));
        assert!(!bm.get(2, 2));
        assert!(bm.test_and_set(0, 0));
    }

    #[test]
    fn generation_wrap_resets_storage() {
        let mut bm = StampBitmap::new(2, 1);
        bm.generation = u8::MAX;
        assert!(bm.test_and_set(1, 0));
        bm.clear();
        assert_eq!(bm.generation, 1);
        assert!(!bm.get(1, 0));
        assert!(bm.arr.iter().all(|&c| c == 0));
    }

    #[test]
    fn stale_stamps_never_read_as_set_across_wraps() {
        let mut bm = StampBitmap::new(3, 1);
        bm.test_and_set(0, 0);
        // Cell 0 keeps stamp 1 while the counter goes all the way around.
        for _ in 0..600 {
            bm.clear();
            assert!(!bm.get(0, 0));
        }
        assert!(bm.test_and_set(0, 0));
        assert_eq!(bm.arr.len(), 3);
    }
}
