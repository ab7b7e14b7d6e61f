use crate::state_table::nex;

// State Map -------------------------------------------------------------------------------------------------------------------- State Map
//
// Maps a bit history state (or any small context) to a 12-bit probability.
// Entries start at the probability implied by the state's (n0, n1) counts,
// with a x128 boost when one side is zero. The entry queried on the
// previous bit is nudged toward the freshly observed bit before the new
// context is served: t[prev] += (sm_add_y - t[prev]) >> sm_shft, where
// sm_add_y is sm_add if that bit was a 1 and 0 otherwise.
#[derive(Clone)]
pub struct StateMap {
    cxt:  usize,    // Context of last prediction
    t:    Vec<u16>, // Context -> probability * 64K
}
impl StateMap {
    pub fn new(n: usize) -> StateMap {
        StateMap {
            cxt:  0,
            t:    (0..n).map(|i| {
                      let mut n0 = nex((i & 255) as u8, 2) as u32;
                      let mut n1 = nex((i & 255) as u8, 3) as u32;
                      if n0 == 0 { n1 *= 128; }
                      if n1 == 0 { n0 *= 128; }
                      (65536 * (n1 + 1) / (n0 + n1 + 2)) as u16
                  })
                  .collect(),
        }
    }
    pub fn p(&mut self, sm_add_y: i32, sm_shft: i32, cx: usize) -> i32 {
        assert!(cx < self.t.len());
        let q = self.t[self.cxt] as i32;
        self.t[self.cxt] = (q + ((sm_add_y - q) >> sm_shft)) as u16;
        self.cxt = cx;
        (self.t[cx] >> 4) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_under_constant_ones() {
        let mut sm = StateMap::new(256);
        let (sm_add, sm_shft) = (65535 + 127, 7);
        let mut last = 0;
        for _ in 0..2000 {
            last = sm.p(sm_add, sm_shft, 5);
        }
        // fixpoint of q += (sm_add - q) >> 7, served as q >> 4
        assert!(last > 4080, "p = {last}");
    }

    #[test]
    fn converges_under_constant_zeros() {
        let mut sm = StateMap::new(256);
        let mut last = 4095;
        for _ in 0..2000 {
            last = sm.p(0, 7, 5);
        }
        assert!(last < 16, "p = {last}");
    }

    #[test]
    fn update_lands_on_previous_context() {
        let mut sm = StateMap::new(256);
        let a0 = sm.p(0, 7, 10);            // serve 10, train 0
        let _  = sm.p(65535 + 127, 7, 20);  // train 10 toward 1
        let a1 = sm.p(0, 7, 10);            // train 20, serve 10 again
        assert!(a1 > a0, "entry 10 was not trained: {a0} -> {a1}");
    }
}
