use crate::{
    context::Context,
    logistic::stretch,
    mixer::Mixer,
};

// Small Stationary Context Map -------------------------------------------------------------------------- Small Stationary Context Map
// Direct-mapped table of 16-bit probabilities. set() selects a 256-entry
// row for the whole-byte context; the partial byte c0 picks the entry.
pub struct SmallStationaryContextMap {
    t:     Vec<u16>,
    cxt:   usize,  // Start of the selected row
    cp:    usize,  // Entry used for the previous prediction
    mulc:  i32,
}
impl SmallStationaryContextMap {
    pub fn new(m: usize, mulc: i32) -> SmallStationaryContextMap {
        assert!((m / 2).is_power_of_two());
        SmallStationaryContextMap {
            t:    vec![32768; m / 2],
            cxt:  0,
            cp:   0,
            mulc,
        }
    }

    pub fn set(&mut self, cx: u32) {
        self.cxt = (cx as usize * 256) & (self.t.len() - 256);
    }

    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context) {
        // Adapt the previously used entry toward the observed bit,
        // slowing down after 4 MB of input
        let v = self.t[self.cp] as i32;
        let v = if ctx.pos < 4_000_000 {
            v + (((ctx.y << 16) - v + (1 << 8)) >> 9)
        }
        else {
            v + (((ctx.y << 16) - v + (1 << 9)) >> 10)
        };
        self.t[self.cp] = v as u16;

        self.cp = self.cxt + ctx.c0 as usize;
        m.add(stretch((self.t[self.cp] >> 4) as i32) * self.mulc / 32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_aligned_and_in_range() {
        let mut scm = SmallStationaryContextMap::new(0x2000, 12);
        scm.set(0xFFFF_FFFF);
        assert_eq!(scm.cxt % 256, 0);
        assert!(scm.cxt + 256 <= scm.t.len());
    }
}
