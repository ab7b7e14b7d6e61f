use crate::{
    context::Context,
    hash_table::HashTable,
    ilog::ilog,
    mixer::Mixer,
};

// Run Context Map ---------------------------------------------------------------------------------------------------------- Run Context Map
// Maps a hashed context to the last byte seen in it and a repeat count.
// The record lives in the first two bytes of a bucket row, the count
// doubling as the slot's replacement priority.
pub struct RunContextMap {
    t:     HashTable,
    cp:    (usize, usize), // Bucket and slot of the current record
    mulc:  i32,            // Confidence scale fed to the mixer
}
impl RunContextMap {
    pub fn new(m: usize, mulc: i32) -> RunContextMap {
        RunContextMap {
            t:  HashTable::new(m),
            cp: (0, 0),
            mulc,
        }
    }

    /// Promote or reset the count for the byte just completed, then
    /// re-index to the new context.
    pub fn set(&mut self, cx: u32, b1: u32) {
        let (b, s) = self.cp;
        let row = &mut self.t.bucket(b).bh[s];
        if row[0] == 0 || row[1] != b1 as u8 {
            row[0] = 1;
            row[1] = b1 as u8;
        }
        else if row[0] < 255 {
            row[0] += 1;
        }
        self.cp = self.t.get(cx, 0);
    }

    /// Prediction for the next bit: signed log of the run length when the
    /// stored byte is consistent with the bits of the current byte so far.
    pub fn p(&mut self, ctx: &Context) -> i32 {
        let (b, s) = self.cp;
        let row = &self.t.bucket(b).bh[s];
        if (row[1] as u32 + 256) >> (8 - ctx.bpos) == ctx.c0 {
            let sign = ((row[1] >> (7 - ctx.bpos)) & 1) as i32 * 2 - 1;
            sign * ilog(row[0] as u16 + 1) * self.mulc
        }
        else {
            0
        }
    }

    /// Returns 1 if the context has a record.
    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context) -> i32 {
        let p = self.p(ctx);
        m.add(p);
        let (b, s) = self.cp;
        (self.t.bucket(b).bh[s][0] != 0) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_promotes_on_repeat_and_resets_on_change() {
        let mut rcm = RunContextMap::new(64 * 64, 14);
        rcm.set(7, 0);
        rcm.set(7, 0x41);
        rcm.set(7, 0x41);
        rcm.set(7, 0x41);
        let (b, s) = rcm.cp;
        assert_eq!(rcm.t.bucket(b).bh[s][0], 3);
        assert_eq!(rcm.t.bucket(b).bh[s][1], 0x41);

        rcm.set(7, 0x42);
        let (b, s) = rcm.cp;
        assert_eq!(rcm.t.bucket(b).bh[s][0], 1);
        assert_eq!(rcm.t.bucket(b).bh[s][1], 0x42);
    }
}
