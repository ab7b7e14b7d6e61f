use crate::{
    context::Context,
    hash_table::HashTable,
    ilog::ilog,
    logistic::stretch,
    mixer::Mixer,
    random::Random,
    state_table::nex,
    statemap::StateMap,
};

// Context Map ---------------------------------------------------------------------------------------------------------------- Context Map
//
// Binds each of C whole-byte contexts to bit history rows in the bucket
// table, with an integrated run model and a StateMap per context. set()
// is called once per context per byte; mix() runs every bit: it advances
// the referenced history with the observed bit, walks to the row position
// for the next bit (rehashing on bits 0, 2 and 5), and emits the run and
// bit history predictions. mix() returns the number of contexts with a
// nonzero state, which the driver uses as an order estimate.
//
// Rows for bits 2-7 of a byte are not written until the context is seen a
// second time; the pending state is recognized by a run count of exactly 2.

/// Push the bit history features for state s. The wide form carries five
/// inputs, the narrow one (record model contexts) four.
fn mix2(m: &mut Mixer, s: u8, sm: &mut StateMap, ctx: &Context) -> i32 {
    let p1 = sm.p(ctx.sm_add_y, ctx.sm_shft, s as usize);
    let n0 = -((nex(s, 2) == 0) as i32);
    let n1 = -((nex(s, 3) == 0) as i32);
    let st = stretch(p1);
    if ctx.cxtfl != 0 {
        m.add(st / 4);
        let p0 = 4095 - p1;
        m.add((p1 - p0) * 3 / 64);
        m.add(st * (n1 - n0) * 3 / 16);
        m.add(((p1 & n0) - (p0 & n1)) / 16);
        m.add(((p0 & n0) - (p1 & n1)) * 7 / 64);
        return (s > 0) as i32;
    }
    m.add(st * 9 / 32);
    m.add(st * (n1 - n0) * 3 / 16);
    let p0 = 4095 - p1;
    m.add(((p1 & n0) - (p0 & n1)) / 16);
    m.add(((p0 & n0) - (p1 & n1)) * 7 / 64);
    (s > 0) as i32
}

pub struct ContextMap {
    c:     usize,                  // Number of contexts
    t:     HashTable,
    cp:    Vec<Option<(usize, usize, usize)>>, // (bucket, slot, byte): current history
    cp0:   Vec<(usize, usize)>,    // Row the current byte started on
    cxt:   Vec<u32>,               // Permuted whole-byte context hashes
    runp:  Vec<(usize, usize)>,    // Row whose bytes 3..7 hold the run record
    sm:    Vec<StateMap>,
    cn:    usize,                  // Next context to set
    rnd:   Random,
}
impl ContextMap {
    pub fn new(m: usize, c: usize) -> ContextMap {
        assert!(m >= 64 && m.is_power_of_two());
        ContextMap {
            c,
            t:     HashTable::new(m),
            cp:    vec![None; c],
            cp0:   vec![(0, 0); c],
            cxt:   vec![0; c],
            runp:  vec![(0, 0); c],
            sm:    vec![StateMap::new(256); c],
            cn:    0,
            rnd:   Random::new(),
        }
    }

    /// Set the next whole-byte context. The value is permuted, not
    /// hashed, to spread the distribution.
    pub fn set(&mut self, cx: u32) {
        let i = self.cn;
        self.cn += 1;
        assert!(i < self.c);
        let cx = cx.wrapping_mul(123456791).wrapping_add(i as u32);
        let cx = cx << 16 | cx >> 16;
        self.cxt[i] = cx.wrapping_mul(987654323).wrapping_add(i as u32);
    }

    fn checksum(cx: u32, i: usize) -> u16 {
        ((cx >> 16) as u16).wrapping_add(i as u16)
    }

    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context) -> i32 {
        let cc = ctx.c0;
        let c1 = ctx.b1 as u8;
        let mask = self.t.mask();
        let mut result = 0;

        for i in 0..self.cn {
            // Advance the referenced history, with probabilistic
            // saturation near the top of the state table
            if let Some((b, s, k)) = self.cp[i] {
                let st = self.t.bucket(b).bh[s][k];
                let mut ns = nex(st, ctx.y as usize) as i32;
                if ns >= 204 && self.rnd.next() << (((452 - ns) >> 3) as u32) != 0 {
                    ns -= 4;
                }
                self.t.bucket(b).bh[s][k] = ns as u8;
            }

            // Walk to the row position for the next bit
            let run0 = {
                let (rb, rs) = self.runp[i];
                self.t.bucket(rb).bh[rs][3]
            };
            if ctx.bpos > 1 && run0 == 0 {
                self.cp[i] = None;
            }
            else if ctx.bpos == 1 || ctx.bpos == 3 || ctx.bpos == 6 {
                let (b, s) = self.cp0[i];
                self.cp[i] = Some((b, s, 1 + (cc & 1) as usize));
            }
            else if ctx.bpos == 4 || ctx.bpos == 7 {
                let (b, s) = self.cp0[i];
                self.cp[i] = Some((b, s, 3 + (cc & 3) as usize));
            }
            else {
                let chk = Self::checksum(self.cxt[i], i);
                let bi = self.cxt[i].wrapping_add(cc) as usize & mask;
                let slot = self.t.bucket(bi).get(chk);
                self.cp0[i] = (bi, slot);
                self.cp[i] = Some((bi, slot, 0));

                if ctx.bpos == 0 {
                    // Second sighting of this context: write the pending
                    // rows for bits 2-7 of the byte it recorded
                    if self.t.bucket(bi).bh[slot][3] == 2 {
                        let c = self.t.bucket(bi).bh[slot][4] as u32 + 256;
                        let sub = self.cxt[i].wrapping_add(c >> 6) as usize & mask;
                        let s1 = self.t.bucket(sub).get(chk);
                        let row = &mut self.t.bucket(sub).bh[s1];
                        row[0] = 1 + ((c >> 5) & 1) as u8;
                        let k = row[0] as usize;
                        row[k] = 1 + ((c >> 4) & 1) as u8;
                        row[3 + ((c >> 4) & 3) as usize] = 1 + ((c >> 3) & 1) as u8;

                        let sub = self.cxt[i].wrapping_add(c >> 3) as usize & mask;
                        let s2 = self.t.bucket(sub).get(chk);
                        let row = &mut self.t.bucket(sub).bh[s2];
                        row[0] = 1 + ((c >> 2) & 1) as u8;
                        let k = row[0] as usize;
                        row[k] = 1 + ((c >> 1) & 1) as u8;
                        row[3 + ((c >> 1) & 3) as usize] = 1 + (c & 1) as u8;

                        self.t.bucket(bi).bh[slot][6] = 0;
                    }

                    // Run record of the previous context
                    let (rb, rs) = self.runp[i];
                    let row = &mut self.t.bucket(rb).bh[rs];
                    if row[3] == 0 {
                        row[3] = 2;
                        row[4] = c1;
                    }
                    else if row[4] != c1 {
                        row[3] = 1;
                        row[4] = c1;
                    }
                    else if row[3] < 254 {
                        row[3] += 2;
                    }
                    self.runp[i] = (bi, slot);
                }
            }

            // Predict from the last byte seen in this context
            let (rb, rs) = self.runp[i];
            let rc = self.t.bucket(rb).bh[rs][3] as i32;
            let rbyte = self.t.bucket(rb).bh[rs][4] as u32;
            if (rbyte + 256) >> (8 - ctx.bpos) == cc {
                let sign = ((rbyte >> (7 - ctx.bpos)) & 1) as i32 * 2 - 1;
                let mut conf = ilog((rc + 1) as u16);
                if rc & 1 != 0 {
                    conf = conf * 15 / 4;
                }
                else {
                    conf *= 13;
                }
                m.add(sign * conf);
            }
            else {
                m.add(0);
            }

            // Predict from the bit history
            let s = match self.cp[i] {
                Some((b, sl, k)) => self.t.bucket(b).bh[sl][k],
                None => 0,
            };
            result += mix2(m, s, &mut self.sm[i], ctx);
        }
        if ctx.bpos == 7 {
            self.cn = 0;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(cm: &mut ContextMap, ctx: &mut Context, m: &mut Mixer, byte: u8, cx: u32) {
        for i in (0..8).rev() {
            if ctx.bpos == 0 {
                cm.set(cx);
            }
            m.update(ctx.y);
            cm.mix(m, ctx);
            ctx.update(((byte >> i) & 1) as i32);
        }
    }

    #[test]
    fn run_record_promotes_then_backfills() {
        let mut ctx = Context::new(0x10000);
        let mut cm = ContextMap::new(0x10000, 1);
        let mut m = Mixer::new(8, 8, 1, 0);

        step(&mut cm, &mut ctx, &mut m, 0x41, 0xABCD);
        step(&mut cm, &mut ctx, &mut m, 0x41, 0xABCD);
        // the boundary mix of the second byte recorded 0x41 once
        let (rb, rs) = cm.runp[0];
        assert_eq!(cm.t.bucket(rb).bh[rs][3], 2);
        assert_eq!(cm.t.bucket(rb).bh[rs][4], 0x41);

        // the third boundary promotes the count and backfills the
        // bit 2-7 rows of the recorded byte
        cm.set(0xABCD);
        m.update(ctx.y);
        cm.mix(&mut m, &ctx);
        let (rb, rs) = cm.runp[0];
        assert_eq!(cm.t.bucket(rb).bh[rs][3], 4);
        let c = 0x41u32 + 256;
        let mask = cm.t.mask();
        let sub = cm.cxt[0].wrapping_add(c >> 6) as usize & mask;
        let chk = ContextMap::checksum(cm.cxt[0], 0);
        let s1 = cm.t.bucket(sub).get(chk);
        assert_eq!(cm.t.bucket(sub).bh[s1][0], 1 + ((c >> 5) & 1) as u8);
    }

    #[test]
    fn byte_boundary_starts_from_empty_state() {
        let ctx = Context::new(0x10000);
        let mut cm = ContextMap::new(0x10000, 1);
        let mut m = Mixer::new(8, 8, 1, 0);
        cm.set(1);
        m.update(0);
        let present = cm.mix(&mut m, &ctx);
        assert_eq!(present, 0);
    }
}
