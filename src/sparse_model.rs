use crate::{
    context::Context,
    context_map::ContextMap,
    mixer::Mixer,
    stationary::SmallStationaryContextMap,
};

// Sparse Model -------------------------------------------------------------------------------------------------------------- Sparse Model
// Order 1-2 contexts with gaps, plus direct single-byte and text-feature
// contexts over small stationary tables.
pub struct SparseModel {
    cn:    ContextMap,
    scm1:  SmallStationaryContextMap,
    scm2:  SmallStationaryContextMap,
    scm3:  SmallStationaryContextMap,
    scm4:  SmallStationaryContextMap,
    scm5:  SmallStationaryContextMap,
    scm6:  SmallStationaryContextMap,
    scm7:  SmallStationaryContextMap,
    scm8:  SmallStationaryContextMap,
    scm9:  SmallStationaryContextMap,
    scma:  SmallStationaryContextMap,
}
impl SparseModel {
    pub fn new(mem: usize) -> SparseModel {
        SparseModel {
            cn:    ContextMap::new(mem * 2, 5),
            scm1:  SmallStationaryContextMap::new(0x20000, 17),
            scm2:  SmallStationaryContextMap::new(0x20000, 12),
            scm3:  SmallStationaryContextMap::new(0x20000, 12),
            scm4:  SmallStationaryContextMap::new(0x20000, 13),
            scm5:  SmallStationaryContextMap::new(0x10000, 12),
            scm6:  SmallStationaryContextMap::new(0x20000, 12),
            scm7:  SmallStationaryContextMap::new(0x2000, 12),
            scm8:  SmallStationaryContextMap::new(0x8000, 13),
            scm9:  SmallStationaryContextMap::new(0x1000, 12),
            scma:  SmallStationaryContextMap::new(0x10000, 16),
        }
    }

    pub fn mix(&mut self, m: &mut Mixer, ctx: &Context) {
        if ctx.bpos == 0 {
            self.cn.set(ctx.words & 0x1FFFF);
            self.cn.set((ctx.f4 & 0x000FFFFF).wrapping_mul(7));
            self.cn.set((ctx.x4 & 0xF8F8F8F8).wrapping_add(3));
            self.cn.set((ctx.tt & 0x00000FFF).wrapping_mul(9));
            self.cn.set((ctx.x4 & 0x80F0F0FF).wrapping_add(6));
            self.scm1.set(ctx.b1);
            self.scm2.set(ctx.b2);
            self.scm3.set(ctx.b3);
            self.scm4.set(ctx.b4);
            self.scm5.set(ctx.words & 127);
            self.scm6.set((ctx.words & 12) * 16 + (ctx.w4 & 12) * 4 + (ctx.b1 >> 4));
            self.scm7.set(ctx.w4 & 15);
            self.scm8.set(ctx.spafdo * (((ctx.w4 & 3) == 1) as u32));
            self.scm9.set(ctx.col * (ctx.b1 == 32) as u32);
            self.scma.set(ctx.frstchar);
        }
        self.cn.mix(m, ctx);
        self.scm1.mix(m, ctx);
        self.scm2.mix(m, ctx);
        self.scm3.mix(m, ctx);
        self.scm4.mix(m, ctx);
        self.scm5.mix(m, ctx);
        self.scm6.mix(m, ctx);
        self.scm7.mix(m, ctx);
        self.scm8.mix(m, ctx);
        self.scm9.mix(m, ctx);
        self.scma.mix(m, ctx);
    }
}
