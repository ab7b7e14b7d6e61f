use crate::{
    context::Context,
    context_map::ContextMap,
    ilog::llog,
    mixer::Mixer,
};

// Record Model -------------------------------------------------------------------------------------------------------------- Record Model
//
// Models 2-D data with a fixed record length by keying contexts on the
// distance to the last occurrence of the current byte and byte pair.
// Three of the five maps run with the narrow bit history form: the
// cxtfl gate is dropped around them and restored after.
pub struct RecordModel {
    cpos1:  Vec<i32>, // Byte -> last position seen
    wpos1:  Vec<i32>, // Byte pair -> last position seen
    cm:     ContextMap,
    cn:     ContextMap,
    co:     ContextMap,
    cp:     ContextMap,
    cq:     ContextMap,
}
impl RecordModel {
    pub fn new() -> RecordModel {
        RecordModel {
            cpos1:  vec![0; 256],
            wpos1:  vec![0; 0x10000],
            cm:     ContextMap::new(32768 / 4, 2),
            cn:     ContextMap::new(32768 / 2, 5),
            co:     ContextMap::new(32768, 4),
            cp:     ContextMap::new(32768 * 2, 3),
            cq:     ContextMap::new(32768 * 4, 3),
        }
    }

    pub fn mix(&mut self, m: &mut Mixer, ctx: &mut Context) {
        if ctx.bpos == 0 {
            let c = ctx.b1 as usize;
            let w = ((ctx.b2 << 8) + ctx.b1) as usize;
            let d = w & 0xF0FF;
            let e = ctx.c4 & 0xFFFFFF;

            self.cm.set((c as u32) << 8 | ((ctx.pos as i32 - self.cpos1[c]).min(255) / 4) as u32);
            self.cm.set((w as u32) << 9 | (llog((ctx.pos as i32 - self.wpos1[w]) as u32) >> 2) as u32);

            self.cn.set(w as u32);
            self.cn.set((d as u32) << 8);
            self.cn.set((c as u32) << 16);
            self.cn.set((ctx.f4 & 0xFFFF) << 3);
            let col = ctx.pos & 3;
            self.cn.set(col as u32 | 2 << 12);

            self.co.set(c as u32);
            self.co.set((w as u32) << 8);
            self.co.set(ctx.w5 & 0x3FFFF);
            self.co.set(e << 3);

            self.cp.set(d as u32);
            self.cp.set((c as u32) << 8);
            self.cp.set((w as u32) << 16);

            self.cq.set((w as u32) << 3);
            self.cq.set((c as u32) << 19);
            self.cq.set(e);

            self.cpos1[c] = ctx.pos as i32;
            self.wpos1[w] = ctx.pos as i32;
        }
        self.co.mix(m, ctx);
        self.cp.mix(m, ctx);
        ctx.cxtfl = 0;
        self.cm.mix(m, ctx);
        self.cn.mix(m, ctx);
        self.cq.mix(m, ctx);
        ctx.cxtfl = 3;
    }
}
