use crate::{
    config::Config,
    context::{sentence_end, Context},
    context_map::ContextMap,
    mixer::Mixer,
    record_model::RecordModel,
    run_map::RunContextMap,
    sparse_model::SparseModel,
    word_model::WordModel,
};

// Context Model ------------------------------------------------------------------------------------------------------------ Context Model
//
// Combines all models through one gated mixer. The order-N chains are
// prime-multiplied hashes of the last N bytes; orders 3, 4, 5, 6, 8, 13
// and 0 feed the main map, orders 7, 9 and 11 feed run maps. Word,
// sparse and record models join at level 4 and up. The number of live
// main-map contexts selects the mixer's gating columns.

const PRIMES: [u32; 14] = [
    0, 257, 251, 241, 239, 233, 229, 227, 223, 211, 199, 197, 193, 191,
];

pub struct ContextModel {
    cm:      ContextMap,
    rcm7:    RunContextMap,
    rcm9:    RunContextMap,
    rcm10:   RunContextMap,
    m:       Mixer,
    cxt:     [u32; 14],  // Order 0-13 context hashes
    word:    WordModel,
    sparse:  SparseModel,
    record:  RecordModel,
    level:   u32,
}
impl ContextModel {
    pub fn new(cfg: &Config) -> ContextModel {
        let mem = cfg.mem;
        ContextModel {
            cm:      ContextMap::new(mem * 32, 7),
            rcm7:    RunContextMap::new(mem / 4, 14),
            rcm9:    RunContextMap::new(mem / 4, 18),
            rcm10:   RunContextMap::new(mem / 2, 20),
            m:       Mixer::new(456, 128 * (16 + 14 + 14 + 12 + 14 + 16), 6, 512),
            cxt:     [0; 14],
            word:    WordModel::new(mem),
            sparse:  SparseModel::new(mem),
            record:  RecordModel::new(),
            level:   cfg.level,
        }
    }

    pub fn p(&mut self, ctx: &mut Context) -> i32 {
        self.m.update(ctx.y);
        self.m.add(64);

        if ctx.bpos == 0 {
            let f2 = ctx.buf_back(2) as u32;
            let mut i = 0;
            if sentence_end(f2) && ctx.b1 != f2 && ctx.buf_back(3) as u32 != f2 {
                // inject a virtual separator after a sentence end
                i = 13;
                ctx.x4 = ctx.x4.wrapping_mul(256).wrapping_add(f2);
            }
            while i > 0 {
                self.cxt[i] = self.cxt[i - 1].wrapping_mul(PRIMES[i]);
                i -= 1;
            }
            for i in (1..=13).rev() {
                self.cxt[i] = self.cxt[i - 1].wrapping_mul(PRIMES[i]).wrapping_add(ctx.b1);
            }

            self.cm.set(self.cxt[3]);
            self.cm.set(self.cxt[4]);
            self.cm.set(self.cxt[5]);
            self.cm.set(self.cxt[6]);
            self.cm.set(self.cxt[8]);
            self.cm.set(self.cxt[13]);
            self.cm.set(0);

            self.rcm7.set(self.cxt[7], ctx.b1);
            self.rcm9.set(self.cxt[9], ctx.b1);
            self.rcm10.set(self.cxt[11], ctx.b1);

            ctx.x4 = ctx.x4.wrapping_mul(256).wrapping_add(ctx.b1);
        }

        self.rcm7.mix(&mut self.m, ctx);
        self.rcm9.mix(&mut self.m, ctx);
        self.rcm10.mix(&mut self.m, ctx);

        let qq = self.m.nx;
        let mut order = self.cm.mix(&mut self.m, ctx) - 1;
        if order < 0 {
            order = 0;
        }
        let order = order as usize;

        // Keep the first three inputs of each main-map context as they
        // are and rescale the rest upward
        let zz = (self.m.nx - qq) / 7;
        self.m.nx = qq + zz * 3;
        for _ in 0..zz * 2 {
            self.m.mul(5);
        }
        for _ in 0..zz {
            self.m.mul(6);
        }
        for _ in 0..zz {
            self.m.mul(9);
        }

        if self.level >= 4 {
            self.word.mix(&mut self.m, ctx);
            self.sparse.mix(&mut self.m, ctx);
            self.record.mix(&mut self.m, ctx);
        }

        let mut c1 = ctx.b1;
        let mut c2 = ctx.b2;
        if c1 == 9 || c1 == 10 || c1 == 32 { c1 = 16; }
        if c2 == 9 || c2 == 10 || c2 == 32 { c2 = 16; }

        self.m.set(256 * order + (ctx.w4 & 240) as usize + (c2 >> 4) as usize, 256 * 7);

        let c = ((ctx.words >> 1) & 63) as usize;
        self.m.set((ctx.w4 & 3) as usize * 64 + c + order * 256, 256 * 7);

        let c = (ctx.w4 & 255) as usize + 256 * ctx.bpos;
        self.m.set(c, 256 * 8);

        let c = if ctx.bpos != 0 {
            let mut c = (ctx.c0 << (8 - ctx.bpos)) as usize;
            if ctx.bpos == 1 {
                c += (ctx.b3 / 2) as usize;
            }
            ctx.bpos.min(5) * 256 + (ctx.tt & 63) as usize + (c & 192)
        }
        else {
            ((ctx.words & 12) * 16 + (ctx.tt & 63)) as usize
        };
        self.m.set(c, 1536);

        let c = ctx.bpos;
        let c2 = ((ctx.c0 << (8 - ctx.bpos)) | (c1 >> ctx.bpos)) as usize;
        self.m.set(order * 256 + c + (c2 & 248), 256 * 7);

        let c = c * 256 + ((ctx.c0 << (8 - ctx.bpos)) & 255) as usize;
        let c1 = (ctx.words << ctx.bpos) & 255;
        self.m.set(c + (c1 >> ctx.bpos) as usize, 2048);

        self.m.p(ctx.y)
    }
}
