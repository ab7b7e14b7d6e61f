use crate::buffer::Buf;

// Global Context -------------------------------------------------------------------------------------------------------- Global Context
//
// The bit-stream state every model reads: the rotating input queue, the
// partial byte, packed recent bytes, and the quantized summary registers
// used as gating contexts. One record owned by the driver, so several
// predictors can coexist in a process.

// Nibble class codes for the w4/w5 and tt registers
const WRT_MPW: [u32; 16] = [3, 3, 3, 2, 2, 2, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0];
const WRT_MTT: [u32; 16] = [0, 0, 1, 2, 3, 4, 5, 5, 6, 6, 6, 6, 6, 7, 7, 7];

/// Bytes driving the end-of-sentence heuristic. The last one is `'}'-'{'+'P'`.
pub fn sentence_end(c: u32) -> bool {
    c == b'.' as u32 || c == b'O' as u32 || c == b'M' as u32
        || c == b'!' as u32 || c == b')' as u32 || c == 82
}

pub struct Context {
    pub buf:   Buf,   // Rotating input queue
    pub pos:   usize, // Number of input bytes
    pub bpos:  usize, // Bits of the partial byte, 0-7
    pub c0:    u32,   // Partial byte with a leading 1 bit (1-255)
    pub y:     i32,   // Last observed bit

    pub b1:    u32,   // Last 8 whole bytes, b1 most recent
    pub b2:    u32,
    pub b3:    u32,
    pub b4:    u32,
    pub b5:    u32,
    pub b6:    u32,
    pub b7:    u32,
    pub b8:    u32,
    pub c4:    u32,   // Last 4 whole bytes packed, b1 in the low byte
    pub x4:    u32,   // Shift registers of quantized byte summaries
    pub x5:    u32,
    pub w4:    u32,
    pub w5:    u32,
    pub f4:    u32,
    pub tt:    u32,

    pub sm_shft:   i32, // State map smoothing knobs, scheduled on pos
    pub sm_add:    i32,
    pub sm_add_y:  i32, // sm_add if the last bit was 1, else 0

    pub cxtfl:  i32,  // Selects the 5- or 4-feature bit history form

    pub fails:      u32, // Shifted records of confident mispredictions
    pub failz:      u32,
    pub failcount:  u32, // Fails in the last 8 bits

    // Text features maintained by the word model, read by the sparse model
    pub words:       u32,
    pub spaces:      u32,
    pub wordcount:   u32,
    pub spacecount:  u32,
    pub spafdo:      u32, // Distance since sentence end
    pub col:         u32, // Column in the current line
    pub frstchar:    u32, // First character of the current line
}
impl Context {
    pub fn new(mem: usize) -> Context {
        Context {
            buf:   Buf::new(mem * 8),
            pos:   0,
            bpos:  0,
            c0:    1,
            y:     0,
            b1: 0, b2: 0, b3: 0, b4: 0, b5: 0, b6: 0, b7: 0, b8: 0,
            c4: 0, x4: 0, x5: 0, w4: 0, w5: 0, f4: 0, tt: 0,
            sm_shft:    7,
            sm_add:     65535 + 127,
            sm_add_y:   0,
            cxtfl:      3,
            fails:      0,
            failz:      0,
            failcount:  0,
            words:      0,
            spaces:     0,
            wordcount:  0,
            spacecount: 0,
            spafdo:     0,
            col:        0,
            frstchar:   0,
        }
    }

    /// The i'th byte back from the write position, raw from the queue.
    pub fn buf_back(&self, i: usize) -> u8 {
        self.buf.at(self.pos as i64 - i as i64)
    }

    /// Shift the observed bit into the partial byte; on a completed byte,
    /// emit it into the queue and roll every packed register.
    pub fn update(&mut self, y: i32) {
        self.y = y;
        self.sm_add_y = self.sm_add & -y;

        self.c0 += self.c0 + y as u32;
        if self.c0 >= 256 {
            self.buf[self.pos] = self.c0 as u8;
            self.pos += 1;
            self.c0 -= 256;

            if self.pos <= 1024 * 1024 {
                if self.pos == 1024 * 1024 {
                    self.sm_shft = 9;
                    self.sm_add = 65535 + 511;
                }
                if self.pos == 512 * 1024 {
                    self.sm_shft = 8;
                    self.sm_add = 65535 + 255;
                }
                self.sm_add_y = self.sm_add & -y;
            }

            // w5 takes code 2 after a prior byte 12, w4 never does
            let mut i = WRT_MPW[(self.c0 >> 4) as usize];
            self.w4 = self.w4.wrapping_mul(4).wrapping_add(i);
            if self.b1 == 12 {
                i = 2;
            }
            self.w5 = self.w5.wrapping_mul(4).wrapping_add(i);

            self.b8 = self.b7; self.b7 = self.b6; self.b6 = self.b5; self.b5 = self.b4;
            self.b4 = self.b3; self.b3 = self.b2; self.b2 = self.b1; self.b1 = self.c0;

            if sentence_end(self.c0) {
                self.w5 = (self.w5 << 8) | 0x3FF;
                self.x5 = (self.x5 << 8) + self.c0;
                self.f4 = (self.f4 & 0xFFFFFFF0) + 2;
                if self.c0 != b'!' as u32 && self.c0 != b'O' as u32 {
                    self.w4 |= 12;
                }
                if self.c0 != b'!' as u32 {
                    self.b2 = b'.' as u32;
                    self.tt = (self.tt & 0xFFFFFFF8) + 1;
                }
            }

            self.c4 = (self.c4 << 8) + self.c0;
            self.x5 = (self.x5 << 8) + self.c0;
            let mut c = self.c0;
            if c == 32 {
                c -= 1;
            }
            self.f4 = self.f4.wrapping_mul(16).wrapping_add(c >> 4);
            self.tt = self.tt.wrapping_mul(8).wrapping_add(WRT_MTT[(c >> 4) as usize]);
            self.c0 = 1;
        }
        self.bpos = (self.bpos + 1) & 7;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_byte(ctx: &mut Context, byte: u8) {
        for i in (0..8).rev() {
            ctx.update(((byte >> i) & 1) as i32);
        }
    }

    #[test]
    fn c0_keeps_the_leading_one() {
        let mut ctx = Context::new(0x10000);
        for (bits, bit) in [1, 0, 1, 1, 0, 1, 0, 0].iter().enumerate() {
            assert!(ctx.c0 >= 1 && ctx.c0 < 256);
            assert_eq!(ctx.c0 >> bits, 1);
            ctx.update(*bit);
        }
        // byte boundary: reset to the bare sentinel
        assert_eq!(ctx.c0, 1);
        assert_eq!(ctx.bpos, 0);
    }

    #[test]
    fn emitted_byte_lands_in_b1_and_c4() {
        let mut ctx = Context::new(0x10000);
        feed_byte(&mut ctx, 0xA7);
        assert_eq!(ctx.b1, 0xA7);
        assert_eq!(ctx.c4 & 0xFF, 0xA7);
        assert_eq!(ctx.buf_back(1), 0xA7);
        assert_eq!(ctx.pos, 1);

        feed_byte(&mut ctx, 0x3C);
        assert_eq!(ctx.b1, 0x3C);
        assert_eq!(ctx.b2, 0xA7);
        assert_eq!(ctx.c4 & 0xFFFF, 0xA73C);
    }

    #[test]
    fn smoothing_knobs_flip_on_exact_bytes() {
        let mut ctx = Context::new(0x10000);
        ctx.pos = 512 * 1024 - 1;
        feed_byte(&mut ctx, 0);
        assert_eq!((ctx.sm_shft, ctx.sm_add), (8, 65535 + 255));

        ctx.pos = 1024 * 1024 - 1;
        feed_byte(&mut ctx, 0);
        assert_eq!((ctx.sm_shft, ctx.sm_add), (9, 65535 + 511));

        // past the schedule nothing moves
        feed_byte(&mut ctx, 0);
        assert_eq!((ctx.sm_shft, ctx.sm_add), (9, 65535 + 511));
    }

    #[test]
    fn sentence_end_sets_sentinels() {
        let mut ctx = Context::new(0x10000);
        feed_byte(&mut ctx, b'a');
        feed_byte(&mut ctx, b'.');
        assert_eq!(ctx.w5 & 0xFF, 0xFF);
        assert_eq!(ctx.b2, b'.' as u32);
        assert_eq!(ctx.f4 & 0xF, (b'.' as u32) >> 4);
    }
}
