use std::sync::OnceLock;

// ilog ------------------------------------------------------------------------------------------------------------------------------ ilog
// ilog(x) = round(log2(x) * 16), 0 <= x < 64K. The table is computed once
// by numerical integration of 1/x (numerator is 2^29/ln 2) and shared
// read-only afterwards.
static ILOG: OnceLock<Vec<u8>> = OnceLock::new();

fn table() -> &'static [u8] {
    ILOG.get_or_init(|| {
        let mut t = vec![0u8; 65536];
        let mut x = 14155776u32;
        for i in 2..65536usize {
            x += 774541002 / (i as u32 * 2 - 1);
            t[i] = (x >> 24) as u8;
        }
        t
    })
}

pub fn ilog(x: u16) -> i32 {
    table()[x as usize] as i32
}

/// Piecewise extension of ilog over 32 bits.
pub fn llog(x: u32) -> i32 {
    if x >= 0x1000000 {
        256 + ilog((x >> 16) as u16)
    }
    else if x >= 0x10000 {
        128 + ilog((x >> 8) as u16)
    }
    else {
        ilog(x as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_log2_within_one_step() {
        for x in 2u32..65536 {
            let exact = (16.0 * (x as f64).log2()).round() as i32;
            let got = ilog(x as u16);
            assert!(
                (got - exact).abs() <= 1,
                "ilog({x}) = {got}, expected about {exact}"
            );
        }
    }

    #[test]
    fn llog_extends_over_high_bytes() {
        assert_eq!(llog(65535), ilog(65535));
        assert_eq!(llog(0x10000), 128 + ilog(0x100));
        assert_eq!(llog(0x1000000), 256 + ilog(0x100));
    }
}
