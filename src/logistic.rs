use std::sync::OnceLock;

// Logistic Functions ------------------------------------------------------------------------------------------------- Logistic Functions

/// Returns p = 1/(1 + exp(-d)) (Inverse of stretch)
/// d = (-2047..2047), p = (0..4095)
pub fn squash(d: i32) -> i32 {
    const SQ_T: [i32; 33] = [
    1,2,3,6,10,16,27,45,73,120,194,310,488,747,1101,
    1546,2047,2549,2994,3348,3607,3785,3901,3975,4022,
    4050,4068,4079,4085,4089,4092,4093,4094];
    if d > 2047  { return 4095; }
    if d < -2047 { return 0;    }
    let i_w = d & 127;
    let d = ((d >> 7) + 16) as usize;
    (SQ_T[d] * (128 - i_w) + SQ_T[d+1] * i_w + 64) >> 7
}

// Table inverse of squash, filled by scanning squash over its domain and
// writing each plateau run.
static STRETCH: OnceLock<Vec<i16>> = OnceLock::new();

fn stretch_table() -> &'static [i16] {
    STRETCH.get_or_init(|| {
        let mut t = vec![0i16; 4096];
        let mut pi = 0usize;
        for x in -2047..=2047i32 {
            let i = squash(x) as usize;
            for j in pi..=i {
                t[j] = x as i16;
            }
            pi = i + 1;
        }
        t[4095] = 2047;
        t
    })
}

/// Returns d = ln(p/(1-p)) (Inverse of squash)
/// p = (0..4095), d = (-2047..2047)
pub fn stretch(p: i32) -> i32 {
    assert!(p >= 0 && p < 4096);
    stretch_table()[p as usize] as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squash_saturates() {
        assert_eq!(squash(2048), 4095);
        assert_eq!(squash(-2048), 0);
        assert_eq!(squash(0), 2047);
    }

    #[test]
    fn stretch_of_squash_stays_on_plateau() {
        for d in -2047..=2047 {
            let p = squash(d);
            let back = stretch(p);
            // squash is flat near the tails, so the round trip may land
            // anywhere on the plateau containing d
            assert!(squash(back) == p, "d={d} p={p} back={back}");
        }
    }

    #[test]
    fn squash_of_stretch_is_exact() {
        // 4095 is pinned to 2047 by hand and sits past the last plateau
        for p in 0..4095 {
            let d = stretch(p);
            let q = squash(d);
            assert!(q >= p, "p={p} d={d} q={q}");
            assert!(stretch(q) == d, "p={p} d={d} q={q}");
        }
        assert_eq!(stretch(4095), 2047);
    }
}
