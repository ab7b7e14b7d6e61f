use hpaq::{Config, Predictor};

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn feed(p: &mut Predictor, byte: u8) {
    for i in (0..8).rev() {
        p.update(((byte >> i) & 1) as i32);
    }
}

/// Probability the predictor assigns to `bit` being next.
fn prob_of(p: &Predictor, bit: u8) -> i32 {
    if bit == 1 { p.p() } else { 4095 - p.p() }
}

#[test]
fn fresh_predictor_is_even() {
    let p = Predictor::new(&Config::new(8).unwrap());
    assert_eq!(p.p(), 2048);
}

#[test]
fn locks_onto_a_constant_stream() {
    let mut p = Predictor::new(&Config::new(1).unwrap());
    for _ in 0..4096 {
        feed(&mut p, 0x00);
    }
    let mut weakest = 4095;
    for _ in 0..60 * 1024 {
        for _ in 0..8 {
            weakest = weakest.min(prob_of(&p, 0));
            p.update(0);
        }
    }
    assert!(weakest >= 4000, "weakest prediction {weakest}");
}

#[test]
fn alternating_pattern_alternates_polarity() {
    let mut p = Predictor::new(&Config::new(1).unwrap());
    for _ in 0..1024 {
        feed(&mut p, 0x55);
    }
    for _ in 0..16 {
        for i in (0..8).rev() {
            let bit = (0x55u8 >> i) & 1;
            if bit == 1 {
                assert!(p.p() > 2048, "bit {i}: {}", p.p());
            }
            else {
                assert!(p.p() < 2048, "bit {i}: {}", p.p());
            }
            p.update(bit as i32);
        }
    }
}

#[test]
fn uniform_noise_stays_near_even_odds() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut p = Predictor::new(&Config::new(0).unwrap());
    let mut sum = 0f64;
    let mut sumsq = 0f64;
    let mut n = 0f64;
    let mut block = [0u8; 4096];
    for _ in 0..64 {
        rng.fill_bytes(&mut block);
        for &byte in block.iter() {
            for i in (0..8).rev() {
                let pr = p.p() as f64;
                sum += pr;
                sumsq += pr * pr;
                n += 1.0;
                p.update(((byte >> i) & 1) as i32);
            }
        }
    }
    let mean = sum / n;
    let var = sumsq / n - mean * mean;
    assert!((2000.0..=2100.0).contains(&mean), "mean {mean}");
    assert!(var <= 1_000_000.0, "var {var}");
}

#[test]
fn word_model_locks_onto_repeated_text() {
    let pat = b"the quick brown fox ";
    let mut p = Predictor::new(&Config::new(4).unwrap());
    let mut weakest = 4095;
    for rep in 0..4096 {
        for (j, &byte) in pat.iter().enumerate() {
            for i in (0..8).rev() {
                let bit = (byte >> i) & 1;
                // the 'u' of "quick", well past the warmup
                if rep >= 3996 && j == 5 {
                    weakest = weakest.min(prob_of(&p, bit));
                }
                p.update(bit as i32);
            }
        }
    }
    assert!(weakest > 3500, "weakest bit of 'u' predicted at {weakest}");
}

#[test]
fn run_transition_collapses_within_a_byte() {
    let mut p = Predictor::new(&Config::new(1).unwrap());
    for _ in 0..1023 {
        feed(&mut p, 0x41);
    }
    let mut weakest = 4095;
    for i in (0..8).rev() {
        let bit = (0x41u8 >> i) & 1;
        weakest = weakest.min(prob_of(&p, bit));
        p.update(bit as i32);
    }
    assert!(weakest > 3500, "still uncertain after 1 KiB of runs: {weakest}");

    // the first byte of the new run breaks the confident prediction
    let mut lowest = 4095;
    for i in (0..8).rev() {
        let bit = (0x42u8 >> i) & 1;
        lowest = lowest.min(prob_of(&p, bit));
        p.update(bit as i32);
    }
    assert!(lowest < 2500, "no collapse at the transition: {lowest}");
}

#[test]
fn identical_streams_yield_identical_predictions() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut block = [0u8; 8192];
    rng.fill_bytes(&mut block);

    let cfg = Config::new(0).unwrap();
    let mut a = Predictor::new(&cfg);
    let mut b = Predictor::new(&cfg);
    for &byte in block.iter() {
        for i in (0..8).rev() {
            assert_eq!(a.p(), b.p());
            let bit = ((byte >> i) & 1) as i32;
            a.update(bit);
            b.update(bit);
        }
    }
}
