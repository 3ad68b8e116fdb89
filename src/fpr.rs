//! False-positive-rate estimator
//!
//! Implements the closed-form estimate from Rottenstreich et al.,
//! "The Variable-Increment Counting Bloom Filter" (INFOCOM 2012), as
//! given in spec §4.4:
//!
//! ```text
//! p0 = (1 - 1/m)^(nk)
//! p1 = ((L-1)/L) * (nk) * (1/m) * (1 - 1/m)^(nk-1)
//! p2 = (((L-1)(L+1)) / (6L^2)) * C(nk, 2) * (1/m)^2 * (1 - 1/m)^(nk-2)
//! FPR = (1 - p0 - p1 - p2)^k
//! ```
//!
//! with `C(a, 2) = a(a-1)/2`. All arithmetic is `f64`.

/// Estimates the false positive rate for a VI-CBF with `m` slots, `n`
/// stored elements, `k` hash functions, and variable-increment base `L`.
///
/// Matches a reference computation to within `1e-11` absolute for the
/// canonical inputs in spec §8 S4.
pub fn estimate(m: u64, n: u64, k: u32, vibase: u32) -> f64 {
    if n == 0 {
        return 0.0;
    }

    let m = m as f64;
    let nk = (n as f64) * (k as f64);
    let l = vibase as f64;
    let inv_m = 1.0 / m;
    let one_minus_inv_m = 1.0 - inv_m;

    let p0 = one_minus_inv_m.powf(nk);
    let p1 = ((l - 1.0) / l) * nk * inv_m * one_minus_inv_m.powf(nk - 1.0);

    let c_nk_2 = nk * (nk - 1.0) / 2.0;
    let p2 = (((l - 1.0) * (l + 1.0)) / (6.0 * l * l))
        * c_nk_2
        * inv_m
        * inv_m
        * one_minus_inv_m.powf(nk - 2.0);

    (1.0 - p0 - p1 - p2).powi(k as i32)
}
