//! The basic bitpacked algorithm from Myers'99.
use crate::{H, B, V};

/// Implements Myers '99 bitpacking based algorithm. Terminology is as in the
/// paper. The code is a translation from the implementation in Edlib.
///
/// Modifies `h0` (horizontal difference at top) and `v` (vertical differences
/// along the left) in place.
///
/// Given the scores below:
///
/// A0 - B0
/// |    |
/// A1 - B1
///   ...
/// AW - BW
///
/// h0 = B0 - A0
/// v[i] = A(i+1) - Ai
///
/// On return `h0` holds the horizontal difference below row `out` of the
/// block, `B(out+1) - A(out+1)`. Pass `W - 1` to get the difference at the
/// bottom; the last block of a sequence passes the row of its last symbol.
///
/// 20 operations, excluding `eq`.
#[inline(always)]
pub fn compute_block(h0: &mut H, v: &mut V, eq: B, out: usize) {
    let (vp, vm) = v.pm();
    let vx = eq | vm;
    // Myers'99 assumes the incoming horizontal delta is never -1.
    let eq = eq | h0.m();
    // The add here contains the 'folding' magic that makes this algorithm
    // 'non-local' and prevents simple SIMDification. See Myers'99 for details.
    let hx = (((eq & vp).wrapping_add(vp)) ^ vp) | eq;
    let hp = vm | !(hx | vp);
    let hm = vp & hx;
    // Extract `hw` from `hp` and `hm`.
    let hpw = (hp >> out) & 1;
    let hmw = (hm >> out) & 1;
    // Push `hw` out of `hp` and `hm` and shift in `h0`.
    let hp = (hp << 1) | h0.p();
    let hm = (hm << 1) | h0.m();

    *h0 = H::from(hpw, hmw);
    *v = V::from(hm | !(vx | hp), hp & vx);
}
