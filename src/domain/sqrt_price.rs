//! Q64.96 square-root price conversion.
//!
//! A v4 pool stores `sqrt(token1 / token0) * 2^96` in raw units. Recovering
//! a human price means squaring, shifting out 2^192 and adjusting for the
//! decimal difference between the two tokens. All intermediate math runs in
//! 512-bit integers scaled by 10^18 so that neither a large decimal gap nor
//! the reciprocal for the token1 case loses precision before the final
//! conversion to `f64`.

use alloy_primitives::{Uint, U256};

use crate::error::PriceError;

type U512 = Uint<512, 8>;

/// Fixed-point scale applied before the final division.
const SCALE_DECIMALS: u32 = 18;

/// Largest decimal gap the 512-bit intermediate can absorb.
pub const MAX_DECIMAL_GAP: u32 = 36;

fn pow10(exp: u32) -> U512 {
    U512::from(10u8).pow(U512::from(exp))
}

/// Convert a pool's `sqrtPriceX96` into quote-token units per base token.
///
/// `base_is_token0` selects the derivation path: when the priced token is
/// token0 the squared ratio is used directly, otherwise the reciprocal is
/// computed in integer space.
///
/// # Errors
///
/// Returns [`PriceError::Conversion`] for a zero square-root price or a
/// decimal gap wider than [`MAX_DECIMAL_GAP`].
pub fn sqrt_price_x96_to_price(
    sqrt_price_x96: U256,
    base_is_token0: bool,
    base_decimals: u8,
    quote_decimals: u8,
) -> Result<f64, PriceError> {
    if sqrt_price_x96.is_zero() {
        return Err(PriceError::Conversion("sqrtPriceX96 is zero".into()));
    }

    let gap = i32::from(base_decimals) - i32::from(quote_decimals);
    if gap.unsigned_abs() > MAX_DECIMAL_GAP {
        return Err(PriceError::Conversion(format!(
            "decimal gap {gap} exceeds {MAX_DECIMAL_GAP}"
        )));
    }

    // 10^gap split into the side of the fraction it belongs on.
    let (up, down) = if gap >= 0 {
        (pow10(gap.unsigned_abs()), U512::from(1u8))
    } else {
        (U512::from(1u8), pow10(gap.unsigned_abs()))
    };

    let s = U512::from(sqrt_price_x96);
    let s_squared = s * s;
    let q192 = U512::from(1u8) << 192;
    let scale = pow10(SCALE_DECIMALS);

    let scaled: U512 = if base_is_token0 {
        (s_squared * up * scale) / (q192 * down)
    } else {
        (q192 * up * scale) / (s_squared * down)
    };

    let scaled: f64 = scaled
        .to_string()
        .parse()
        .map_err(|e: std::num::ParseFloatError| PriceError::Conversion(e.to_string()))?;

    Ok(scaled / 1e18)
}
