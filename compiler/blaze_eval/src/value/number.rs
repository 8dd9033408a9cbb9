//! Numeric values.
//!
//! Integers and floats share one representation. The `is_float` tag decides
//! how a number prints and whether integer-only operators (`%`) accept it.
//! A number only keeps the integer tag while its value fits in an `i64`;
//! anything larger becomes a float instead of saturating.

use std::fmt;

/// A Blaze number.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Number {
    raw: f64,
    is_float: bool,
}

impl Number {
    pub const ZERO: Number = Number {
        raw: 0.0,
        is_float: false,
    };
    pub const ONE: Number = Number {
        raw: 1.0,
        is_float: false,
    };

    pub fn new(raw: f64, is_float: bool) -> Self {
        Number {
            raw,
            is_float: is_float || !fits_int(raw),
        }
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "integers are stored in the shared f64 representation"
    )]
    pub fn int(value: i64) -> Self {
        Number::new(value as f64, false)
    }

    pub const fn float(value: f64) -> Self {
        Number {
            raw: value,
            is_float: true,
        }
    }

    /// `true` as 1, `false` as 0, both non-float.
    pub const fn from_bool(value: bool) -> Self {
        if value {
            Number::ONE
        } else {
            Number::ZERO
        }
    }

    /// Result of an arithmetic operation on `a` and `b`.
    ///
    /// Float if either operand was float; otherwise float only when the
    /// result has a fractional part (`3 / 2`).
    pub fn arithmetic(raw: f64, a: Number, b: Number) -> Self {
        Number::new(raw, a.is_float || b.is_float || raw.fract() != 0.0)
    }

    pub const fn raw(self) -> f64 {
        self.raw
    }

    pub const fn is_float(self) -> bool {
        self.is_float
    }

    /// Integer value, truncating toward zero.
    ///
    /// Exact for non-float numbers, which always fit in an `i64`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "non-float numbers hold integral values"
    )]
    pub fn as_int(self) -> i64 {
        self.raw as i64
    }

    pub fn is_zero(self) -> bool {
        self.raw == 0.0
    }

    /// Truthiness: only a value equal to 1 is true.
    #[allow(clippy::float_cmp, reason = "exact comparison against 1 is the rule")]
    pub fn is_one(self) -> bool {
        self.raw == 1.0
    }

    #[must_use]
    pub fn negate(self) -> Self {
        Number::new(-self.raw, self.is_float)
    }

    /// `self + delta`, keeping the float tag while the result fits.
    #[must_use]
    pub fn step(self, delta: f64) -> Self {
        Number::new(self.raw + delta, self.is_float)
    }
}

/// `i64::MIN` as a float; `i64` covers `[-2^63, 2^63)`.
const I64_MIN_F64: f64 = -9_223_372_036_854_775_808.0;

/// Returns `true` if `raw` converts to an `i64` without saturating.
fn fits_int(raw: f64) -> bool {
    raw.is_finite() && raw >= I64_MIN_F64 && raw < -I64_MIN_F64
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_float {
            f.write_str(&format_g(self.raw))
        } else {
            write!(f, "{}", self.as_int())
        }
    }
}

/// Significant digits used by `%g`.
const G_PRECISION: i32 = 6;

/// Format a float like C's `printf("%g", value)`.
///
/// Six significant digits, trailing zeros removed, scientific notation when
/// the decimal exponent is below -4 or at least 6.
pub fn format_g(value: f64) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    #[expect(clippy::cast_sign_loss, reason = "G_PRECISION is a small positive constant")]
    let digits = (G_PRECISION - 1) as usize;
    // Round to the final number of significant digits first; the exponent
    // can shift by one (9.999995 -> 1.00000e1).
    let scientific = format!("{value:.digits$e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= G_PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            strip_trailing_zeros(mantissa),
            exponent.unsigned_abs()
        )
    } else {
        #[expect(clippy::cast_sign_loss, reason = "exponent < G_PRECISION here")]
        let decimals = (G_PRECISION - 1 - exponent) as usize;
        strip_trailing_zeros(&format!("{value:.decimals$}")).to_string()
    }
}

fn strip_trailing_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
