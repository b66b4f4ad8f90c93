use crate::f;

/// Extends numerical primitives with report formatting
pub trait ValueExt {
    /// Scientific notation with a signed, zero-padded exponent
    ///
    /// Rust prints `1e3` as `1e3` and `1e-3` as `1e-3`, which makes columns of
    /// tally results ragged. This always gives the sign and pads the exponent
    /// to `exp_pad` digits.
    ///
    /// ```rust
    /// # use mcpost_utils::ValueExt;
    /// assert_eq!((40.0).sci(3, 2), "4.000e+01");
    /// assert_eq!((-0.05).sci(2, 2), "-5.00e-02");
    /// assert_eq!((1.0e-120).sci(1, 2), "1.0e-120");
    /// ```
    ///
    /// Values without an exponent (`inf`, `NaN`) are returned as Rust prints
    /// them.
    fn sci(&self, precision: usize, exp_pad: usize) -> String;
}

impl<T: std::fmt::LowerExp> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let number = f!("{:.precision$e}", self);
        match number.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                f!("{mantissa}e{sign}{digits:0>exp_pad$}")
            }
            None => number,
        }
    }
}
