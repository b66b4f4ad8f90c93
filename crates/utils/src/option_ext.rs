use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// The contained value, or `-` for `None`
    ///
    /// Most tally bins are only defined for some filters, so report tables use
    /// a dash for the missing ones.
    ///
    /// ```rust
    /// # use mcpost_utils::OptionExt;
    /// assert_eq!(Some(14).display(), "14");
    /// assert_eq!(None::<u32>.display(), "-");
    /// ```
    fn display(&self) -> String {
        self.display_or("-")
    }

    /// The contained value, or `placeholder` for `None`
    ///
    /// ```rust
    /// # use mcpost_utils::OptionExt;
    /// assert_eq!(None::<&str>.display_or("total"), "total");
    /// ```
    fn display_or(&self, placeholder: &str) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display_or(&self, placeholder: &str) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => placeholder.to_string(),
        }
    }
}
