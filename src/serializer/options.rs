//! Serializer options.
//!
//! `SerializeOptions` controls how a serializer interprets its bound source.

/// Options controlling how a serializer reads its source.
///
/// # Example
/// ```
/// use barq::SerializeOptions;
///
/// let opts = SerializeOptions {
///     many: true,
///     ..Default::default()
/// };
/// assert!(!opts.call);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerializeOptions {
    /// The source is a sequence; produce one mapping per element (default: false).
    pub many: bool,

    /// The source is a zero-argument producer, invoked before reading
    /// (default: false).
    pub call: bool,
}

impl SerializeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_many(mut self, many: bool) -> Self {
        self.many = many;
        self
    }

    pub fn with_call(mut self, call: bool) -> Self {
        self.call = call;
        self
    }
}
