//! Configuration for outline traversal.

/// Default maximum nesting depth considered when reading and writing outlines.
pub const DEFAULT_MAX_DEPTH: usize = 15;

/// Options controlling how an outline is read from and written to a document.
///
/// # Example
///
/// ```
/// use pdf_outline::config::OutlineOptions;
///
/// // Silently repair reference loops (default)
/// let lenient = OutlineOptions::lenient();
///
/// // Fail on the first reoccurring outline object
/// let strict = OutlineOptions::strict().with_max_depth(4);
/// assert!(strict.strict);
/// assert_eq!(strict.max_depth, 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineOptions {
    /// Maximum recursion depth of the outline to be read and re-written.
    ///
    /// `0` only considers the root level, `1` the first sub-level of each
    /// root item, and so on. Items beyond this depth are silently ignored.
    pub max_depth: usize,

    /// Raise an error on structural anomalies (true) or repair them (false)
    ///
    /// In lenient mode a reference loop only cancels processing of the
    /// affected level when reading, and duplicated objects are reproduced as
    /// new objects when writing.
    pub strict: bool,
}

impl Default for OutlineOptions {
    fn default() -> Self {
        Self::lenient()
    }
}

impl OutlineOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lenient preset: repair structural errors silently.
    pub fn lenient() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict: false,
        }
    }

    /// Strict preset: any reoccurring object reference is an error.
    pub fn strict() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            strict: true,
        }
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enable or disable strict mode.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
