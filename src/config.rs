/// Default nesting bound applied to both encoding and decoding.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// What a decoder does when it reads a type tag it does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTagPolicy {
    /// Read no payload and yield [`Value::Undefined`](crate::Value::Undefined).
    ///
    /// A corrupted stream can silently desynchronize under this policy.
    #[default]
    Lenient,
    /// Fail with [`EncoderError::UnknownTag`](crate::EncoderError::UnknownTag).
    Reject,
}

/// Runtime knobs for encoding and decoding.
///
/// The defaults reproduce the reference wire behavior: encoding fails past 100 nested levels
/// and unknown tags decode to `Undefined`. Decoding is additionally bounded at 100 levels,
/// counted the same way as encoding, so every value this crate can encode can be decoded.
///
/// # Example
/// ```rust
/// use dynval_encoder::{Config, UnknownTagPolicy};
///
/// let config = Config::default()
///     .max_decode_depth(Some(32))
///     .unknown_tags(UnknownTagPolicy::Reject);
/// assert_eq!(config.decode_depth_limit(), Some(32));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    max_encode_depth: usize,
    max_decode_depth: Option<usize>,
    unknown_tags: UnknownTagPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_encode_depth: DEFAULT_MAX_DEPTH,
            max_decode_depth: Some(DEFAULT_MAX_DEPTH),
            unknown_tags: UnknownTagPolicy::default(),
        }
    }
}

impl Config {
    /// Sets the deepest nesting level the encoder accepts.
    pub fn max_encode_depth(mut self, depth: usize) -> Self {
        self.max_encode_depth = depth;
        self
    }

    /// Sets the deepest nesting level the decoder accepts; `None` removes the bound.
    pub fn max_decode_depth(mut self, depth: Option<usize>) -> Self {
        self.max_decode_depth = depth;
        self
    }

    /// Sets the policy for unknown type tags.
    pub fn unknown_tags(mut self, policy: UnknownTagPolicy) -> Self {
        self.unknown_tags = policy;
        self
    }

    /// Deepest nesting level the encoder accepts.
    pub fn encode_depth_limit(&self) -> usize {
        self.max_encode_depth
    }

    /// Deepest nesting level the decoder accepts, `None` when unbounded.
    pub fn decode_depth_limit(&self) -> Option<usize> {
        self.max_decode_depth
    }

    /// Policy applied to unknown type tags.
    pub fn unknown_tag_policy(&self) -> UnknownTagPolicy {
        self.unknown_tags
    }
}
