/// Config for parsing envelopes.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseConfig {
    pushnum_tags: bool,
    skip_precheck: bool,
}

impl ParseConfig {
    /// Constructs the default config: strict push decoding, pre-check on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `OP_1NEGATE` and `OP_1..OP_16` as one byte pushes inside
    /// envelopes.
    pub fn with_pushnum_tags(mut self, enabled: bool) -> Self {
        self.pushnum_tags = enabled;
        self
    }

    /// Run the full decoder on every input instead of filtering on the hex
    /// marker pre-check first.
    pub fn with_skip_precheck(mut self, enabled: bool) -> Self {
        self.skip_precheck = enabled;
        self
    }

    /// Whether push-number opcodes are accepted as pushes.
    pub fn pushnum_tags(&self) -> bool {
        self.pushnum_tags
    }

    /// Whether the marker pre-check is bypassed.
    pub fn skip_precheck(&self) -> bool {
        self.skip_precheck
    }
}
