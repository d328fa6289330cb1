/// How lossy casts are reported
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum LossyPolicy {
    /// Collect diagnostics and log a warning per cast
    #[default]
    Warn,
    /// Collect diagnostics silently
    Ignore,
    /// Fail the cast with [`Error::LossyCast`](crate::error::Error::LossyCast)
    Error,
}

/// Registry-wide behavior switches
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub lossy: LossyPolicy,

    /// Broadcast size-1 operands to the size of the other operand
    pub recycle: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            lossy: LossyPolicy::default(),
            recycle: true,
        }
    }
}

impl Options {
    pub fn with_lossy(mut self, lossy: LossyPolicy) -> Self {
        self.lossy = lossy;
        self
    }

    pub fn with_recycle(mut self, recycle: bool) -> Self {
        self.recycle = recycle;
        self
    }
}
