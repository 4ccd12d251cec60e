use crate::{DEFAULT_DETOUR_RATIO, Error, routing::StopFlag};

/// Tuning knobs shared by every leg of a prism computation
#[derive(Debug, Clone)]
pub struct PrismParams {
    /// Paths longer than `fastest * detour_ratio` are never part of the prism,
    /// however generous the time budget
    pub detour_ratio: f64,
    /// Accumulate the physical length of the emitted edges
    pub include_length: bool,
    /// Cancellation signal checked by every search
    pub stop: Option<StopFlag>,
}

impl Default for PrismParams {
    fn default() -> Self {
        Self {
            detour_ratio: DEFAULT_DETOUR_RATIO,
            include_length: false,
            stop: None,
        }
    }
}

impl PrismParams {
    #[must_use]
    pub fn with_detour_ratio(mut self, detour_ratio: f64) -> Self {
        self.detour_ratio = detour_ratio;
        self
    }

    #[must_use]
    pub fn with_length(mut self, include_length: bool) -> Self {
        self.include_length = include_length;
        self
    }

    #[must_use]
    pub fn with_stop(mut self, stop: StopFlag) -> Self {
        self.stop = Some(stop);
        self
    }

    /// A ratio below 1 would cut the fastest path itself out of the prism
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.detour_ratio.is_finite() && self.detour_ratio >= 1.0 {
            Ok(())
        } else {
            Err(Error::MalformedRequest(format!(
                "Detour ratio must be a finite number >= 1, got {}",
                self.detour_ratio
            )))
        }
    }
}
