use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest supported participant count. The number of combinations grows as
/// `choose(N, N - M + 1)` and every participant stores one public key per
/// combination.
pub const MAX_PARTICIPANTS: usize = 16;

/// Error raised when a threshold/participant pair is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error(
    "invalid threshold configuration: threshold {threshold} of {participants} participants"
)]
pub struct InvalidParameters {
    pub threshold: usize,
    pub participants: usize,
}

/// Validate the relation between threshold and participant counts.
///
/// Accepts `2 <= participants <= MAX_PARTICIPANTS` and
/// `1 <= threshold < participants`.
pub fn validate_threshold_config(threshold: usize, participants: usize) -> bool {
    (2..=MAX_PARTICIPANTS).contains(&participants) && (1..participants).contains(&threshold)
}

/// An M-of-N key generation setup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawParameters", into = "RawParameters")]
pub struct DkgParameters {
    threshold: usize,
    participants: usize,
}

#[derive(Serialize, Deserialize)]
struct RawParameters {
    threshold: usize,
    participants: usize,
}

impl DkgParameters {
    pub fn new(threshold: usize, participants: usize) -> Result<Self, InvalidParameters> {
        if !validate_threshold_config(threshold, participants) {
            return Err(InvalidParameters {
                threshold,
                participants,
            });
        }
        Ok(Self {
            threshold,
            participants,
        })
    }

    /// M: how many participants are needed to reconstruct.
    #[inline]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// N.
    #[inline]
    pub const fn participants(&self) -> usize {
        self.participants
    }

    #[inline]
    pub const fn peer_count(&self) -> usize {
        self.participants - 1
    }

    /// Members per combination, `N - M + 1`.
    ///
    /// Any M participants then meet every combination, while M - 1 of them
    /// miss at least one.
    #[inline]
    pub const fn combination_size(&self) -> usize {
        self.participants - self.threshold + 1
    }

    /// `choose(N, N - M + 1)`.
    pub fn combination_count(&self) -> usize {
        binomial(self.participants, self.combination_size())
    }
}

impl TryFrom<RawParameters> for DkgParameters {
    type Error = InvalidParameters;

    fn try_from(raw: RawParameters) -> Result<Self, Self::Error> {
        Self::new(raw.threshold, raw.participants)
    }
}

impl From<DkgParameters> for RawParameters {
    fn from(params: DkgParameters) -> Self {
        Self {
            threshold: params.threshold,
            participants: params.participants,
        }
    }
}

fn binomial(n: usize, k: usize) -> usize {
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}
