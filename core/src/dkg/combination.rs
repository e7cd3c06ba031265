use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombinationError {
    #[error("combination must have at least one member")]
    Empty,
    #[error("participant {0} listed twice")]
    Duplicate(u32),
}

/// A fixed set of participant ids, stored in ascending order.
///
/// Ordering is lexicographic over the sorted members, which is also the order
/// [`Combination::enumerate`] produces.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct Combination(Vec<u32>);

impl Combination {
    pub fn new(mut members: Vec<u32>) -> Result<Self, CombinationError> {
        if members.is_empty() {
            return Err(CombinationError::Empty);
        }
        members.sort_unstable();
        if let Some(pair) = members.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(CombinationError::Duplicate(pair[0]));
        }
        Ok(Self(members))
    }

    /// All `size`-element subsets of `members`, in lexicographic order.
    ///
    /// Duplicate ids in `members` are collapsed first. Returns nothing when
    /// `size` is zero or larger than the member count.
    pub fn enumerate(members: &[u32], size: usize) -> Vec<Combination> {
        let mut sorted = members.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        let n = sorted.len();
        if size == 0 || size > n {
            return Vec::new();
        }

        let mut picks: Vec<usize> = (0..size).collect();
        let mut combinations = Vec::new();
        loop {
            combinations.push(Self(picks.iter().map(|&i| sorted[i]).collect()));
            let Some(i) = (0..size).rev().find(|&i| picks[i] != i + n - size) else {
                return combinations;
            };
            picks[i] += 1;
            for j in i + 1..size {
                picks[j] = picks[j - 1] + 1;
            }
        }
    }

    pub fn members(&self) -> &[u32] {
        &self.0
    }

    pub fn size(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.0.binary_search(&id).is_ok()
    }

    /// Member count followed by the members, all as big-endian `u32`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 * (self.0.len() + 1));
        bytes.extend_from_slice(&(self.0.len() as u32).to_be_bytes());
        for member in &self.0 {
            bytes.extend_from_slice(&member.to_be_bytes());
        }
        bytes
    }
}

impl TryFrom<Vec<u32>> for Combination {
    type Error = CombinationError;

    fn try_from(members: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(members)
    }
}

impl From<Combination> for Vec<u32> {
    fn from(combination: Combination) -> Self {
        combination.0
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, member) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{member}")?;
        }
        write!(f, ")")
    }
}
