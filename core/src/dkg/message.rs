use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::channel::SealedBox;
use crate::group::Group;

use super::combination::Combination;

/// Broadcast: the sender's long-term public key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Round1Message<G: Group> {
    pub sender: u32,
    pub public_key: G::Point,
}

/// Point-to-point: the sender's sealed contribution to every combination it
/// shares with the receiver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round2Message {
    pub sender: u32,
    pub receiver: u32,
    #[serde(with = "entries")]
    pub cipher_map: BTreeMap<Combination, SealedBox>,
}

/// Broadcast: the public key of every combination the sender belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Round3Message<G: Group> {
    pub sender: u32,
    #[serde(with = "entries")]
    pub public_keys: BTreeMap<Combination, G::Point>,
}

/// First context of a round-2 seal: binds the box to one sender and receiver.
pub(crate) fn round2_context(sender: u32, receiver: u32) -> Vec<u8> {
    let mut context = b"round2".to_vec();
    context.extend_from_slice(&sender.to_be_bytes());
    context.extend_from_slice(&receiver.to_be_bytes());
    context
}

/// Maps keyed by [`Combination`] travel as `[key, value]` lists so that
/// formats with string-only map keys can carry them.
mod entries {
    use std::collections::BTreeMap;

    use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<K, V, S>(map: &BTreeMap<K, V>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        V: Serialize,
        S: Serializer,
    {
        serializer.collect_seq(map.iter())
    }

    pub fn deserialize<'de, K, V, D>(deserializer: D) -> Result<BTreeMap<K, V>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        V: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        let entries = Vec::<(K, V)>::deserialize(deserializer)?;
        let count = entries.len();
        let map: BTreeMap<K, V> = entries.into_iter().collect();
        if map.len() != count {
            return Err(D::Error::custom("repeated combination"));
        }
        Ok(map)
    }
}
