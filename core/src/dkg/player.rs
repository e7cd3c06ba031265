use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};
use math::sort_by_residue;
use rand::CryptoRng;
use zeroize::{Zeroize, Zeroizing};

use crate::channel::SecureChannel;
use crate::group::Group;
use crate::params::DkgParameters;

use super::combination::Combination;
use super::error::{DkgError, DkgResult};
use super::message::{round2_context, Round1Message, Round2Message, Round3Message};
use super::output::DkgOutput;

const PREMERGE_TAG: &[u8] = b"premerge";

/// Progress of one participant through the key generation.
///
/// `Round2Sent` and `Round3Sent` mean the participant has produced its own
/// messages for that round and is still collecting everyone else's.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerState {
    Created,
    Round1Done,
    Round2Sent,
    Round2Done,
    Round3Sent,
    Round3Done,
    Finalized,
}

/// One participant of the M-of-N key generation.
///
/// Rounds:
/// 1. broadcast [`Player::round1_message`], feed every peer's into
///    [`Player::round1_recv`];
/// 2. send each output of [`Player::round2_init`] to its receiver, feed the
///    received ones into [`Player::round2_recv`];
/// 3. broadcast [`Player::round3_init`], feed the peers' into
///    [`Player::round3_recv`];
/// 4. [`Player::finalize`].
///
/// A rejected message leaves the player exactly as it was.
pub struct Player<G: Group> {
    id: u32,
    params: DkgParameters,
    state: PlayerState,
    private_key: G::Scalar,
    public_key: G::Point,
    peers: BTreeMap<u32, G::Point>,
    combinations: Vec<Combination>,
    accumulators: BTreeMap<Combination, G::Point>,
    round2_expected: BTreeSet<u32>,
    round2_received: BTreeSet<u32>,
    share_private_keys: BTreeMap<Combination, G::Scalar>,
    share_public_keys: BTreeMap<Combination, G::Point>,
    round3_received: BTreeSet<u32>,
}

impl<G: Group> Player<G> {
    pub fn new<R: CryptoRng + ?Sized>(
        id: u32,
        params: DkgParameters,
        rng: &mut R,
    ) -> DkgResult<Self> {
        if id == 0 {
            return Err(DkgError::ZeroParticipantId);
        }
        let private_key = G::random_scalar(rng);
        let public_key = G::base_mul(&private_key);
        debug!(
            "player {id}: created for {} of {}",
            params.threshold(),
            params.participants()
        );
        Ok(Self {
            id,
            params,
            state: PlayerState::Created,
            private_key,
            public_key,
            peers: BTreeMap::new(),
            combinations: Vec::new(),
            accumulators: BTreeMap::new(),
            round2_expected: BTreeSet::new(),
            round2_received: BTreeSet::new(),
            share_private_keys: BTreeMap::new(),
            share_public_keys: BTreeMap::new(),
            round3_received: BTreeSet::new(),
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn params(&self) -> &DkgParameters {
        &self.params
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn public_key(&self) -> &G::Point {
        &self.public_key
    }

    /// Every combination of the run, in lexicographic order. Empty before
    /// round 2.
    pub fn combinations(&self) -> &[Combination] {
        &self.combinations
    }

    pub fn round1_message(&self) -> Round1Message<G> {
        Round1Message {
            sender: self.id,
            public_key: self.public_key,
        }
    }

    /// Records a peer's public key. Order of arrival does not matter; the
    /// round closes once all `N - 1` peers are known.
    ///
    /// Re-delivering an identical message is a no-op.
    pub fn round1_recv(&mut self, message: &Round1Message<G>) -> DkgResult<()> {
        self.expect_state(
            "round1_recv",
            &[PlayerState::Created, PlayerState::Round1Done],
        )?;
        self.check_round1(message).inspect_err(|err| {
            warn!("player {}: rejected round 1 message: {err}", self.id)
        })?;

        if self.peers.contains_key(&message.sender) {
            debug!(
                "player {}: ignoring repeated round 1 message from {}",
                self.id, message.sender
            );
            return Ok(());
        }
        self.peers.insert(message.sender, message.public_key);
        debug!("player {}: public key of {} recorded", self.id, message.sender);

        if self.peers.len() == self.params.peer_count() {
            self.transition(PlayerState::Round1Done);
        }
        Ok(())
    }

    fn check_round1(&self, message: &Round1Message<G>) -> DkgResult<()> {
        let sender = message.sender;
        if sender == self.id {
            return Err(DkgError::SelfMessage(sender));
        }
        if sender == 0 {
            return Err(DkgError::ZeroParticipantId);
        }
        if !G::is_in_main_subgroup(&message.public_key) {
            return Err(DkgError::InvalidPoint { sender });
        }
        match self.peers.get(&sender) {
            Some(known) if *known != message.public_key => Err(DkgError::DuplicateMessage(sender)),
            Some(_) => Ok(()),
            None if self.peers.len() == self.params.peer_count() => {
                Err(DkgError::UnknownParticipant(sender))
            }
            None => Ok(()),
        }
    }

    /// Enumerates the combinations, computes this participant's contribution
    /// to each one it belongs to and seals them for the co-members.
    ///
    /// Returns one message per peer sharing at least one combination, sorted
    /// by receiver.
    pub fn round2_init<C: SecureChannel<G>>(
        &mut self,
        channel: &C,
    ) -> DkgResult<Vec<Round2Message>> {
        if self.state == PlayerState::Created {
            return Err(DkgError::IncompleteRound {
                round: 1,
                received: self.peers.len(),
                expected: self.params.peer_count(),
            });
        }
        self.expect_state("round2_init", &[PlayerState::Round1Done])?;

        let members: Vec<u32> = self
            .peers
            .keys()
            .copied()
            .chain(std::iter::once(self.id))
            .collect();
        let combinations = Combination::enumerate(&members, self.params.combination_size());

        let mut accumulators = BTreeMap::new();
        for combination in combinations.iter().filter(|c| c.contains(self.id)) {
            let mut contribution = G::identity();
            for member in combination.members().iter().filter(|&&m| m != self.id) {
                let peer_key = self
                    .peers
                    .get(member)
                    .ok_or(DkgError::UnknownParticipant(*member))?;
                contribution += *peer_key * self.private_key;
            }
            accumulators.insert(combination.clone(), contribution);
        }

        let mut messages = Vec::new();
        let mut expected = BTreeSet::new();
        for (&peer, peer_key) in &self.peers {
            let context1 = round2_context(self.id, peer);
            let mut cipher_map = BTreeMap::new();
            for (combination, contribution) in accumulators.iter().filter(|(c, _)| c.contains(peer)) {
                let plaintext = Zeroizing::new(G::point_to_bytes(contribution));
                let sealed = channel.seal(
                    &plaintext,
                    &self.private_key,
                    peer_key,
                    &context1,
                    &combination.to_bytes(),
                )?;
                cipher_map.insert(combination.clone(), sealed);
            }
            if cipher_map.is_empty() {
                continue;
            }
            expected.insert(peer);
            messages.push(Round2Message {
                sender: self.id,
                receiver: peer,
                cipher_map,
            });
        }

        info!(
            "player {}: {} combinations, member of {}",
            self.id,
            combinations.len(),
            accumulators.len()
        );
        self.combinations = combinations;
        self.accumulators = accumulators;
        self.round2_expected = expected;
        self.transition(PlayerState::Round2Sent);
        self.close_round2();
        Ok(messages)
    }

    /// Opens a peer's contributions and adds them to the accumulators.
    ///
    /// The message must cover exactly the combinations shared with the
    /// sender. Every box is opened and every point validated before any
    /// accumulator changes.
    pub fn round2_recv<C: SecureChannel<G>>(
        &mut self,
        message: &Round2Message,
        channel: &C,
    ) -> DkgResult<()> {
        self.expect_state(
            "round2_recv",
            &[PlayerState::Round2Sent, PlayerState::Round2Done],
        )?;
        let contributions = self.open_round2(message, channel).inspect_err(|err| {
            warn!("player {}: rejected round 2 message: {err}", self.id)
        })?;

        for (combination, point) in contributions {
            if let Some(accumulator) = self.accumulators.get_mut(&combination) {
                *accumulator += point;
            }
        }
        self.round2_received.insert(message.sender);
        debug!("player {}: round 2 contributions of {} added", self.id, message.sender);
        self.close_round2();
        Ok(())
    }

    fn open_round2<C: SecureChannel<G>>(
        &self,
        message: &Round2Message,
        channel: &C,
    ) -> DkgResult<Vec<(Combination, G::Point)>> {
        let sender = message.sender;
        if message.receiver != self.id {
            return Err(DkgError::MisaddressedMessage {
                receiver: message.receiver,
                id: self.id,
            });
        }
        let sender_key = self.known_peer(sender)?;
        if self.round2_received.contains(&sender) {
            return Err(DkgError::DuplicateMessage(sender));
        }

        let context1 = round2_context(sender, self.id);
        let mut contributions = Vec::with_capacity(message.cipher_map.len());
        for (combination, sealed) in &message.cipher_map {
            if !combination.contains(sender) || !self.accumulators.contains_key(combination) {
                return Err(DkgError::UnknownCombination {
                    combination: combination.clone(),
                    sender,
                });
            }
            let plaintext = channel.open(
                sealed,
                &self.private_key,
                sender_key,
                &context1,
                &combination.to_bytes(),
            )?;
            let point = G::point_from_bytes(&plaintext)
                .filter(G::is_in_main_subgroup)
                .ok_or(DkgError::InvalidPoint { sender })?;
            contributions.push((combination.clone(), point));
        }

        let expected = self.accumulators.keys().filter(|c| c.contains(sender)).count();
        if contributions.len() != expected {
            return Err(DkgError::IncompleteMessage {
                sender,
                received: contributions.len(),
                expected,
            });
        }
        Ok(contributions)
    }

    fn close_round2(&mut self) {
        if self.state == PlayerState::Round2Sent && self.round2_received == self.round2_expected {
            self.transition(PlayerState::Round2Done);
        }
    }

    /// Hashes every accumulator into a share private key and publishes the
    /// matching public keys. The accumulators are wiped.
    pub fn round3_init(&mut self) -> DkgResult<Round3Message<G>> {
        if self.state == PlayerState::Round2Sent {
            return Err(DkgError::IncompleteRound {
                round: 2,
                received: self.round2_received.len(),
                expected: self.round2_expected.len(),
            });
        }
        self.expect_state("round3_init", &[PlayerState::Round2Done])?;

        let mut accumulators = std::mem::take(&mut self.accumulators);
        for (combination, accumulator) in accumulators.iter_mut() {
            let encoded = Zeroizing::new(G::point_to_bytes(accumulator));
            let share_private = G::hash_to_scalar(&[encoded.as_slice()]);
            self.share_public_keys
                .insert(combination.clone(), G::base_mul(&share_private));
            self.share_private_keys.insert(combination.clone(), share_private);
            accumulator.zeroize();
        }
        drop(accumulators);

        let message = Round3Message {
            sender: self.id,
            public_keys: self.share_public_keys.clone(),
        };
        self.transition(PlayerState::Round3Sent);
        self.close_round3();
        Ok(message)
    }

    /// Merges a peer's combination public keys into the known set.
    ///
    /// A key for a combination already known must match it exactly, also when
    /// the sender repeats itself; an identical repeat is a no-op.
    pub fn round3_recv(&mut self, message: &Round3Message<G>) -> DkgResult<()> {
        self.expect_state(
            "round3_recv",
            &[PlayerState::Round3Sent, PlayerState::Round3Done],
        )?;
        let fresh = self.check_round3(message).inspect_err(|err| {
            warn!("player {}: rejected round 3 message: {err}", self.id)
        })?;

        for (combination, public_key) in fresh {
            self.share_public_keys.insert(combination, public_key);
        }
        if !self.round3_received.insert(message.sender) {
            debug!(
                "player {}: ignoring repeated round 3 message from {}",
                self.id, message.sender
            );
            return Ok(());
        }
        debug!("player {}: round 3 keys of {} merged", self.id, message.sender);
        self.close_round3();
        Ok(())
    }

    fn check_round3(&self, message: &Round3Message<G>) -> DkgResult<Vec<(Combination, G::Point)>> {
        let sender = message.sender;
        self.known_peer(sender)?;

        let mut fresh = Vec::new();
        for (combination, public_key) in &message.public_keys {
            if !combination.contains(sender) || self.combinations.binary_search(combination).is_err() {
                return Err(DkgError::UnknownCombination {
                    combination: combination.clone(),
                    sender,
                });
            }
            if !G::is_in_main_subgroup(public_key) {
                return Err(DkgError::InvalidPoint { sender });
            }
            match self.share_public_keys.get(combination) {
                Some(known) if G::point_to_bytes(known) != G::point_to_bytes(public_key) => {
                    return Err(DkgError::ConsistencyError {
                        combination: combination.clone(),
                        sender,
                    });
                }
                Some(_) => {}
                None => fresh.push((combination.clone(), *public_key)),
            }
        }

        let expected = self.combinations.iter().filter(|c| c.contains(sender)).count();
        if message.public_keys.len() != expected {
            return Err(DkgError::IncompleteMessage {
                sender,
                received: message.public_keys.len(),
                expected,
            });
        }
        Ok(fresh)
    }

    fn close_round3(&mut self) {
        if self.state == PlayerState::Round3Sent
            && self.round3_received.len() == self.params.peer_count()
        {
            self.transition(PlayerState::Round3Done);
        }
    }

    /// Premerge: weights every combination key by a hash over the sorted set
    /// of all combination keys and sums them into the aggregate public key.
    ///
    /// Sorting uses each key's canonical coordinate, so every honest
    /// participant computes the same weights.
    pub fn finalize(&mut self) -> DkgResult<DkgOutput<G>> {
        if self.state == PlayerState::Round3Sent {
            return Err(DkgError::IncompleteRound {
                round: 3,
                received: self.round3_received.len(),
                expected: self.params.peer_count(),
            });
        }
        self.expect_state("finalize", &[PlayerState::Round3Done])?;
        if self.share_public_keys.len() != self.combinations.len() {
            return Err(DkgError::IncompleteRound {
                round: 3,
                received: self.share_public_keys.len(),
                expected: self.combinations.len(),
            });
        }

        let mut keyed = self
            .share_public_keys
            .values()
            .map(|point| Ok((G::canonical_coordinate(point)?, *point)))
            .collect::<DkgResult<Vec<_>>>()?;
        sort_by_residue(&mut keyed, |(coordinate, _)| coordinate)?;
        let sorted: Vec<u8> = keyed
            .iter()
            .flat_map(|(_, point)| G::point_to_bytes(point))
            .collect();

        let mut aggregate = G::identity();
        for (combination, public_key) in &self.share_public_keys {
            let encoded = G::point_to_bytes(public_key);
            let weight = G::hash_to_scalar(&[PREMERGE_TAG, sorted.as_slice(), encoded.as_slice()]);
            aggregate += *public_key * weight;
            if let Some(share) = self.share_private_keys.get_mut(combination) {
                *share *= weight;
            }
        }
        self.share_public_keys.clear();

        let output = DkgOutput::new(
            self.id,
            self.combinations.clone(),
            std::mem::take(&mut self.share_private_keys),
            aggregate,
        );
        self.transition(PlayerState::Finalized);
        Ok(output)
    }

    fn known_peer(&self, sender: u32) -> DkgResult<&G::Point> {
        if sender == self.id {
            return Err(DkgError::SelfMessage(sender));
        }
        self.peers
            .get(&sender)
            .ok_or(DkgError::UnknownParticipant(sender))
    }

    fn expect_state(&self, operation: &'static str, allowed: &[PlayerState]) -> DkgResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(DkgError::UnexpectedState {
                operation,
                state: self.state,
            })
        }
    }

    fn transition(&mut self, to: PlayerState) {
        info!("player {}: {:?} -> {:?}", self.id, self.state, to);
        self.state = to;
    }
}

impl<G: Group> Drop for Player<G> {
    fn drop(&mut self) {
        self.private_key.zeroize();
        for accumulator in self.accumulators.values_mut() {
            accumulator.zeroize();
        }
        for share in self.share_private_keys.values_mut() {
            share.zeroize();
        }
    }
}
