use curve25519_dalek::{constants::EIGHT_TORSION, scalar::Scalar};
use rand::{rngs::StdRng, SeedableRng};
use threshold_dkg::channel::{ChannelError, Ecies};
use threshold_dkg::dkg::{
    reconstruct_private_key, DkgError, DkgOutput, Player, PlayerState, Round1Message,
    Round2Message, Round3Message,
};
use threshold_dkg::group::{Ed25519, Group};
use threshold_dkg::params::DkgParameters;
use threshold_dkg::vss::FeldmanVss;

type TestPlayer = Player<Ed25519>;

fn new_players(threshold: usize, participants: usize, seed: u64) -> Vec<TestPlayer> {
    let params =
        DkgParameters::new(threshold, participants).expect("parameters should be valid");
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=participants as u32)
        .map(|id| Player::new(id, params, &mut rng).expect("player creation succeeds"))
        .collect()
}

fn player_mut(players: &mut [TestPlayer], id: u32) -> &mut TestPlayer {
    players
        .iter_mut()
        .find(|player| player.id() == id)
        .expect("receiver exists")
}

fn round1(players: &mut [TestPlayer]) {
    let broadcasts: Vec<Round1Message<Ed25519>> =
        players.iter().map(Player::round1_message).collect();
    for player in players.iter_mut() {
        let id = player.id();
        // reverse order: arrival order must not matter
        for message in broadcasts.iter().rev().filter(|m| m.sender != id) {
            player.round1_recv(message).expect("round 1 message accepted");
        }
        assert_eq!(player.state(), PlayerState::Round1Done);
    }
}

fn round2_messages(players: &mut [TestPlayer]) -> Vec<Round2Message> {
    players
        .iter_mut()
        .flat_map(|player| player.round2_init(&Ecies).expect("round 2 init succeeds"))
        .collect()
}

fn deliver_round2(players: &mut [TestPlayer], messages: &[Round2Message]) {
    for message in messages {
        player_mut(players, message.receiver)
            .round2_recv(message, &Ecies)
            .expect("round 2 message accepted");
    }
}

fn round3_messages(players: &mut [TestPlayer]) -> Vec<Round3Message<Ed25519>> {
    players
        .iter_mut()
        .map(|player| player.round3_init().expect("round 3 init succeeds"))
        .collect()
}

fn deliver_round3(players: &mut [TestPlayer], messages: &[Round3Message<Ed25519>]) {
    for player in players.iter_mut() {
        let id = player.id();
        for message in messages.iter().filter(|m| m.sender != id) {
            player.round3_recv(message).expect("round 3 message accepted");
        }
    }
}

fn run_dkg(threshold: usize, participants: usize, seed: u64) -> Vec<DkgOutput<Ed25519>> {
    let mut players = new_players(threshold, participants, seed);
    round1(&mut players);
    let round2 = round2_messages(&mut players);
    deliver_round2(&mut players, &round2);
    let round3 = round3_messages(&mut players);
    deliver_round3(&mut players, &round3);
    players
        .iter_mut()
        .map(|player| player.finalize().expect("finalize succeeds"))
        .collect()
}

fn by_ids<'a>(outputs: &'a [DkgOutput<Ed25519>], ids: &[u32]) -> Vec<&'a DkgOutput<Ed25519>> {
    ids.iter()
        .map(|id| {
            outputs
                .iter()
                .find(|output| output.id() == *id)
                .expect("signer exists")
        })
        .collect()
}

fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    fn helper<T: Clone>(
        items: &[T],
        k: usize,
        start: usize,
        current: &mut Vec<T>,
        result: &mut Vec<Vec<T>>,
    ) {
        if current.len() == k {
            result.push(current.clone());
            return;
        }
        for idx in start..items.len() {
            current.push(items[idx].clone());
            helper(items, k, idx + 1, current, result);
            current.pop();
        }
    }

    let mut result = Vec::new();
    let mut current = Vec::new();
    helper(items, k, 0, &mut current, &mut result);
    result
}

#[test]
fn six_players_threshold_three() {
    let outputs = run_dkg(3, 6, 2024);
    assert_eq!(outputs.len(), 6);

    let aggregate = *outputs[0].aggregate_public_key();
    for output in &outputs {
        assert_eq!(*output.aggregate_public_key(), aggregate);
        assert_eq!(output.combinations().len(), 15);
        // choose(5, 3) combinations of size 4 contain a given player
        assert_eq!(output.share_private_keys().len(), 10);
    }
    assert!(Ed25519::is_in_main_subgroup(&aggregate));

    let key = reconstruct_private_key(&by_ids(&outputs, &[1, 2, 5]))
        .expect("signers 1, 2 and 5 cover every combination");
    assert_eq!(Ed25519::base_mul(&key), aggregate);
}

#[test]
fn every_threshold_subset_reconstructs_and_smaller_ones_do_not() {
    let outputs = run_dkg(3, 5, 7);
    let ids: Vec<u32> = (1..=5).collect();
    let aggregate = *outputs[0].aggregate_public_key();

    let mut keys = Vec::new();
    for signers in combinations(&ids, 3) {
        let key = reconstruct_private_key(&by_ids(&outputs, &signers))
            .expect("any three signers reconstruct");
        assert_eq!(Ed25519::base_mul(&key), aggregate);
        keys.push(*key);
    }
    assert!(keys.windows(2).all(|pair| pair[0] == pair[1]));

    for signers in combinations(&ids, 2) {
        assert!(matches!(
            reconstruct_private_key(&by_ids(&outputs, &signers)),
            Err(DkgError::IncompleteCoverage { unclaimed: 1, total: 10 })
        ));
    }
}

#[test]
fn signer_order_does_not_change_the_key() {
    let outputs = run_dkg(2, 4, 99);
    let forward = reconstruct_private_key(&by_ids(&outputs, &[1, 3])).unwrap();
    let backward = reconstruct_private_key(&by_ids(&outputs, &[3, 1])).unwrap();
    let with_extra = reconstruct_private_key(&by_ids(&outputs, &[4, 3, 1])).unwrap();
    assert_eq!(*forward, *backward);
    assert_eq!(*forward, *with_extra);
}

#[test]
fn independent_runs_yield_different_keys() {
    let first = run_dkg(2, 3, 1);
    let second = run_dkg(2, 3, 2);
    assert_ne!(first[0].aggregate_public_key(), second[0].aggregate_public_key());
}

#[test]
fn round3_tampering_is_detected_by_every_recipient() {
    let mut players = new_players(3, 6, 31);
    round1(&mut players);
    let round2 = round2_messages(&mut players);
    deliver_round2(&mut players, &round2);
    let mut round3 = round3_messages(&mut players);

    let (tampered_combination, forged) = {
        let message = &mut round3[0];
        assert_eq!(message.sender, 1);
        let (combination, key) = message
            .public_keys
            .iter_mut()
            .next()
            .expect("player 1 holds combinations");
        *key += Ed25519::base_point();
        (combination.clone(), message.clone())
    };

    // honest keys first, so every recipient already knows each combination
    for player in players.iter_mut().filter(|p| p.id() != 1) {
        let id = player.id();
        for message in round3[1..].iter().filter(|m| m.sender != id) {
            player.round3_recv(message).expect("honest message accepted");
        }
        assert_eq!(
            player.round3_recv(&forged),
            Err(DkgError::ConsistencyError {
                combination: tampered_combination.clone(),
                sender: 1
            })
        );
        assert_eq!(player.state(), PlayerState::Round3Sent);
    }
}

#[test]
fn round2_tampering_fails_authentication_without_state_change() {
    let mut players = new_players(2, 3, 41);
    round1(&mut players);
    let round2 = round2_messages(&mut players);

    let honest = round2
        .iter()
        .find(|m| m.sender == 2 && m.receiver == 1)
        .expect("player 2 writes to player 1")
        .clone();
    let mut tampered = honest.clone();
    let sealed = tampered
        .cipher_map
        .values_mut()
        .next()
        .expect("at least one shared combination");
    sealed.ciphertext[0] ^= 0x01;

    let receiver = player_mut(&mut players, 1);
    assert_eq!(
        receiver.round2_recv(&tampered, &Ecies),
        Err(DkgError::Channel(ChannelError::Authentication))
    );
    assert_eq!(receiver.state(), PlayerState::Round2Sent);

    // a box lifted onto another combination fails too
    let mut swapped = honest.clone();
    if swapped.cipher_map.len() > 1 {
        let mut boxes: Vec<_> = swapped.cipher_map.values().cloned().collect();
        boxes.rotate_left(1);
        for (slot, sealed) in swapped.cipher_map.values_mut().zip(boxes) {
            *slot = sealed;
        }
        assert!(receiver.round2_recv(&swapped, &Ecies).is_err());
    }

    receiver
        .round2_recv(&honest, &Ecies)
        .expect("the untouched message still applies");
}

#[test]
fn small_order_component_is_confined_to_k_zero() {
    let h = EIGHT_TORSION[1];
    let mut rng = StdRng::seed_from_u64(5);
    let p = Ed25519::base_mul(&Ed25519::random_scalar(&mut rng));

    for k in 0u64..8 {
        let candidate = h * Scalar::from(k) + p;
        assert_eq!(Ed25519::is_in_main_subgroup(&candidate), k == 0, "k = {k}");
    }

    let mut players = new_players(1, 2, 6);
    let mut poisoned = players[1].round1_message();
    poisoned.public_key += h;
    assert_eq!(
        players[0].round1_recv(&poisoned),
        Err(DkgError::InvalidPoint { sender: 2 })
    );
    assert_eq!(players[0].state(), PlayerState::Created);
}

#[test]
fn messages_survive_json_transport() {
    let mut players = new_players(2, 4, 77);

    let round1_wire: Vec<String> = players
        .iter()
        .map(|p| serde_json::to_string(&p.round1_message()).unwrap())
        .collect();
    for player in players.iter_mut() {
        for wire in &round1_wire {
            let message: Round1Message<Ed25519> = serde_json::from_str(wire).unwrap();
            if message.sender != player.id() {
                player.round1_recv(&message).unwrap();
            }
        }
    }

    let round2_wire: Vec<String> = round2_messages(&mut players)
        .iter()
        .map(|m| serde_json::to_string(m).unwrap())
        .collect();
    for wire in &round2_wire {
        let message: Round2Message = serde_json::from_str(wire).unwrap();
        player_mut(&mut players, message.receiver)
            .round2_recv(&message, &Ecies)
            .unwrap();
    }

    let round3_wire: Vec<String> = round3_messages(&mut players)
        .iter()
        .map(|m| serde_json::to_string(m).unwrap())
        .collect();
    let round3: Vec<Round3Message<Ed25519>> = round3_wire
        .iter()
        .map(|wire| serde_json::from_str(wire).unwrap())
        .collect();
    deliver_round3(&mut players, &round3);

    let outputs: Vec<_> = players.iter_mut().map(|p| p.finalize().unwrap()).collect();
    let key = reconstruct_private_key(&by_ids(&outputs, &[2, 4])).unwrap();
    assert_eq!(&Ed25519::base_mul(&key), outputs[0].aggregate_public_key());
}

#[test]
fn feldman_shares_verify_and_recover() {
    let mut rng = StdRng::seed_from_u64(8);
    let secret = Ed25519::random_scalar(&mut rng);
    let indices: Vec<Scalar> = (1u64..=4).map(Scalar::from).collect();
    let (shares, commitments) =
        FeldmanVss::<Ed25519>::generate(&mut rng, &secret, &indices, 3).unwrap();

    assert!(shares
        .iter()
        .all(|share| FeldmanVss::<Ed25519>::verify(share, &commitments)));

    for picks in combinations(&[0usize, 1, 2, 3], 3) {
        let subset: Vec<_> = picks.iter().map(|&i| shares[i].clone()).collect();
        assert_eq!(FeldmanVss::<Ed25519>::recover(&subset).unwrap(), secret);
    }
    let pair = vec![shares[1].clone(), shares[3].clone()];
    assert_ne!(FeldmanVss::<Ed25519>::recover(&pair).unwrap(), secret);
}
