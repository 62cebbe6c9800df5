// Scalar field boundary checks across both contracts.
//
// Every public signal must be a canonical BN254 scalar (< r). The voting
// contract rejects out-of-field nullifiers itself; the root is only compared
// for equality there, so an out-of-field root is caught by the verifier.

use num_bigint::BigUint;
use soroban_sdk::{testutils::Address as _, Address, Bytes, BytesN, Env, String, Vec, U256};

use anon_voting::{AnonVotingClient, Proof, VoteMode, VotingError};
use groth16_verifier::{Groth16VerifierClient, VerificationKey};

const BN254_R: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

fn biguint_to_u256(env: &Env, value: &BigUint) -> U256 {
    let bytes = value.to_bytes_be();
    assert!(bytes.len() <= 32, "value wider than 256 bits");
    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(&bytes);
    U256::from_be_bytes(env, &Bytes::from_array(env, &padded))
}

fn modulus_plus(env: &Env, offset: i64) -> U256 {
    let r: BigUint = BN254_R.parse().expect("valid decimal");
    let value = if offset >= 0 {
        r + BigUint::from(offset as u64)
    } else {
        r - BigUint::from(offset.unsigned_abs())
    };
    biguint_to_u256(env, &value)
}

fn g1(env: &Env) -> BytesN<64> {
    let mut bytes = [0u8; 64];
    bytes[31] = 1;
    bytes[63] = 2;
    BytesN::from_array(env, &bytes)
}

fn g2(env: &Env) -> BytesN<128> {
    let mut bytes = [0u8; 128];
    bytes[31] = 1;
    bytes[95] = 1;
    BytesN::from_array(env, &bytes)
}

fn proof(env: &Env) -> Proof {
    Proof {
        a: g1(env),
        b: g2(env),
        c: g1(env),
    }
}

struct Setup {
    env: Env,
    admin: Address,
    voting: Address,
    proposal_id: u64,
}

fn setup() -> Setup {
    let env = Env::default();
    env.mock_all_auths();

    let admin = Address::generate(&env);
    let verifier = env.register(groth16_verifier::Groth16Verifier, (admin.clone(),));
    let mut ic = Vec::new(&env);
    for _ in 0..5 {
        ic.push_back(g1(&env));
    }
    Groth16VerifierClient::new(&env, &verifier).set_vk(
        &admin,
        &VerificationKey {
            alpha: g1(&env),
            beta: g2(&env),
            gamma: g2(&env),
            delta: g2(&env),
            ic,
        },
    );

    let voting = env.register(
        anon_voting::AnonVoting,
        (
            admin.clone(),
            verifier,
            U256::from_u32(&env, 777),
            None::<Address>,
        ),
    );

    let client = AnonVotingClient::new(&env, &voting);
    let mut options = Vec::new(&env);
    options.push_back(String::from_str(&env, "Yes"));
    options.push_back(String::from_str(&env, "No"));
    let proposal_id = client.create_proposal(
        &admin,
        &String::from_str(&env, "Boundary"),
        &String::from_str(&env, ""),
        &VoteMode::Simple,
        &options,
        &1_000,
    );

    Setup {
        env,
        admin,
        voting,
        proposal_id,
    }
}

fn cast(setup: &Setup, nullifier: &U256) -> Result<(), VotingError> {
    let client = AnonVotingClient::new(&setup.env, &setup.voting);
    match client.try_vote(
        &None,
        &setup.proposal_id,
        &0,
        &client.signal_hash(&0),
        nullifier,
        &client.current_root(),
        &proof(&setup.env),
    ) {
        Ok(_) => Ok(()),
        Err(Ok(err)) => Err(err),
        Err(Err(err)) => panic!("unexpected host error: {:?}", err),
    }
}

#[test]
fn test_nullifier_at_modulus_rejected() {
    let setup = setup();
    let r = modulus_plus(&setup.env, 0);
    assert_eq!(cast(&setup, &r), Err(VotingError::InvalidNullifier));
    assert_eq!(
        cast(&setup, &modulus_plus(&setup.env, 1)),
        Err(VotingError::InvalidNullifier)
    );
}

#[test]
fn test_nullifier_just_below_modulus_accepted() {
    let setup = setup();
    let r_minus_one = modulus_plus(&setup.env, -1);
    assert_eq!(cast(&setup, &r_minus_one), Ok(()));

    let client = AnonVotingClient::new(&setup.env, &setup.voting);
    assert!(client.is_nullifier_used(&setup.proposal_id, &r_minus_one));
}

#[test]
fn test_aliased_nullifier_cannot_replay() {
    // 5 and r + 5 are the same field element; only the canonical one counts
    let setup = setup();
    assert_eq!(cast(&setup, &U256::from_u32(&setup.env, 5)), Ok(()));
    assert_eq!(
        cast(&setup, &modulus_plus(&setup.env, 5)),
        Err(VotingError::InvalidNullifier)
    );
}

#[test]
fn test_out_of_field_root_fails_verification() {
    let setup = setup();
    let client = AnonVotingClient::new(&setup.env, &setup.voting);
    client.update_member_root(&setup.admin, &modulus_plus(&setup.env, 0));

    assert_eq!(
        cast(&setup, &U256::from_u32(&setup.env, 9)),
        Err(VotingError::ProofInvalid)
    );
    assert!(!client.is_nullifier_used(&setup.proposal_id, &U256::from_u32(&setup.env, 9)));
}
