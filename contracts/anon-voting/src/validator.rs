//! Vote admission pipeline.
//!
//! Every check reads state only. The first failing check decides the error,
//! and nothing is written until all of them pass, so a rejected vote leaves
//! the ledger exactly as it found it.

use soroban_sdk::{log, Address, Bytes, Env, IntoVal, Symbol, Vec, U256};
use zk_groth16::Proof;

use crate::storage;
use crate::types::{Proposal, VotingError};

const SIGNAL_PREFIX: &[u8] = b"VOTE_";

/// Proof-verification capability consumed by the validator.
pub trait ProofVerifier {
    fn verify(&self, env: &Env, proof: &Proof, pub_signals: &Vec<U256>) -> bool;
}

/// Verifier reached through a contract address exposing
/// `verify(proof, pub_signals) -> bool`.
pub struct ContractVerifier(pub Address);

impl ProofVerifier for ContractVerifier {
    // A trapping or erroring verifier counts as a rejection.
    fn verify(&self, env: &Env, proof: &Proof, pub_signals: &Vec<U256>) -> bool {
        let result = env.try_invoke_contract::<bool, soroban_sdk::Error>(
            &self.0,
            &Symbol::new(env, "verify"),
            soroban_sdk::vec![env, proof.into_val(env), pub_signals.into_val(env)],
        );
        matches!(result, Ok(Ok(true)))
    }
}

/// A vote as submitted by a client.
pub struct Ballot {
    pub option_index: u32,
    pub signal_hash: U256,
    pub nullifier: U256,
    pub root: U256,
    pub proof: Proof,
}

/// Canonical signal for an option: `keccak256("VOTE_" ++ decimal(index)) >> 8`.
///
/// The shift keeps the hash below the BN254 scalar field modulus so it can be
/// used as a public signal.
pub fn signal_hash_for(env: &Env, option_index: u32) -> U256 {
    let mut preimage = Bytes::from_slice(env, SIGNAL_PREFIX);
    append_decimal(&mut preimage, option_index);
    let digest = env.crypto().keccak256(&preimage).to_array();
    U256::from_be_bytes(env, &Bytes::from_array(env, &digest)).shr(8)
}

fn append_decimal(out: &mut Bytes, mut value: u32) {
    let mut digits = [0u8; 10];
    let mut start = digits.len();
    loop {
        start -= 1;
        digits[start] = b'0' + (value % 10) as u8;
        value /= 10;
        if value == 0 {
            break;
        }
    }
    for digit in &digits[start..] {
        out.push_back(*digit);
    }
}

/// Public signals in circuit order: `[root, nullifier, signal_hash, proposal_id]`.
pub fn public_signals(env: &Env, proposal_id: u64, ballot: &Ballot) -> Vec<U256> {
    soroban_sdk::vec![
        env,
        ballot.root.clone(),
        ballot.nullifier.clone(),
        ballot.signal_hash.clone(),
        U256::from_u128(env, proposal_id as u128)
    ]
}

/// Runs all admission checks and returns the proposal the ballot targets.
pub fn validate<V: ProofVerifier>(
    env: &Env,
    proposal_id: u64,
    ballot: &Ballot,
    verifier: &V,
) -> Result<Proposal, VotingError> {
    let proposal = storage::load_proposal(env, proposal_id)?;
    if !proposal.accepts_votes() {
        return Err(VotingError::ProposalClosed);
    }

    if ballot.option_index >= proposal.options.len() {
        return Err(VotingError::InvalidOption);
    }

    if zk_groth16::validate_nullifier(env, &ballot.nullifier).is_err() {
        return Err(VotingError::InvalidNullifier);
    }
    if storage::nullifier_used(env, proposal_id, &ballot.nullifier) {
        return Err(VotingError::NullifierAlreadyUsed);
    }

    if ballot.root != storage::member_root(env) {
        return Err(VotingError::RootMismatch);
    }

    if ballot.signal_hash != signal_hash_for(env, ballot.option_index) {
        return Err(VotingError::SignalMismatch);
    }

    let signals = public_signals(env, proposal_id, ballot);
    if !verifier.verify(env, &ballot.proof, &signals) {
        log!(env, "proof rejected", proposal_id);
        return Err(VotingError::ProofInvalid);
    }

    Ok(proposal)
}
