use soroban_sdk::{Address, Env, U256};

use crate::types::{DataKey, Proposal, VotingError};

pub fn admin(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Admin)
        .expect("admin set in constructor")
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
}

/// Authenticates `caller` and checks it is the configured admin.
pub fn require_admin(env: &Env, caller: &Address) -> Result<(), VotingError> {
    caller.require_auth();
    if caller != &admin(env) {
        return Err(VotingError::Unauthorized);
    }
    Ok(())
}

pub fn verifier(env: &Env) -> Address {
    env.storage()
        .instance()
        .get(&DataKey::Verifier)
        .expect("verifier set in constructor")
}

pub fn set_verifier(env: &Env, verifier: &Address) {
    env.storage().instance().set(&DataKey::Verifier, verifier);
}

pub fn weight_source(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::WeightSource)
}

pub fn set_weight_source(env: &Env, source: &Option<Address>) {
    match source {
        Some(source) => env.storage().instance().set(&DataKey::WeightSource, source),
        None => env.storage().instance().remove(&DataKey::WeightSource),
    }
}

pub fn member_root(env: &Env) -> U256 {
    env.storage()
        .instance()
        .get(&DataKey::MemberRoot)
        .expect("root set in constructor")
}

pub fn set_member_root(env: &Env, root: &U256) {
    env.storage().instance().set(&DataKey::MemberRoot, root);
}

pub fn proposal_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProposalCount)
        .unwrap_or(0)
}

pub fn next_proposal_id(env: &Env) -> u64 {
    let new_id = proposal_count(env) + 1;
    env.storage()
        .instance()
        .set(&DataKey::ProposalCount, &new_id);
    new_id
}

pub fn load_proposal(env: &Env, proposal_id: u64) -> Result<Proposal, VotingError> {
    env.storage()
        .persistent()
        .get(&DataKey::Proposal(proposal_id))
        .ok_or(VotingError::NotFound)
}

pub fn save_proposal(env: &Env, proposal: &Proposal) {
    env.storage()
        .persistent()
        .set(&DataKey::Proposal(proposal.id), proposal);
}

pub fn nullifier_used(env: &Env, proposal_id: u64, nullifier: &U256) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Nullifier(proposal_id, nullifier.clone()))
}

/// Write-once: callers must have checked `nullifier_used` in the same invocation.
pub fn consume_nullifier(env: &Env, proposal_id: u64, nullifier: &U256) {
    env.storage()
        .persistent()
        .set(&DataKey::Nullifier(proposal_id, nullifier.clone()), &true);
}
