//! # Groth16 Verifier Contract
//!
//! Holds the verification key for the vote circuit and answers
//! `verify(proof, pub_signals) -> bool` for the voting contract. The voting
//! contract only knows this contract's address, so a different verifier (or a
//! mock) can be swapped in without touching vote validation.
//!
//! Vote circuit public signals: `[root, nullifier, signal_hash, proposal_id]`.

#![no_std]
use soroban_sdk::{
    contract, contracterror, contractimpl, log, symbol_short, Address, Env, Symbol, Vec, U256,
};

pub use zk_groth16::{Proof, VerificationKey};

const ADMIN: Symbol = symbol_short!("admin");
const VK: Symbol = symbol_short!("vk");

/// Number of public signals exposed by the vote circuit.
pub const VOTE_SIGNAL_COUNT: u32 = 4;
const EXPECTED_IC_LENGTH: u32 = VOTE_SIGNAL_COUNT + 1;

#[contracterror]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum VerifierError {
    NotAdmin = 1,
    IcLengthMismatch = 2,
}

#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct VkSetEvent {
    pub ic_len: u32,
}

#[contract]
pub struct Groth16Verifier;

#[contractimpl]
impl Groth16Verifier {
    pub fn __constructor(env: Env, admin: Address) {
        env.storage().instance().set(&ADMIN, &admin);
    }

    /// Install or replace the verification key (admin only).
    pub fn set_vk(env: Env, admin: Address, vk: VerificationKey) -> Result<(), VerifierError> {
        admin.require_auth();
        if admin != Self::admin(env.clone()) {
            return Err(VerifierError::NotAdmin);
        }
        if vk.ic.len() != EXPECTED_IC_LENGTH {
            return Err(VerifierError::IcLengthMismatch);
        }

        env.storage().instance().set(&VK, &vk);
        log!(&env, "verification key installed", vk.ic.len());

        VkSetEvent {
            ic_len: vk.ic.len(),
        }
        .publish(&env);
        Ok(())
    }

    pub fn vk(env: Env) -> Option<VerificationKey> {
        env.storage().instance().get(&VK)
    }

    pub fn admin(env: Env) -> Address {
        env.storage()
            .instance()
            .get(&ADMIN)
            .expect("admin set in constructor")
    }

    /// Verify a proof against the stored key. No key means nothing verifies.
    pub fn verify(env: Env, proof: Proof, pub_signals: Vec<U256>) -> bool {
        let vk: VerificationKey = match env.storage().instance().get(&VK) {
            Some(vk) => vk,
            None => {
                log!(&env, "verify called before a key was installed");
                return false;
            }
        };
        zk_groth16::verify_groth16(&env, &vk, &proof, &pub_signals)
    }
}
