//! # Groth16 / BN254 verification primitives
//!
//! Shared by the verifier contract (which owns a verification key and answers
//! `verify(proof, pub_signals)`) and by the voting contract (which only needs
//! the proof type and the scalar-field checks for nullifiers).
//!
//! Verification equation, with `vk_x = IC[0] + Σ signal[i]·IC[i+1]`:
//!
//! ```text
//! e(-A, B) · e(alpha, beta) · e(vk_x, gamma) · e(C, delta) == 1
//! ```
//!
//! Points use the big-endian (EIP-196/197) encoding expected by the Soroban
//! BN254 host functions.

#![no_std]

#[allow(unused_imports)]
use soroban_sdk::{
    contracterror, contracttype,
    crypto::bn254::{Bn254G1Affine as G1Affine, Bn254G2Affine as G2Affine, Fr},
    Bytes, BytesN, Env, Vec, U256,
};

/// BN254 scalar field modulus r, big-endian.
/// r = 21888242871839275222246405745257275088548364400416034343698204186575808495617
pub const BN254_FR_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

/// r - 1, i.e. -1 in Fr. Multiplying a G1 point by it negates the point.
#[allow(dead_code)]
const BN254_R_MINUS_ONE: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x00,
];

#[contracterror]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Groth16Error {
    /// IC length is not `pub_signals.len() + 1`
    IcLengthMismatch = 40,
    /// Value is >= r and would alias another field element
    SignalNotInField = 41,
    /// Nullifier is zero
    InvalidNullifier = 42,
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationKey {
    pub alpha: BytesN<64>,   // G1
    pub beta: BytesN<128>,   // G2
    pub gamma: BytesN<128>,  // G2
    pub delta: BytesN<128>,  // G2
    pub ic: Vec<BytesN<64>>, // G1, one per public signal plus IC[0]
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Proof {
    pub a: BytesN<64>,  // G1
    pub b: BytesN<128>, // G2
    pub c: BytesN<64>,  // G1
}

fn fr_modulus(env: &Env) -> U256 {
    U256::from_be_bytes(env, &Bytes::from_array(env, &BN254_FR_MODULUS))
}

/// Returns true if `value < r`.
pub fn is_in_field(env: &Env, value: &U256) -> bool {
    value < &fr_modulus(env)
}

/// Rejects values that are not canonical scalar field elements.
///
/// A value `v >= r` reduces to `v - r` inside the circuit, so accepting it
/// would let the same proof be replayed under a second storage key.
pub fn assert_in_field(env: &Env, value: &U256) -> Result<(), Groth16Error> {
    if !is_in_field(env, value) {
        return Err(Groth16Error::SignalNotInField);
    }
    Ok(())
}

/// A nullifier must be non-zero and a canonical field element.
pub fn validate_nullifier(env: &Env, nullifier: &U256) -> Result<(), Groth16Error> {
    if nullifier == &U256::from_u32(env, 0) {
        return Err(Groth16Error::InvalidNullifier);
    }
    assert_in_field(env, nullifier)
}

/// Checks the shape of a (key, signals) pair before any curve arithmetic.
pub fn check_inputs(
    env: &Env,
    vk: &VerificationKey,
    pub_signals: &Vec<U256>,
) -> Result<(), Groth16Error> {
    if pub_signals.len() + 1 != vk.ic.len() {
        return Err(Groth16Error::IcLengthMismatch);
    }
    for signal in pub_signals.iter() {
        assert_in_field(env, &signal)?;
    }
    Ok(())
}

/// Runs the Groth16 pairing check. Returns `false` for malformed inputs.
///
/// With `cfg(test)` or the `testutils` feature the pairing is skipped and any
/// well-shaped input verifies, so contracts can be exercised without real
/// circuit artifacts.
#[allow(unused_variables)]
pub fn verify_groth16(
    env: &Env,
    vk: &VerificationKey,
    proof: &Proof,
    pub_signals: &Vec<U256>,
) -> bool {
    if check_inputs(env, vk, pub_signals).is_err() {
        return false;
    }

    #[cfg(any(test, feature = "testutils"))]
    {
        return true;
    }

    #[cfg(not(any(test, feature = "testutils")))]
    {
        let vk_x = G1Affine::from_bytes(linear_combination(env, vk, pub_signals));
        let neg_a = G1Affine::from_bytes(proof.a.clone()) * neg_one(env);

        let g1 = soroban_sdk::vec![
            env,
            neg_a,
            G1Affine::from_bytes(vk.alpha.clone()),
            vk_x,
            G1Affine::from_bytes(proof.c.clone()),
        ];
        let g2 = soroban_sdk::vec![
            env,
            G2Affine::from_bytes(proof.b.clone()),
            G2Affine::from_bytes(vk.beta.clone()),
            G2Affine::from_bytes(vk.gamma.clone()),
            G2Affine::from_bytes(vk.delta.clone()),
        ];

        env.crypto().bn254().pairing_check(g1, g2)
    }
}

#[cfg(not(any(test, feature = "testutils")))]
fn neg_one(env: &Env) -> Fr {
    let bytes = Bytes::from_array(env, &BN254_R_MINUS_ONE);
    Fr::from(U256::from_be_bytes(env, &bytes))
}

// vk_x = IC[0] + Σ signal[i]·IC[i+1]; lengths are checked by the caller.
#[cfg(not(any(test, feature = "testutils")))]
fn linear_combination(env: &Env, vk: &VerificationKey, pub_signals: &Vec<U256>) -> BytesN<64> {
    let mut acc = match vk.ic.get(0) {
        Some(ic0) => G1Affine::from_bytes(ic0),
        None => return BytesN::from_array(env, &[0u8; 64]),
    };
    for (i, signal) in pub_signals.iter().enumerate() {
        if let Some(point) = vk.ic.get(i as u32 + 1) {
            acc = acc + G1Affine::from_bytes(point) * Fr::from(signal);
        }
    }
    acc.to_bytes()
}
