//! # Anonymous Voting Contract
//!
//! Registered members vote on proposals without revealing which member cast
//! which ballot. Each vote carries a zero-knowledge proof that the voter is in
//! the membership set committed to by the current root, plus a nullifier that
//! is unique per (member, proposal). The contract never sees an identity; it
//! only checks public values:
//!
//! | Public signal | Binds the proof to                                  |
//! |---------------|-----------------------------------------------------|
//! | root          | the trusted membership root                         |
//! | nullifier     | one vote per member for this proposal               |
//! | signal_hash   | the declared option, `keccak256("VOTE_<i>") >> 8`   |
//! | proposal_id   | this proposal only (external nullifier)             |
//!
//! Proof verification is delegated to a verifier contract whose address is
//! configured at deployment. Tallies are plain counts in `Simple` mode and
//! `isqrt(token balance)` weights in `Quadratic` mode.
//!
//! Each invocation runs as one ledger transaction, so the nullifier
//! check-and-insert and the tally update in `vote` cannot interleave with
//! another vote, and any error rolls back every write of the call.

#![no_std]
use soroban_sdk::{contract, contractimpl, log, Address, Env, String, Vec, U256};

mod storage;
mod tally;
mod types;
mod validator;

pub use types::*;
pub use validator::{signal_hash_for, Ballot, ContractVerifier, ProofVerifier};
pub use zk_groth16::Proof;

#[contract]
pub struct AnonVoting;

#[contractimpl]
impl AnonVoting {
    /// Constructor: admin authority, verifier contract, initial membership root
    /// and an optional token used for quadratic weights.
    pub fn __constructor(
        env: Env,
        admin: Address,
        verifier: Address,
        initial_root: U256,
        weight_source: Option<Address>,
    ) {
        storage::set_admin(&env, &admin);
        storage::set_verifier(&env, &verifier);
        storage::set_member_root(&env, &initial_root);
        storage::set_weight_source(&env, &weight_source);
    }

    // ---------------------------------------------------------------------
    // Membership root
    // ---------------------------------------------------------------------

    pub fn current_root(env: Env) -> U256 {
        storage::member_root(&env)
    }

    /// Replace the membership root (admin only). The root's content is not
    /// inspected; producing a correct root is the membership manager's job.
    pub fn update_member_root(env: Env, caller: Address, new_root: U256) -> Result<(), VotingError> {
        storage::require_admin(&env, &caller)?;

        let old_root = storage::member_root(&env);
        storage::set_member_root(&env, &new_root);
        log!(&env, "member root updated", new_root);

        RootUpdatedEvent { old_root, new_root }.publish(&env);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Administration
    // ---------------------------------------------------------------------

    pub fn admin(env: Env) -> Address {
        storage::admin(&env)
    }

    /// Hand the admin role to another address (current admin only).
    pub fn transfer_admin(env: Env, new_admin: Address) {
        let old_admin = storage::admin(&env);
        old_admin.require_auth();

        storage::set_admin(&env, &new_admin);

        AdminXferEvent {
            old_admin,
            new_admin,
        }
        .publish(&env);
    }

    pub fn verifier(env: Env) -> Address {
        storage::verifier(&env)
    }

    /// Point vote validation at a different verifier contract (admin only).
    pub fn set_verifier(env: Env, caller: Address, verifier: Address) -> Result<(), VotingError> {
        storage::require_admin(&env, &caller)?;
        storage::set_verifier(&env, &verifier);
        VerifierSetEvent { verifier }.publish(&env);
        Ok(())
    }

    pub fn weight_source(env: Env) -> Option<Address> {
        storage::weight_source(&env)
    }

    /// Set or clear the token consulted for quadratic weights (admin only).
    /// Weights are read at vote time, so a change affects later votes only.
    pub fn set_weight_source(
        env: Env,
        caller: Address,
        source: Option<Address>,
    ) -> Result<(), VotingError> {
        storage::require_admin(&env, &caller)?;
        storage::set_weight_source(&env, &source);
        WeightSourceSetEvent { source }.publish(&env);
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Proposal lifecycle
    // ---------------------------------------------------------------------

    /// Create a proposal that accepts votes for `duration_secs` from now.
    pub fn create_proposal(
        env: Env,
        caller: Address,
        title: String,
        description: String,
        mode: VoteMode,
        options: Vec<String>,
        duration_secs: u64,
    ) -> Result<u64, VotingError> {
        storage::require_admin(&env, &caller)?;

        if options.len() < 2 {
            return Err(VotingError::InvalidOptions);
        }
        if options.len() > MAX_OPTIONS {
            return Err(VotingError::TooManyOptions);
        }
        if options.iter().any(|option| option.len() > MAX_OPTION_LEN) {
            return Err(VotingError::OptionTooLong);
        }
        if title.len() > MAX_TITLE_LEN {
            return Err(VotingError::TitleTooLong);
        }
        if description.len() > MAX_DESCRIPTION_LEN {
            return Err(VotingError::DescriptionTooLong);
        }

        let now = env.ledger().timestamp();
        let closes_at = now
            .checked_add(duration_secs)
            .ok_or(VotingError::InvalidDuration)?;

        let mut tally = Vec::new(&env);
        for _ in 0..options.len() {
            tally.push_back(0u128);
        }

        let proposal_id = storage::next_proposal_id(&env);
        let proposal = Proposal {
            id: proposal_id,
            title: title.clone(),
            description,
            mode,
            options,
            created_at: now,
            closes_at,
            closed: false,
            tally,
            winner: NO_WINNER,
        };
        storage::save_proposal(&env, &proposal);

        log!(&env, "proposal created", proposal_id, closes_at);

        ProposalCreatedEvent {
            proposal_id,
            title,
            mode,
            option_count: proposal.options.len(),
            closes_at,
        }
        .publish(&env);

        Ok(proposal_id)
    }

    pub fn get_proposal(env: Env, proposal_id: u64) -> Result<ProposalView, VotingError> {
        let proposal = storage::load_proposal(&env, proposal_id)?;
        Ok(ProposalView {
            is_open: proposal.is_open(env.ledger().timestamp()),
            title: proposal.title,
            mode: proposal.mode,
            closes_at: proposal.closes_at,
            options: proposal.options,
        })
    }

    /// Full stored record, including description and tallies.
    pub fn proposal(env: Env, proposal_id: u64) -> Result<Proposal, VotingError> {
        storage::load_proposal(&env, proposal_id)
    }

    pub fn proposal_count(env: Env) -> u64 {
        storage::proposal_count(&env)
    }

    /// Close a proposal whose voting period has ended. Anyone may call.
    pub fn close_proposal(env: Env, proposal_id: u64) -> Result<u32, VotingError> {
        let mut proposal = storage::load_proposal(&env, proposal_id)?;
        if proposal.closed {
            return Err(VotingError::AlreadyClosed);
        }
        if env.ledger().timestamp() < proposal.closes_at {
            return Err(VotingError::TooEarly);
        }

        tally::close(&env, &mut proposal);
        storage::save_proposal(&env, &proposal);
        Ok(proposal.winner)
    }

    /// Winning option of a closed proposal; `None` while open or on a tie.
    pub fn winner(env: Env, proposal_id: u64) -> Result<Option<u32>, VotingError> {
        let proposal = storage::load_proposal(&env, proposal_id)?;
        if !proposal.closed || proposal.winner == NO_WINNER {
            return Ok(None);
        }
        Ok(Some(proposal.winner))
    }

    // ---------------------------------------------------------------------
    // Voting
    // ---------------------------------------------------------------------

    /// Submit an anonymous vote.
    ///
    /// Anyone may relay a ballot. `voter` is only consulted for quadratic
    /// proposals with a weight source, where it must authorize the call and
    /// its token balance sets the weight; it is not linked to the membership
    /// proof. A vote landing at or after `closes_at` on a proposal nobody has
    /// closed yet is counted and then closes the proposal.
    pub fn vote(
        env: Env,
        voter: Option<Address>,
        proposal_id: u64,
        option_index: u32,
        signal_hash: U256,
        nullifier: U256,
        root: U256,
        proof: Proof,
    ) -> Result<(), VotingError> {
        let ballot = Ballot {
            option_index,
            signal_hash,
            nullifier,
            root,
            proof,
        };
        let verifier = ContractVerifier(storage::verifier(&env));
        let mut proposal = validator::validate(&env, proposal_id, &ballot, &verifier)?;
        let weight = tally::vote_weight(&env, proposal.mode, storage::weight_source(&env), &voter)?;

        ProofVerifiedEvent {
            proposal_id,
            nullifier: ballot.nullifier.clone(),
        }
        .publish(&env);

        storage::consume_nullifier(&env, proposal_id, &ballot.nullifier);
        tally::apply_vote(&env, &mut proposal, option_index, &ballot.nullifier, weight)?;
        storage::save_proposal(&env, &proposal);
        Ok(())
    }

    pub fn is_nullifier_used(env: Env, proposal_id: u64, nullifier: U256) -> bool {
        storage::nullifier_used(&env, proposal_id, &nullifier)
    }

    /// The signal hash a client must prove for `option_index`.
    pub fn signal_hash(env: Env, option_index: u32) -> U256 {
        signal_hash_for(&env, option_index)
    }

    // ---------------------------------------------------------------------
    // Results
    // ---------------------------------------------------------------------

    /// Paginated per-option weights, `[start, start + count)` clamped to the
    /// option count; `count == 0` reads to the end.
    pub fn tallies(
        env: Env,
        proposal_id: u64,
        start: u32,
        count: u32,
    ) -> Result<Vec<u128>, VotingError> {
        let proposal = storage::load_proposal(&env, proposal_id)?;
        tally::tally_range(&env, &proposal.tally, start, count)
    }
}
