use soroban_sdk::{log, token::TokenClient, Address, Env, Vec, U256};

use crate::types::{
    Proposal, ProposalClosedEvent, VoteMode, VoteRecordedEvent, VotingError, NO_WINNER,
};

/// Weight of one accepted vote.
///
/// Simple mode, or Quadratic mode without a configured weight source, counts
/// every vote as 1 and never looks at `voter`. Otherwise the voter must be
/// given and authorize the call, and the weight is `isqrt(balance)` of its
/// balance on the weight-source token; negative balances weigh nothing.
pub fn vote_weight(
    env: &Env,
    mode: VoteMode,
    source: Option<Address>,
    voter: &Option<Address>,
) -> Result<u64, VotingError> {
    match (mode, source) {
        (VoteMode::Quadratic, Some(token)) => {
            let voter = voter.as_ref().ok_or(VotingError::VoterRequired)?;
            voter.require_auth();
            let balance = TokenClient::new(env, &token).balance(voter);
            Ok(quadratic_weight(balance))
        }
        _ => Ok(1),
    }
}

pub fn quadratic_weight(balance: i128) -> u64 {
    if balance <= 0 {
        return 0;
    }
    // sqrt(i128::MAX) < 2^64
    (balance as u128).isqrt() as u64
}

/// Adds `weight` to the chosen option and records the vote. A vote landing at
/// or after `closes_at` closes the proposal once it is counted.
pub fn apply_vote(
    env: &Env,
    proposal: &mut Proposal,
    option_index: u32,
    nullifier: &U256,
    weight: u64,
) -> Result<(), VotingError> {
    let current = proposal
        .tally
        .get(option_index)
        .ok_or(VotingError::InvalidOption)?;
    let updated = current
        .checked_add(weight as u128)
        .ok_or(VotingError::TallyOverflow)?;
    proposal.tally.set(option_index, updated);

    VoteRecordedEvent {
        proposal_id: proposal.id,
        option_index,
        nullifier: nullifier.clone(),
        weight,
    }
    .publish(env);

    if env.ledger().timestamp() >= proposal.closes_at {
        close(env, proposal);
    }
    Ok(())
}

/// Scans final tallies left to right for the winner.
///
/// The running maximum starts at zero with no winner. A strictly greater tally
/// takes the lead; a tally equal to the running maximum resets the winner to
/// `NO_WINNER`. Zero tallies therefore only matter before any option has
/// received weight, and an all-zero proposal has no winner.
pub fn select_winner(tally: &Vec<u128>) -> u32 {
    let mut max = 0u128;
    let mut winner = NO_WINNER;
    for (index, votes) in tally.iter().enumerate() {
        if votes > max {
            max = votes;
            winner = index as u32;
        } else if votes == max {
            winner = NO_WINNER;
        }
    }
    winner
}

/// Marks the proposal closed and fixes its winner. Callers check lifecycle
/// preconditions; this only performs the transition.
pub fn close(env: &Env, proposal: &mut Proposal) {
    proposal.closed = true;
    proposal.winner = select_winner(&proposal.tally);

    log!(env, "proposal closed", proposal.id, proposal.winner);

    ProposalClosedEvent {
        proposal_id: proposal.id,
        winner: proposal.winner,
    }
    .publish(env);
}

/// Clamped slice of a tally vector. `count == 0` or an overrunning range reads
/// to the end.
pub fn tally_range(
    env: &Env,
    tally: &Vec<u128>,
    start: u32,
    count: u32,
) -> Result<Vec<u128>, VotingError> {
    let len = tally.len();
    if start >= len {
        return Err(VotingError::OutOfBounds);
    }
    let end = match start.checked_add(count) {
        Some(end) if count != 0 && end <= len => end,
        _ => len,
    };

    let mut out = Vec::new(env);
    for index in start..end {
        if let Some(votes) = tally.get(index) {
            out.push_back(votes);
        }
    }
    Ok(out)
}
