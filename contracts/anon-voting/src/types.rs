use soroban_sdk::{contracterror, contracttype, Address, String, Vec, U256};

/// Winner value for a closed proposal without a single strict leader.
pub const NO_WINNER: u32 = u32::MAX;

// Size limits to keep ledger entries bounded
pub const MAX_TITLE_LEN: u32 = 256;
pub const MAX_DESCRIPTION_LEN: u32 = 1024;
pub const MAX_OPTIONS: u32 = 64;
pub const MAX_OPTION_LEN: u32 = 128;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Verifier,
    WeightSource,
    MemberRoot,
    ProposalCount,
    Proposal(u64),        // proposal_id -> Proposal
    Nullifier(u64, U256), // (proposal_id, nullifier) -> true
}

#[contracttype]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteMode {
    Simple,    // one vote, weight 1
    Quadratic, // weight = isqrt(balance) from the weight source
}

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct Proposal {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub mode: VoteMode,
    pub options: Vec<String>,
    pub created_at: u64,
    pub closes_at: u64,
    pub closed: bool,
    pub tally: Vec<u128>, // one entry per option
    pub winner: u32,      // NO_WINNER until closed
}

impl Proposal {
    pub fn is_open(&self, now: u64) -> bool {
        !self.closed && now < self.closes_at
    }

    /// Votes are admitted until the proposal is closed. The first vote landing
    /// at or after `closes_at` is still counted and closes the proposal.
    pub fn accepts_votes(&self) -> bool {
        !self.closed
    }
}

/// Read-only summary returned by `get_proposal`.
#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub struct ProposalView {
    pub title: String,
    pub mode: VoteMode,
    pub is_open: bool,
    pub closes_at: u64,
    pub options: Vec<String>,
}

#[contracterror]
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum VotingError {
    // Admission
    InvalidOptions = 1,
    InvalidOption = 2,
    OutOfBounds = 3,
    NotFound = 4,
    TitleTooLong = 5,
    DescriptionTooLong = 6,
    TooManyOptions = 7,
    OptionTooLong = 8,
    InvalidDuration = 9,
    // Protocol integrity
    NullifierAlreadyUsed = 10,
    RootMismatch = 11,
    SignalMismatch = 12,
    ProofInvalid = 13,
    InvalidNullifier = 14,
    TallyOverflow = 15,
    // Lifecycle
    ProposalClosed = 20,
    AlreadyClosed = 21,
    TooEarly = 22,
    // Authorization
    Unauthorized = 30,
    /// Quadratic vote with a weight source but no voter to weigh
    VoterRequired = 31,
}

// Typed Events
#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct ProposalCreatedEvent {
    #[topic]
    pub proposal_id: u64,
    pub title: String,
    pub mode: VoteMode,
    pub option_count: u32,
    pub closes_at: u64,
}

#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct ProofVerifiedEvent {
    #[topic]
    pub proposal_id: u64,
    pub nullifier: U256,
}

#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct VoteRecordedEvent {
    #[topic]
    pub proposal_id: u64,
    pub option_index: u32,
    pub nullifier: U256,
    pub weight: u64,
}

#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct ProposalClosedEvent {
    #[topic]
    pub proposal_id: u64,
    pub winner: u32,
}

#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct RootUpdatedEvent {
    pub old_root: U256,
    pub new_root: U256,
}

#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct AdminXferEvent {
    pub old_admin: Address,
    pub new_admin: Address,
}

#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct VerifierSetEvent {
    pub verifier: Address,
}

#[soroban_sdk::contractevent]
#[derive(Clone, Debug, PartialEq)]
pub struct WeightSourceSetEvent {
    pub source: Option<Address>,
}
