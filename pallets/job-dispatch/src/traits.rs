use frame_support::weights::Weight;
use sp_core::{H256, U256};
use sp_runtime::DispatchError;
use sp_std::vec::Vec;

/// Source of the publicly reproducible selection seed.
pub trait RandomnessSource {
	/// Seed for one job assignment.
	fn seed(job_hash: &H256, counter: u32, height: u64, timestamp: u64) -> U256;

	/// Identifier of the block `depth + 1` blocks before the current one.
	fn historical_block_id(depth: u32) -> H256;
}

/// Downstream business logic a job payload is forwarded to.
pub trait JobHandler {
	/// Weight the payload declares it needs; executors must supply at least this much.
	fn weight_budget(payload: &[u8]) -> Weight;

	/// Runs the payload, returning the weight actually consumed.
	fn handle(payload: &[u8]) -> Result<Weight, DispatchError>;
}

/// Resolves the controlling account of an operator that is itself a contract.
pub trait OperatorOwnership<AccountId> {
	fn owner_of(operator: &AccountId) -> Option<AccountId>;
}

impl<AccountId> OperatorOwnership<AccountId> for () {
	fn owner_of(_operator: &AccountId) -> Option<AccountId> {
		None
	}
}

/// Entry point for messaging pallets that have already authenticated an inbound job.
pub trait JobInbox {
	fn receive_job(payload: Vec<u8>) -> Result<H256, DispatchError>;
}
