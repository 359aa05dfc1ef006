pub use jsonrpsee::{core::RpcResult, proc_macros::rpc};
use sp_core::H256;

pub mod types;

pub use crate::types::{JobSummary, PodPage};
use rpc_primitives_job_dispatch::{BondInfo, PodIndex};

/// Job dispatch rpc interface.
#[rpc(server)]
pub trait JobDispatchApi<AccountId, Balance> {
	/// Collateral a new operator must lock to join `pod`.
	#[method(name = "jobDispatch_requiredBond")]
	fn required_bond(&self, pod: PodIndex) -> RpcResult<Balance>;

	#[method(name = "jobDispatch_bondOf")]
	fn bond_of(&self, operator: AccountId) -> RpcResult<BondInfo<Balance>>;

	#[method(name = "jobDispatch_totalBonded")]
	fn total_bonded(&self) -> RpcResult<Balance>;

	/// Slots `offset..offset + len` of `pod`, slot 0 being the open slot.
	#[method(name = "jobDispatch_podMembers")]
	fn pod_members(&self, pod: PodIndex, offset: u32, len: u32) -> RpcResult<PodPage<AccountId>>;

	/// Assignment, ladder position and fallbacks of an open job, `None` if it is not open.
	#[method(name = "jobDispatch_job")]
	fn job(&self, job_hash: H256) -> RpcResult<Option<JobSummary<AccountId>>>;
}
