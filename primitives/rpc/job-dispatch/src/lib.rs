#![cfg_attr(not(feature = "std"), no_std)]
use codec::Codec;
use sp_api::decl_runtime_apis;
use sp_core::H256;
use sp_runtime::DispatchError;
use sp_std::vec::Vec;

pub use pallet_job_dispatch::{Assignee, BondInfo, JobRecord, JobState, PodIndex};

decl_runtime_apis! {
    /// Read access to operator pods and open jobs.
    pub trait JobDispatchRuntimeApi<AccountId, Balance>
    where
        AccountId: Codec,
        Balance: Codec,
    {
        fn required_bond(pod: PodIndex) -> Balance;
        fn bond_of(operator: AccountId) -> BondInfo<Balance>;
        fn total_bonded() -> Balance;
        fn pod_count() -> PodIndex;
        fn pod_size(pod: PodIndex) -> u32;
        fn pod_members(pod: PodIndex, offset: u32, len: u32) -> Result<Vec<Assignee<AccountId>>, DispatchError>;
        fn job_record(job_hash: H256) -> JobRecord;
        fn job_state(job_hash: H256) -> JobState;
        fn job_assignee(job_hash: H256) -> Option<Assignee<AccountId>>;
        fn job_fallbacks(job_hash: H256) -> Vec<Assignee<AccountId>>;
    }
}
