use codec::Codec;
use jsonrpsee::{
	core::RpcResult,
	types::error::{ErrorObject, ErrorObjectOwned, INTERNAL_ERROR_CODE, INVALID_PARAMS_CODE},
};
pub use rpc_core_job_dispatch::JobDispatchApiServer;
use rpc_core_job_dispatch::{JobSummary, PodPage};
use rpc_primitives_job_dispatch::{BondInfo, JobDispatchRuntimeApi, PodIndex};
use sp_api::ProvideRuntimeApi;
use sp_blockchain::HeaderBackend;
use sp_core::H256;
use sp_runtime::traits::Block as BlockT;
use std::{fmt::Debug, sync::Arc};

pub fn internal_err<T: ToString>(message: T) -> ErrorObjectOwned {
	ErrorObject::owned(INTERNAL_ERROR_CODE, message.to_string(), None::<()>)
}

pub fn invalid_params<T: ToString>(message: T) -> ErrorObjectOwned {
	ErrorObject::owned(INVALID_PARAMS_CODE, message.to_string(), None::<()>)
}

fn runtime_err<E: Debug>(err: E) -> ErrorObjectOwned {
	log::error!("job dispatch runtime api call failed: {:?}", err);
	internal_err(format!("fetch job dispatch state failed: {:?}", err))
}

/// Job dispatch API implementation.
pub struct JobDispatchImpl<B: BlockT, C> {
	client: Arc<C>,
	_phantom_data: std::marker::PhantomData<B>,
}

impl<B: BlockT, C> JobDispatchImpl<B, C> {
	pub fn new(client: Arc<C>) -> Self {
		Self { client, _phantom_data: Default::default() }
	}
}

impl<B, C, AccountId, Balance> JobDispatchApiServer<AccountId, Balance> for JobDispatchImpl<B, C>
where
	B: BlockT,
	C: ProvideRuntimeApi<B> + 'static,
	C::Api: JobDispatchRuntimeApi<B, AccountId, Balance>,
	C: HeaderBackend<B> + Send + Sync,
	AccountId: Codec + Clone + Send + Sync + 'static,
	Balance: Codec + Send + Sync + 'static,
	AccountId: serde::Serialize + serde::de::DeserializeOwned,
	Balance: serde::Serialize,
{
	fn required_bond(&self, pod: PodIndex) -> RpcResult<Balance> {
		let api = self.client.runtime_api();
		let best_hash = self.client.info().best_hash;

		api.required_bond(best_hash, pod).map_err(runtime_err)
	}

	fn bond_of(&self, operator: AccountId) -> RpcResult<BondInfo<Balance>> {
		let api = self.client.runtime_api();
		let best_hash = self.client.info().best_hash;

		api.bond_of(best_hash, operator).map_err(runtime_err)
	}

	fn total_bonded(&self) -> RpcResult<Balance> {
		let api = self.client.runtime_api();
		let best_hash = self.client.info().best_hash;

		api.total_bonded(best_hash).map_err(runtime_err)
	}

	fn pod_members(&self, pod: PodIndex, offset: u32, len: u32) -> RpcResult<PodPage<AccountId>> {
		let api = self.client.runtime_api();
		let best_hash = self.client.info().best_hash;

		let members = api
			.pod_members(best_hash, pod, offset, len)
			.map_err(runtime_err)?
			.map_err(|err| invalid_params(format!("invalid pod range: {:?}", err)))?;
		let size = api.pod_size(best_hash, pod).map_err(runtime_err)?;

		Ok(PodPage { pod, size, offset, members })
	}

	fn job(&self, job_hash: H256) -> RpcResult<Option<JobSummary<AccountId>>> {
		let api = self.client.runtime_api();
		let best_hash = self.client.info().best_hash;

		let Some(assignee) = api.job_assignee(best_hash, job_hash).map_err(runtime_err)? else {
			return Ok(None);
		};
		let record = api.job_record(best_hash, job_hash).map_err(runtime_err)?;
		let state = api.job_state(best_hash, job_hash).map_err(runtime_err)?;
		let fallbacks = api.job_fallbacks(best_hash, job_hash).map_err(runtime_err)?;

		Ok(Some(JobSummary::new(job_hash, record, state, assignee, fallbacks)))
	}
}
