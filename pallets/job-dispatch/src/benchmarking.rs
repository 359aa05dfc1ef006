//! Benchmarking setup for pallet-job-dispatch
#![cfg(feature = "runtime-benchmarks")]

use super::*;
use crate::Pallet as JobDispatch;
use frame_benchmarking::v2::*;
use frame_support::traits::{Currency, EnsureOrigin, Get};
use frame_system::RawOrigin;
use sp_runtime::traits::{Bounded, Saturating};

const SEED: u32 = 0;
const PAYLOAD: &[u8] = b"benchmark job payload";

fn funded_operator<T: Config>(name: &'static str, index: u32) -> T::AccountId {
	let operator: T::AccountId = account(name, index, SEED);
	T::Currency::make_free_balance_be(&operator, BalanceOf::<T>::max_value() / 4u32.into());
	operator
}

fn bonded_operator<T: Config>(index: u32) -> T::AccountId {
	let operator = funded_operator::<T>("operator", index);
	assert!(JobDispatch::<T>::do_bond(&operator, 0, JobDispatch::<T>::required_bond(0)).is_ok());
	operator
}

fn payload<T: Config>() -> PayloadOf<T> {
	PAYLOAD.to_vec().try_into().expect("payload fits the configured bound")
}

#[benchmarks]
mod benchmarks {
	use super::*;

	#[benchmark]
	fn bond() {
		let caller = funded_operator::<T>("caller", 0);
		let amount = JobDispatch::<T>::required_bond(0);

		#[extrinsic_call]
		bond(RawOrigin::Signed(caller.clone()), 0, amount);

		assert!(Bonds::<T>::get(&caller).is_bonded());
	}

	#[benchmark]
	fn top_up() {
		let caller = bonded_operator::<T>(0);
		let amount = T::BaseBond::get();

		#[extrinsic_call]
		top_up(RawOrigin::Signed(caller.clone()), amount);

		assert_eq!(Bonds::<T>::get(&caller).amount, amount.saturating_add(amount));
	}

	#[benchmark]
	fn unbond() {
		let caller = bonded_operator::<T>(0);
		let recipient: T::AccountId = account("recipient", 0, SEED);

		#[extrinsic_call]
		unbond(RawOrigin::Signed(caller.clone()), caller.clone(), recipient);

		assert!(!Bonds::<T>::get(&caller).is_bonded());
	}

	#[benchmark]
	fn rejoin_pod() {
		let caller = bonded_operator::<T>(0);
		Pods::<T>::mutate(0, |members| members.retain(|member| member != &caller));

		#[extrinsic_call]
		rejoin_pod(RawOrigin::Signed(caller.clone()));

		assert!(Pods::<T>::get(0).contains(&caller));
	}

	#[benchmark]
	fn dispatch_job() -> Result<(), BenchmarkError> {
		for index in 0..T::MaxPodSize::get().saturating_sub(1) {
			bonded_operator::<T>(index);
		}
		let origin =
			T::DispatchOrigin::try_successful_origin().map_err(|_| BenchmarkError::Weightless)?;

		#[extrinsic_call]
		dispatch_job(origin as T::RuntimeOrigin, payload::<T>());

		assert!(!JobDispatch::<T>::job_record(&JobDispatch::<T>::job_hash(PAYLOAD)).is_empty());
		Ok(())
	}

	#[benchmark]
	fn execute_job() -> Result<(), BenchmarkError> {
		bonded_operator::<T>(0);
		JobDispatch::<T>::do_dispatch(payload::<T>())?;

		// Past every rung so that any caller may settle the job.
		let late = T::PrimaryWindow::get().saturating_add(
			T::EscalationInterval::get().saturating_mul((FALLBACK_SLOTS as u32).into()),
		);
		let now = frame_system::Pallet::<T>::block_number();
		frame_system::Pallet::<T>::set_block_number(now.saturating_add(late));

		let executor = funded_operator::<T>("executor", 0);
		let weight_limit = T::JobHandler::weight_budget(PAYLOAD);
		let price = T::ReferencePrice::get();

		#[extrinsic_call]
		execute_job(RawOrigin::Signed(executor), payload::<T>(), weight_limit, price);

		assert!(JobDispatch::<T>::job_record(&JobDispatch::<T>::job_hash(PAYLOAD)).is_empty());
		Ok(())
	}

	impl_benchmark_test_suite!(JobDispatch, crate::mock::new_test_ext(), crate::mock::Test);
}
