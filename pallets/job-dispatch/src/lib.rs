//! # Job Dispatch Pallet
//!
//! ## Overview
//!
//! Assigns inbound cross-chain jobs to bonded operators and enforces a fallback ladder when the
//! assigned operator misses its window.
//!
//! Operators lock collateral into one of several pods. Pod `n` requires
//! `BaseBond * PodBondMultiplier^n`. Slot 0 of every pod is an open placeholder, so selecting it
//! leaves a job claimable by anyone.
//!
//! When a job arrives, a seed derived from chain state picks a pod and a primary operator, which
//! is taken out of rotation until the job completes. Five fallback slots are derived from the
//! seed and the hashes of the preceding blocks. Everything is packed into a single 256-bit record
//! keyed by the payload hash.
//!
//! Inside the primary window only the primary may execute. After it, the ladder (see
//! [`escalation`]) picks the fallback slot entitled to execute; a successful fallback execution
//! slashes the primary by its pod bond and credits the executor.
//!
//! ## Interface
//!
//! ### Dispatchable Functions
//!
//! - `bond`: Lock collateral and join a pod.
//! - `top_up`: Add collateral to an existing bond.
//! - `unbond`: Leave the pod and withdraw the bond to a recipient.
//! - `rejoin_pod`: Re-enter rotation after being held out.
//! - `dispatch_job`: Accept an authenticated job payload and assign it.
//! - `execute_job`: Execute an assigned job and settle the ladder economics.

#![cfg_attr(not(feature = "std"), no_std)]

pub use pallet::*;
pub use types::*;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub mod escalation;
pub mod randomness;
pub mod traits;
pub mod types;
pub mod weights;

pub use randomness::ChainRandomness;
pub use traits::{JobHandler, JobInbox, OperatorOwnership, RandomnessSource};
pub use weights::WeightInfo;

#[frame_support::pallet]
pub mod pallet {
	use super::*;
	use crate::escalation::{Ineligible, LadderConfig};
	use codec::Encode;
	use frame_support::{
		pallet_prelude::*,
		traits::{Currency, ExistenceRequirement, UnixTime},
		PalletId,
	};
	use frame_system::pallet_prelude::*;
	use sp_core::{H256, U256};
	use sp_runtime::traits::{AccountIdConversion, SaturatedConversion, Saturating, Zero};
	use sp_std::prelude::*;

	pub type BalanceOf<T> =
		<<T as Config>::Currency as Currency<<T as frame_system::Config>::AccountId>>::Balance;

	pub type PayloadOf<T> = BoundedVec<u8, <T as Config>::MaxPayloadLen>;

	#[pallet::pallet]
	pub struct Pallet<T>(_);

	#[pallet::config]
	pub trait Config: frame_system::Config {
		type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;

		/// Asset operators bond.
		type Currency: Currency<Self::AccountId>;

		/// Account holding bonded collateral is derived from this id.
		#[pallet::constant]
		type PalletId: Get<PalletId>;

		/// Origin allowed to hand over authenticated inbound jobs.
		type DispatchOrigin: EnsureOrigin<Self::RuntimeOrigin>;

		type Randomness: RandomnessSource;

		type TimeProvider: UnixTime;

		/// Execution price in force at assignment; escalation compares declared prices to it.
		type ReferencePrice: Get<u128>;

		/// Business logic that consumes job payloads.
		type JobHandler: JobHandler;

		type OperatorOwnership: OperatorOwnership<Self::AccountId>;

		/// Bond required by pod 0.
		#[pallet::constant]
		type BaseBond: Get<BalanceOf<Self>>;

		/// Each pod requires this many times the bond of the previous one.
		#[pallet::constant]
		type PodBondMultiplier: Get<u32>;

		#[pallet::constant]
		type MaxPods: Get<u8>;

		/// Operators per pod, not counting the open slot.
		#[pallet::constant]
		type MaxPodSize: Get<u32>;

		#[pallet::constant]
		type MaxPayloadLen: Get<u32>;

		/// Blocks during which only the primary operator may execute.
		#[pallet::constant]
		type PrimaryWindow: Get<BlockNumberFor<Self>>;

		/// Blocks between two rungs of the fallback ladder.
		#[pallet::constant]
		type EscalationInterval: Get<BlockNumberFor<Self>>;

		/// Price increase, in basis points of the recorded price, that moves the ladder one rung.
		#[pallet::constant]
		type PriceRungBps: Get<u32>;

		/// Declared/recorded price ratio, in basis points, above which execution is refused.
		#[pallet::constant]
		type PriceSpikeThresholdBps: Get<u32>;

		type WeightInfo: WeightInfo;
	}

	/// Collateral and pod of every operator. Absent means unbonded.
	#[pallet::storage]
	#[pallet::getter(fn bond_of)]
	pub type Bonds<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, BondInfo<BalanceOf<T>>, ValueQuery>;

	/// Operators currently in rotation, per pod. The open slot 0 is implicit.
	#[pallet::storage]
	pub type Pods<T: Config> =
		StorageMap<_, Twox64Concat, PodIndex, BoundedVec<T::AccountId, T::MaxPodSize>, ValueQuery>;

	/// One past the highest pod ever bonded into.
	#[pallet::storage]
	#[pallet::getter(fn pod_count)]
	pub type PodCount<T> = StorageValue<_, u8, ValueQuery>;

	#[pallet::storage]
	#[pallet::getter(fn total_bonded)]
	pub type TotalBonded<T: Config> = StorageValue<_, BalanceOf<T>, ValueQuery>;

	/// Open jobs each operator is the primary of.
	#[pallet::storage]
	pub type ActiveAssignments<T: Config> =
		StorageMap<_, Blake2_128Concat, T::AccountId, u32, ValueQuery>;

	/// Packed job records keyed by payload hash.
	#[pallet::storage]
	pub type Jobs<T: Config> = StorageMap<_, Blake2_128Concat, H256, PackedJob, ValueQuery>;

	/// Primary operator of each open job, addressed by the reference stored in its record.
	#[pallet::storage]
	pub type AssigneeRefs<T: Config> =
		StorageMap<_, Twox64Concat, AssigneeRef, Assignee<T::AccountId>, OptionQuery>;

	#[pallet::storage]
	pub type NextAssigneeRef<T> = StorageValue<_, AssigneeRef, ValueQuery>;

	/// Reference price recorded when the job was assigned.
	#[pallet::storage]
	pub type AssignmentPrice<T: Config> =
		StorageMap<_, Blake2_128Concat, H256, u128, ValueQuery>;

	#[pallet::genesis_config]
	#[derive(frame_support::DefaultNoBound)]
	pub struct GenesisConfig<T: Config> {
		/// `(operator, pod, amount)` bonds taken from the operators' free balance.
		pub bonds: Vec<(T::AccountId, PodIndex, BalanceOf<T>)>,
	}

	#[pallet::genesis_build]
	impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
		fn build(&self) {
			let vault = Pallet::<T>::account_id();
			let endowment = T::Currency::minimum_balance();
			if T::Currency::free_balance(&vault) < endowment {
				let _ = T::Currency::make_free_balance_be(&vault, endowment);
			}
			for (operator, pod, amount) in &self.bonds {
				Pallet::<T>::do_bond(operator, *pod, *amount)
					.expect("genesis bonds must satisfy pod requirements");
			}
		}
	}

	#[pallet::event]
	#[pallet::generate_deposit(pub(super) fn deposit_event)]
	pub enum Event<T: Config> {
		Bonded { operator: T::AccountId, pod: PodIndex, amount: BalanceOf<T> },
		ToppedUp { operator: T::AccountId, amount: BalanceOf<T>, total: BalanceOf<T> },
		Unbonded { operator: T::AccountId, recipient: T::AccountId, amount: BalanceOf<T> },
		RejoinedPod { operator: T::AccountId, pod: PodIndex },
		/// A job has been assigned and can be picked up.
		JobAvailable {
			job_hash: H256,
			pod: PodIndex,
			assignee: Assignee<T::AccountId>,
			assigned_at: BlockNumberFor<T>,
			payload: PayloadOf<T>,
		},
		JobExecuted { job_hash: H256, executor: T::AccountId, claim: Claim },
		OperatorSlashed { operator: T::AccountId, beneficiary: T::AccountId, amount: BalanceOf<T> },
		/// A slash asked for more than the operator had bonded.
		SlashClamped { operator: T::AccountId, requested: BalanceOf<T>, applied: BalanceOf<T> },
		/// The primary could not be returned to its pod because the pod is full.
		ReadmissionDeferred { operator: T::AccountId, pod: PodIndex },
	}

	#[pallet::error]
	pub enum Error<T> {
		/// Operator already holds a bond.
		AlreadyBonded,
		/// Amount is below the pod requirement.
		BondTooSmall,
		NotBonded,
		/// Caller neither is the operator nor controls it.
		NotOwner,
		ZeroAmount,
		PodNotFound,
		PodFull,
		IndexOutOfBounds,
		/// Observed balance change differs from the transferred amount.
		TransferMismatch,
		/// Operator is the primary of an open job.
		AssignmentPending,
		AlreadyInPod,
		UnknownJob,
		JobAlreadyOpen,
		PayloadTooLarge,
		/// Block height no longer fits the job record.
		HeightOverflow,
		/// Only the primary operator may execute during the primary window.
		NotAssignedOperator,
		/// Caller is not the fallback operator currently entitled to execute.
		NotFallbackOperator,
		/// Declared price is implausibly far above the price at assignment.
		PriceSpikeSuspected,
		/// Supplied weight is below the job's declared budget.
		InsufficientResources,
	}

	impl<T> From<Ineligible> for Error<T> {
		fn from(reason: Ineligible) -> Self {
			match reason {
				Ineligible::NotAssignedOperator => Error::<T>::NotAssignedOperator,
				Ineligible::NotFallbackOperator => Error::<T>::NotFallbackOperator,
				Ineligible::PriceSpike => Error::<T>::PriceSpikeSuspected,
			}
		}
	}

	#[pallet::hooks]
	impl<T: Config> Hooks<BlockNumberFor<T>> for Pallet<T> {
		fn integrity_test() {
			assert!(T::MaxPods::get() > 0, "at least one pod must be allowed");
			// Fallback indices are 16-bit and include the open slot.
			assert!(T::MaxPodSize::get() < u32::from(u16::MAX), "pods must fit 16-bit indices");
			assert!(!T::EscalationInterval::get().is_zero(), "ladder interval must be non-zero");
			assert!(T::PriceRungBps::get() > 0, "price rung step must be non-zero");
			assert!(
				u128::from(T::PriceSpikeThresholdBps::get()) >= escalation::PARITY_BPS,
				"spike threshold must not be below parity"
			);
		}
	}

	#[pallet::call]
	impl<T: Config> Pallet<T> {
		/// Lock `amount` of collateral and join `pod`.
		///
		/// The amount must cover the pod requirement. Emits `Bonded`.
		#[pallet::call_index(0)]
		#[pallet::weight(T::WeightInfo::bond())]
		pub fn bond(origin: OriginFor<T>, pod: PodIndex, amount: BalanceOf<T>) -> DispatchResult {
			let operator = ensure_signed(origin)?;
			Self::do_bond(&operator, pod, amount)
		}

		/// Add collateral to an existing bond. The pod requirement is not re-checked.
		#[pallet::call_index(1)]
		#[pallet::weight(T::WeightInfo::top_up())]
		pub fn top_up(origin: OriginFor<T>, amount: BalanceOf<T>) -> DispatchResult {
			let operator = ensure_signed(origin)?;
			ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
			ensure!(Bonds::<T>::get(&operator).is_bonded(), Error::<T>::NotBonded);

			Self::deposit_collateral(&operator, amount)?;
			let total = Bonds::<T>::mutate(&operator, |bond| {
				bond.amount = bond.amount.saturating_add(amount);
				bond.amount
			});
			TotalBonded::<T>::mutate(|bonded| *bonded = bonded.saturating_add(amount));

			Self::deposit_event(Event::ToppedUp { operator, amount, total });
			Ok(())
		}

		/// Leave the pod and pay the whole bond out to `recipient`.
		///
		/// The caller must be the operator or the account controlling it.
		#[pallet::call_index(2)]
		#[pallet::weight(T::WeightInfo::unbond())]
		pub fn unbond(
			origin: OriginFor<T>,
			operator: T::AccountId,
			recipient: T::AccountId,
		) -> DispatchResult {
			let caller = ensure_signed(origin)?;
			let bond = Bonds::<T>::get(&operator);
			let pod = bond.pod_index().ok_or(Error::<T>::NotBonded)?;
			ensure!(
				caller == operator ||
					T::OperatorOwnership::owner_of(&operator).as_ref() == Some(&caller),
				Error::<T>::NotOwner
			);
			ensure!(ActiveAssignments::<T>::get(&operator) == 0, Error::<T>::AssignmentPending);

			Pods::<T>::mutate(pod, |members| members.retain(|member| member != &operator));
			Bonds::<T>::remove(&operator);
			TotalBonded::<T>::mutate(|bonded| *bonded = bonded.saturating_sub(bond.amount));
			if !bond.amount.is_zero() {
				Self::release_collateral(&recipient, bond.amount)?;
			}

			Self::deposit_event(Event::Unbonded { operator, recipient, amount: bond.amount });
			Ok(())
		}

		/// Return to rotation after being held out of the pod, e.g. following a slash.
		#[pallet::call_index(3)]
		#[pallet::weight(T::WeightInfo::rejoin_pod())]
		pub fn rejoin_pod(origin: OriginFor<T>) -> DispatchResult {
			let operator = ensure_signed(origin)?;
			let bond = Bonds::<T>::get(&operator);
			let pod = bond.pod_index().ok_or(Error::<T>::NotBonded)?;
			ensure!(ActiveAssignments::<T>::get(&operator) == 0, Error::<T>::AssignmentPending);
			ensure!(bond.amount >= Self::required_bond(pod), Error::<T>::BondTooSmall);

			Pods::<T>::try_mutate(pod, |members| -> Result<(), Error<T>> {
				ensure!(!members.contains(&operator), Error::<T>::AlreadyInPod);
				members.try_push(operator.clone()).map_err(|_| Error::<T>::PodFull)
			})?;

			Self::deposit_event(Event::RejoinedPod { operator, pod });
			Ok(())
		}

		/// Accept an authenticated inbound job and assign it. Emits `JobAvailable`.
		#[pallet::call_index(4)]
		#[pallet::weight(T::WeightInfo::dispatch_job())]
		pub fn dispatch_job(origin: OriginFor<T>, payload: PayloadOf<T>) -> DispatchResult {
			T::DispatchOrigin::ensure_origin(origin)?;
			Self::do_dispatch(payload).map(|_| ())
		}

		/// Execute an open job.
		///
		/// `weight_limit` must cover the job's declared budget. `declared_price` is the price the
		/// executor pays for inclusion; after the primary window it drives the fallback ladder.
		/// The job is retired only if the downstream handler succeeds.
		#[pallet::call_index(5)]
		#[pallet::weight(T::WeightInfo::execute_job().saturating_add(*weight_limit))]
		pub fn execute_job(
			origin: OriginFor<T>,
			payload: PayloadOf<T>,
			weight_limit: Weight,
			declared_price: u128,
		) -> DispatchResultWithPostInfo {
			let executor = ensure_signed(origin)?;
			let consumed = Self::do_execute(&executor, &payload, weight_limit, declared_price)?;
			Ok(Some(T::WeightInfo::execute_job().saturating_add(consumed.min(weight_limit))).into())
		}
	}

	impl<T: Config> Pallet<T> {
		pub fn account_id() -> T::AccountId {
			T::PalletId::get().into_account_truncating()
		}

		pub fn job_hash(payload: &[u8]) -> H256 {
			H256(sp_io::hashing::blake2_256(payload))
		}

		/// `BaseBond * PodBondMultiplier^pod`, saturating.
		pub fn required_bond(pod: PodIndex) -> BalanceOf<T> {
			let multiplier = BalanceOf::<T>::from(T::PodBondMultiplier::get());
			T::BaseBond::get().saturating_mul(multiplier.saturating_pow(pod as usize))
		}

		/// Number of selectable slots in `pod`, the open slot included.
		pub fn pod_size(pod: PodIndex) -> u32 {
			Pods::<T>::get(pod).len() as u32 + 1
		}

		/// Slots `offset..offset + len` of `pod`.
		pub fn pod_members(
			pod: PodIndex,
			offset: u32,
			len: u32,
		) -> Result<Vec<Assignee<T::AccountId>>, DispatchError> {
			ensure!(pod < PodCount::<T>::get(), Error::<T>::PodNotFound);
			let members = Pods::<T>::get(pod);
			let end = offset.checked_add(len).ok_or(Error::<T>::IndexOutOfBounds)?;
			ensure!(end as usize <= members.len() + 1, Error::<T>::IndexOutOfBounds);
			Ok((offset..end).map(|index| Self::slot_of(&members, index as usize)).collect())
		}

		/// Unpacked record of `job_hash`, all zero when the job is not open.
		pub fn job_record(job_hash: &H256) -> JobRecord {
			JobRecord::from_word(&Jobs::<T>::get(job_hash))
		}

		pub fn job_state(job_hash: &H256) -> JobState {
			let record = Self::job_record(job_hash);
			if record.is_empty() {
				return JobState::Unassigned;
			}
			let elapsed = Self::current_height().saturating_sub(record.assigned_at);
			escalation::job_state(&Self::ladder_config(), elapsed)
		}

		/// Primary assignee of an open job.
		pub fn job_assignee(job_hash: &H256) -> Option<Assignee<T::AccountId>> {
			let record = Self::job_record(job_hash);
			if record.is_empty() {
				return None;
			}
			AssigneeRefs::<T>::get(record.assignee_ref)
		}

		/// Fallback slots of an open job resolved against current pod membership.
		pub fn resolve_fallbacks(record: &JobRecord) -> [Assignee<T::AccountId>; FALLBACK_SLOTS] {
			let members = Pods::<T>::get(record.pod);
			record.fallbacks.map(|index| Self::slot_of(&members, index as usize))
		}

		pub fn ladder_config() -> LadderConfig {
			LadderConfig {
				primary_window: T::PrimaryWindow::get().saturated_into(),
				interval: T::EscalationInterval::get().saturated_into(),
				rung_step_bps: T::PriceRungBps::get(),
				spike_threshold_bps: T::PriceSpikeThresholdBps::get(),
			}
		}

		pub(crate) fn do_bond(
			operator: &T::AccountId,
			pod: PodIndex,
			amount: BalanceOf<T>,
		) -> DispatchResult {
			ensure!(!amount.is_zero(), Error::<T>::ZeroAmount);
			ensure!(pod < T::MaxPods::get(), Error::<T>::PodNotFound);
			ensure!(!Bonds::<T>::get(operator).is_bonded(), Error::<T>::AlreadyBonded);
			ensure!(amount >= Self::required_bond(pod), Error::<T>::BondTooSmall);

			Pods::<T>::try_mutate(pod, |members| members.try_push(operator.clone()))
				.map_err(|_| Error::<T>::PodFull)?;
			Self::deposit_collateral(operator, amount)?;

			Bonds::<T>::insert(operator, BondInfo { amount, pod: pod + 1 });
			PodCount::<T>::mutate(|count| *count = (*count).max(pod + 1));
			TotalBonded::<T>::mutate(|bonded| *bonded = bonded.saturating_add(amount));

			Self::deposit_event(Event::Bonded { operator: operator.clone(), pod, amount });
			Ok(())
		}

		pub(crate) fn do_dispatch(payload: PayloadOf<T>) -> Result<H256, DispatchError> {
			let job_hash = Self::job_hash(&payload);
			ensure!(Self::job_record(&job_hash).is_empty(), Error::<T>::JobAlreadyOpen);

			let now = frame_system::Pallet::<T>::block_number();
			let height: u64 = now.saturated_into();
			ensure!(height <= JobRecord::MAX_HEIGHT, Error::<T>::HeightOverflow);

			let assignee_ref = NextAssigneeRef::<T>::mutate(|next| {
				*next = next.wrapping_add(1).max(1);
				*next
			});
			let timestamp: u64 = T::TimeProvider::now().as_millis().saturated_into();
			let seed = T::Randomness::seed(&job_hash, assignee_ref, height, timestamp);
			let (pod, assignee, fallbacks) = Self::allocate(seed);

			if let Assignee::Operator(operator) = &assignee {
				ActiveAssignments::<T>::mutate(operator, |open| *open = open.saturating_add(1));
			}
			AssigneeRefs::<T>::insert(assignee_ref, assignee.clone());
			AssignmentPrice::<T>::insert(job_hash, T::ReferencePrice::get());
			let record = JobRecord { pod, assignee_ref, assigned_at: height, fallbacks };
			Jobs::<T>::insert(job_hash, record.to_word());

			log::info!(
				"job {:?} assigned to {:?} in pod {} at block {}",
				job_hash,
				assignee,
				pod,
				height
			);
			Self::deposit_event(Event::JobAvailable {
				job_hash,
				pod,
				assignee,
				assigned_at: now,
				payload,
			});
			Ok(job_hash)
		}

		/// Picks pod and primary from `seed`, pops the primary from rotation and derives the
		/// fallback indices over what is left of the pod.
		fn allocate(seed: U256) -> (PodIndex, Assignee<T::AccountId>, [u16; FALLBACK_SLOTS]) {
			let pods = PodCount::<T>::get().max(1);
			let pod = (seed % U256::from(pods)).low_u32() as PodIndex;

			Pods::<T>::mutate(pod, |members| {
				let slots = members.len() as u32 + 1;
				let primary = (seed % U256::from(slots)).low_u32() as usize;
				let assignee = match primary {
					0 => Assignee::Open,
					index => Assignee::Operator(members.swap_remove(index - 1)),
				};

				let remaining = members.len() as u32 + 1;
				let mut fallbacks = [0u16; FALLBACK_SLOTS];
				for (depth, index) in fallbacks.iter_mut().enumerate() {
					let block_id = T::Randomness::historical_block_id(depth as u32);
					*index = Self::fallback_index(seed, &block_id, remaining);
				}
				(pod, assignee, fallbacks)
			})
		}

		pub(crate) fn fallback_index(seed: U256, block_id: &H256, slots: u32) -> u16 {
			let mut seed_bytes = [0u8; 32];
			seed.to_big_endian(&mut seed_bytes);
			let digest = (seed_bytes, block_id).using_encoded(sp_io::hashing::blake2_256);
			(U256::from_big_endian(&digest) % U256::from(slots.max(1))).low_u32() as u16
		}

		pub(crate) fn do_execute(
			executor: &T::AccountId,
			payload: &[u8],
			weight_limit: Weight,
			declared_price: u128,
		) -> Result<Weight, DispatchError> {
			let job_hash = Self::job_hash(payload);
			let record = Self::job_record(&job_hash);
			ensure!(!record.is_empty(), Error::<T>::UnknownJob);
			ensure!(
				weight_limit.all_gte(T::JobHandler::weight_budget(payload)),
				Error::<T>::InsufficientResources
			);

			let primary =
				AssigneeRefs::<T>::get(record.assignee_ref).ok_or(Error::<T>::UnknownJob)?;
			let elapsed = Self::current_height().saturating_sub(record.assigned_at);
			let claim = escalation::authorize(
				&Self::ladder_config(),
				elapsed,
				declared_price,
				AssignmentPrice::<T>::get(job_hash),
				&primary,
				&Self::resolve_fallbacks(&record),
				executor,
			)
			.map_err(Error::<T>::from)?;

			let consumed = T::JobHandler::handle(payload)?;

			Self::settle(record.pod, primary, executor, claim)?;
			Jobs::<T>::remove(job_hash);
			AssigneeRefs::<T>::remove(record.assignee_ref);
			AssignmentPrice::<T>::remove(job_hash);

			log::info!("job {:?} executed by {:?} ({:?})", job_hash, executor, claim);
			Self::deposit_event(Event::JobExecuted {
				job_hash,
				executor: executor.clone(),
				claim,
			});
			Ok(consumed)
		}

		/// Applies the economics of a successful execution.
		fn settle(
			pod: PodIndex,
			primary: Assignee<T::AccountId>,
			executor: &T::AccountId,
			claim: Claim,
		) -> DispatchResult {
			let Assignee::Operator(operator) = primary else {
				return Ok(());
			};
			ActiveAssignments::<T>::mutate_exists(&operator, |open| {
				*open = open.and_then(|n| n.checked_sub(1)).filter(|n| *n > 0);
			});

			if claim == Claim::Primary {
				Self::readmit(pod, operator);
				return Ok(());
			}

			let applied = Self::slash(&operator, Self::required_bond(pod));
			if applied.is_zero() {
				return Ok(());
			}
			Self::credit(executor, applied)?;
			Self::deposit_event(Event::OperatorSlashed {
				operator,
				beneficiary: executor.clone(),
				amount: applied,
			});
			Ok(())
		}

		fn readmit(pod: PodIndex, operator: T::AccountId) {
			if Bonds::<T>::get(&operator).pod_index() != Some(pod) {
				return;
			}
			let pushed = Pods::<T>::mutate(pod, |members| members.try_push(operator.clone()));
			if pushed.is_err() {
				log::warn!("pod {} full, {:?} must rejoin manually", pod, operator);
				Self::deposit_event(Event::ReadmissionDeferred { operator, pod });
			}
		}

		/// Removes up to `amount` from the operator's bond, returning what was removed.
		fn slash(operator: &T::AccountId, amount: BalanceOf<T>) -> BalanceOf<T> {
			let applied = Bonds::<T>::mutate(operator, |bond| {
				let applied = amount.min(bond.amount);
				bond.amount = bond.amount.saturating_sub(applied);
				applied
			});
			TotalBonded::<T>::mutate(|bonded| *bonded = bonded.saturating_sub(applied));

			if applied < amount {
				log::error!(
					"slash of {:?} exceeds bond of {:?}, clamped to {:?}",
					amount,
					operator,
					applied
				);
				Self::deposit_event(Event::SlashClamped {
					operator: operator.clone(),
					requested: amount,
					applied,
				});
			}
			applied
		}

		/// Credits slashed collateral to a bonded beneficiary, or pays it out if unbonded.
		fn credit(beneficiary: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
			if !Bonds::<T>::get(beneficiary).is_bonded() {
				return Self::release_collateral(beneficiary, amount);
			}
			Bonds::<T>::mutate(beneficiary, |bond| bond.amount = bond.amount.saturating_add(amount));
			TotalBonded::<T>::mutate(|bonded| *bonded = bonded.saturating_add(amount));
			Ok(())
		}

		/// Moves collateral into the vault. The depositor also covers any shortfall of the
		/// vault below the existential deposit, so payouts never reap it.
		fn deposit_collateral(from: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
			let vault = Self::account_id();
			let shortfall =
				T::Currency::minimum_balance().saturating_sub(T::Currency::free_balance(&vault));
			if !shortfall.is_zero() {
				T::Currency::transfer(from, &vault, shortfall, ExistenceRequirement::KeepAlive)?;
			}
			let before = T::Currency::free_balance(&vault);
			T::Currency::transfer(from, &vault, amount, ExistenceRequirement::KeepAlive)?;
			let received = T::Currency::free_balance(&vault).saturating_sub(before);
			ensure!(received == amount, Error::<T>::TransferMismatch);
			Ok(())
		}

		fn release_collateral(to: &T::AccountId, amount: BalanceOf<T>) -> DispatchResult {
			let before = T::Currency::free_balance(to);
			T::Currency::transfer(&Self::account_id(), to, amount, ExistenceRequirement::KeepAlive)?;
			let received = T::Currency::free_balance(to).saturating_sub(before);
			ensure!(received == amount, Error::<T>::TransferMismatch);
			Ok(())
		}

		fn slot_of(members: &[T::AccountId], index: usize) -> Assignee<T::AccountId> {
			match index.checked_sub(1).and_then(|position| members.get(position)) {
				Some(operator) => Assignee::Operator(operator.clone()),
				None => Assignee::Open,
			}
		}

		fn current_height() -> u64 {
			frame_system::Pallet::<T>::block_number().saturated_into()
		}
	}

	impl<T: Config> JobInbox for Pallet<T> {
		fn receive_job(payload: Vec<u8>) -> Result<H256, DispatchError> {
			let payload = PayloadOf::<T>::try_from(payload).map_err(|_| Error::<T>::PayloadTooLarge)?;
			Self::do_dispatch(payload)
		}
	}
}
