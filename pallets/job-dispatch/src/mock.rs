use crate as pallet_job_dispatch;
use crate::{JobHandler, OperatorOwnership, PayloadOf, RandomnessSource};
use frame_support::{
	derive_impl, parameter_types,
	traits::{ConstU32, ConstU64, ConstU8},
	weights::Weight,
	PalletId,
};
use frame_system::EnsureRoot;
use sp_core::{H256, U256};
use sp_runtime::{traits::IdentityLookup, BuildStorage, DispatchError};

pub type AccountId = u64;
pub type Balance = u128;

pub const INITIAL_BALANCE: Balance = 1_000_000;
pub const BASE_BOND: Balance = 1_000;
/// Funded account that never bonds.
pub const OUTSIDER: AccountId = 99;

frame_support::construct_runtime!(
	pub enum Test
	{
		System: frame_system,
		Balances: pallet_balances,
		Timestamp: pallet_timestamp,
		JobDispatch: pallet_job_dispatch,
	}
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
	type Block = frame_system::mocking::MockBlock<Test>;
	type AccountId = AccountId;
	type AccountData = pallet_balances::AccountData<Balance>;
	type Lookup = IdentityLookup<Self::AccountId>;
}

parameter_types! {
	pub static ExistentialDeposit: Balance = 1;
}

#[derive_impl(pallet_balances::config_preludes::TestDefaultConfig)]
impl pallet_balances::Config for Test {
	type Balance = Balance;
	type AccountStore = System;
	type ExistentialDeposit = ExistentialDeposit;
}

impl pallet_timestamp::Config for Test {
	type Moment = u64;
	type OnTimestampSet = ();
	type MinimumPeriod = ConstU64<1000>;
	type WeightInfo = ();
}

parameter_types! {
	pub const JobDispatchPalletId: PalletId = PalletId(*b"jobdspch");
	pub static BaseBond: Balance = BASE_BOND;
	pub const PodBondMultiplier: u32 = 4;
	pub const PriceRungBps: u32 = 2_000;
	pub const PriceSpikeThresholdBps: u32 = 20_000;
	pub static ForcedSeed: u64 = 0;
	pub static ReferencePrice: u128 = 1_000;
	pub static Owners: Vec<(AccountId, AccountId)> = vec![];
	pub static Handled: Vec<Vec<u8>> = vec![];
}

/// Seed fixed by the test through `ForcedSeed`; block ids depend only on depth.
pub struct TestRandomness;

impl RandomnessSource for TestRandomness {
	fn seed(_job_hash: &H256, _counter: u32, _height: u64, _timestamp: u64) -> U256 {
		U256::from(ForcedSeed::get())
	}

	fn historical_block_id(depth: u32) -> H256 {
		H256::repeat_byte(depth as u8 + 1)
	}
}

/// Budget of 1_000 ref time per payload byte. Payloads starting with `fail` are rejected.
pub struct TestJobHandler;

impl JobHandler for TestJobHandler {
	fn weight_budget(payload: &[u8]) -> Weight {
		Weight::from_parts(1_000 * payload.len() as u64, 0)
	}

	fn handle(payload: &[u8]) -> Result<Weight, DispatchError> {
		if payload.starts_with(b"fail") {
			return Err(DispatchError::Other("handler rejected payload"));
		}
		let mut handled = Handled::get();
		handled.push(payload.to_vec());
		Handled::set(handled);
		Ok(Weight::from_parts(500 * payload.len() as u64, 0))
	}
}

pub struct TestOwnership;

impl OperatorOwnership<AccountId> for TestOwnership {
	fn owner_of(operator: &AccountId) -> Option<AccountId> {
		Owners::get().into_iter().find(|(op, _)| op == operator).map(|(_, owner)| owner)
	}
}

impl pallet_job_dispatch::Config for Test {
	type RuntimeEvent = RuntimeEvent;
	type Currency = Balances;
	type PalletId = JobDispatchPalletId;
	type DispatchOrigin = EnsureRoot<AccountId>;
	type Randomness = TestRandomness;
	type TimeProvider = Timestamp;
	type ReferencePrice = ReferencePrice;
	type JobHandler = TestJobHandler;
	type OperatorOwnership = TestOwnership;
	type BaseBond = BaseBond;
	type PodBondMultiplier = PodBondMultiplier;
	type MaxPods = ConstU8<8>;
	type MaxPodSize = ConstU32<4>;
	type MaxPayloadLen = ConstU32<1024>;
	type PrimaryWindow = ConstU64<10>;
	type EscalationInterval = ConstU64<5>;
	type PriceRungBps = PriceRungBps;
	type PriceSpikeThresholdBps = PriceSpikeThresholdBps;
	type WeightInfo = ();
}

pub fn vault() -> AccountId {
	JobDispatch::account_id()
}

pub fn payload(bytes: &[u8]) -> PayloadOf<Test> {
	bytes.to_vec().try_into().unwrap()
}

/// Weight that exactly covers the handler budget of `bytes`.
pub fn budget(bytes: &[u8]) -> Weight {
	TestJobHandler::weight_budget(bytes)
}

pub fn run_to_block(n: u64) {
	while System::block_number() < n {
		System::set_block_number(System::block_number() + 1);
		Timestamp::set_timestamp(System::block_number() * 6_000);
	}
}

pub fn new_test_ext() -> sp_io::TestExternalities {
	ExtBuilder::default().build()
}

pub struct ExtBuilder {
	existential_deposit: Balance,
	bonds: Vec<(AccountId, u8, Balance)>,
}

impl Default for ExtBuilder {
	fn default() -> Self {
		Self { existential_deposit: 1, bonds: vec![] }
	}
}

impl ExtBuilder {
	pub fn existential_deposit(mut self, existential_deposit: Balance) -> Self {
		self.existential_deposit = existential_deposit;
		self
	}

	pub fn with_bonds(mut self, bonds: Vec<(AccountId, u8, Balance)>) -> Self {
		self.bonds = bonds;
		self
	}

	pub fn build(self) -> sp_io::TestExternalities {
		ExistentialDeposit::set(self.existential_deposit);
		let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();

		let mut balances: Vec<(AccountId, Balance)> =
			(1..=8).map(|who| (who, INITIAL_BALANCE)).collect();
		balances.push((OUTSIDER, INITIAL_BALANCE));
		pallet_balances::GenesisConfig::<Test> { balances }
			.assimilate_storage(&mut t)
			.unwrap();

		pallet_job_dispatch::GenesisConfig::<Test> { bonds: self.bonds }
			.assimilate_storage(&mut t)
			.unwrap();

		let mut ext: sp_io::TestExternalities = t.into();
		ext.execute_with(|| {
			System::set_block_number(1);
			Timestamp::set_timestamp(6_000);
		});
		ext
	}
}
