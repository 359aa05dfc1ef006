use codec::{Decode, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use sp_core::U256;
use sp_runtime::RuntimeDebug;

#[cfg(feature = "std")]
use serde::{Deserialize, Serialize};

/// Index of a collateral tier.
pub type PodIndex = u8;

/// Key into the table of selected primary operators.
pub type AssigneeRef = u32;

/// Number of alternate executors computed for every job.
pub const FALLBACK_SLOTS: usize = 5;

/// Big-endian bytes of a packed [`JobRecord`].
pub type PackedJob = [u8; 32];

/// Who a job (or a pod slot) is reserved for.
///
/// Slot 0 of every pod is `Open`: selecting it leaves the job claimable by any caller.
#[derive(Encode, Decode, Clone, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum Assignee<AccountId> {
	Open,
	Operator(AccountId),
}

impl<AccountId: PartialEq> Assignee<AccountId> {
	/// `true` when `who` may act on behalf of this assignee.
	pub fn admits(&self, who: &AccountId) -> bool {
		match self {
			Assignee::Open => true,
			Assignee::Operator(operator) => operator == who,
		}
	}
}

/// Collateral position of an operator.
///
/// `pod` holds the pod index plus one, zero meaning the operator is unbonded.
#[derive(
	Encode, Decode, Clone, Copy, Eq, PartialEq, Default, RuntimeDebug, TypeInfo, MaxEncodedLen,
)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct BondInfo<Balance> {
	pub amount: Balance,
	pub pod: u8,
}

impl<Balance> BondInfo<Balance> {
	pub fn is_bonded(&self) -> bool {
		self.pod != 0
	}

	pub fn pod_index(&self) -> Option<PodIndex> {
		self.pod.checked_sub(1)
	}
}

/// Scheduling metadata of an open job, stored packed into a single 256-bit word.
///
/// Layout, most significant bit first:
///
/// | bits    | width | field                         |
/// |---------|-------|-------------------------------|
/// | 248-255 | 8     | pod index                     |
/// | 216-247 | 32    | primary operator reference    |
/// | 176-215 | 40    | block height at assignment    |
/// | 160-175 | 16    | fallback index #1             |
/// | 144-159 | 16    | fallback index #2             |
/// | 128-143 | 16    | fallback index #3             |
/// | 112-127 | 16    | fallback index #4             |
/// | 96-111  | 16    | fallback index #5             |
/// | 0-95    | 96    | reserved, always zero         |
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, Default, RuntimeDebug, TypeInfo)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub struct JobRecord {
	pub pod: PodIndex,
	pub assignee_ref: AssigneeRef,
	pub assigned_at: u64,
	pub fallbacks: [u16; FALLBACK_SLOTS],
}

impl JobRecord {
	const POD_SHIFT: usize = 248;
	const REF_SHIFT: usize = 216;
	const HEIGHT_SHIFT: usize = 176;
	const FALLBACK_SHIFT: usize = 160;
	const FALLBACK_WIDTH: usize = 16;

	/// Largest block height the 40-bit height field can hold.
	pub const MAX_HEIGHT: u64 = (1 << 40) - 1;

	pub fn pack(&self) -> U256 {
		let mut word = (U256::from(self.pod) << Self::POD_SHIFT) |
			(U256::from(self.assignee_ref) << Self::REF_SHIFT) |
			(U256::from(self.assigned_at & Self::MAX_HEIGHT) << Self::HEIGHT_SHIFT);
		for (slot, index) in self.fallbacks.iter().enumerate() {
			word = word | (U256::from(*index) << Self::fallback_shift(slot));
		}
		word
	}

	/// Inverse of [`JobRecord::pack`]. Reserved bits are ignored.
	pub fn unpack(word: U256) -> Self {
		let mut fallbacks = [0u16; FALLBACK_SLOTS];
		for (slot, index) in fallbacks.iter_mut().enumerate() {
			*index = ((word >> Self::fallback_shift(slot)).low_u32() & 0xffff) as u16;
		}
		Self {
			pod: ((word >> Self::POD_SHIFT).low_u32() & 0xff) as u8,
			assignee_ref: (word >> Self::REF_SHIFT).low_u32(),
			assigned_at: (word >> Self::HEIGHT_SHIFT).low_u64() & Self::MAX_HEIGHT,
			fallbacks,
		}
	}

	pub fn to_word(&self) -> PackedJob {
		let mut word = [0u8; 32];
		self.pack().to_big_endian(&mut word);
		word
	}

	pub fn from_word(word: &PackedJob) -> Self {
		Self::unpack(U256::from_big_endian(word))
	}

	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	fn fallback_shift(slot: usize) -> usize {
		Self::FALLBACK_SHIFT - slot * Self::FALLBACK_WIDTH
	}
}

/// Where an execution attempt sits on the escalation ladder.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum Claim {
	/// The assigned operator (or anyone, for an open job) inside the primary window.
	Primary,
	/// Alternate executor selected from the given fallback slot.
	Fallback(u8),
	/// Every fallback slot has elapsed; the job is open to any caller.
	Exhausted,
}

/// Lifecycle of a job as seen at the current block.
#[derive(Encode, Decode, Clone, Copy, Eq, PartialEq, RuntimeDebug, TypeInfo, MaxEncodedLen)]
#[cfg_attr(feature = "std", derive(Serialize, Deserialize))]
pub enum JobState {
	Unassigned,
	PrimaryWindow { remaining: u64 },
	Escalation { rung: u8 },
	Exhausted,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample() -> JobRecord {
		JobRecord {
			pod: 3,
			assignee_ref: 0xdead_beef,
			assigned_at: JobRecord::MAX_HEIGHT - 7,
			fallbacks: [1, 0, 0xffff, 42, 7],
		}
	}

	#[test]
	fn packing_places_fields_at_documented_offsets() {
		let bytes = sample().to_word();

		assert_eq!(bytes[0], 3);
		assert_eq!(&bytes[1..5], &0xdead_beefu32.to_be_bytes());
		assert_eq!(&bytes[5..10], &(JobRecord::MAX_HEIGHT - 7).to_be_bytes()[3..]);
		assert_eq!(&bytes[10..12], &1u16.to_be_bytes());
		assert_eq!(&bytes[12..14], &0u16.to_be_bytes());
		assert_eq!(&bytes[14..16], &0xffffu16.to_be_bytes());
		assert_eq!(&bytes[16..18], &42u16.to_be_bytes());
		assert_eq!(&bytes[18..20], &7u16.to_be_bytes());
		assert!(bytes[20..].iter().all(|b| *b == 0));
	}

	#[test]
	fn unpack_restores_every_field() {
		assert_eq!(JobRecord::unpack(sample().pack()), sample());
	}

	#[test]
	fn reserved_bits_do_not_leak_into_fields() {
		let reserved = (U256::one() << 96) - U256::one();
		let word = sample().pack() | reserved;
		assert_eq!(JobRecord::unpack(word), sample());
	}

	#[test]
	fn zero_word_is_the_empty_record() {
		assert!(JobRecord::from_word(&[0u8; 32]).is_empty());
		assert_eq!(JobRecord::from_word(&sample().to_word()), sample());
		assert!(!sample().is_empty());
	}

	#[test]
	fn bond_info_sentinel() {
		let unbonded = BondInfo::<u128>::default();
		assert!(!unbonded.is_bonded());
		assert_eq!(unbonded.pod_index(), None);

		let bonded = BondInfo { amount: 1_000u128, pod: 1 };
		assert!(bonded.is_bonded());
		assert_eq!(bonded.pod_index(), Some(0));
	}

	#[test]
	fn open_assignee_admits_anyone() {
		assert!(Assignee::<u64>::Open.admits(&9));
		assert!(Assignee::Operator(4u64).admits(&4));
		assert!(!Assignee::Operator(4u64).admits(&9));
	}
}
