use crate::traits::RandomnessSource;
use codec::Encode;
use frame_system::pallet_prelude::BlockNumberFor;
use sp_core::{H256, U256};
use sp_runtime::traits::{One, Saturating};
use sp_std::marker::PhantomData;

/// Seed derived from public chain state.
///
/// Anyone holding the state of the assignment block can recompute it; nobody can know it before
/// that block is authored.
pub struct ChainRandomness<T>(PhantomData<T>);

impl<T: frame_system::Config> RandomnessSource for ChainRandomness<T> {
	fn seed(job_hash: &H256, counter: u32, height: u64, timestamp: u64) -> U256 {
		let digest = (b"job-dispatch/seed", job_hash, counter, height, timestamp)
			.using_encoded(sp_io::hashing::blake2_256);
		U256::from_big_endian(&digest)
	}

	/// Early in the chain several depths land on block 0; `depth` is part of the digest so their
	/// ids still differ.
	fn historical_block_id(depth: u32) -> H256 {
		let now = frame_system::Pallet::<T>::block_number();
		let back = BlockNumberFor::<T>::from(depth).saturating_add(One::one());
		let hash = frame_system::Pallet::<T>::block_hash(now.saturating_sub(back));
		H256((b"job-dispatch/block", depth, hash).using_encoded(sp_io::hashing::blake2_256))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mock::{new_test_ext, System, Test};
	use sp_std::collections::btree_set::BTreeSet;

	type Source = ChainRandomness<Test>;

	fn ids() -> BTreeSet<H256> {
		(0..5).map(Source::historical_block_id).collect()
	}

	#[test]
	fn seed_is_reproducible() {
		let job_hash = H256::repeat_byte(7);
		assert_eq!(Source::seed(&job_hash, 3, 40, 240_000), Source::seed(&job_hash, 3, 40, 240_000));
	}

	#[test]
	fn seed_depends_on_every_input() {
		let job_hash = H256::repeat_byte(7);
		let base = Source::seed(&job_hash, 3, 40, 240_000);

		assert_ne!(Source::seed(&H256::repeat_byte(8), 3, 40, 240_000), base);
		assert_ne!(Source::seed(&job_hash, 4, 40, 240_000), base);
		assert_ne!(Source::seed(&job_hash, 3, 41, 240_000), base);
		assert_ne!(Source::seed(&job_hash, 3, 40, 246_000), base);
	}

	#[test]
	fn block_ids_come_from_distinct_parents() {
		new_test_ext().execute_with(|| {
			for n in 1..=6u64 {
				frame_system::BlockHash::<Test>::insert(n, H256::repeat_byte(n as u8));
			}
			System::set_block_number(7);
			assert_eq!(ids().len(), 5);

			// Depth 0 reads the parent block.
			let before = Source::historical_block_id(0);
			frame_system::BlockHash::<Test>::insert(6, H256::repeat_byte(0xff));
			assert_ne!(Source::historical_block_id(0), before);
			assert_eq!(ids().len(), 5);
		});
	}

	#[test]
	fn block_ids_stay_distinct_near_genesis() {
		new_test_ext().execute_with(|| {
			System::set_block_number(1);
			assert_eq!(ids().len(), 5);
		});
	}
}
