#![cfg_attr(rustfmt, rustfmt_skip)]
#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{traits::Get, weights::Weight};
use sp_std::marker::PhantomData;

/// Weight functions needed for pallet_job_dispatch.
pub trait WeightInfo {
    fn bond() -> Weight;
    fn top_up() -> Weight;
    fn unbond() -> Weight;
    fn rejoin_pod() -> Weight;
    fn dispatch_job() -> Weight;
    fn execute_job() -> Weight;
}

/// Default weights for pallet_job_dispatch
pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    // Bonds, Pods, PodCount, TotalBonded, two balances
    fn bond() -> Weight {
        Weight::from_parts(45_000_000, 4_000)
            .saturating_add(T::DbWeight::get().reads(5))
            .saturating_add(T::DbWeight::get().writes(6))
    }

    fn top_up() -> Weight {
        Weight::from_parts(35_000_000, 3_500)
            .saturating_add(T::DbWeight::get().reads(4))
            .saturating_add(T::DbWeight::get().writes(4))
    }

    fn unbond() -> Weight {
        Weight::from_parts(50_000_000, 4_000)
            .saturating_add(T::DbWeight::get().reads(6))
            .saturating_add(T::DbWeight::get().writes(5))
    }

    fn rejoin_pod() -> Weight {
        Weight::from_parts(25_000_000, 3_000)
            .saturating_add(T::DbWeight::get().reads(3))
            .saturating_add(T::DbWeight::get().writes(1))
    }

    // Jobs, PodCount, Pods, NextAssigneeRef, AssigneeRefs, AssignmentPrice, ActiveAssignments
    fn dispatch_job() -> Weight {
        Weight::from_parts(60_000_000, 5_000)
            .saturating_add(T::DbWeight::get().reads(8))
            .saturating_add(T::DbWeight::get().writes(6))
    }

    fn execute_job() -> Weight {
        Weight::from_parts(70_000_000, 6_000)
            .saturating_add(T::DbWeight::get().reads(10))
            .saturating_add(T::DbWeight::get().writes(8))
    }
}

impl WeightInfo for () {
    fn bond() -> Weight {
        Weight::from_parts(45_000_000, 0)
    }

    fn top_up() -> Weight {
        Weight::from_parts(35_000_000, 0)
    }

    fn unbond() -> Weight {
        Weight::from_parts(50_000_000, 0)
    }

    fn rejoin_pod() -> Weight {
        Weight::from_parts(25_000_000, 0)
    }

    fn dispatch_job() -> Weight {
        Weight::from_parts(60_000_000, 0)
    }

    fn execute_job() -> Weight {
        Weight::from_parts(70_000_000, 0)
    }
}
