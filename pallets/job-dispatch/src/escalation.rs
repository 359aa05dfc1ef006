//! Fallback ladder.
//!
//! Pure functions deciding who may execute a job at a given point in its lifetime. The pallet
//! resolves storage (assignee, fallback slots, recorded price) and feeds the values in; nothing
//! here touches state, so every rung of the ladder can be exercised in isolation.
//!
//! A job moves through the following phases:
//!
//! * `PrimaryWindow`: fewer than `primary_window` blocks have passed since assignment. Only the
//!   primary operator may execute, or anyone if the primary slot is open.
//! * `Escalation`: the window is over. The rung is the larger of the time rung (whole
//!   `interval`s elapsed after the window) and the price rung (whole `rung_step_bps` steps of the
//!   declared/recorded price ratio above parity). Rungs `0..FALLBACK_SLOTS` select a fallback
//!   slot; any later rung means the ladder is exhausted and the job is open to anyone.
//!
//! A declared price above `spike_threshold_bps` of the recorded price is rejected outright.

use crate::types::{Assignee, Claim, JobState, FALLBACK_SLOTS};

/// Basis points representing a price ratio of exactly one.
pub const PARITY_BPS: u128 = 10_000;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct LadderConfig {
	pub primary_window: u64,
	pub interval: u64,
	pub rung_step_bps: u32,
	pub spike_threshold_bps: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Phase {
	PrimaryWindow { remaining: u64 },
	Escalation { time_rung: u64 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Ineligible {
	NotAssignedOperator,
	NotFallbackOperator,
	PriceSpike,
}

pub fn phase(config: &LadderConfig, elapsed: u64) -> Phase {
	if elapsed < config.primary_window {
		return Phase::PrimaryWindow { remaining: config.primary_window - elapsed };
	}
	let late = elapsed - config.primary_window;
	Phase::Escalation { time_rung: late / config.interval.max(1) }
}

/// Declared price relative to the recorded one, in basis points.
///
/// A zero recorded price carries no information and is treated as parity.
pub fn price_ratio_bps(declared: u128, recorded: u128) -> u128 {
	if recorded == 0 {
		return PARITY_BPS;
	}
	declared.saturating_mul(PARITY_BPS) / recorded
}

/// Ladder rung implied by the price ratio, capped at the last fallback slot.
pub fn price_rung(config: &LadderConfig, declared: u128, recorded: u128) -> Result<u64, Ineligible> {
	let ratio = price_ratio_bps(declared, recorded);
	if ratio > u128::from(config.spike_threshold_bps) {
		return Err(Ineligible::PriceSpike);
	}
	let above_parity = ratio.saturating_sub(PARITY_BPS);
	let rung = above_parity / u128::from(config.rung_step_bps.max(1));
	Ok(rung.min(FALLBACK_SLOTS as u128 - 1) as u64)
}

/// Combines the time and price rungs into a claim, `Exhausted` past the last slot.
pub fn ladder_claim(time_rung: u64, price_rung: u64) -> Claim {
	let rung = time_rung.max(price_rung);
	if rung < FALLBACK_SLOTS as u64 {
		Claim::Fallback(rung as u8)
	} else {
		Claim::Exhausted
	}
}

/// Decides whether `caller` may execute the job right now.
///
/// `fallbacks` are the fallback slots already resolved against current pod membership.
pub fn authorize<AccountId: PartialEq>(
	config: &LadderConfig,
	elapsed: u64,
	declared_price: u128,
	recorded_price: u128,
	primary: &Assignee<AccountId>,
	fallbacks: &[Assignee<AccountId>; FALLBACK_SLOTS],
	caller: &AccountId,
) -> Result<Claim, Ineligible> {
	match phase(config, elapsed) {
		Phase::PrimaryWindow { .. } => {
			if primary.admits(caller) {
				Ok(Claim::Primary)
			} else {
				Err(Ineligible::NotAssignedOperator)
			}
		},
		Phase::Escalation { time_rung } => {
			let price_rung = price_rung(config, declared_price, recorded_price)?;
			match ladder_claim(time_rung, price_rung) {
				Claim::Fallback(slot) if fallbacks[slot as usize].admits(caller) =>
					Ok(Claim::Fallback(slot)),
				Claim::Fallback(_) => Err(Ineligible::NotFallbackOperator),
				claim => Ok(claim),
			}
		},
	}
}

/// Job state for a job that has been open for `elapsed` blocks, ignoring price.
pub fn job_state(config: &LadderConfig, elapsed: u64) -> JobState {
	match phase(config, elapsed) {
		Phase::PrimaryWindow { remaining } => JobState::PrimaryWindow { remaining },
		Phase::Escalation { time_rung } => match ladder_claim(time_rung, 0) {
			Claim::Fallback(rung) => JobState::Escalation { rung },
			_ => JobState::Exhausted,
		},
	}
}
