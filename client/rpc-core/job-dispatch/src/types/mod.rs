use rpc_primitives_job_dispatch::{Assignee, JobRecord, JobState, PodIndex};
use serde::{Deserialize, Serialize};
use sp_core::H256;

/// One page of a pod listing.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PodPage<AccountId> {
	pub pod: PodIndex,
	/// Selectable slots, the open slot included.
	pub size: u32,
	pub offset: u32,
	pub members: Vec<Assignee<AccountId>>,
}

/// Open job as seen at the best block.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary<AccountId> {
	pub job_hash: H256,
	pub pod: PodIndex,
	pub assigned_at: u64,
	pub state: JobState,
	pub assignee: Assignee<AccountId>,
	pub fallbacks: Vec<Assignee<AccountId>>,
}

impl<AccountId> JobSummary<AccountId> {
	pub fn new(
		job_hash: H256,
		record: JobRecord,
		state: JobState,
		assignee: Assignee<AccountId>,
		fallbacks: Vec<Assignee<AccountId>>,
	) -> Self {
		Self { job_hash, pod: record.pod, assigned_at: record.assigned_at, state, assignee, fallbacks }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn summary_serializes_for_clients() {
		let record = JobRecord { pod: 2, assignee_ref: 9, assigned_at: 40, fallbacks: [0; 5] };
		let summary = JobSummary::new(
			H256::repeat_byte(0xab),
			record,
			JobState::Escalation { rung: 3 },
			Assignee::Operator(7u64),
			vec![Assignee::Open, Assignee::Operator(8)],
		);

		let value = serde_json::to_value(&summary).unwrap();
		assert_eq!(value["pod"], json!(2));
		assert_eq!(value["assignedAt"], json!(40));
		assert_eq!(value["state"], json!({ "Escalation": { "rung": 3 } }));
		assert_eq!(value["assignee"], json!({ "Operator": 7 }));
		assert_eq!(value["fallbacks"], json!(["Open", { "Operator": 8 }]));

		let decoded: JobSummary<u64> = serde_json::from_value(value).unwrap();
		assert_eq!(decoded, summary);
	}
}
