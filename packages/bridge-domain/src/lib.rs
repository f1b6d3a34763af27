pub mod date_serde;
pub mod normalize;
pub mod time_serde;

mod record;
mod result;

pub use normalize::{display_date, display_datetime, join_meta, normalize};
pub use record::{
	ActivityEntry, Milestone, MilestoneStatus, NewActivityEntry, NotionTask, Paper, Phase,
	SectionStatus, SourceRecord, TaskSection, WritingSection,
};
pub use result::{ResultKind, SearchResult};
