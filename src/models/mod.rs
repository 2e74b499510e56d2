pub mod link;
pub mod record;

pub use link::{keyed_items, resolve_key, LinkItem, QuestionKey};
pub use record::{aggregate, QuestionRecord, ResultSet, DEGRADED_SENTINEL};
