// Aggregates the split model files
pub mod due;
pub mod item;
pub mod normalize;

pub use due::{DueUpdateRequest, ResolvedDueFields};
pub use item::TaskRecord;
pub use normalize::{NO_DATE, due_string_for_submit, normalize_due_string};
