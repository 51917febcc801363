pub mod bucket;
pub mod bug;
pub mod item;
pub mod ticket;
pub mod work_item;

pub use bucket::{members, members_owned, Bucket, SprintStatus};
pub use bug::{Bug, BugStatus, Platform, Severity};
pub use item::{BucketId, BucketRef, ItemId, ItemPatch, Orderable, Update};
pub use ticket::{Priority, Ticket, TicketStatus};
pub use work_item::WorkItem;
