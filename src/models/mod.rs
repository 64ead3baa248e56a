pub mod clock;
pub mod memory_item;
pub mod session;
pub mod sm2;
pub mod status;

pub use clock::{Clock, FixedClock, OffsetClock, SystemClock};
pub use memory_item::{MemoryItem, NewMemoryItem};
pub use session::{Session, SessionStats, SessionUpdate};
pub use status::{DashboardCounts, MasteryStatus, classify};
