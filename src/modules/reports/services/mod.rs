pub mod activity_feed;
pub mod aggregation;
pub mod report_service;
pub mod schedule_scanner;

pub use activity_feed::{ActivityEvent, ActivityFeed, ActivityKind};
pub use aggregation::{DateWindow, RepaymentTotals};
pub use report_service::ReportService;
pub use schedule_scanner::{OverdueLoan, ScheduleHit, ScheduleScanner};
