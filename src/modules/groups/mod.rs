pub mod models;
pub mod repositories;

pub use models::{Group, GroupMembership, MembershipStatus};
pub use repositories::{GroupRepository, MySqlGroupRepository};
