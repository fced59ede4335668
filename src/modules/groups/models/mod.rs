pub mod group;

pub use group::{Group, GroupMembership, MembershipStatus};
