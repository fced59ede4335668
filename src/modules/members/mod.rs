pub mod models;
pub mod repositories;

pub use models::{Member, MemberRole};
pub use repositories::{MemberRepository, MySqlMemberRepository};
