pub mod member_set;

pub use member_set::MemberSet;
