pub mod assessment;
pub mod waitlist;
