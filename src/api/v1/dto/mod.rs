pub mod me;
pub mod session;
