//! SMS gateway implementations

pub mod mock;
pub mod msg_ge;

pub use mock::MockSmsGateway;
pub use msg_ge::MsgGeGateway;
