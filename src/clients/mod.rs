pub mod chat;
pub mod revocation;
pub mod storage;
