pub mod checkin;
pub mod checkout;
pub mod clone;
pub mod delete;
pub mod init;
pub mod overwrite_master;
pub mod pull;
pub mod push;
pub mod repair_master;
pub mod stash;
pub mod status;
