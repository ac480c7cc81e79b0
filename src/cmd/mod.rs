pub mod balance;
pub mod holidays;
pub mod init;
pub mod leave;
pub mod rules;
pub mod suggest;
