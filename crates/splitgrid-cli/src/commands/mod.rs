pub mod groups;
pub mod init;
pub mod runtime;
