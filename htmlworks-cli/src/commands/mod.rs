pub mod diff;
pub mod gen;
pub mod init;
pub mod serve;
