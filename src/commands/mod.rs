pub mod build;
pub mod flush;
pub mod init;
pub mod lookup;
pub mod status;
