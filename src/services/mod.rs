pub mod file_manager;
pub mod preview;
pub mod staging;
pub mod storage;
