pub mod dto;
pub mod handler;
pub mod helpers;
pub mod storage;
pub mod wizard;
