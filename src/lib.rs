pub mod feedback;
pub mod logging;
pub mod notify;
pub mod storage;
pub mod web;
