pub mod request;
pub mod fifo;
pub mod queueing_network;
pub mod file_logger;
