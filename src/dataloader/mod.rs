pub mod config;
pub mod data_batch;
pub mod dataset;
pub mod error;
pub mod generator;
pub mod info;
pub mod minibatch_reader;
pub mod storage;
