//! Network-facing services: catalogs, downloads, storage, orchestration.
//!
//! These are the only modules that suspend. Each request runs as one
//! logical task; within it, candidate downloads may proceed concurrently
//! while every candidate's decode/parse/merge chain stays sequential.

pub mod catalog;
pub mod download;
pub mod pipeline;
pub mod storage;
