//! Service layer: the operations the rest of the system calls.

pub mod bucket_service;
