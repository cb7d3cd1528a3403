//! API endpoint integration tests
//!
//! Drives the composed router end to end: session resolution, the team
//! resource, audit delivery, and the Postgres-backed store.

#![allow(dead_code)]

mod audit;
mod common;
mod postgres;
mod teams;
