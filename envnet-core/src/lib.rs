//! envnet Core
//!
//! Resolves an environment's CIDR allocation and declares the VPC resource
//! graph that is rendered into a provisioning template.

pub mod cidr;
pub mod config;
pub mod graph;
pub mod network;
pub mod resource;
pub mod schema;
pub mod stack;
