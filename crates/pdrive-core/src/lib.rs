//! pdrive Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `Email`, `RemoteName`, `RemotePath`, `Credentials`, `LogLine`
//! - **Use cases** - `LinkAccountUseCase`, `LinkStatusUseCase`, `SavedLoginUseCase`
//! - **Port definition** - `IRemoteBackend`, the trait the rclone adapter implements
//! - **Output classification** - mapping recognized rclone output text to severities
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure logic with no subprocess or terminal
//! dependencies. The single port defines the interface the external-tool
//! adapter implements. Use cases orchestrate the multi-step flows (such as
//! linking an account) through the port so that both front-ends share one
//! implementation of each sequence.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
