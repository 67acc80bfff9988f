//! USMCA compliance toolkit: regional value content qualification, tariff savings
//! estimates, and a write-time gate for the cached tariff rate table.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
