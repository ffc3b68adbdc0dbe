//! Data models for payroll extraction.

pub mod config;
pub mod document;
pub mod payroll;
