//! Core business logic for Mizan.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `accounts` - Chart of accounts rules and the signed-delta balance rule
//! - `journal` - Journal entry validation, numbering, and the posting state machine
//! - `fiscal` - Fiscal year management
//! - `reports` - Trial balance, general ledger, balance sheet, income statement
//! - `autojournal` - Trigger-driven entry generation from templates
//! - `reconciliation` - Bank statement matching and confidence scoring

pub mod accounts;
pub mod autojournal;
pub mod fiscal;
pub mod journal;
pub mod reconciliation;
pub mod reports;
