//! RIT: Receiving Inspection Toolkit
//!
//! Computes MIL-STD-105E single sampling plans for received lots and keeps a
//! plain-text register with one row per inspected shipment.

pub mod cli;
pub mod core;
pub mod entities;
