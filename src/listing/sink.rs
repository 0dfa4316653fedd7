//! Destination for output units

use crate::error::ListError;

use super::types::OutputUnit;

/// Receives output units as an aggregation policy emits them.
///
/// Units are never retracted: once `emit` returns, the sink owns the unit
/// even if the run later fails.
pub trait UnitSink {
    fn emit(&mut self, unit: OutputUnit) -> Result<(), ListError>;
}

impl UnitSink for Vec<OutputUnit> {
    fn emit(&mut self, unit: OutputUnit) -> Result<(), ListError> {
        self.push(unit);
        Ok(())
    }
}
