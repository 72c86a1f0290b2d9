//! Payload envelope: a version tag plus one typed record array.

use crate::error::FleetError;
use crate::records::{StatusChange, Trip};
use crate::version::MdsVersion;

#[derive(Debug, Clone, PartialEq)]
pub enum PayloadData {
    StatusChanges(Vec<StatusChange>),
    Trips(Vec<Trip>),
}

impl PayloadData {
    /// Key of the array inside `data`.
    pub fn key(&self) -> &'static str {
        match self {
            PayloadData::StatusChanges(_) => "status_changes",
            PayloadData::Trips(_) => "trips",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PayloadData::StatusChanges(records) => records.len(),
            PayloadData::Trips(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    pub version: MdsVersion,
    pub data: PayloadData,
}

impl Payload {
    pub fn status_changes(version: MdsVersion, records: Vec<StatusChange>) -> Self {
        Self {
            version,
            data: PayloadData::StatusChanges(records),
        }
    }

    pub fn trips(version: MdsVersion, records: Vec<Trip>) -> Self {
        Self {
            version,
            data: PayloadData::Trips(records),
        }
    }
}

/// Wrap whichever collection was provided. Exactly one must be given.
pub fn assemble(
    version: MdsVersion,
    status_changes: Option<Vec<StatusChange>>,
    trips: Option<Vec<Trip>>,
) -> Result<Payload, FleetError> {
    match (status_changes, trips) {
        (Some(records), None) => Ok(Payload::status_changes(version, records)),
        (None, Some(records)) => Ok(Payload::trips(version, records)),
        (Some(_), Some(_)) => Err(FleetError::AmbiguousPayload),
        (None, None) => Err(FleetError::EmptyPayload),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assemble_picks_the_provided_collection() {
        let payload = assemble(MdsVersion::lower(), Some(vec![]), None).expect("status changes");
        assert_eq!(payload.data.key(), "status_changes");
        assert!(payload.data.is_empty());

        let payload = assemble(MdsVersion::lower(), None, Some(vec![])).expect("trips");
        assert_eq!(payload.data.key(), "trips");
        assert_eq!(payload.version.to_string(), "0.2.0");
    }

    #[test]
    fn assemble_rejects_both_or_neither() {
        assert_eq!(
            assemble(MdsVersion::lower(), Some(vec![]), Some(vec![])),
            Err(FleetError::AmbiguousPayload)
        );
        assert_eq!(assemble(MdsVersion::lower(), None, None), Err(FleetError::EmptyPayload));
    }
}
