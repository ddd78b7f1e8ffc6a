//! Effects - side effects declared by the reducer

use crate::state::{Coordinates, ImageKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Read `user-coordinates` from session storage
    LoadSession,
    /// Write `user-coordinates` to session storage
    SaveCoordinates(Coordinates),
    /// Ask the location provider for the current position
    AcquireLocation,
    /// Weather for a position
    FetchByCoordinates(Coordinates),
    /// Weather for a city name
    FetchByCity { city: String },
    /// Download and decode a flag or condition icon
    FetchImage { kind: ImageKind, url: String },
}
