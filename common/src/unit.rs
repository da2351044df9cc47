//! Marker types.

/// Marker type describing an entity creation.
///
/// For users this is the moment they joined the platform.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

