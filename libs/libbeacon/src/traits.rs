use crate::frame::components::MacAddress;

/// Helper trait to easily access source, destination and bssid on frames.
pub trait Addresses {
    /// Returns the sender of the frame.
    fn src(&self) -> Option<&MacAddress>;

    /// Returns the destination of the frame. Always present.
    fn dest(&self) -> &MacAddress;

    /// Returns the BSSID, when the frame carries one.
    fn bssid(&self) -> Option<&MacAddress>;
}
