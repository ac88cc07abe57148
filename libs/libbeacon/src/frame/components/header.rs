use super::{FrameControl, MacAddress, SequenceControl};
use crate::traits::Addresses;

/// Representation of a management frame header. This format is used by all
/// management frames.
///
/// Structure:
///
/// **Bytes 0-1** \
/// Protocol meta information and flags, parsed into [FrameControl].
///
/// **Bytes 2-3** \
/// Duration bytes. Always present, carried opaquely.
///
/// **Bytes 4-21** \
/// Address 1, address 2 and address 3, six bytes each.
///
/// **Bytes 22-23** \
/// Sequence control, see [SequenceControl].
#[derive(Clone, Debug)]
pub struct ManagementHeader {
    pub frame_control: FrameControl,
    pub duration: [u8; 2],
    pub address_1: MacAddress,
    pub address_2: MacAddress,
    pub address_3: MacAddress,
    pub sequence_control: SequenceControl,
}

impl ManagementHeader {
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.extend_from_slice(&self.frame_control.encode());
        bytes.extend_from_slice(&self.duration);
        bytes.extend_from_slice(&self.address_1.encode());
        bytes.extend_from_slice(&self.address_2.encode());
        bytes.extend_from_slice(&self.address_3.encode());
        bytes.extend_from_slice(&self.sequence_control.encode());

        bytes
    }

    /// Overwrite the destination address, whichever slot it lives in for
    /// this header's `to_ds`/`from_ds` combination.
    pub fn set_dest(&mut self, address: MacAddress) {
        let frame_control = &self.frame_control;
        if frame_control.to_ds() && frame_control.from_ds() {
            self.address_3 = address;
        } else if frame_control.to_ds() {
            self.address_2 = address;
        } else if frame_control.from_ds() {
            self.address_3 = address;
        } else {
            self.address_1 = address;
        }
    }
}

/// Which address is used in which way depends on the `to_ds`/`from_ds` flags
/// in the FrameControl header.
///
/// A rule of thumb:
///
/// **Address 1:** the recipient station address.
/// **Address 2:** the transmitter station address.
/// **Address 3:** whichever of destination/source the other two don't cover;
/// for ordinary AP traffic (both flags clear) this is the BSSID.
impl Addresses for ManagementHeader {
    fn src(&self) -> Option<&MacAddress> {
        let frame_control = &self.frame_control;
        if frame_control.to_ds() {
            Some(&self.address_3)
        } else if frame_control.from_ds() {
            Some(&self.address_1)
        } else {
            Some(&self.address_2)
        }
    }

    fn dest(&self) -> &MacAddress {
        let frame_control = &self.frame_control;
        if frame_control.to_ds() && frame_control.from_ds() {
            &self.address_3
        } else if frame_control.to_ds() {
            &self.address_2
        } else if frame_control.from_ds() {
            &self.address_3
        } else {
            &self.address_1
        }
    }

    fn bssid(&self) -> Option<&MacAddress> {
        let frame_control = &self.frame_control;
        if frame_control.to_ds() {
            Some(&self.address_1)
        } else if frame_control.from_ds() {
            Some(&self.address_2)
        } else {
            Some(&self.address_3)
        }
    }
}
