/// Libbeacon's own [Error](error::Error) implementation.
pub mod error;
/// The [Beacon](frame::Beacon) struct and its components.
pub mod frame;
/// Enums representing frame types and frame subtypes.
mod frame_types;
/// [nom] parsers for internal usage.
pub mod parsers;
/// Codec for the radiotap pseudo-header wrapped around captured frames.
pub mod radiotap;
/// All traits used or provided by this library.
mod traits;

use crate::error::Error;
use crate::parsers::parse_frame_control;

// Re-exports for user convenience
pub use crate::frame::Beacon;
pub use crate::frame_types::*;
pub use crate::traits::Addresses;

use crc::{Crc, CRC_32_ISO_HDLC};

// CRC algorithm for FCS calculation
const CRC_32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// A beacon frame is at least a 24-byte management header plus the 12-byte
/// fixed parameter block; the element chain behind them may be empty.
const BEACON_MIN_LEN: usize = 36;

/// Parse a beacon frame from raw bytes, starting at the frame control word.
///
/// Anything that is not a management/beacon frame is rejected with
/// [Error::UnsupportedFrame]; this is a filter condition for the capture
/// loop, not a parsing failure.
pub fn parse_beacon(input: &[u8]) -> Result<Beacon, Error> {
    if input.len() < BEACON_MIN_LEN {
        return Err(Error::Truncated("management frame header"));
    }

    let (input, frame_control) = parse_frame_control(input)?;

    match (frame_control.frame_type, frame_control.frame_subtype) {
        (FrameType::Management, FrameSubType::Beacon) => {
            parsers::parse_beacon(frame_control, input)
        }
        _ => Err(Error::UnsupportedFrame(format!(
            "{:?} {:?}",
            frame_control.frame_type, frame_control.frame_subtype
        ))),
    }
}

/// Retry entry for captures that kept a trailing frame check sequence: parse
/// again with the last four bytes dropped.
///
/// The retry itself is purely length-based. The CRC over the shortened
/// input is checked only to say in the logs whether the dropped tail really
/// was an FCS or just unrelated trailing bytes.
pub fn parse_beacon_stripped(input: &[u8]) -> Result<Beacon, Error> {
    if input.len() < 4 {
        return Err(Error::Truncated("management frame header"));
    }

    let (frame_data, fcs_bytes) = input.split_at(input.len() - 4);
    let fcs = u32::from_le_bytes([fcs_bytes[0], fcs_bytes[1], fcs_bytes[2], fcs_bytes[3]]);
    if CRC_32.checksum(frame_data) == fcs {
        log::debug!("stripped tail is a valid frame check sequence");
    } else {
        log::debug!("stripped tail does not checksum as an FCS, dropping it anyway");
    }

    parse_beacon(frame_data)
}
