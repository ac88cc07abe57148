use crate::frame_types::*;

#[inline]
/// Mini helper to check, whether a bit is set or not.
fn flag_is_set(data: u8, bit: u8) -> bool {
    data & (1 << bit) > 0
}

/// The very first two bytes of every frame contain the FrameControl header.
///
/// First byte:
///
/// - **bit_0-1**: Protocol version. Until now, this has always been 0.
/// - **bit_2-3**: [FrameType]
/// - **bit_4-7**: [FrameSubType]
///
/// Second byte (Flags), of which this pipeline only consults `to_ds` and
/// `from_ds` to resolve the address slots.
#[derive(Clone, Debug)]
pub struct FrameControl {
    pub protocol_version: u8,
    pub frame_type: FrameType,
    pub frame_subtype: FrameSubType,
    pub flags: u8,
}

impl FrameControl {
    pub fn to_ds(&self) -> bool {
        flag_is_set(self.flags, 0)
    }

    pub fn from_ds(&self) -> bool {
        flag_is_set(self.flags, 1)
    }

    pub fn encode(&self) -> [u8; 2] {
        let protocol_version_bits = self.protocol_version & 0b11; // 2 bits
        let frame_type_bits = (self.frame_type as u8 & 0b11) << 2; // 2 bits
        let frame_subtype_bits = (self.frame_subtype.to_bits() & 0b1111) << 4; // 4 bits

        let first_byte = frame_subtype_bits | frame_type_bits | protocol_version_bits;

        [first_byte, self.flags]
    }
}

#[cfg(test)]
mod tests {
    use crate::parsers::parse_frame_control;
    use crate::frame_types::{FrameSubType, FrameType};

    #[test]
    /// Create a Management-Beacon FrameControl header.
    /// FrameType should be `00` and SubType `1000`.
    fn test_beacon() {
        let bytes = [0b1000_0000, 0b0000_0000];
        let frame_control = parse_frame_control(&bytes).unwrap().1;

        assert!(matches!(frame_control.frame_type, FrameType::Management));
        assert!(matches!(frame_control.frame_subtype, FrameSubType::Beacon));
    }

    #[test]
    fn test_encode_is_parse_inverse() {
        let bytes = [0b1000_0000, 0b0000_0010];
        let frame_control = parse_frame_control(&bytes).unwrap().1;
        assert!(frame_control.from_ds());
        assert!(!frame_control.to_ds());
        assert_eq!(frame_control.encode(), bytes);
    }
}
