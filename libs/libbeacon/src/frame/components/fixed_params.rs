use std::fmt;

/// The 12-byte fixed parameter block that follows the management header of a
/// beacon frame: timestamp (8 bytes), beacon interval (2 bytes) and the
/// capability bitfield (2 bytes), all little-endian.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedParameters {
    pub timestamp: u64,
    pub beacon_interval: u16,
    pub capability_info: u16,
}

impl FixedParameters {
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::new();

        bytes.extend_from_slice(&self.timestamp.to_le_bytes());
        bytes.extend_from_slice(&self.beacon_interval.to_le_bytes());
        bytes.extend_from_slice(&self.capability_info.to_le_bytes());

        bytes
    }
}

impl fmt::Display for FixedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\ttimestamp: {}", self.timestamp)?;
        writeln!(f, "\tbeacon interval: {}", self.beacon_interval)?;
        write!(f, "\tcapability info: {:#06x}", self.capability_info)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parsers::parse_fixed_parameters;

    #[test]
    fn test_roundtrip() {
        let params = FixedParameters {
            timestamp: 0x0102_0304_0506_0708,
            beacon_interval: 100,
            capability_info: 0x0431,
        };

        let bytes = params.encode();
        assert_eq!(bytes.len(), 12);
        let (rest, decoded) = parse_fixed_parameters(&bytes).unwrap();
        assert!(rest.is_empty());
        assert_eq!(decoded, params);
    }
}
