use std::fmt;

/// Contains structs representing recurring sets of structured data.
/// For instance, MAC-addresses, headers, information elements.
pub mod components;

use crate::error::Error;
use crate::traits::Addresses;
use components::{ElementChain, FixedParameters, MacAddress, ManagementHeader};

/// A decoded beacon frame: the 24-byte management header, the 12-byte fixed
/// parameter block and the chain of information elements.
///
/// Frames are decoded fresh from each captured buffer, mutated at most once
/// and re-encoded once; nothing is shared across capture cycles.
#[derive(Clone, Debug)]
pub struct Beacon {
    pub header: ManagementHeader,
    pub fixed: FixedParameters,
    pub elements: ElementChain,
}

impl Beacon {
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();

        bytes.extend(self.header.encode());
        bytes.extend(self.fixed.encode());
        bytes.extend(self.elements.encode()?);

        Ok(bytes)
    }
}

impl Addresses for Beacon {
    fn src(&self) -> Option<&MacAddress> {
        self.header.src()
    }

    fn dest(&self) -> &MacAddress {
        self.header.dest()
    }

    fn bssid(&self) -> Option<&MacAddress> {
        self.header.bssid()
    }
}

impl fmt::Display for Beacon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "frame control: {:?}", self.header.frame_control)?;
        writeln!(f, "duration: {:02x?}", self.header.duration)?;
        writeln!(f, "address 1: {}", self.header.address_1)?;
        writeln!(f, "address 2: {}", self.header.address_2)?;
        writeln!(f, "address 3: {}", self.header.address_3)?;
        writeln!(
            f,
            "sequence: {} fragment: {}",
            self.header.sequence_control.sequence_number,
            self.header.sequence_control.fragment_number
        )?;
        writeln!(f, "fixed parameters:")?;
        writeln!(f, "{}", self.fixed)?;
        write!(f, "{}", self.elements)
    }
}
