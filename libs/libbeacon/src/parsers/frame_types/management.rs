use crate::error::Error;
use crate::frame::components::FrameControl;
use crate::frame::Beacon;
use crate::parsers::{parse_element_chain, parse_fixed_parameters, parse_management_header};

/// Parse a [Beacon] frame.
///
/// The general structure is:
/// - ManagementHeader
/// - Fixed parameters (timestamp, beacon interval, capability info)
/// - Information element chain
///
/// The caller has verified the 36-byte minimum and consumed the frame
/// control bytes, so the header and fixed block reads can't run short;
/// the element chain decoder is lenient by contract.
pub fn parse_beacon(frame_control: FrameControl, input: &[u8]) -> Result<Beacon, Error> {
    let (input, header) = parse_management_header(frame_control, input)?;
    let (input, fixed) = parse_fixed_parameters(input)?;
    let elements = parse_element_chain(input);

    Ok(Beacon {
        header,
        fixed,
        elements,
    })
}
