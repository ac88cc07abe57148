use nom::number::complete::{le_u16, le_u64};
use nom::sequence::tuple;
use nom::IResult;

use crate::frame::components::FixedParameters;

/// Parse the 12-byte fixed parameter block of a beacon frame.
pub fn parse_fixed_parameters(input: &[u8]) -> IResult<&[u8], FixedParameters> {
    let (remaining, (timestamp, beacon_interval, capability_info)) =
        tuple((le_u64, le_u16, le_u16))(input)?;

    Ok((
        remaining,
        FixedParameters {
            timestamp,
            beacon_interval,
            capability_info,
        },
    ))
}
