use nom::bytes::complete::take;
use nom::sequence::tuple;

use super::parse_sequence_control;
use crate::error::Error;
use crate::frame::components::{FrameControl, ManagementHeader};
use crate::parsers::{clone_slice, parse_mac};

/// Parse and return the [ManagementHeader] from a given payload.
/// The frame control bytes have already been consumed by the caller.
pub fn parse_management_header(
    frame_control: FrameControl,
    input: &[u8],
) -> Result<(&[u8], ManagementHeader), Error> {
    let (remaining, (duration, address_1, address_2, address_3, sequence_control)) = tuple((
        take(2usize),
        parse_mac,
        parse_mac,
        parse_mac,
        parse_sequence_control,
    ))(input)?;

    let duration = clone_slice::<2>(duration);

    Ok((
        remaining,
        ManagementHeader {
            frame_control,
            duration,
            address_1,
            address_2,
            address_3,
            sequence_control,
        },
    ))
}
