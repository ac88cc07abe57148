use nom::number::complete::le_u16;
use nom::IResult;

use crate::frame::components::SequenceControl;

/// Parse the sequence control field: one little-endian word holding the
/// fragment number in the low 4 bits and the sequence number in the upper 12.
/// The exact inverse of [SequenceControl::encode].
pub fn parse_sequence_control(input: &[u8]) -> IResult<&[u8], SequenceControl> {
    let (remaining, word) = le_u16(input)?;

    Ok((
        remaining,
        SequenceControl {
            fragment_number: (word & 0x000F) as u8,
            sequence_number: word >> 4,
        },
    ))
}
