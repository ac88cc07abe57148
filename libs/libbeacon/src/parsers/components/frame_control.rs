use nom::sequence::tuple;
use nom::{bits, IResult};
use nom::{complete::take, error::Error};

use crate::frame::components::FrameControl;
use crate::frame_types::*;

/// Parse the frame control of a frame.
/// The format is the same for ALL frames, which makes this part quite unique.
pub fn parse_frame_control(input: &[u8]) -> IResult<&[u8], FrameControl> {
    let (remaining, (frame_subtype, frame_type, protocol_version, flags)) =
        bits::<_, (u8, u8, u8, u8), Error<(&[u8], usize)>, _, _>(tuple((
            take(4usize),
            take(2usize),
            take(2usize),
            take(8usize),
        )))(input)?;

    let frame_type = parse_frame_type(frame_type);

    // The next 4 bits are then used to determine the frame sub-type.
    // The sub-type depends on the current FrameType.
    let frame_subtype = match frame_type {
        FrameType::Management => management_frame_subtype(frame_subtype),
        _ => FrameSubType::Unhandled,
    };

    Ok((
        remaining,
        FrameControl {
            protocol_version,
            frame_type,
            frame_subtype,
            flags,
        },
    ))
}

/// Get the FrameType from a two-bit integer (bits 2-3 of the first byte).
fn parse_frame_type(byte: u8) -> FrameType {
    match byte {
        0 => FrameType::Management,
        1 => FrameType::Control,
        2 => FrameType::Data,
        _ => FrameType::Unknown,
    }
}

/// Get the FrameSubType from a 4-bit integer (bits 4-7) under
/// the assumption that this is a management frame.
fn management_frame_subtype(byte: u8) -> FrameSubType {
    match byte {
        0 => FrameSubType::AssociationRequest,
        1 => FrameSubType::AssociationResponse,
        2 => FrameSubType::ReassociationRequest,
        3 => FrameSubType::ReassociationResponse,
        4 => FrameSubType::ProbeRequest,
        5 => FrameSubType::ProbeResponse,
        6 => FrameSubType::TimingAdvertisement,
        7 => FrameSubType::Reserved,
        8 => FrameSubType::Beacon,
        9 => FrameSubType::Atim,
        10 => FrameSubType::Disassociation,
        11 => FrameSubType::Authentication,
        12 => FrameSubType::Deauthentication,
        13 => FrameSubType::Action,
        14 => FrameSubType::ActionNoAck,
        15 => FrameSubType::Reserved,
        _ => FrameSubType::Unhandled,
    }
}
