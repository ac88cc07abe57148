/// Frame type from bits 2-3 of the first frame control byte.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum FrameType {
    Management,
    Control,
    Data,
    Unknown,
}

/// Management frame subtypes (bits 4-7 of the first frame control byte).
///
/// Only [Beacon](FrameSubType::Beacon) gets a full decoder; the other
/// variants exist so a rejected frame can say what it actually was.
/// Control and data frames collapse into [Unhandled](FrameSubType::Unhandled).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum FrameSubType {
    AssociationRequest,
    AssociationResponse,
    ReassociationRequest,
    ReassociationResponse,
    ProbeRequest,
    ProbeResponse,
    TimingAdvertisement,
    Beacon,
    Atim,
    Disassociation,
    Authentication,
    Deauthentication,
    Action,
    ActionNoAck,
    Reserved,
    Unhandled,
}

impl FrameSubType {
    /// The 4-bit wire value, assuming a management frame.
    pub fn to_bits(self) -> u8 {
        match self {
            FrameSubType::AssociationRequest => 0,
            FrameSubType::AssociationResponse => 1,
            FrameSubType::ReassociationRequest => 2,
            FrameSubType::ReassociationResponse => 3,
            FrameSubType::ProbeRequest => 4,
            FrameSubType::ProbeResponse => 5,
            FrameSubType::TimingAdvertisement => 6,
            FrameSubType::Beacon => 8,
            FrameSubType::Atim => 9,
            FrameSubType::Disassociation => 10,
            FrameSubType::Authentication => 11,
            FrameSubType::Deauthentication => 12,
            FrameSubType::Action => 13,
            FrameSubType::ActionNoAck => 14,
            FrameSubType::Reserved => 7,
            FrameSubType::Unhandled => 15,
        }
    }
}
