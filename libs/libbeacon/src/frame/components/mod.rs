mod channel_switch;
mod element;
mod fixed_params;
mod frame_control;
mod header;
mod mac_address;
mod sequence_control;

pub use channel_switch::{ChannelSwitchAnnouncement, ChannelSwitchMode};
pub use element::{ElementChain, InformationElement};
pub use fixed_params::FixedParameters;
pub use frame_control::FrameControl;
pub use header::ManagementHeader;
pub use mac_address::{MacAddress, MacParseError};
pub use sequence_control::SequenceControl;
