mod element;
mod fixed_params;
mod frame_control;
mod header;
mod sequence_control;

pub use element::{parse_element, parse_element_chain};
pub use fixed_params::parse_fixed_parameters;
pub use frame_control::parse_frame_control;
pub use header::parse_management_header;
pub use sequence_control::parse_sequence_control;
