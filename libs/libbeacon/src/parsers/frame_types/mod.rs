mod management;

pub use management::parse_beacon;
