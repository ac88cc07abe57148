//! Codec for the radiotap pseudo-header that a monitor-mode capture stack
//! prepends to every 802.11 frame.
//!
//! The receive side decodes the self-describing layout: a 4-byte fixed
//! prefix, a chain of 32-bit present words (bit 31 of a word announces that
//! another word follows), then the optional fields the present bits gate.
//! Only the bits of the *first* present word ever gate a field; extension
//! words are read to find the end of the chain and carried for reference.
//! Anyone adding coverage for fields gated by extension words has to revisit
//! that assumption.
//!
//! The transmit side does not re-encode a received header. Injection goes
//! out behind a fixed 18-byte header built by [TxHeaderTemplate], which
//! reuses the captured rate and channel but hardcodes everything else.

use std::fmt;
use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use nom::number::complete::{le_i8, le_u16, le_u32, le_u8};
use nom::sequence::tuple;

use crate::error::Error;

/// Bits of the first present word that gate the optional fields we decode.
pub const PRESENT_FLAGS: u32 = 0x0000_0002;
pub const PRESENT_DATA_RATE: u32 = 0x0000_0004;
pub const PRESENT_CHANNEL: u32 = 0x0000_0008;
pub const PRESENT_ANTENNA_SIGNAL: u32 = 0x0000_0020;
pub const PRESENT_ANTENNA: u32 = 0x0000_0040;
pub const PRESENT_RX_FLAGS: u32 = 0x0000_0080;

/// Bit 31: another present word follows this one.
pub const PRESENT_EXT: u32 = 0x8000_0000;

/// Flags-field bit: the capture kept the frame check sequence.
pub const FLAG_FCS_INCLUDED: u8 = 0x10;

/// First-word bits for fields that would be laid out before or between the
/// ones we decode (TSFT and FHSS). A header that sets either shifts every
/// later offset, so the optional fields can't be trusted and stay undecoded.
const PRESENT_OFFSET_SHIFTING: u32 = 0x0000_0011;

/// The length of the fixed transmit header built by [TxHeaderTemplate].
pub const TX_HEADER_LEN: u16 = 18;

/// A decoded radiotap header.
///
/// `length` is the byte offset at which the 802.11 frame starts. It is taken
/// from the wire and always trusted for locating the frame, independent of
/// how many optional fields were actually decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RadiotapHeader {
    pub version: u8,
    pub pad: u8,
    pub length: u16,
    /// The first present word, which gates all decoded optional fields.
    pub present: u32,
    /// Extension present words, in wire order. Carried, never consulted.
    pub present_ext: Vec<u32>,
    /// Flags byte with [FLAG_FCS_INCLUDED] already cleared; whether the
    /// capture kept its FCS is not observable downstream.
    pub flags: Option<u8>,
    pub data_rate: Option<u8>,
    pub channel_freq: Option<u16>,
    pub channel_flags: Option<u16>,
    pub antenna_signal: Option<i8>,
    pub antenna: Option<u8>,
    pub rx_flags: Option<u16>,
}

/// Run a nom parser and turn any failure into a [Error::Truncated] naming
/// the field that was being read.
fn read<'a, O, F>(field: &'static str, mut parser: F, input: &'a [u8]) -> Result<(&'a [u8], O), Error>
where
    F: nom::Parser<&'a [u8], O, nom::error::Error<&'a [u8]>>,
{
    parser.parse(input).map_err(|_| Error::Truncated(field))
}

impl RadiotapHeader {
    pub fn parse(input: &[u8]) -> Result<RadiotapHeader, Error> {
        let (input, (version, pad, length)) =
            read("radiotap fixed header", tuple((le_u8, le_u8, le_u16)), input)?;
        let (mut input, present) = read("radiotap present word", le_u32, input)?;

        let mut present_ext = Vec::new();
        let mut last_word = present;
        while last_word & PRESENT_EXT != 0 {
            let (remaining, word) = read("radiotap present word", le_u32, input)?;
            input = remaining;
            present_ext.push(word);
            last_word = word;
        }

        let mut header = RadiotapHeader {
            version,
            pad,
            length,
            present,
            present_ext,
            ..Default::default()
        };

        if present & PRESENT_OFFSET_SHIFTING != 0 {
            // A field we don't handle sits in front of the ones we do; every
            // later offset would be wrong. The declared length still locates
            // the frame, so the header itself stays usable.
            log::debug!(
                "radiotap present word {present:#010x} carries unsupported leading fields, \
                 skipping optional field decode"
            );
            return Ok(header);
        }

        if present & PRESENT_FLAGS != 0 {
            let (remaining, flags) = read("flags field", le_u8, input)?;
            input = remaining;
            header.flags = Some(flags & !FLAG_FCS_INCLUDED);
        }
        if present & PRESENT_DATA_RATE != 0 {
            let (remaining, data_rate) = read("data rate field", le_u8, input)?;
            input = remaining;
            header.data_rate = Some(data_rate);
        }
        if present & PRESENT_CHANNEL != 0 {
            let (remaining, (channel_freq, channel_flags)) =
                read("channel field", tuple((le_u16, le_u16)), input)?;
            input = remaining;
            header.channel_freq = Some(channel_freq);
            header.channel_flags = Some(channel_flags);
        }
        if present & PRESENT_ANTENNA_SIGNAL != 0 {
            let (remaining, antenna_signal) = read("antenna signal field", le_i8, input)?;
            input = remaining;
            header.antenna_signal = Some(antenna_signal);
        }
        if present & PRESENT_ANTENNA != 0 {
            let (remaining, antenna) = read("antenna field", le_u8, input)?;
            input = remaining;
            header.antenna = Some(antenna);
        }
        if present & PRESENT_RX_FLAGS != 0 {
            let (_, rx_flags) = read("rx flags field", le_u16, input)?;
            header.rx_flags = Some(rx_flags);
        }

        Ok(header)
    }

    /// Serialize the header back into its wire form.
    ///
    /// The present chain is normalized on the way out: every word except the
    /// last gets the another-word-follows bit, the last has it cleared. A
    /// gated field that was never populated encodes as zero.
    pub fn encode(&self) -> Result<Vec<u8>, io::Error> {
        let mut bytes = Vec::new();

        bytes.write_u8(self.version)?;
        bytes.write_u8(self.pad)?;
        bytes.write_u16::<LittleEndian>(self.length)?;

        let mut words = Vec::with_capacity(1 + self.present_ext.len());
        words.push(self.present);
        words.extend_from_slice(&self.present_ext);
        let last = words.len() - 1;
        for (position, word) in words.iter().enumerate() {
            let word = if position < last {
                word | PRESENT_EXT
            } else {
                word & !PRESENT_EXT
            };
            bytes.write_u32::<LittleEndian>(word)?;
        }

        let present = self.present;
        if present & PRESENT_FLAGS != 0 {
            bytes.write_u8(self.flags.unwrap_or_default())?;
        }
        if present & PRESENT_DATA_RATE != 0 {
            bytes.write_u8(self.data_rate.unwrap_or_default())?;
        }
        if present & PRESENT_CHANNEL != 0 {
            bytes.write_u16::<LittleEndian>(self.channel_freq.unwrap_or_default())?;
            bytes.write_u16::<LittleEndian>(self.channel_flags.unwrap_or_default())?;
        }
        if present & PRESENT_ANTENNA_SIGNAL != 0 {
            bytes.write_i8(self.antenna_signal.unwrap_or_default())?;
        }
        if present & PRESENT_ANTENNA != 0 {
            bytes.write_u8(self.antenna.unwrap_or_default())?;
        }
        if present & PRESENT_RX_FLAGS != 0 {
            bytes.write_u16::<LittleEndian>(self.rx_flags.unwrap_or_default())?;
        }

        Ok(bytes)
    }
}

impl fmt::Display for RadiotapHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "version: {} pad: {}", self.version, self.pad)?;
        writeln!(f, "length: {}", self.length)?;
        writeln!(f, "present: {:#010x}", self.present)?;
        for (position, word) in self.present_ext.iter().enumerate() {
            writeln!(f, "present ext[{position}]: {word:#010x}")?;
        }
        if let Some(flags) = self.flags {
            writeln!(f, "flags: {flags:#04x}")?;
        }
        if let Some(data_rate) = self.data_rate {
            writeln!(f, "data rate: {data_rate}")?;
        }
        if let (Some(freq), Some(channel_flags)) = (self.channel_freq, self.channel_flags) {
            writeln!(f, "channel: {freq} MHz flags: {channel_flags:#06x}")?;
        }
        if let Some(antenna_signal) = self.antenna_signal {
            writeln!(f, "antenna signal: {antenna_signal} dBm")?;
        }
        if let Some(antenna) = self.antenna {
            writeln!(f, "antenna: {antenna}")?;
        }
        if let Some(rx_flags) = self.rx_flags {
            writeln!(f, "rx flags: {rx_flags:#06x}")?;
        }
        Ok(())
    }
}

/// The constants behind the fixed transmit header.
///
/// These values (present word, the trailing two-byte field, the padding)
/// were lifted from a transmit capture that one receiving stack demonstrably
/// accepts. Whether any of them is required by other radios is unknown, so
/// they are data with a [Default], not hardcoded law; override the template
/// when a target needs different bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxHeaderTemplate {
    pub present: u32,
    pub extra: u16,
    pub padding: [u8; 3],
}

impl Default for TxHeaderTemplate {
    fn default() -> Self {
        TxHeaderTemplate {
            present: 0x0000_482e,
            extra: 0xd900,
            padding: [0; 3],
        }
    }
}

impl TxHeaderTemplate {
    /// Build the 18-byte transmit header, reusing the captured data rate and
    /// channel so the injected frame matches the air it was captured from.
    /// The declared length is always [TX_HEADER_LEN].
    pub fn build(
        &self,
        data_rate: u8,
        channel_freq: u16,
        channel_flags: u16,
    ) -> Result<Vec<u8>, io::Error> {
        let mut bytes = Vec::with_capacity(TX_HEADER_LEN as usize);

        bytes.write_u8(0)?; // version
        bytes.write_u8(0)?; // pad
        bytes.write_u16::<LittleEndian>(TX_HEADER_LEN)?;
        bytes.write_u32::<LittleEndian>(self.present)?;
        bytes.write_u8(data_rate)?;
        bytes.write_u16::<LittleEndian>(channel_freq)?;
        bytes.write_u16::<LittleEndian>(channel_flags)?;
        bytes.write_u16::<LittleEndian>(self.extra)?;
        bytes.write_all(&self.padding)?;

        Ok(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;

    /// version 0, declared length 22, present chain of two words, all six
    /// supported fields present, FCS bit set in flags.
    const CAPTURE: [u8; 22] = [
        0x00, 0x00, 0x16, 0x00, // version, pad, length 22
        0xee, 0x00, 0x00, 0x80, // present: flags..rx-flags + ext bit
        0x01, 0x00, 0x00, 0x00, // extension word, end of chain
        0x12, // flags: FCS included + short preamble
        0x04, // data rate
        0x85, 0x09, // channel freq 2437
        0xa0, 0x00, // channel flags
        0xd8, // antenna signal -40
        0x01, // antenna
        0x00, 0x00, // rx flags
    ];

    #[test]
    fn test_parse_capture() {
        let header = RadiotapHeader::parse(&CAPTURE).unwrap();

        assert_eq!(header.version, 0);
        assert_eq!(header.length, 22);
        assert_eq!(header.present, 0x8000_00ee);
        assert_eq!(header.present_ext, vec![1]);
        // The FCS-included bit never survives decoding.
        assert_eq!(header.flags, Some(0x02));
        assert_eq!(header.data_rate, Some(4));
        assert_eq!(header.channel_freq, Some(2437));
        assert_eq!(header.channel_flags, Some(0x00a0));
        assert_eq!(header.antenna_signal, Some(-40));
        assert_eq!(header.antenna, Some(1));
        assert_eq!(header.rx_flags, Some(0));
    }

    #[test]
    fn test_roundtrip() {
        let header = RadiotapHeader::parse(&CAPTURE).unwrap();
        let reencoded = header.encode().unwrap();
        let reparsed = RadiotapHeader::parse(&reencoded).unwrap();

        assert_eq!(reparsed, header);
    }

    #[test]
    fn test_truncations_name_the_field() {
        let cases: [(usize, &str); 4] = [
            (3, "radiotap fixed header"),
            (6, "radiotap present word"),
            (12, "flags field"),
            (15, "channel field"),
        ];
        for (cut, field) in cases {
            match RadiotapHeader::parse(&CAPTURE[..cut]) {
                Err(Error::Truncated(name)) => assert_eq!(name, field),
                other => panic!("expected Truncated({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_unsupported_leading_field_skips_optionals() {
        // TSFT bit set: the 8-byte timestamp would sit in front of the flags
        // byte, so nothing after the present word can be located.
        let bytes = [
            0x00, 0x00, 0x20, 0x00, // length 32
            0x2f, 0x00, 0x00, 0x00, // TSFT + flags + rate + channel + signal
            0xff, 0xff, 0xff, 0xff, // would-be timestamp...
        ];
        let header = RadiotapHeader::parse(&bytes).unwrap();

        assert_eq!(header.length, 32);
        assert_eq!(header.flags, None);
        assert_eq!(header.data_rate, None);
    }

    #[test]
    fn test_tx_header_build() {
        let bytes = TxHeaderTemplate::default().build(0x04, 2437, 0x00a0).unwrap();

        assert_eq!(bytes.len(), TX_HEADER_LEN as usize);
        // declared length
        assert_eq!(&bytes[2..4], &[0x12, 0x00]);
        // template present word
        assert_eq!(&bytes[4..8], &[0x2e, 0x48, 0x00, 0x00]);
        // captured rate and channel
        assert_eq!(bytes[8], 0x04);
        assert_eq!(&bytes[9..11], &[0x85, 0x09]);
        assert_eq!(&bytes[11..13], &[0xa0, 0x00]);
        // fixed tail
        assert_eq!(&bytes[13..15], &[0x00, 0xd9]);
        assert_eq!(&bytes[15..18], &[0x00, 0x00, 0x00]);
    }
}
