use nom::bytes::complete::take;
use nom::number::complete::u8 as get_u8;
use nom::sequence::tuple;
use nom::IResult;

use crate::frame::components::{ElementChain, InformationElement};

/// Parse a single information element:
///
/// 1 byte: element id
/// 1 byte: element length (up to 255 bytes)
/// $element_length bytes: element data
///
/// Fails when fewer than `2 + length` bytes remain.
pub fn parse_element(input: &[u8]) -> IResult<&[u8], InformationElement> {
    let (input, (id, length)) = tuple((get_u8, get_u8))(input)?;
    let (input, data) = take(length)(input)?;

    Ok((
        input,
        InformationElement {
            id,
            length,
            data: data.to_vec(),
        },
    ))
}

/// Parse the element chain that makes up the rest of a management frame
/// body. Elements are decoded while at least two bytes remain; the first
/// short element ends the chain instead of failing it, so trailing padding
/// or a frame check sequence the capture may have kept is dropped silently.
pub fn parse_element_chain(mut input: &[u8]) -> ElementChain {
    let mut elements = Vec::new();

    while input.len() >= 2 {
        match parse_element(input) {
            Ok((remaining, element)) => {
                elements.push(element);
                input = remaining;
            }
            Err(_) => {
                log::trace!(
                    "element chain: stopped with {} undecodable trailing bytes",
                    input.len()
                );
                break;
            }
        }
    }

    ElementChain { elements }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_element() {
        let bytes = [3, 1, 6, 99];
        let (remaining, element) = parse_element(&bytes).unwrap();
        assert_eq!(element.id, 3);
        assert_eq!(element.length, 1);
        assert_eq!(element.data, vec![6]);
        assert_eq!(remaining, &[99]);
    }

    #[test]
    fn test_parse_element_truncated_payload() {
        // Declares 4 payload bytes, carries 1.
        assert!(parse_element(&[3, 4, 6]).is_err());
    }

    #[test]
    fn test_chain_stops_at_truncated_element() {
        // One valid element, then an element header whose payload is missing.
        let bytes = [3, 1, 6, 0, 1];
        let chain = parse_element_chain(&bytes);

        assert_eq!(chain.len(), 1);
        assert_eq!(chain.elements[0].id, 3);
        assert_eq!(chain.elements[0].data, vec![6]);
    }

    #[test]
    fn test_chain_ignores_single_trailing_byte() {
        let bytes = [0, 0, 7];
        let chain = parse_element_chain(&bytes);

        // The zero-length SSID element decodes; the lone trailing byte can't
        // even form an element header.
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.elements[0].id, 0);
        assert!(chain.elements[0].data.is_empty());
    }
}
