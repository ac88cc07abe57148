use std::fmt;

use crate::error::Error;

/// One tagged parameter (information element) from the variable body of a
/// management frame: a one-byte id, a one-byte payload length, and the
/// payload itself.
///
/// The `length` field must always equal `data.len()`. Build elements through
/// [InformationElement::new] to keep that invariant; `encode` re-checks it
/// and refuses to serialize an element that violates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InformationElement {
    pub id: u8,
    pub length: u8,
    pub data: Vec<u8>,
}

impl InformationElement {
    pub fn new(id: u8, data: Vec<u8>) -> Self {
        InformationElement {
            id,
            length: data.len() as u8,
            data,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        if self.data.len() != self.length as usize {
            return Err(Error::LengthMismatch {
                id: self.id,
                declared: self.length,
                actual: self.data.len(),
            });
        }

        let mut bytes = Vec::with_capacity(2 + self.data.len());
        bytes.push(self.id);
        bytes.push(self.length);
        bytes.extend_from_slice(&self.data);

        Ok(bytes)
    }
}

impl fmt::Display for InformationElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "id: {} length: {} data: {:02x?}", self.id, self.length, self.data)
    }
}

/// The ordered chain of information elements in a management frame body.
///
/// Well-formed captures carry elements in ascending id order, but the order
/// is taken from the wire as-is and never validated; re-encoding preserves
/// it byte for byte.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementChain {
    pub elements: Vec<InformationElement>,
}

impl ElementChain {
    pub fn encode(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = Vec::new();
        for element in &self.elements {
            bytes.extend(element.encode()?);
        }
        Ok(bytes)
    }

    /// Insert an element at `index`, shifting everything behind it.
    pub fn insert(&mut self, index: usize, element: InformationElement) {
        self.elements.insert(index, element);
    }

    /// Stable sort by ascending id; elements sharing an id keep their
    /// relative order. Utility only, the capture/replay path relies on wire
    /// order instead.
    pub fn sort_by_id(&mut self) {
        self.elements.sort_by_key(|element| element.id);
    }

    /// The first element with the given id, if any.
    pub fn get(&self, id: u8) -> Option<&InformationElement> {
        self.elements.iter().find(|element| element.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InformationElement> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl fmt::Display for ElementChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "element count: {}", self.elements.len())?;
        for element in &self.elements {
            writeln!(f, "  {element}")?;
        }
        Ok(())
    }
}
