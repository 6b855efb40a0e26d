use std::fmt;

use bytes::Bytes;

/// One application-level input to the send path.
///
/// Sequence variants expand in place into one frame per element when a
/// message is flattened; scalar variants contribute exactly one frame.
/// Values outside this set are admitted through [`Part::display`], which
/// renders them to text first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// UTF-8 text, sent as its byte encoding.
    Text(String),
    /// Raw bytes, sent as-is.
    Bytes(Bytes),
    /// Ordered sequence of text parts.
    TextSeq(Vec<String>),
    /// Ordered sequence of raw byte parts.
    BytesSeq(Vec<Bytes>),
}

impl Part {
    /// Render any displayable scalar to a text part.
    pub fn display<T: fmt::Display>(value: T) -> Self {
        Part::Text(value.to_string())
    }

    fn flatten_into(self, units: &mut Vec<Bytes>) {
        match self {
            Part::Text(s) => units.push(Bytes::from(s)),
            Part::Bytes(b) => units.push(b),
            Part::TextSeq(seq) => units.extend(seq.into_iter().map(Bytes::from)),
            Part::BytesSeq(seq) => units.extend(seq),
        }
    }
}

/// Flatten parts into an ordered sequence of scalar send units.
///
/// Sequence parts expand in place, preserving order; an empty sequence at
/// any position contributes zero units. The result may be empty.
pub fn flatten<I>(parts: I) -> Vec<Bytes>
where
    I: IntoIterator<Item = Part>,
{
    let mut units = Vec::new();
    for part in parts {
        part.flatten_into(&mut units);
    }
    units
}

impl From<&str> for Part {
    fn from(value: &str) -> Self {
        Part::Text(value.to_owned())
    }
}

impl From<String> for Part {
    fn from(value: String) -> Self {
        Part::Text(value)
    }
}

impl From<Bytes> for Part {
    fn from(value: Bytes) -> Self {
        Part::Bytes(value)
    }
}

impl From<Vec<u8>> for Part {
    fn from(value: Vec<u8>) -> Self {
        Part::Bytes(Bytes::from(value))
    }
}

impl From<&[u8]> for Part {
    fn from(value: &[u8]) -> Self {
        Part::Bytes(Bytes::copy_from_slice(value))
    }
}

impl From<Vec<String>> for Part {
    fn from(value: Vec<String>) -> Self {
        Part::TextSeq(value)
    }
}

impl From<Vec<&str>> for Part {
    fn from(value: Vec<&str>) -> Self {
        Part::TextSeq(value.into_iter().map(str::to_owned).collect())
    }
}

impl From<Vec<Bytes>> for Part {
    fn from(value: Vec<Bytes>) -> Self {
        Part::BytesSeq(value)
    }
}

impl From<Vec<Vec<u8>>> for Part {
    fn from(value: Vec<Vec<u8>>) -> Self {
        Part::BytesSeq(value.into_iter().map(Bytes::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_parts_flatten_to_one_unit_each() {
        let units = flatten([Part::from("text"), Part::from(vec![0x01u8, 0x02])]);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].as_ref(), b"text");
        assert_eq!(units[1].as_ref(), &[0x01, 0x02]);
    }

    #[test]
    fn sequences_expand_in_place_preserving_order() {
        let units = flatten([
            Part::from("head"),
            Part::from(vec!["a", "b"]),
            Part::from("tail"),
        ]);

        let rendered: Vec<&[u8]> = units.iter().map(|u| u.as_ref()).collect();
        assert_eq!(
            rendered,
            vec![b"head".as_ref(), b"a".as_ref(), b"b".as_ref(), b"tail".as_ref()]
        );
    }

    #[test]
    fn empty_sequences_contribute_zero_units() {
        let units = flatten([
            Part::TextSeq(Vec::new()),
            Part::from("only"),
            Part::BytesSeq(Vec::new()),
        ]);
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].as_ref(), b"only");
    }

    #[test]
    fn trailing_empty_sequence_flattens_away() {
        let units = flatten([Part::from("x"), Part::TextSeq(Vec::new())]);
        assert_eq!(units.len(), 1);
    }

    #[test]
    fn no_parts_flatten_to_no_units() {
        let units = flatten(std::iter::empty::<Part>());
        assert!(units.is_empty());
    }

    #[test]
    fn display_renders_other_scalars_to_text() {
        assert_eq!(Part::display(42), Part::Text("42".to_owned()));
        assert_eq!(Part::display(2.5), Part::Text("2.5".to_owned()));
        assert_eq!(Part::display(true), Part::Text("true".to_owned()));
    }

    #[test]
    fn byte_sequence_round_trips_through_flatten() {
        let units = flatten([Part::from(vec![vec![0xFFu8], vec![0x00u8, 0x01]])]);
        assert_eq!(units.len(), 2);
        assert_eq!(units[0].as_ref(), &[0xFF]);
        assert_eq!(units[1].as_ref(), &[0x00, 0x01]);
    }
}
