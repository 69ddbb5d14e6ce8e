//! Streaming reader for the RS3 subset this crate consumes.
//!
//! Only four element paths below the document element are recognised:
//!
//! - `header/relations/rel`
//! - `body/segment`
//! - `body/group`
//! - `body/signals/signal`
//!
//! Everything else (`sigtypes`, `secedges`, unknown markup) is skipped. The
//! reader produces flat records; tree construction happens in [`crate::tree`].

use std::io::BufRead;

use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Result, Rs3Error};
use crate::NodeId;

const REL_PATH: &[&[u8]] = &[b"header", b"relations", b"rel"];
const SEGMENT_PATH: &[&[u8]] = &[b"body", b"segment"];
const GROUP_PATH: &[&[u8]] = &[b"body", b"group"];
const SIGNAL_PATH: &[&[u8]] = &[b"body", b"signals", b"signal"];

#[derive(Debug, Clone)]
pub(crate) struct RawRelation {
    pub name: String,
    pub kind: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct RawSegment {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub relname: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub(crate) struct RawGroup {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub relname: Option<String>,
    pub kind: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct RawSignal {
    pub source: NodeId,
    pub kind: Option<String>,
    pub subtype: Option<String>,
    pub tokens: Vec<usize>,
}

/// All records of one RS3 file, in source order.
#[derive(Debug, Default)]
pub(crate) struct RawDocument {
    pub relations: Vec<RawRelation>,
    pub segments: Vec<RawSegment>,
    pub groups: Vec<RawGroup>,
    pub signals: Vec<RawSignal>,
}

/// Segment whose start tag has been read but not its end tag.
struct OpenSegment {
    segment: RawSegment,
    /// Only text before the first child element belongs to the segment.
    text_closed: bool,
}

pub(crate) fn read_document<R: BufRead>(mut reader: Reader<R>) -> Result<RawDocument> {
    let mut document = RawDocument::default();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut open: Option<OpenSegment> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                if let Some(open) = open.as_mut() {
                    open.text_closed = true;
                }
                path.push(start.name().as_ref().to_vec());
                if at(&path, SEGMENT_PATH) {
                    open = Some(OpenSegment {
                        segment: read_segment(&start, reader.decoder())?,
                        text_closed: false,
                    });
                } else {
                    document.record(&path, &start, reader.decoder())?;
                }
            }
            Event::Empty(start) => {
                if let Some(open) = open.as_mut() {
                    open.text_closed = true;
                }
                path.push(start.name().as_ref().to_vec());
                if at(&path, SEGMENT_PATH) {
                    document.segments.push(read_segment(&start, reader.decoder())?);
                } else {
                    document.record(&path, &start, reader.decoder())?;
                }
                path.pop();
            }
            Event::Text(text) => {
                if let Some(open) = open.as_mut().filter(|o| !o.text_closed) {
                    open.segment.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(open) = open.as_mut().filter(|o| !o.text_closed) {
                    open.segment.text.push_str(&reader.decoder().decode(&data)?);
                }
            }
            Event::End(_) => {
                if at(&path, SEGMENT_PATH) {
                    if let Some(open) = open.take() {
                        document.segments.push(open.segment);
                    }
                }
                path.pop();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(document)
}

impl RawDocument {
    fn record(
        &mut self,
        path: &[Vec<u8>],
        start: &BytesStart<'_>,
        decoder: Decoder,
    ) -> Result<()> {
        if at(path, REL_PATH) {
            let name =
                attribute(start, decoder, "name")?.ok_or(Rs3Error::MissingAttribute {
                    element: "rel",
                    attribute: "name",
                })?;
            self.relations.push(RawRelation {
                name,
                kind: attribute(start, decoder, "type")?,
            });
        } else if at(path, GROUP_PATH) {
            self.groups.push(RawGroup {
                id: required_integer(start, decoder, "group", "id")?,
                parent: optional_integer(start, decoder, "group", "parent")?,
                relname: attribute(start, decoder, "relname")?,
                kind: attribute(start, decoder, "type")?,
            });
        } else if at(path, SIGNAL_PATH) {
            let tokens = match attribute(start, decoder, "tokens")? {
                Some(list) => parse_token_list(&list)?,
                None => Vec::new(),
            };
            self.signals.push(RawSignal {
                source: required_integer(start, decoder, "signal", "source")?,
                kind: attribute(start, decoder, "type")?,
                subtype: attribute(start, decoder, "subtype")?,
                tokens,
            });
        }
        Ok(())
    }
}

fn read_segment(start: &BytesStart<'_>, decoder: Decoder) -> Result<RawSegment> {
    Ok(RawSegment {
        id: required_integer(start, decoder, "segment", "id")?,
        parent: optional_integer(start, decoder, "segment", "parent")?,
        relname: attribute(start, decoder, "relname")?,
        text: String::new(),
    })
}

/// Parses a `tokens="1,2,3"` attribute value. An empty value is an empty list.
pub(crate) fn parse_token_list(value: &str) -> Result<Vec<usize>> {
    if value.is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|item| {
            item.trim()
                .parse::<usize>()
                .map_err(|_| Rs3Error::InvalidAttribute {
                    element: "signal",
                    attribute: "tokens",
                    value: value.to_string(),
                })
        })
        .collect()
}

fn at(path: &[Vec<u8>], expected: &[&[u8]]) -> bool {
    path.len() == expected.len() + 1
        && path[1..]
            .iter()
            .zip(expected)
            .all(|(actual, expected)| actual.as_slice() == *expected)
}

/// Attribute value decoded with the document's declared encoding, then
/// unescaped.
fn attribute(start: &BytesStart<'_>, decoder: Decoder, name: &str) -> Result<Option<String>> {
    let attr = start
        .try_get_attribute(name)
        .map_err(quick_xml::Error::from)?;
    match attr {
        Some(attr) => {
            let raw = decoder.decode(&attr.value)?;
            let value = unescape(&raw).map_err(quick_xml::Error::from)?;
            Ok(Some(value.into_owned()))
        }
        None => Ok(None),
    }
}

fn optional_integer(
    start: &BytesStart<'_>,
    decoder: Decoder,
    element: &'static str,
    name: &'static str,
) -> Result<Option<NodeId>> {
    attribute(start, decoder, name)?
        .map(|value| {
            value
                .trim()
                .parse::<NodeId>()
                .map_err(|_| Rs3Error::InvalidAttribute {
                    element,
                    attribute: name,
                    value,
                })
        })
        .transpose()
}

fn required_integer(
    start: &BytesStart<'_>,
    decoder: Decoder,
    element: &'static str,
    name: &'static str,
) -> Result<NodeId> {
    optional_integer(start, decoder, element, name)?.ok_or(Rs3Error::MissingAttribute {
        element,
        attribute: name,
    })
}
