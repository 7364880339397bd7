// XML normalization: element tree plus the three feed shapes
use quick_xml::escape::unescape;
use quick_xml::events::Event as XmlEvent;
use quick_xml::reader::Reader;
use tracing::debug;

use crate::error::FeedError;
use crate::models::{Event, Show, TheatreArea};

// Navigable element tree built from a feed document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    // Parses a whole document. The returned element is an unnamed document
    // node whose children are the top-level elements.
    pub fn parse(xml: &str) -> Result<XmlElement, FeedError> {
        let mut reader = Reader::from_str(xml);
        let mut stack = vec![XmlElement::default()];

        loop {
            match reader.read_event() {
                Ok(XmlEvent::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    stack.push(XmlElement::named(name));
                }
                Ok(XmlEvent::Empty(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlElement::named(name));
                    }
                }
                Ok(XmlEvent::End(_)) => {
                    let mut element = stack.pop().ok_or_else(|| {
                        FeedError::XmlParseError("unbalanced end tag".to_string())
                    })?;
                    element.text = element.text.trim().to_string();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => {
                            return Err(FeedError::XmlParseError(
                                "unbalanced end tag".to_string(),
                            ))
                        }
                    }
                }
                Ok(XmlEvent::Text(t)) => {
                    let raw = String::from_utf8_lossy(&t);
                    push_unescaped(&mut stack, &raw)?;
                }
                Ok(XmlEvent::GeneralRef(r)) => {
                    let raw = format!("&{};", String::from_utf8_lossy(&r));
                    push_unescaped(&mut stack, &raw)?;
                }
                Ok(XmlEvent::CData(c)) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&c));
                    }
                }
                Ok(XmlEvent::Eof) => break,
                Err(e) => {
                    return Err(FeedError::XmlParseError(format!(
                        "error at position {}: {}",
                        reader.error_position(),
                        e
                    )))
                }
                _ => (), // declarations, comments, processing instructions
            }
        }

        if stack.len() != 1 {
            return Err(FeedError::XmlParseError(format!(
                "unexpected end of document, {} element(s) left open",
                stack.len() - 1
            )));
        }
        let mut document = stack.pop().unwrap_or_default();
        document.text = document.text.trim().to_string();
        Ok(document)
    }

    // All descendants with the given tag, in document order
    pub fn elements_by_tag<'a>(&'a self, tag: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect_by_tag(tag, &mut found);
        found
    }

    fn collect_by_tag<'a>(&'a self, tag: &str, found: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.name == tag {
                found.push(child);
            }
            child.collect_by_tag(tag, found);
        }
    }

    pub fn first_by_tag(&self, tag: &str) -> Option<&XmlElement> {
        for child in &self.children {
            if child.name == tag {
                return Some(child);
            }
            if let Some(found) = child.first_by_tag(tag) {
                return Some(found);
            }
        }
        None
    }

    // Text of the first matching descendant
    pub fn first_text(&self, tag: &str) -> Option<&str> {
        self.first_by_tag(tag).map(|element| element.text.as_str())
    }

    pub fn required_text(&self, tag: &str) -> Result<String, FeedError> {
        self.first_text(tag)
            .map(str::to_string)
            .ok_or_else(|| FeedError::MissingRequiredField {
                element: self.name.clone(),
                field: tag.to_string(),
            })
    }

    pub fn optional_text(&self, tag: &str) -> String {
        self.first_text(tag).unwrap_or_default().to_string()
    }
}

fn push_unescaped(stack: &mut [XmlElement], raw: &str) -> Result<(), FeedError> {
    let text = unescape(raw).map_err(|e| FeedError::XmlParseError(e.to_string()))?;
    if let Some(current) = stack.last_mut() {
        current.text.push_str(&text);
    }
    Ok(())
}

// TheatreAreas feed: <TheatreArea><ID/><Name/></TheatreArea>
pub fn parse_theatre_areas(xml: &str) -> Result<Vec<TheatreArea>, FeedError> {
    let document = XmlElement::parse(xml)?;
    let areas = document
        .elements_by_tag("TheatreArea")
        .into_iter()
        .map(|area| {
            Ok(TheatreArea {
                id: area.required_text("ID")?,
                name: area.required_text("Name")?,
            })
        })
        .collect::<Result<Vec<_>, FeedError>>()?;
    debug!(count = areas.len(), "normalized theatre areas");
    Ok(areas)
}

// Events feed: <Event><ID/><ShortSynopsis/></Event>
pub fn parse_events(xml: &str) -> Result<Vec<Event>, FeedError> {
    let document = XmlElement::parse(xml)?;
    let events = document
        .elements_by_tag("Event")
        .into_iter()
        .map(|event| {
            Ok(Event {
                id: event.required_text("ID")?,
                synopsis: event.optional_text("ShortSynopsis"),
            })
        })
        .collect::<Result<Vec<_>, FeedError>>()?;
    debug!(count = events.len(), "normalized events");
    Ok(events)
}

// Schedule feed: <Schedule><Shows><Show>...</Show></Shows></Schedule>
pub fn parse_schedule(xml: &str) -> Result<Vec<Show>, FeedError> {
    let document = XmlElement::parse(xml)?;
    let shows = document
        .elements_by_tag("Show")
        .into_iter()
        .map(|show| {
            Ok(Show {
                id: show.required_text("ID")?,
                event_id: show.required_text("EventID")?,
                title: show.required_text("Title")?,
                theatre: show.required_text("Theatre")?,
                date_time: show.required_text("dtAccounting")?,
                start_time: show.required_text("dttmShowStart")?,
                genres: show.optional_text("Genres"),
                length_minutes: show.required_text("LengthInMinutes")?,
                image_url: show.optional_text("EventMediumImagePortrait"),
            })
        })
        .collect::<Result<Vec<_>, FeedError>>()?;
    debug!(count = shows.len(), "normalized schedule");
    Ok(shows)
}

// Sample feed documents stored in the samples directory
pub const SAMPLE_AREAS_PATH: &str = "samples/theatre_areas.xml";
pub const SAMPLE_EVENTS_PATH: &str = "samples/events.xml";
pub const SAMPLE_SCHEDULE_PATH: &str = "samples/schedule.xml";
