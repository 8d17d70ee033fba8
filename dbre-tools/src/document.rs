use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use crate::{DbreError, Result};

/// An owned xml element tree. Only elements, text, comments and CDATA sections are kept;
/// the xml declaration is always written back as UTF-8, standalone="no".
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Document {
    prolog: Vec<Node>,
    root: Element,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    CData(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Element {
            name: name.to_string(),
            attributes: vec![],
            children: vec![],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overwrites the attribute in place, or appends it when the element does not have it yet.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => {
                v.clear();
                v.push_str(value);
            }
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(k, _)| k != name);
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter_map(move |n| match n {
            Node::Element(e) if e.name == name => Some(e),
            _ => None,
        })
    }

    pub fn find_child_mut(&mut self, name: &str, predicate: impl Fn(&Element) -> bool) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) if e.name == name && predicate(e) => Some(e),
            _ => None,
        })
    }

    /// Returns the first child element matching the predicate, appending a new empty element when there is none.
    pub fn find_or_append_child(&mut self, name: &str, predicate: impl Fn(&Element) -> bool) -> &mut Element {
        let position = self.children.iter().position(|n| matches!(n, Node::Element(e) if e.name == name && predicate(e)));

        let position = match position {
            Some(p) => p,
            None => {
                self.children.push(Node::Element(Element::new(name)));
                self.children.len() - 1
            }
        };

        match &mut self.children[position] {
            Node::Element(e) => e,
            _ => unreachable!("position always points at an element"),
        }
    }

    /// Removes the child elements with the given name that match the predicate, returning how many were removed.
    pub fn remove_children(&mut self, name: &str, predicate: impl Fn(&Element) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|n| !matches!(n, Node::Element(e) if e.name == name && predicate(e)));
        before - self.children.len()
    }

    fn strip_whitespace_text(&mut self) {
        self.children.retain(|n| !matches!(n, Node::Text(t) if t.trim().is_empty()));

        for child in &mut self.children {
            if let Node::Element(e) = child {
                e.strip_whitespace_text();
            }
        }
    }
}

impl Document {
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn parse(xml: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);

        let mut prolog = vec![];
        let mut root = None;
        let mut stack: Vec<Element> = vec![];

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(element_from_start(&e)?),
                Event::Empty(e) => {
                    let element = element_from_start(&e)?;
                    close_element(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| DbreError::InvalidDocument("closing tag without a matching opening tag".to_string()))?;
                    close_element(&mut stack, &mut root, element)?;
                }
                Event::Text(e) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = e.unescape().map_err(quick_xml::Error::from)?;
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
                Event::CData(e) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::CData(utf8(&e.into_inner())?));
                    }
                }
                Event::Comment(e) => {
                    let comment = Node::Comment(utf8(&e.into_inner())?);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(comment),
                        None if root.is_none() => prolog.push(comment),
                        None => {}
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(DbreError::InvalidDocument(format!("element <{}> is never closed", open.name)));
        }

        let root = root.ok_or_else(|| DbreError::InvalidDocument("document has no root element".to_string()))?;

        Ok(Document { prolog, root })
    }

    /// Drops text nodes that only contain whitespace. The writer indents the output itself.
    pub fn normalize_whitespace(&mut self) {
        self.root.strip_whitespace_text();
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;

        for node in &self.prolog {
            write_node(&mut writer, node)?;
        }

        write_element(&mut writer, &self.root)?;

        let mut xml = String::from_utf8(writer.into_inner()).map_err(|e| DbreError::InvalidDocument(e.to_string()))?;
        xml.push('\n');

        Ok(xml)
    }
}

fn utf8(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| DbreError::InvalidDocument(e.to_string()))
}

fn element_from_start(start: &BytesStart) -> Result<Element> {
    let mut element = Element::new(&utf8(start.name().as_ref())?);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = utf8(attribute.key.as_ref())?;
        let value = attribute.unescape_value().map_err(quick_xml::Error::from)?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn close_element(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(DbreError::InvalidDocument(format!("second root element <{}>", element.name))),
    }

    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result {
    match node {
        Node::Element(e) => write_element(writer, e)?,
        Node::Text(t) => writer.write_event(Event::Text(BytesText::new(t)))?,
        Node::Comment(c) => writer.write_event(Event::Comment(BytesText::from_escaped(c.as_str())))?,
        Node::CData(c) => writer.write_event(Event::CData(BytesCData::new(c.as_str())))?,
    }

    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    for child in &element.children {
        write_node(writer, child)?;
    }

    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;

    Ok(())
}
