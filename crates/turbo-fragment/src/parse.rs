//! Markup to [`ProductDescriptor`].
//!
//! Fragments are server-rendered HTML, not XML: void elements are left open,
//! attributes may be unquoted and end tags may be missing. The reader runs in
//! its lenient mode and the scan only looks at the elements named by
//! [`FragmentMarkup`].
//!
//! Two things an XML reader refuses are rewritten first: a bare `&` is escaped,
//! and `<script>`/`<style>` elements are dropped along with their raw text.

use crate::error::FragmentError;
use crate::markup::FragmentMarkup;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, warn};
use turbo_variants::{
    MediaAsset, MediaKind, OptionKind, ProductDescriptor, SubmitControl, VariantOption,
};

/// Elements whose content is raw text rather than markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Parse a product fragment into a validated descriptor.
pub fn parse_fragment(
    html: &str,
    markup: &FragmentMarkup,
) -> Result<ProductDescriptor, FragmentError> {
    let html = prepare_markup(html);
    let mut reader = Reader::from_str(&html);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut scan = Scan::new(markup);
    loop {
        match reader.read_event()? {
            Event::Start(e) => scan.open(Element::from_start(&e), false),
            Event::Empty(e) => scan.open(Element::from_start(&e), true),
            Event::Text(t) => scan.text(&decode_entities(&String::from_utf8_lossy(&t))),
            Event::CData(t) => scan.text(&String::from_utf8_lossy(&t)),
            Event::GeneralRef(r) => scan.text(&resolve_entity(&String::from_utf8_lossy(&r))),
            Event::End(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                scan.close(&name);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    scan.finish()
}

/// One start tag with lowercased names and decoded attribute values.
struct Element {
    name: String,
    attrs: HashMap<String, String>,
}

impl Element {
    fn from_start(e: &BytesStart) -> Self {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();

        let mut attrs = HashMap::new();
        for attr in e.html_attributes().flatten() {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
            let value = decode_entities(&String::from_utf8_lossy(&attr.value));
            // First occurrence wins, as in browsers.
            attrs.entry(key).or_insert(value);
        }

        Self { name, attrs }
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Attribute value, trimmed, if present and non-empty.
    fn non_empty_attr(&self, name: &str) -> Option<&str> {
        self.attr(name).map(str::trim).filter(|v| !v.is_empty())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name.as_str())
    }
}

/// A chip whose value comes from its text, waiting for its end tag.
struct PendingChip {
    kind: OptionKind,
    tag: String,
    value: Option<String>,
    text: String,
    selected: bool,
    available: bool,
}

struct Scan<'m> {
    markup: &'m FragmentMarkup,
    sizes: Vec<VariantOption>,
    colors: Vec<VariantOption>,
    media: Vec<MediaAsset>,
    active_media: Option<usize>,
    hidden: HashMap<OptionKind, String>,
    submit: SubmitControl,
    has_viewer: bool,
    pending: Option<PendingChip>,
}

impl<'m> Scan<'m> {
    fn new(markup: &'m FragmentMarkup) -> Self {
        Self {
            markup,
            sizes: Vec::new(),
            colors: Vec::new(),
            media: Vec::new(),
            active_media: None,
            hidden: HashMap::new(),
            submit: SubmitControl::default(),
            has_viewer: false,
            pending: None,
        }
    }

    fn open(&mut self, el: Element, self_closing: bool) {
        if el.has_class(&self.markup.thumbnail_class) {
            self.thumbnail(&el);
        }

        if let Some(kind) = self.chip_kind(&el) {
            self.flush_chip();
            let chip = self.chip(kind, &el);
            if chip.value.is_some() || self_closing || el.is_void() {
                self.push_chip(chip);
            } else {
                self.pending = Some(chip);
            }
        }

        if el.name == "input" {
            self.hidden_input(&el);
        }

        if el.attr("id") == Some(self.markup.viewer_id.as_str()) {
            self.has_viewer = true;
        }
        if el.has_class(&self.markup.submit_class) {
            self.submit.present = true;
        }
        if el.has_class(&self.markup.buy_now_class) {
            self.submit.buy_now = true;
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(chip) = &mut self.pending {
            chip.text.push_str(text);
        }
    }

    fn close(&mut self, name: &str) {
        if self.pending.as_ref().map(|c| c.tag == name).unwrap_or(false) {
            self.flush_chip();
        }
    }

    fn chip_kind(&self, el: &Element) -> Option<OptionKind> {
        if el.has_class(&self.markup.size_chip_class) {
            Some(OptionKind::Size)
        } else if el.has_class(&self.markup.color_chip_class) {
            Some(OptionKind::Color)
        } else {
            None
        }
    }

    fn chip(&self, kind: OptionKind, el: &Element) -> PendingChip {
        let markup = self.markup;
        let value = el
            .non_empty_attr(&markup.chip_value_attr)
            .or_else(|| el.non_empty_attr("value"))
            .map(str::to_string);

        let selected = el.has_class(&markup.selected_class)
            || el.has_attr("checked")
            || el.has_attr("selected");

        let marked_unavailable = el.has_class(&markup.unavailable_class)
            || el.has_attr("disabled")
            || el
                .attr(&markup.available_attr)
                .map(|v| v.trim().eq_ignore_ascii_case("false"))
                .unwrap_or(false);

        PendingChip {
            kind,
            tag: el.name.clone(),
            value,
            text: String::new(),
            selected,
            available: !marked_unavailable,
        }
    }

    fn flush_chip(&mut self) {
        if let Some(chip) = self.pending.take() {
            self.push_chip(chip);
        }
    }

    fn push_chip(&mut self, chip: PendingChip) {
        let value = chip
            .value
            .unwrap_or_else(|| chip.text.split_whitespace().collect::<Vec<_>>().join(" "));

        let mut option = VariantOption::new(chip.kind, value);
        option.is_available = chip.available;
        option.preselected = chip.selected;

        match chip.kind {
            OptionKind::Size => self.sizes.push(option),
            OptionKind::Color => self.colors.push(option),
        }
    }

    fn thumbnail(&mut self, el: &Element) {
        let markup = self.markup;
        let Some(src) = el.non_empty_attr(&markup.media_src_attr) else {
            debug!(attr = %markup.media_src_attr, "thumbnail without media source skipped");
            return;
        };

        let asset = MediaAsset {
            kind: MediaKind::parse_lenient(el.attr(&markup.media_type_attr).unwrap_or("")),
            source_url: src.to_string(),
            poster_url: el.non_empty_attr(&markup.media_poster_attr).map(str::to_string),
            associated_color: el.non_empty_attr(&markup.media_color_attr).map(str::to_string),
        };

        if self.active_media.is_none() && el.has_class(&markup.active_class) {
            self.active_media = Some(self.media.len());
        }
        self.media.push(asset);
    }

    fn hidden_input(&mut self, el: &Element) {
        let kind = match el.attr("name") {
            Some(name) if name == self.markup.hidden_size_name => OptionKind::Size,
            Some(name) if name == self.markup.hidden_color_name => OptionKind::Color,
            _ => return,
        };
        if let Some(value) = el.non_empty_attr("value") {
            self.hidden.insert(kind, value.to_string());
        }
    }

    fn finish(mut self) -> Result<ProductDescriptor, FragmentError> {
        self.flush_chip();

        for (kind, value) in &self.hidden {
            let options = match kind {
                OptionKind::Size => &mut self.sizes,
                OptionKind::Color => &mut self.colors,
            };
            if options.iter().any(|o| o.preselected) {
                continue;
            }
            match options.iter_mut().find(|o| o.value == *value) {
                Some(option) => option.preselected = true,
                None => {
                    debug!(kind = kind.as_str(), value = %value, "hidden value matches no chip")
                }
            }
        }

        if !self.media.is_empty() && !self.has_viewer {
            warn!(viewer_id = %self.markup.viewer_id, "fragment has media but no viewer slot");
        }

        let mut descriptor = ProductDescriptor::new(self.sizes, self.colors, self.media)?
            .with_submit(self.submit);
        if let Some(index) = self.active_media {
            descriptor = descriptor.with_initial_media(index);
        }

        debug!(
            sizes = descriptor.sizes().len(),
            colors = descriptor.colors().len(),
            media = descriptor.media().len(),
            submit = descriptor.submit().present,
            "fragment parsed"
        );

        Ok(descriptor)
    }
}

/// Rewrite `html` into something the XML reader tokenizes the way a browser would.
fn prepare_markup(html: &str) -> Cow<'_, str> {
    if !html.contains('&') && raw_text_start(html).is_none() {
        return Cow::Borrowed(html);
    }

    let mut out = String::with_capacity(html.len() + 16);
    let mut rest = html;
    while let Some(pos) = rest.find(|c: char| c == '&' || c == '<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        if tail.starts_with('&') {
            if starts_with_reference(&tail[1..]) {
                out.push('&');
            } else {
                out.push_str("&amp;");
            }
            rest = &tail[1..];
        } else if tail.starts_with("<!--") {
            let end = tail.find("-->").map(|i| i + 3).unwrap_or(tail.len());
            out.push_str(&tail[..end]);
            rest = &tail[end..];
        } else if let Some(name) = raw_text_name(tail) {
            let skipped = raw_text_len(tail, name);
            debug!(element = name, bytes = skipped, "raw text element dropped");
            rest = &tail[skipped..];
        } else {
            out.push('<');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    Cow::Owned(out)
}

/// Byte offset of the first `<script` or `<style` start tag.
fn raw_text_start(html: &str) -> Option<usize> {
    html.match_indices('<')
        .find(|(i, _)| raw_text_name(&html[*i..]).is_some())
        .map(|(i, _)| i)
}

/// Name of the raw text element whose start tag begins `tail`.
fn raw_text_name(tail: &str) -> Option<&'static str> {
    let bytes = tail.as_bytes();
    RAW_TEXT_ELEMENTS.iter().copied().find(|name| {
        let end = 1 + name.len();
        bytes.len() > end
            && bytes[1..end].eq_ignore_ascii_case(name.as_bytes())
            && matches!(bytes[end], b'>' | b'/' | b' ' | b'\t' | b'\n' | b'\r')
    })
}

/// Length of the element starting at `tail`, through its end tag (or the
/// rest of the input when it is never closed).
fn raw_text_len(tail: &str, name: &str) -> usize {
    let lower = tail.to_ascii_lowercase();
    let Some(open_end) = lower.find('>').map(|i| i + 1) else {
        return tail.len();
    };
    if lower[..open_end].ends_with("/>") {
        return open_end;
    }

    let close = format!("</{}", name);
    match lower[open_end..].find(&close) {
        Some(at) => {
            let after = open_end + at + close.len();
            lower[after..]
                .find('>')
                .map(|i| after + i + 1)
                .unwrap_or(tail.len())
        }
        None => tail.len(),
    }
}

/// Whether `s` (the text after a `&`) starts a complete entity or character
/// reference.
fn starts_with_reference(s: &str) -> bool {
    fn terminated(body: &[u8], valid: impl Fn(&u8) -> bool) -> bool {
        let len = body.iter().take_while(|b| valid(*b)).count();
        len > 0 && len <= 32 && body.get(len) == Some(&b';')
    }

    match s.as_bytes() {
        [b'#', b'x' | b'X', rest @ ..] => terminated(rest, u8::is_ascii_hexdigit),
        [b'#', rest @ ..] => terminated(rest, u8::is_ascii_digit),
        bytes @ [first, ..] if first.is_ascii_alphabetic() => {
            terminated(bytes, u8::is_ascii_alphanumeric)
        }
        _ => false,
    }
}

/// Resolve a character or entity reference name (`amp`, `#39`, `#x27`).
fn resolve_entity(name: &str) -> String {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => name.strip_prefix('#').and_then(|num| {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };

    match resolved {
        Some(c) => c.to_string(),
        None => format!("&{};", name),
    }
}

/// Decode entity references left inside a text or attribute value.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start + 1..];
        match tail.find(';') {
            Some(end) if end > 0 && end <= 10 => {
                out.push_str(&resolve_entity(&tail[..end]));
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('&');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
