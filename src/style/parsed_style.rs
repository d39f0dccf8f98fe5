use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyId {
    Position,
    Left,
    Top,
    Width,
    Height,
    OverflowX,
    OverflowY,
    TransitionProperty,
    TransitionDuration,
    Transform,
    Custom(SmolStr),
}

impl PropertyId {
    pub fn parse(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        match name.as_str() {
            "position" => Self::Position,
            "left" => Self::Left,
            "top" => Self::Top,
            "width" => Self::Width,
            "height" => Self::Height,
            "overflow-x" => Self::OverflowX,
            "overflow-y" => Self::OverflowY,
            "transition-property" => Self::TransitionProperty,
            "transition-duration" => Self::TransitionDuration,
            "transform" => Self::Transform,
            _ => Self::Custom(SmolStr::new(name)),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Position => "position",
            Self::Left => "left",
            Self::Top => "top",
            Self::Width => "width",
            Self::Height => "height",
            Self::OverflowX => "overflow-x",
            Self::OverflowY => "overflow-y",
            Self::TransitionProperty => "transition-property",
            Self::TransitionDuration => "transition-duration",
            Self::Transform => "transform",
            Self::Custom(name) => name.as_str(),
        }
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

impl Position {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "static" => Some(Self::Static),
            "relative" => Some(Self::Relative),
            "absolute" => Some(Self::Absolute),
            "fixed" => Some(Self::Fixed),
            "sticky" => Some(Self::Sticky),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Relative => "relative",
            Self::Absolute => "absolute",
            Self::Fixed => "fixed",
            Self::Sticky => "sticky",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overflow {
    Visible,
    Hidden,
    Scroll,
    Auto,
}

impl Overflow {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "scroll" => Some(Self::Scroll),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
            Self::Scroll => "scroll",
            Self::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

impl Length {
    pub const fn px(value: f64) -> Self {
        Self::Px(value)
    }

    pub const fn percent(value: f64) -> Self {
        Self::Percent(value)
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(number) = value.strip_suffix("px") {
            return number.trim().parse().ok().map(Self::Px);
        }
        if let Some(number) = value.strip_suffix('%') {
            return number.trim().parse().ok().map(Self::Percent);
        }
        match value.parse::<f64>() {
            Ok(number) if number == 0.0 => Some(Self::Px(0.0)),
            _ => None,
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(value) => write!(f, "{value}px"),
            Self::Percent(value) => write!(f, "{value}%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParsedValue {
    Position(Position),
    Overflow(Overflow),
    Length(Length),
    /// Comma separated property list, as used by `transition-property`.
    Properties(Vec<PropertyId>),
    Seconds(f64),
    Translate(f64, f64),
    Raw(SmolStr),
}

impl ParsedValue {
    /// Parses `raw` in the context of `property`. Values this crate does not
    /// interpret are kept verbatim.
    pub fn parse(property: &PropertyId, raw: &str) -> Self {
        let raw = raw.trim();
        let parsed = match property {
            PropertyId::Position => Position::parse(raw).map(Self::Position),
            PropertyId::OverflowX | PropertyId::OverflowY => {
                Overflow::parse(raw).map(Self::Overflow)
            }
            PropertyId::Left | PropertyId::Top | PropertyId::Width | PropertyId::Height => {
                Length::parse(raw).map(Self::Length)
            }
            PropertyId::TransitionProperty => Some(Self::Properties(
                raw.split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(PropertyId::parse)
                    .collect(),
            )),
            PropertyId::TransitionDuration => parse_seconds(raw).map(Self::Seconds),
            PropertyId::Transform => parse_translate(raw),
            PropertyId::Custom(_) => None,
        };
        parsed.unwrap_or_else(|| Self::Raw(SmolStr::new(raw)))
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(position) => f.write_str(position.as_str()),
            Self::Overflow(overflow) => f.write_str(overflow.as_str()),
            Self::Length(length) => write!(f, "{length}"),
            Self::Properties(properties) => {
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(property.name())?;
                }
                Ok(())
            }
            Self::Seconds(seconds) => write!(f, "{seconds}s"),
            Self::Translate(x, y) => write!(f, "translate({x}px,{y}px)"),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

fn parse_seconds(raw: &str) -> Option<f64> {
    if let Some(ms) = raw.strip_suffix("ms") {
        return ms.trim().parse::<f64>().ok().map(|ms| ms / 1000.0);
    }
    raw.strip_suffix('s')?.trim().parse().ok()
}

fn parse_translate(raw: &str) -> Option<ParsedValue> {
    let args = raw.strip_prefix("translate(")?.strip_suffix(')')?;
    let (x, y) = args.split_once(',')?;
    let x = x.trim().strip_suffix("px")?.parse().ok()?;
    let y = y.trim().strip_suffix("px")?.parse().ok()?;
    Some(ParsedValue::Translate(x, y))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: PropertyId,
    pub value: ParsedValue,
}

/// Inline style of one element. Declarations keep their insertion order so the
/// serialized css text is stable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    declarations: Vec<Declaration>,
    index: FxHashMap<PropertyId, usize>,
}

impl InlineStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_css_text(css_text: &str) -> Self {
        let mut style = Self::new();
        for chunk in css_text.split(';') {
            let Some((name, value)) = chunk.split_once(':') else {
                continue;
            };
            let property = PropertyId::parse(name);
            if property.name().is_empty() || value.trim().is_empty() {
                continue;
            }
            let value = ParsedValue::parse(&property, value);
            style.insert(property, value);
        }
        style
    }

    pub fn insert(&mut self, property: PropertyId, value: ParsedValue) {
        match self.index.get(&property).copied() {
            Some(i) => self.declarations[i].value = value,
            None => {
                self.index.insert(property.clone(), self.declarations.len());
                self.declarations.push(Declaration { property, value });
            }
        }
    }

    pub fn remove(&mut self, property: &PropertyId) -> Option<ParsedValue> {
        let i = self.index.remove(property)?;
        let removed = self.declarations.remove(i);
        for slot in self.index.values_mut() {
            if *slot > i {
                *slot -= 1;
            }
        }
        Some(removed.value)
    }

    /// `None` clears the declaration, the same way assigning an empty string
    /// to an inline style property does.
    pub fn set(&mut self, property: PropertyId, value: Option<ParsedValue>) {
        match value {
            Some(value) => self.insert(property, value),
            None => {
                self.remove(&property);
            }
        }
    }

    pub fn get(&self, property: &PropertyId) -> Option<&ParsedValue> {
        self.index
            .get(property)
            .and_then(|i| self.declarations.get(*i))
            .map(|decl| &decl.value)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn css_text(&self) -> String {
        self.declarations
            .iter()
            .map(|decl| format!("{}: {};", decl.property, decl.value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_text_keeps_declaration_order_and_replaces_in_place() {
        let mut style = InlineStyle::new();
        style.insert(PropertyId::Position, ParsedValue::Position(Position::Relative));
        style.insert(PropertyId::Height, ParsedValue::Length(Length::percent(100.0)));
        style.insert(PropertyId::Position, ParsedValue::Position(Position::Absolute));

        assert_eq!(style.css_text(), "position: absolute; height: 100%;");
    }

    #[test]
    fn parse_css_text_reads_typed_and_unknown_values() {
        let style = InlineStyle::parse_css_text(
            "position: relative; height: 1200px; color: red; transition-duration: 300ms; transform: translate(10px,-4px)",
        );

        assert_eq!(
            style.get(&PropertyId::Position),
            Some(&ParsedValue::Position(Position::Relative))
        );
        assert_eq!(
            style.get(&PropertyId::Height),
            Some(&ParsedValue::Length(Length::Px(1200.0)))
        );
        assert_eq!(
            style.get(&PropertyId::parse("color")),
            Some(&ParsedValue::Raw(SmolStr::new("red")))
        );
        assert_eq!(
            style.get(&PropertyId::Transform),
            Some(&ParsedValue::Translate(10.0, -4.0))
        );
        assert!(matches!(
            style.get(&PropertyId::TransitionDuration),
            Some(ParsedValue::Seconds(seconds)) if (seconds - 0.3).abs() < 1e-6
        ));
    }

    #[test]
    fn removing_a_declaration_keeps_the_index_consistent() {
        let mut style = InlineStyle::parse_css_text("left: 1px; top: 2px; width: 3px;");
        style.set(PropertyId::Left, None);
        style.set(PropertyId::Width, Some(ParsedValue::Length(Length::px(30.0))));

        assert_eq!(style.css_text(), "top: 2px; width: 30px;");
        assert_eq!(style.get(&PropertyId::Left), None);
    }

    #[test]
    fn transition_property_list_serializes_without_spaces() {
        let value = ParsedValue::Properties(vec![
            PropertyId::Transform,
            PropertyId::Width,
            PropertyId::Height,
        ]);
        assert_eq!(value.to_string(), "transform,width,height");
        assert_eq!(Length::percent(25.0).to_string(), "25%");
    }
}
