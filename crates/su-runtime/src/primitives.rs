//! Typed views over the resolved props of each primitive.
//!
//! Views read only the keys they know; everything else in the prop map is
//! ignored. Defaults follow the primitives' documented defaults.

use su_core::{PropMap, SuValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    FlexStart,
    FlexEnd,
    Center,
    #[default]
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
    Lighter,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerProps {
    pub flex_direction: FlexDirection,
    pub gap: f64,
    pub padding: f64,
    pub align_items: Align,
    pub background: Option<Rgb>,
}

impl ContainerProps {
    pub fn from_props(props: &PropMap) -> Self {
        Self {
            flex_direction: match text(props, "flexDirection").as_deref() {
                Some("row") => FlexDirection::Row,
                _ => FlexDirection::Column,
            },
            gap: length(props.get("gap")),
            padding: length(props.get("padding")),
            align_items: match text(props, "alignItems").as_deref() {
                Some("flex-start") => Align::FlexStart,
                Some("flex-end") => Align::FlexEnd,
                Some("center") => Align::Center,
                _ => Align::Stretch,
            },
            background: style_color(props, "backgroundColor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextProps {
    pub content: Option<String>,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub color: Rgb,
    pub strike_through: bool,
    pub dimmed: bool,
}

impl TextProps {
    pub fn from_props(props: &PropMap) -> Self {
        let color = text(props, "color")
            .and_then(|raw| parse_hex_color(&raw))
            .or_else(|| style_color(props, "color"))
            .unwrap_or(Rgb(0, 0, 0));
        Self {
            content: props
                .get("content")
                .filter(|value| value.is_truthy())
                .map(SuValue::to_text),
            font_size: props
                .get("fontSize")
                .map(|value| length(Some(value)))
                .filter(|size| *size > 0.0)
                .unwrap_or(16.0),
            font_weight: font_weight(props.get("fontWeight")),
            color,
            strike_through: style(props, "textDecoration")
                .is_some_and(|decoration| decoration.to_text().contains("line-through")),
            dimmed: style(props, "opacity")
                .and_then(SuValue::as_number)
                .is_some_and(|opacity| opacity < 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ButtonProps {
    pub label: Option<String>,
    pub disabled: bool,
    pub background: Rgb,
    pub color: Rgb,
}

impl ButtonProps {
    pub fn from_props(props: &PropMap) -> Self {
        Self {
            label: props
                .get("label")
                .filter(|value| value.is_truthy())
                .map(SuValue::to_text),
            disabled: props.get("disabled").is_some_and(SuValue::is_truthy),
            background: style_color(props, "backgroundColor").unwrap_or(Rgb(0x63, 0x66, 0xf1)),
            color: style_color(props, "color").unwrap_or(Rgb(0xff, 0xff, 0xff)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridProps {
    pub columns: usize,
    pub gap: f64,
}

impl GridProps {
    pub fn from_props(props: &PropMap) -> Self {
        let columns = props
            .get("columns")
            .and_then(SuValue::as_number)
            .filter(|columns| columns.is_finite() && *columns >= 1.0)
            .map(|columns| columns as usize)
            .unwrap_or(1);
        Self {
            columns,
            gap: length(props.get("gap")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputProps {
    pub value: String,
    pub placeholder: String,
}

impl InputProps {
    pub fn from_props(props: &PropMap) -> Self {
        Self {
            value: text(props, "value").unwrap_or_default(),
            placeholder: text(props, "placeholder").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListProps {
    pub items_key: String,
}

impl ListProps {
    pub fn from_props(props: &PropMap) -> Self {
        Self {
            items_key: text(props, "itemsKey")
                .filter(|key| !key.is_empty())
                .unwrap_or_else(|| "items".to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Parses `#rgb` and `#rrggbb` colors.
pub fn parse_hex_color(raw: &str) -> Option<Rgb> {
    let hex = raw.trim().strip_prefix('#')?;
    let digits: Vec<u8> = hex
        .chars()
        .map(|ch| ch.to_digit(16).map(|digit| digit as u8))
        .collect::<Option<_>>()?;
    match digits.as_slice() {
        [r, g, b] => Some(Rgb(r * 17, g * 17, b * 17)),
        [r1, r2, g1, g2, b1, b2] => Some(Rgb(r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2)),
        _ => None,
    }
}

fn text(props: &PropMap, name: &str) -> Option<String> {
    props
        .get(name)
        .filter(|value| !value.is_null())
        .map(SuValue::to_text)
}

fn style<'a>(props: &'a PropMap, name: &str) -> Option<&'a SuValue> {
    props.get("style")?.as_map()?.get(name)
}

fn style_color(props: &PropMap, name: &str) -> Option<Rgb> {
    style(props, name)
        .and_then(SuValue::as_str)
        .and_then(parse_hex_color)
}

/// Numbers are pixels; strings like `"12px"` contribute their leading number.
fn length(value: Option<&SuValue>) -> f64 {
    match value {
        Some(SuValue::Number(number)) if number.is_finite() => *number,
        Some(SuValue::String(raw)) => {
            let numeric: String = raw
                .trim()
                .chars()
                .take_while(|ch| ch.is_ascii_digit() || *ch == '.')
                .collect();
            numeric.parse().unwrap_or(0.0)
        }
        _ => 0.0,
    }
}

fn font_weight(value: Option<&SuValue>) -> FontWeight {
    match value {
        Some(SuValue::Number(weight)) if *weight >= 600.0 => FontWeight::Bold,
        Some(SuValue::Number(weight)) if *weight < 400.0 => FontWeight::Lighter,
        Some(SuValue::String(raw)) => match raw.as_str() {
            "bold" | "bolder" => FontWeight::Bold,
            "lighter" => FontWeight::Lighter,
            other => match other.parse::<f64>() {
                Ok(weight) => font_weight(Some(&SuValue::Number(weight))),
                Err(_) => FontWeight::Normal,
            },
        },
        _ => FontWeight::Normal,
    }
}
