//! Canonical textual encodings of typed property values.
//!
//! Property values are stored as text. These types parse that text and render
//! it back. Parsing is lenient: malformed components decode to zero and empty
//! text decodes to "unset" where the value kind has such a notion.

use std::fmt;

fn parse_int(s: &str) -> i32 {
    s.trim().parse().unwrap_or(0)
}

/// `x,y`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Empty text decodes to `None`, the toolkit default position.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let mut parts = text.splitn(2, ',');
        let x = parse_int(parts.next().unwrap_or_default());
        let y = parse_int(parts.next().unwrap_or_default());
        Some(Self { x, y })
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// `width,height`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn parse(text: &str) -> Option<Self> {
        Point::parse(text).map(|p| Self {
            width: p.x,
            height: p.y,
        })
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.width, self.height)
    }
}

/// Either an explicit `r,g,b` triple or a system colour constant such as
/// `wxSYS_COLOUR_WINDOW`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Colour {
    Rgb(u8, u8, u8),
    System(String),
}

impl Colour {
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if text.starts_with("wx") {
            return Some(Self::System(text.to_string()));
        }
        let mut channels = text
            .split(',')
            .map(|c| c.trim().parse::<u8>().unwrap_or(0));
        Some(Self::Rgb(
            channels.next().unwrap_or(0),
            channels.next().unwrap_or(0),
            channels.next().unwrap_or(0),
        ))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rgb(r, g, b) => write!(f, "{r},{g},{b}"),
            Self::System(name) => f.write_str(name),
        }
    }
}

/// `face,style,weight,size,family,underlined`
///
/// Style, weight and family are the toolkit's numeric codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub face: String,
    pub style: i32,
    pub weight: i32,
    pub point_size: i32,
    pub family: i32,
    pub underlined: bool,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            face: String::new(),
            style: 90,
            weight: 90,
            point_size: 9,
            family: 70,
            underlined: false,
        }
    }
}

impl Font {
    pub fn parse(text: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        let defaults = Self::default();
        let parts: Vec<&str> = text.split(',').collect();
        let int_at = |i: usize, fallback: i32| {
            parts
                .get(i)
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(fallback)
        };
        Some(Self {
            face: parts.first().map(|p| p.trim().to_string()).unwrap_or_default(),
            style: int_at(1, defaults.style),
            weight: int_at(2, defaults.weight),
            point_size: int_at(3, defaults.point_size),
            family: int_at(4, defaults.family),
            underlined: int_at(5, 0) != 0,
        })
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{},{}",
            self.face,
            self.style,
            self.weight,
            self.point_size,
            self.family,
            u8::from(self.underlined)
        )
    }
}

/// Where a bitmap is loaded from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BitmapSource {
    #[default]
    File,
    Resource,
    IconResource,
}

impl BitmapSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "Load From File",
            Self::Resource => "Load From Resource",
            Self::IconResource => "Load From Icon Resource",
        }
    }

    fn parse(text: &str) -> Self {
        match text.trim() {
            "Load From Resource" => Self::Resource,
            "Load From Icon Resource" => Self::IconResource,
            _ => Self::File,
        }
    }
}

/// `path; source`. The source part is optional and defaults to a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitmapRef {
    pub path: String,
    pub source: BitmapSource,
}

impl BitmapRef {
    pub fn parse(text: &str) -> Self {
        match text.split_once(';') {
            Some((path, source)) => Self {
                path: path.trim().to_string(),
                source: BitmapSource::parse(source),
            },
            None => Self {
                path: text.trim().to_string(),
                source: BitmapSource::File,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether the bitmap is an XPM file compiled into the program.
    pub fn is_xpm(&self) -> bool {
        self.source == BitmapSource::File && self.path.to_ascii_lowercase().ends_with(".xpm")
    }

    /// C identifier of the XPM array: base file name with the extension dot
    /// replaced by `_`.
    pub fn xpm_name(&self) -> String {
        let file = self
            .path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.path.as_str());
        match file.rfind('.') {
            Some(dot) => format!("{}_{}", &file[..dot], &file[dot + 1..]),
            None => file.to_string(),
        }
    }
}

impl fmt::Display for BitmapRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; {}", self.path, self.source.as_str())
    }
}

/// Decodes `"a" "b \"c\""` into its items.
pub fn parse_string_list(text: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '"' {
            continue;
        }
        let mut item = String::new();
        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        item.push(escaped);
                    }
                }
                '"' => break,
                other => item.push(other),
            }
        }
        items.push(item);
    }
    items
}

pub fn format_string_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| {
            let escaped = item.as_ref().replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{escaped}\"")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Comma separated integers. Tokens that are not integers are skipped.
pub fn parse_int_list(text: &str) -> Vec<i64> {
    text.split(',')
        .filter_map(|t| t.trim().parse().ok())
        .collect()
}

pub fn format_int_list(values: &[i64]) -> String {
    values
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// `0`, empty text and `false` are false. Any other integer is true.
pub fn parse_bool(text: &str) -> bool {
    let text = text.trim();
    match text.parse::<i64>() {
        Ok(v) => v != 0,
        Err(_) => text.eq_ignore_ascii_case("true"),
    }
}

/// Splits a bit-list value such as `wxALL | wxEXPAND` into its flags.
pub fn split_flags(text: &str) -> Vec<String> {
    text.split('|')
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_flags<S: AsRef<str>>(flags: &[S]) -> String {
    flags
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join("|")
}
