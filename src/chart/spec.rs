//! Declarative chart specifications.
//!
//! A `ChartSpec` carries everything a renderer needs (traces, axes, layout) and
//! nothing about how it is drawn. The TUI draws it with Plotters/Ratatui; the
//! CLI serializes it to JSON in a plotly-like shape.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub traces: Vec<Trace>,
    pub layout: LayoutSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Bar(BarTrace),
    ScatterGeo(GeoTrace),
}

/// A single axis value. `Missing` serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Text(String),
    Date(NaiveDate),
    Missing,
}

impl Datum {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Datum::Number(v) => Some(*v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Orientation {
    #[serde(rename = "v")]
    Vertical,
    #[serde(rename = "h")]
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub orientation: Orientation,
    pub x: Vec<Datum>,
    pub y: Vec<Datum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoTrace {
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub text: Vec<String>,
    pub hoverinfo: String,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub size: Vec<f64>,
    pub line_width: f64,
    pub sizemode: SizeMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    Area,
    Diameter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Stack,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<String>,
    pub x: f64,
    pub y: f64,
    pub font_size: u32,
    pub itemclick: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLayout {
    pub projection: String,
    pub resolution: u32,
    pub showcountries: bool,
    pub countrycolor: String,
    pub showframe: bool,
    pub coastlinecolor: String,
    pub showgrid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutSpec {
    pub height: u32,
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<BarMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_bgcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_bgcolor: Option<String>,
    pub tick_font_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoLayout>,
    pub dragmode: bool,
}

pub const BOX_COLOR: &str = "#F5F5F5";

impl LayoutSpec {
    /// Full-height geographic layout for the world bubble map.
    pub fn world_map() -> Self {
        Self {
            height: 670,
            margin: Margin { r: 0, t: 0, l: 0, b: 0 },
            title: None,
            xaxis_title: None,
            yaxis_title: None,
            barmode: None,
            plot_bgcolor: None,
            paper_bgcolor: None,
            tick_font_size: 12,
            legend: None,
            geo: Some(GeoLayout {
                projection: "natural earth".to_string(),
                resolution: 50,
                showcountries: true,
                countrycolor: "white".to_string(),
                showframe: false,
                coastlinecolor: "slategrey".to_string(),
                showgrid: false,
            }),
            dragmode: false,
        }
    }

    /// Wide bar layout with a horizontal legend under the plot.
    pub fn world_bars() -> Self {
        Self {
            height: 350,
            margin: Margin { r: 20, t: 60, l: 40, b: 20 },
            title: None,
            xaxis_title: None,
            yaxis_title: None,
            barmode: None,
            plot_bgcolor: Some(BOX_COLOR.to_string()),
            paper_bgcolor: Some(BOX_COLOR.to_string()),
            tick_font_size: 12,
            legend: Some(Legend {
                orientation: Some("h".to_string()),
                x: 0.08,
                y: -0.2,
                font_size: 12,
                itemclick: "toggleothers".to_string(),
            }),
            geo: None,
            dragmode: false,
        }
    }

    /// Compact bar layout for the top-10 panels.
    pub fn simple_bars() -> Self {
        Self {
            height: 225,
            margin: Margin { r: 10, t: 10, l: 10, b: 20 },
            title: None,
            xaxis_title: None,
            yaxis_title: None,
            barmode: None,
            plot_bgcolor: Some(BOX_COLOR.to_string()),
            paper_bgcolor: Some(BOX_COLOR.to_string()),
            tick_font_size: 10,
            legend: Some(Legend {
                orientation: None,
                x: 0.02,
                y: 0.96,
                font_size: 10,
                itemclick: "toggleothers".to_string(),
            }),
            geo: None,
            dragmode: false,
        }
    }
}
