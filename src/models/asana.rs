//! Posture (asana) model

use serde::{Deserialize, Serialize};

/// One of the three fixed Ashtanga series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Series {
    Primary,
    Intermediate,
    Advanced,
}

impl Series {
    pub const ALL: [Series; 3] = [Series::Primary, Series::Intermediate, Series::Advanced];

    /// Series number as stored in the catalog (1..=3)
    pub fn number(self) -> u8 {
        match self {
            Series::Primary => 1,
            Series::Intermediate => 2,
            Series::Advanced => 3,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Series::Primary),
            2 => Some(Series::Intermediate),
            3 => Some(Series::Advanced),
            _ => None,
        }
    }

    /// Highest order number offered in the range prompt
    pub fn max_order(self) -> u32 {
        match self {
            Series::Primary => 42,
            Series::Intermediate => 27,
            Series::Advanced => 25,
        }
    }

    /// Button title in the series pickers
    pub fn title(self) -> &'static str {
        match self {
            Series::Primary => "Первая серия",
            Series::Intermediate => "Вторая серия",
            Series::Advanced => "Третья серия",
        }
    }
}

impl TryFrom<u8> for Series {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Series::from_number(value).ok_or_else(|| format!("unknown series {}", value))
    }
}

impl From<Series> for u8 {
    fn from(series: Series) -> Self {
        series.number()
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// A catalog row describing one posture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posture {
    pub id: i64,
    pub name: String,
    pub series: Series,
    pub order_num: u32,
    pub image_url: String,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
}

impl Posture {
    /// Whether the posture's order number falls within the inclusive range
    pub fn in_range(&self, start: u32, end: u32) -> bool {
        start <= self.order_num && self.order_num <= end
    }
}
