use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 座標文字為此值時視為「未設定」
pub const UNSET_COORDINATE: &str = "0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: String,
    pub name: String,
    pub geolat: Option<String>,
    pub geolong: Option<String>,
    /// 目前使用者是否曾到訪
    pub visited: Option<bool>,
}

impl Venue {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            geolat: None,
            geolong: None,
            visited: None,
        }
    }

    pub fn with_coordinates(mut self, geolat: impl Into<String>, geolong: impl Into<String>) -> Self {
        self.geolat = Some(geolat.into());
        self.geolong = Some(geolong.into());
        self
    }

    pub fn with_visited(mut self, visited: bool) -> Self {
        self.visited = Some(visited);
        self
    }

    pub fn has_visited(&self) -> bool {
        self.visited.unwrap_or(false)
    }

    /// 解析座標文字；任一欄缺漏或不是數字時回傳 None
    pub fn position(&self) -> Option<GeoPoint> {
        let lat = self.geolat.as_deref()?.trim().parse::<f64>().ok()?;
        let lon = self.geolong.as_deref()?.trim().parse::<f64>().ok()?;
        if lat.is_finite() && lon.is_finite() {
            Some(GeoPoint { lat, lon })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// One category of search results, as handed over by the search subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultGroup {
    pub category: String,
    pub venues: Vec<Arc<Venue>>,
}

impl ResultGroup {
    pub fn new(category: impl Into<String>, venues: Vec<Venue>) -> Self {
        Self {
            category: category.into(),
            venues: venues.into_iter().map(Arc::new).collect(),
        }
    }
}

pub type ResultSet = Vec<ResultGroup>;

/// The mappable subsequence of a [`ResultGroup`]. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderGroup {
    pub category: String,
    pub venues: Vec<Arc<Venue>>,
}

impl RenderGroup {
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerVariant {
    Default,
    BeenThere,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueOverlayItem {
    pub venue: Arc<Venue>,
    pub position: Option<GeoPoint>,
    pub marker: MarkerVariant,
}

/// One installed overlay: a render group plus its per-item marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueOverlay {
    pub category: String,
    pub items: Vec<VenueOverlayItem>,
}

impl VenueOverlay {
    pub fn item(&self, index: usize) -> Option<&VenueOverlayItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SelectionState {
    #[default]
    Unselected,
    Selected(Arc<Venue>),
}

impl SelectionState {
    pub fn venue(&self) -> Option<&Arc<Venue>> {
        match self {
            SelectionState::Unselected => None,
            SelectionState::Selected(venue) => Some(venue),
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, SelectionState::Selected(_))
    }
}
