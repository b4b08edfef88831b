use crate::domain::model::{Venue, UNSET_COORDINATE};

/// 兩個座標都存在，且文字都不等於未設定的標記值 "0"。
///
/// 比對的是文字本身而非數值，所以 "0.0" 仍視為可上圖。
pub fn is_mappable(venue: &Venue) -> bool {
    match (venue.geolat.as_deref(), venue.geolong.as_deref()) {
        (Some(lat), Some(lon)) => lat != UNSET_COORDINATE && lon != UNSET_COORDINATE,
        _ => false,
    }
}
