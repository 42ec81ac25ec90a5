//! ZIP code to local-jurisdiction overlay resolution

use dealdesk_pack::RulePack;

/// Overlay name for the City of Philadelphia.
pub const PHILA_OVERLAY: &str = "PHILA";

/// Resolve a property ZIP to a named city overlay.
///
/// An exact key match wins. Otherwise the first stored 3-character key
/// that prefixes the ZIP matches; order among competing prefix keys
/// follows map iteration order and is not a contract. An empty ZIP is
/// not an error, it simply resolves to no overlay.
pub fn resolve_overlay<'a>(zip: &str, pack: &'a RulePack) -> Option<&'a str> {
    let zip = zip.trim();
    if zip.is_empty() {
        return None;
    }
    if let Some(name) = pack.city_overlay_map.get(zip) {
        return Some(name.as_str());
    }
    pack.city_overlay_map
        .iter()
        .find(|(key, _)| key.len() == 3 && zip.starts_with(key.as_str()))
        .map(|(_, name)| name.as_str())
}
