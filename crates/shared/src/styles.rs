use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;
use crate::geo::TileCoord;

/// Subdomains substituted for `{s}` in tile URL templates.
pub const TILE_SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

const OSM_ATTRIBUTION: &str =
    r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors"#;
const CARTO_ATTRIBUTION: &str = r#"&copy; <a href="https://www.openstreetmap.org/copyright">OpenStreetMap</a> contributors, &copy; <a href="https://carto.com/attributions">CARTO</a>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleDescriptor {
    pub display_name: &'static str,
    pub url_template: &'static str,
    /// HTML markup; must be shown alongside the tiles.
    pub attribution: &'static str,
}

const OSM: StyleDescriptor = StyleDescriptor {
    display_name: "OpenStreetMap",
    url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    attribution: OSM_ATTRIBUTION,
};

const CARTO_VOYAGER: StyleDescriptor = StyleDescriptor {
    display_name: "CartoDB Voyager",
    url_template: "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png",
    attribution: CARTO_ATTRIBUTION,
};

const CARTO_LIGHT: StyleDescriptor = StyleDescriptor {
    display_name: "CartoDB Light",
    url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png",
    attribution: CARTO_ATTRIBUTION,
};

const CARTO_DARK: StyleDescriptor = StyleDescriptor {
    display_name: "CartoDB Dark",
    url_template: "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
    attribution: CARTO_ATTRIBUTION,
};

const STAMEN_TONER: StyleDescriptor = StyleDescriptor {
    display_name: "Stamen Toner",
    url_template: "https://stamen-tiles.a.ssl.fastly.net/toner/{z}/{x}/{y}.png",
    attribution: r#"Map tiles by <a href="http://stamen.com">Stamen Design</a>, under <a href="http://creativecommons.org/licenses/by/3.0">CC BY 3.0</a>. Data by <a href="http://openstreetmap.org">OpenStreetMap</a>, under <a href="http://www.openstreetmap.org/copyright">ODbL</a>."#,
};

const STAMEN_TERRAIN: StyleDescriptor = StyleDescriptor {
    display_name: "Stamen Terrain",
    url_template: "https://stamen-tiles.a.ssl.fastly.net/terrain/{z}/{x}/{y}.jpg",
    attribution: r#"Map tiles by <a href="http://stamen.com">Stamen Design</a>, under <a href="http://creativecommons.org/licenses/by/3.0">CC BY 3.0</a>. Data by <a href="http://openstreetmap.org">OpenStreetMap</a>, under <a href="http://creativecommons.org/licenses/by-sa/3.0">CC BY SA</a>."#,
};

const ESRI_WORLD: StyleDescriptor = StyleDescriptor {
    display_name: "Esri World Street",
    url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Street_Map/MapServer/tile/{z}/{y}/{x}",
    attribution: "Tiles &copy; Esri &mdash; Source: Esri, DeLorme, NAVTEQ, USGS, Intermap, iPC, NRCAN, Esri Japan, METI, Esri China (Hong Kong), Esri (Thailand), TomTom, 2012",
};

/// Key into the fixed tile style registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MapStyle {
    Osm,
    #[default]
    CartoVoyager,
    CartoLight,
    CartoDark,
    StamenToner,
    StamenTerrain,
    EsriWorld,
}

impl MapStyle {
    /// Registry order, as shown in the style selector.
    pub const ALL: [MapStyle; 7] = [
        MapStyle::Osm,
        MapStyle::CartoVoyager,
        MapStyle::CartoLight,
        MapStyle::CartoDark,
        MapStyle::StamenToner,
        MapStyle::StamenTerrain,
        MapStyle::EsriWorld,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MapStyle::Osm => "osm",
            MapStyle::CartoVoyager => "cartoVoyager",
            MapStyle::CartoLight => "cartoLight",
            MapStyle::CartoDark => "cartoDark",
            MapStyle::StamenToner => "stamenToner",
            MapStyle::StamenTerrain => "stamenTerrain",
            MapStyle::EsriWorld => "esriWorld",
        }
    }

    pub fn descriptor(self) -> &'static StyleDescriptor {
        match self {
            MapStyle::Osm => &OSM,
            MapStyle::CartoVoyager => &CARTO_VOYAGER,
            MapStyle::CartoLight => &CARTO_LIGHT,
            MapStyle::CartoDark => &CARTO_DARK,
            MapStyle::StamenToner => &STAMEN_TONER,
            MapStyle::StamenTerrain => &STAMEN_TERRAIN,
            MapStyle::EsriWorld => &ESRI_WORLD,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }
}

impl FromStr for MapStyle {
    type Err = StyleError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        MapStyle::ALL
            .into_iter()
            .find(|style| style.key() == key)
            .ok_or_else(|| StyleError::UnknownStyle(key.to_string()))
    }
}

impl fmt::Display for MapStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Fill a tile URL template for `tile`.
///
/// `{x}` receives the wrapped column; `{r}` is the retina suffix and is left
/// empty since tiles are requested at 256 px.
pub fn expand_tile_url(template: &str, tile: TileCoord) -> String {
    let sub = TILE_SUBDOMAINS[((tile.x as u64 + tile.y as u64) % TILE_SUBDOMAINS.len() as u64) as usize];
    template
        .replace("{s}", sub)
        .replace("{z}", &tile.z.to_string())
        .replace("{x}", &tile.x.to_string())
        .replace("{y}", &tile.y.to_string())
        .replace("{r}", "")
}
