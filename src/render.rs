//! Map renderer - builds the scatter-map figure for a device selection
//!
//! The output is a plain serializable document shaped like a Plotly figure
//! (`data` + `layout`), so the browser can hand it straight to `Plotly.react`.

use serde::Serialize;

use crate::config::{Center, MapConfig};
use crate::dataset::{Dataset, Record};
use crate::filter::FilterSelection;
use crate::timestamp;

/// Complete figure: one scatter trace plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<ScatterMapbox>,
    pub layout: Layout,
}

/// Tooltip payload attached to each point: altitude, CPU temp, device id, display timestamp
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomData(pub f64, pub f64, pub String, pub String);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterMapbox {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub marker: Marker,
    pub selected: MarkerState,
    pub unselected: MarkerState,
    pub hoverinfo: &'static str,
    pub customdata: Vec<CustomData>,
    pub text: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerState {
    pub marker: MarkerStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub hovermode: &'static str,
    pub hoverdistance: u32,
    pub title: Title,
    pub mapbox: Mapbox,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapbox {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accesstoken: Option<String>,
    pub bearing: f64,
    pub style: String,
    pub center: Center,
    pub pitch: f64,
    pub zoom: f64,
}

impl Figure {
    pub fn point_count(&self) -> usize {
        self.data.iter().map(|t| t.lat.len()).sum()
    }
}

/// Six hover lines for a record, in display order
pub fn hover_lines(record: &Record) -> [String; 6] {
    [
        format!("Mac adress: {}", record.device_id),
        format!("Timestamp: {}", timestamp::format_display(&record.timestamp)),
        format!("Lat: {}", record.latitude),
        format!("Lon: {}", record.longitude),
        format!("Altitude: {}", record.altitude),
        format!("CPU Temp: {}", record.cpu_temperature),
    ]
}

/// Render the figure for `selection`. An empty selection yields an empty trace.
pub fn render_figure(
    dataset: &Dataset,
    selection: &FilterSelection,
    map: &MapConfig,
    token: Option<&str>,
) -> Figure {
    let visible: Vec<&Record> = dataset
        .records()
        .iter()
        .filter(|r| selection.contains(&r.device_id))
        .collect();

    let trace = ScatterMapbox {
        kind: "scattermapbox",
        mode: "markers",
        lat: visible.iter().map(|r| r.latitude).collect(),
        lon: visible.iter().map(|r| r.longitude).collect(),
        marker: Marker {
            color: visible.iter().map(|r| r.color.clone()).collect(),
        },
        selected: MarkerState {
            marker: MarkerStyle {
                opacity: map.selected_opacity,
                size: Some(map.selected_size),
            },
        },
        unselected: MarkerState {
            marker: MarkerStyle {
                opacity: map.unselected_opacity,
                size: None,
            },
        },
        hoverinfo: "text",
        customdata: visible
            .iter()
            .map(|r| {
                CustomData(
                    r.altitude,
                    r.cpu_temperature,
                    r.device_id.clone(),
                    timestamp::format_display(&r.timestamp),
                )
            })
            .collect(),
        text: visible.iter().map(|r| hover_lines(r).join("<br>")).collect(),
    };

    Figure {
        data: vec![trace],
        layout: Layout {
            hovermode: "closest",
            hoverdistance: map.hoverdistance,
            title: Title {
                text: map.title.clone(),
                font: Font {
                    size: map.title_size,
                    color: map.title_color.clone(),
                },
            },
            mapbox: Mapbox {
                accesstoken: token.map(str::to_string),
                bearing: map.bearing,
                style: map.style.clone(),
                center: map.center,
                pitch: map.pitch,
                zoom: map.zoom,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::sample_dataset;

    fn render(ds: &Dataset, sel: &FilterSelection) -> Figure {
        render_figure(ds, sel, &MapConfig::default(), Some("pk.test"))
    }

    #[test]
    fn test_selection_filters_records() {
        let ds = sample_dataset();
        let fig = render(&ds, &FilterSelection::from_ids(["AA:BB"]));

        let trace = &fig.data[0];
        assert_eq!(fig.point_count(), 2);
        assert!(trace.customdata.iter().all(|c| c.2 == "AA:BB"));
        assert_eq!(trace.lat, vec![48.8141, 48.8139]);
        let color = ds.color_of("AA:BB").unwrap();
        assert!(trace.marker.color.iter().all(|c| c == color));
    }

    #[test]
    fn test_empty_selection_is_empty_map() {
        let ds = sample_dataset();
        let fig = render(&ds, &FilterSelection::default());
        assert_eq!(fig.point_count(), 0);
        assert_eq!(fig.data.len(), 1);
        assert!(fig.data[0].text.is_empty());
    }

    #[test]
    fn test_all_selection_is_whole_dataset() {
        let ds = sample_dataset();
        let fig = render(&ds, &FilterSelection::all(&ds));
        assert_eq!(fig.point_count(), ds.len());
    }

    #[test]
    fn test_unknown_ids_match_nothing() {
        let ds = sample_dataset();
        let fig = render(&ds, &FilterSelection::from_ids(["ZZ:ZZ"]));
        assert_eq!(fig.point_count(), 0);
    }

    #[test]
    fn test_rerender_is_identical() {
        let ds = sample_dataset();
        let sel = FilterSelection::all(&ds);
        assert_eq!(render(&ds, &sel), render(&ds, &sel));
    }

    #[test]
    fn test_hover_lines_order() {
        let ds = sample_dataset();
        let lines = hover_lines(&ds.records()[0]);
        assert_eq!(
            lines,
            [
                "Mac adress: AA:BB".to_string(),
                "Timestamp: 14/11/2023 22:13".to_string(),
                "Lat: 48.8141".to_string(),
                "Lon: 2.3771".to_string(),
                "Altitude: 35.5".to_string(),
                "CPU Temp: 41.2".to_string(),
            ]
        );
    }

    #[test]
    fn test_figure_json_shape() {
        let ds = sample_dataset();
        let fig = render(&ds, &FilterSelection::from_ids(["CC:DD"]));
        let json = serde_json::to_value(&fig).unwrap();

        assert_eq!(json["data"][0]["type"], "scattermapbox");
        assert_eq!(json["data"][0]["customdata"][0][2], "CC:DD");
        assert_eq!(json["data"][0]["customdata"][0][3], "14/11/2023 22:14");
        assert_eq!(json["data"][0]["selected"]["marker"]["size"], 25.0);
        assert_eq!(json["data"][0]["selected"]["marker"]["opacity"], 0.5);
        assert_eq!(json["data"][0]["unselected"]["marker"]["opacity"], 1.0);
        assert!(json["data"][0]["unselected"]["marker"].get("size").is_none());

        let mapbox = &json["layout"]["mapbox"];
        assert_eq!(mapbox["accesstoken"], "pk.test");
        assert_eq!(mapbox["center"]["lat"], 48.814);
        assert_eq!(mapbox["center"]["lon"], 2.377);
        assert_eq!(mapbox["bearing"], 25.0);
        assert_eq!(mapbox["pitch"], 40.0);
        assert_eq!(mapbox["zoom"], 15.0);
        assert_eq!(mapbox["style"], "basic");
        assert_eq!(json["layout"]["title"]["text"], "Mapping of devices");
        assert_eq!(json["layout"]["title"]["font"]["size"], 50);
    }

    #[test]
    fn test_missing_token_still_renders() {
        let ds = sample_dataset();
        let fig = render_figure(&ds, &FilterSelection::all(&ds), &MapConfig::default(), None);
        assert_eq!(fig.point_count(), 3);
        let json = serde_json::to_value(&fig).unwrap();
        assert!(json["layout"]["mapbox"].get("accesstoken").is_none());
    }
}
