//! Map renderers.
//!
//! [`render_svg`] draws the complete view server-side: basemap tiles as
//! `<image>` references, one circle per marker with its popup as a `<title>`
//! tooltip, the legend box, and the tile attribution.
//!
//! [`render_html`] produces the interactive page: a Leaflet map with the same
//! view and tile layer, markers and legend computed here and embedded as
//! JSON, so the page script only places them.

use serde::Serialize;
use svg::Document;
use svg::node::element::{Circle, Group, Image, Rectangle as Rect, Text, Title};

use crate::legend::{Corner, Legend};
use crate::marker::Marker;
use crate::projection::{TILE_SIZE, visible_tiles};
use crate::style::MarkerStyle;
use crate::types::{MapView, TileLayer};

const LEGEND_ROW_H: f64 = 18.0;
const LEGEND_SWATCH: f64 = 14.0;
const LEGEND_W: f64 = 120.0;
const LEGEND_MARGIN: f64 = 10.0;
const LEGEND_PAD: f64 = 8.0;

/// Popup HTML as plain text lines, for SVG tooltips.
fn popup_plain(popup: &str) -> String {
    popup.replace("<br> ", "\n").replace("<br>", "\n")
}

/// Attribution HTML with tags stripped and entities decoded.
fn attribution_plain(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.replace("&copy;", "©").replace("&amp;", "&")
}

/// Build the whole map as an SVG document.
#[must_use]
pub fn svg_document(view: &MapView, tiles: &TileLayer, markers: &[Marker], legend: &Legend) -> Document {
    let (w, h) = (view.width, view.height);

    let background = Rect::new()
        .set("width", "100%")
        .set("height", "100%")
        .set("fill", "#aad3df");

    let basemap = visible_tiles(view).into_iter().fold(Group::new().set("class", "basemap"), |group, placed| {
        group.add(
            Image::new()
                .set("x", format!("{:.1}", placed.at.x))
                .set("y", format!("{:.1}", placed.at.y))
                .set("width", TILE_SIZE)
                .set("height", TILE_SIZE)
                .set("href", tiles.url(placed.tile)),
        )
    });

    let style = MarkerStyle::QUAKE;
    let mut circles = Group::new().set("class", "markers");
    for marker in markers {
        let p = view.to_screen(marker.position);
        let r = view.radius_px(marker.position.lat, marker.radius_m);
        if !view.intersects(p, r) {
            continue;
        }
        let mut circle = Circle::new()
            .set("cx", format!("{:.2}", p.x))
            .set("cy", format!("{:.2}", p.y))
            .set("r", format!("{r:.2}"))
            .set("fill", marker.band.hex())
            .set("fill-opacity", style.fill_opacity);
        if style.stroke {
            circle = circle
                .set("stroke", style.color)
                .set("stroke-width", style.weight)
                .set("stroke-opacity", style.opacity);
        }
        circles = circles.add(circle.add(Title::new(popup_plain(&marker.popup))));
    }

    let attribution = Text::new(attribution_plain(&tiles.attribution))
        .set("x", w.saturating_sub(4))
        .set("y", h.saturating_sub(2))
        .set("font-family", "sans-serif")
        .set("font-size", 10)
        .set("text-anchor", "end")
        .set("fill", "#333");

    Document::new()
        .set("xmlns:xlink", "http://www.w3.org/1999/xlink")
        .set("width", w)
        .set("height", h)
        .set("viewBox", format!("0 0 {w} {h}"))
        .add(background)
        .add(basemap)
        .add(circles)
        .add(legend_group(view, legend))
        .add(attribution)
}

/// Render the whole map as standalone SVG text.
#[must_use]
pub fn render_svg(view: &MapView, tiles: &TileLayer, markers: &[Marker], legend: &Legend) -> String {
    svg_document(view, tiles, markers, legend).to_string()
}

fn legend_group(view: &MapView, legend: &Legend) -> Group {
    let box_h = LEGEND_PAD * 2.0 + LEGEND_ROW_H * legend.entries.len() as f64;
    let (vw, vh) = (f64::from(view.width), f64::from(view.height));
    // Leave room for the attribution line along the bottom edge.
    let (x, y) = match legend.position {
        Corner::TopLeft => (LEGEND_MARGIN, LEGEND_MARGIN),
        Corner::TopRight => (vw - LEGEND_W - LEGEND_MARGIN, LEGEND_MARGIN),
        Corner::BottomLeft => (LEGEND_MARGIN, vh - box_h - LEGEND_MARGIN - 12.0),
        Corner::BottomRight => (vw - LEGEND_W - LEGEND_MARGIN, vh - box_h - LEGEND_MARGIN - 12.0),
    };

    let frame = Rect::new()
        .set("width", LEGEND_W)
        .set("height", box_h)
        .set("rx", 5)
        .set("fill", "white")
        .set("fill-opacity", 0.8);

    let group = Group::new()
        .set("class", "legend")
        .set("transform", format!("translate({x:.1},{y:.1})"))
        .add(frame);

    legend.entries.iter().enumerate().fold(group, |group, (i, entry)| {
        let row_y = LEGEND_PAD + LEGEND_ROW_H * i as f64;
        group
            .add(
                Rect::new()
                    .set("x", LEGEND_PAD)
                    .set("y", row_y)
                    .set("width", LEGEND_SWATCH)
                    .set("height", LEGEND_SWATCH)
                    .set("fill", entry.band.hex()),
            )
            .add(
                Text::new(entry.label.as_str())
                    .set("x", LEGEND_PAD + LEGEND_SWATCH + 6.0)
                    .set("y", row_y + LEGEND_SWATCH - 2.0)
                    .set("font-family", "sans-serif")
                    .set("font-size", 12),
            )
    })
}

/// Data handed to the page script.
#[derive(Serialize)]
struct PageData<'a> {
    title: &'a str,
    center: [f64; 2],
    zoom: u8,
    tile_url: &'a str,
    subdomains: &'a [String],
    attribution: &'a str,
    style: MarkerStyle,
    markers: Vec<PageMarker<'a>>,
    legend: &'a Legend,
}

#[derive(Serialize)]
struct PageMarker<'a> {
    lat: f64,
    lon: f64,
    radius: f64,
    fill: &'static str,
    popup: &'a str,
}

const PAGE_SCRIPT: &str = r#"
const data = JSON.parse(document.getElementById("map-data").textContent);
document.title = data.title;
const map = L.map("map", { center: data.center, zoom: data.zoom });
L.tileLayer(data.tile_url, { subdomains: data.subdomains, attribution: data.attribution }).addTo(map);
for (const m of data.markers) {
  L.circle([m.lat, m.lon], {
    stroke: data.style.stroke,
    color: data.style.color,
    weight: data.style.weight,
    opacity: data.style.opacity,
    fillOpacity: data.style.fill_opacity,
    fillColor: m.fill,
    radius: m.radius,
  }).bindPopup(m.popup).addTo(map);
}
const legend = L.control({ position: data.legend.position });
legend.onAdd = function () {
  const div = L.DomUtil.create("div", "info legend");
  for (const e of data.legend.entries) {
    const swatch = document.createElement("i");
    swatch.style.background = e.color;
    div.appendChild(swatch);
    div.appendChild(document.createTextNode(e.label));
    div.appendChild(document.createElement("br"));
  }
  return div;
};
legend.addTo(map);
"#;

const PAGE_STYLE: &str = r"
html, body, #map { height: 100%; margin: 0; }
.info.legend { background: rgba(255,255,255,0.85); padding: 6px 8px; border-radius: 5px; line-height: 18px; font: 12px sans-serif; }
.info.legend i { width: 14px; height: 14px; float: left; margin-right: 6px; }
";

/// Render the interactive Leaflet page.
#[must_use]
pub fn render_html(view: &MapView, tiles: &TileLayer, markers: &[Marker], legend: &Legend, title: &str) -> String {
    let data = PageData {
        title,
        center: [view.center.lat, view.center.lon],
        zoom: view.zoom,
        tile_url: &tiles.url_template,
        subdomains: &tiles.subdomains,
        attribution: &tiles.attribution,
        style: MarkerStyle::QUAKE,
        markers: markers
            .iter()
            .map(|m| PageMarker {
                lat: m.position.lat,
                lon: m.position.lon,
                radius: m.radius_m,
                fill: m.fill_color(),
                popup: &m.popup,
            })
            .collect(),
        legend,
    };
    // Serializing plain structs of strings and floats cannot fail; NaN
    // coordinates become `null`.
    let json = serde_json::to_string(&data).unwrap_or_else(|_| "{}".to_string());
    // Keep the payload from closing its own <script> element.
    let json = json.replace("</", "<\\/");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>{PAGE_STYLE}</style>
</head>
<body>
<div id="map"></div>
<script id="map-data" type="application/json">{json}</script>
<script>{PAGE_SCRIPT}</script>
</body>
</html>
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::build_markers;
    use crate::testutil::{feed, quake};

    fn markers() -> Vec<Marker> {
        build_markers(&feed(vec![
            quake(-95.7129, 37.0902, 5.0, Some(3.0)),
            quake(-100.0, 40.0, 95.0, Some(0.0)),
            // Far outside the default view.
            quake(120.0, -30.0, 40.0, Some(5.0)),
        ]))
        .unwrap()
    }

    #[test]
    fn svg_draws_visible_markers() {
        let svg = render_svg(&MapView::default(), &TileLayer::default(), &markers(), &Legend::depth());
        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert!(svg.contains(r##"fill="#90ee90""##));
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(r#"stroke="black""#));
        assert!(svg.contains(r#"stroke-width="0.5""#));
        assert!(svg.contains("<title>"));
        assert!(svg.contains("Magnitude: 3\nLocation: 37.0902, -95.7129\nDepth: 5"));
    }

    #[test]
    fn svg_centers_view() {
        let view = MapView::default();
        let svg = render_svg(&view, &TileLayer::default(), &markers()[..1], &Legend::depth());
        assert!(svg.contains(r#"cx="640.00""#));
        assert!(svg.contains(r#"cy="400.00""#));
    }

    #[test]
    fn svg_has_tiles_and_legend() {
        let svg = render_svg(&MapView::default(), &TileLayer::default(), &[], &Legend::depth());
        assert!(svg.contains("tile.openstreetmap.org/4/"));
        assert!(svg.contains("class=\"legend\""));
        for label in ["-10km - 10km", "70km - 90km", "90+"] {
            assert!(svg.contains(label), "missing legend label {label}");
        }
        assert!(svg.contains("© OpenStreetMap contributors"));
    }

    #[test]
    fn svg_marker_radius_follows_zoom() {
        let near = MapView { zoom: 6, ..MapView::default() };
        let all = markers();
        let m = &all[..1];
        let far_svg = render_svg(&MapView::default(), &TileLayer::default(), m, &Legend::depth());
        let near_svg = render_svg(&near, &TileLayer::default(), m, &Legend::depth());
        let radius = |svg: &str| -> f64 {
            let start = svg.find(" r=\"").unwrap() + 4;
            let end = start + svg[start..].find('"').unwrap();
            svg[start..end].parse().unwrap()
        };
        let ratio = radius(&near_svg) / radius(&far_svg);
        assert!((ratio - 4.0).abs() < 2e-2);
    }

    #[test]
    fn html_embeds_markers_and_legend() {
        let html = render_html(
            &MapView::default(),
            &TileLayer::default(),
            &markers(),
            &Legend::depth(),
            "Quakes <week>",
        );
        assert!(html.contains(r#""title":"Quakes <week>""#));
        assert!(!html.contains("<title>Quakes"));
        assert!(html.contains("leaflet.js"));
        assert!(html.contains(r#""position":"bottomright""#));
        assert!(html.contains(r#""fill":"lightgreen""#));
        assert!(html.contains(r#""radius":30000.0"#));
        assert!(html.contains("Magnitude: 3<br> Location: 37.0902, -95.7129<br> Depth: 5"));
    }

    #[test]
    fn html_payload_cannot_close_script() {
        let mut m = markers();
        m[0].popup = "</script><script>alert(1)".to_string();
        let html = render_html(&MapView::default(), &TileLayer::default(), &m, &Legend::depth(), "q");
        assert!(!html.contains("</script><script>alert"));
        assert!(html.contains(r"<\/script><script>alert(1)"));
    }
}
