//! Shapes aggregate rows into the JSON payloads the charting client
//! consumes verbatim, so field names here are part of the wire contract
//! (including the camelCase ones).

use crate::credits_store::{FrequencyRow, YearCount};
use rand::Rng;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DonutChart {
    pub labels: Vec<String>,
    pub datasets: Vec<DonutDataset>,
}

#[derive(Debug, Serialize)]
pub struct DonutDataset {
    pub data: Vec<i64>,
    #[serde(rename = "backgroundColor")]
    pub background_color: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TimeSeriesChart {
    pub labels: Vec<String>,
    pub datasets: Vec<TimeSeriesDataset>,
}

/// Line-style fields fixed by the charting client.
#[derive(Debug, Serialize)]
pub struct TimeSeriesDataset {
    pub label: String,
    pub fill: bool,
    #[serde(rename = "lineTension")]
    pub line_tension: f64,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "borderColor")]
    pub border_color: String,
    #[serde(rename = "borderCapStyle")]
    pub border_cap_style: String,
    #[serde(rename = "borderDash")]
    pub border_dash: Vec<f64>,
    #[serde(rename = "borderDashOffset")]
    pub border_dash_offset: f64,
    #[serde(rename = "borderJoinStyle")]
    pub border_join_style: String,
    #[serde(rename = "pointBorderColor")]
    pub point_border_color: String,
    #[serde(rename = "pointBackgroundColor")]
    pub point_background_color: String,
    #[serde(rename = "pointBorderWidth")]
    pub point_border_width: u32,
    #[serde(rename = "pointHoverRadius")]
    pub point_hover_radius: u32,
    #[serde(rename = "pointHoverBackgroundColor")]
    pub point_hover_background_color: String,
    #[serde(rename = "pointHoverBorderColor")]
    pub point_hover_border_color: String,
    #[serde(rename = "pointHoverBorderWidth")]
    pub point_hover_border_width: u32,
    #[serde(rename = "pointRadius")]
    pub point_radius: u32,
    #[serde(rename = "pointHitRadius")]
    pub point_hit_radius: u32,
    pub data: Vec<i64>,
    #[serde(rename = "spanGaps")]
    pub span_gaps: bool,
}

#[derive(Debug, Serialize)]
pub struct BubbleChart {
    pub name: String,
    pub value: i64,
    pub children: Vec<BubbleNode>,
}

#[derive(Debug, Serialize)]
pub struct BubbleNode {
    pub domain: String,
    pub name: String,
    pub link: String,
    pub value: i64,
}

#[derive(Debug, Serialize)]
pub struct WebGraph {
    pub name: String,
    pub img: String,
    pub children: Vec<WebGraphGroup>,
}

#[derive(Debug, Serialize)]
pub struct WebGraphGroup {
    pub name: String,
    pub children: Vec<WebGraphLeaf>,
}

#[derive(Debug, Serialize)]
pub struct WebGraphLeaf {
    pub hero: String,
    pub name: String,
    pub link: String,
    pub img: String,
    pub size: i64,
}

fn random_rgba() -> String {
    let mut rng = rand::rng();
    format!(
        "rgba({},{},{},1)",
        rng.random_range(0..=255u16),
        rng.random_range(0..=255u16),
        rng.random_range(0..=255u16)
    )
}

/// `1 song` / `N songs`.
pub fn pluralize_songs(count: i64) -> String {
    if count == 1 {
        format!("{} song", count)
    } else {
        format!("{} songs", count)
    }
}

/// Categorical donut from frequency rows: one label, one value and one
/// freshly generated color per category.
pub fn donut_chart(rows: &[FrequencyRow]) -> DonutChart {
    DonutChart {
        labels: rows.iter().map(|r| r.name.clone()).collect(),
        datasets: vec![DonutDataset {
            data: rows.iter().map(|r| r.events).collect(),
            background_color: rows.iter().map(|_| random_rgba()).collect(),
        }],
    }
}

/// Songs-per-year line chart.
pub fn productivity_chart(rows: &[YearCount]) -> TimeSeriesChart {
    TimeSeriesChart {
        labels: rows.iter().map(|r| r.year.clone()).collect(),
        datasets: vec![TimeSeriesDataset {
            label: "Number of Songs Produced".to_string(),
            fill: true,
            line_tension: 0.5,
            background_color: "rgba(0,255,0,0.1)".to_string(),
            border_color: "rgba(220,220,220,1)".to_string(),
            border_cap_style: "butt".to_string(),
            border_dash: Vec::new(),
            border_dash_offset: 0.0,
            border_join_style: "miter".to_string(),
            point_border_color: "rgba(220,220,220,1)".to_string(),
            point_background_color: "green".to_string(),
            point_border_width: 1,
            point_hover_radius: 5,
            point_hover_background_color: "green".to_string(),
            point_hover_border_color: "rgba(220,220,220,1)".to_string(),
            point_hover_border_width: 2,
            point_radius: 3,
            point_hit_radius: 10,
            data: rows.iter().map(|r| r.songs).collect(),
            span_gaps: false,
        }],
    }
}

/// Bubble tree keyed by producer: one child per producer the subject
/// worked with, sized by song count.
pub fn producer_bubbles(subject_name: &str, rows: &[FrequencyRow]) -> BubbleChart {
    BubbleChart {
        name: subject_name.to_string(),
        value: rows.iter().map(|r| r.events).sum(),
        children: rows
            .iter()
            .map(|r| BubbleNode {
                domain: r.name.clone(),
                name: format!("{}: {}", r.name, pluralize_songs(r.events)),
                link: format!("/producers/{}", r.id),
                value: r.events,
            })
            .collect(),
    }
}

/// Nested web graph: the subject at the root, its producers grouped
/// under a single "Producers" branch.
pub fn producer_web_graph(
    subject_name: &str,
    subject_img: Option<&str>,
    rows: &[FrequencyRow],
) -> WebGraph {
    WebGraph {
        name: subject_name.to_string(),
        img: subject_img.unwrap_or_default().to_string(),
        children: vec![WebGraphGroup {
            name: "Producers".to_string(),
            children: rows
                .iter()
                .map(|r| WebGraphLeaf {
                    hero: subject_name.to_string(),
                    name: format!("{} ({})", r.name, pluralize_songs(r.events)),
                    link: format!("/producers/{}", r.id),
                    img: r.img_url.clone().unwrap_or_default(),
                    size: r.events,
                })
                .collect(),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows() -> Vec<FrequencyRow> {
        vec![
            FrequencyRow {
                id: 1,
                name: "Alchemist".to_string(),
                img_url: Some("http://img/a.jpg".to_string()),
                events: 1,
            },
            FrequencyRow {
                id: 2,
                name: "Metro".to_string(),
                img_url: None,
                events: 3,
            },
        ]
    }

    #[test]
    fn test_pluralize_songs() {
        assert_eq!(pluralize_songs(1), "1 song");
        assert_eq!(pluralize_songs(0), "0 songs");
        assert_eq!(pluralize_songs(7), "7 songs");
    }

    #[test]
    fn test_random_rgba_format() {
        let color = random_rgba();
        assert!(color.starts_with("rgba("));
        assert!(color.ends_with(",1)"));
        assert_eq!(color.matches(',').count(), 3);
    }

    #[test]
    fn test_donut_chart_shape() {
        let chart = serde_json::to_value(donut_chart(&rows())).unwrap();
        assert_eq!(chart["labels"], json!(["Alchemist", "Metro"]));
        assert_eq!(chart["datasets"][0]["data"], json!([1, 3]));
        assert_eq!(
            chart["datasets"][0]["backgroundColor"]
                .as_array()
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn test_productivity_chart_shape() {
        let years = vec![
            YearCount {
                year: "2001".to_string(),
                songs: 2,
            },
            YearCount {
                year: "2003".to_string(),
                songs: 5,
            },
        ];
        let chart = serde_json::to_value(productivity_chart(&years)).unwrap();
        assert_eq!(chart["labels"], json!(["2001", "2003"]));
        let dataset = &chart["datasets"][0];
        assert_eq!(dataset["data"], json!([2, 5]));
        assert_eq!(dataset["label"], json!("Number of Songs Produced"));
        assert_eq!(dataset["lineTension"], json!(0.5));
        assert_eq!(dataset["borderCapStyle"], json!("butt"));
        assert_eq!(dataset["pointHitRadius"], json!(10));
        assert_eq!(dataset["spanGaps"], json!(false));
    }

    #[test]
    fn test_producer_bubbles_shape() {
        let chart = serde_json::to_value(producer_bubbles("Vocalist A", &rows())).unwrap();
        assert_eq!(chart["name"], json!("Vocalist A"));
        assert_eq!(chart["value"], json!(4));
        assert_eq!(chart["children"][0]["domain"], json!("Alchemist"));
        assert_eq!(chart["children"][0]["name"], json!("Alchemist: 1 song"));
        assert_eq!(chart["children"][0]["link"], json!("/producers/1"));
        assert_eq!(chart["children"][1]["name"], json!("Metro: 3 songs"));
        assert_eq!(chart["children"][1]["value"], json!(3));
    }

    #[test]
    fn test_producer_web_graph_shape() {
        let graph = serde_json::to_value(producer_web_graph(
            "Vocalist A",
            Some("http://img/v.jpg"),
            &rows(),
        ))
        .unwrap();
        assert_eq!(graph["name"], json!("Vocalist A"));
        assert_eq!(graph["img"], json!("http://img/v.jpg"));
        assert_eq!(graph["children"][0]["name"], json!("Producers"));
        let leaf = &graph["children"][0]["children"][1];
        assert_eq!(leaf["hero"], json!("Vocalist A"));
        assert_eq!(leaf["name"], json!("Metro (3 songs)"));
        assert_eq!(leaf["img"], json!(""));
        assert_eq!(leaf["size"], json!(3));
    }
}
