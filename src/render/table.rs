use crate::analysis::{EmotionResult, Keyword, SentimentResult};
use serde::{Deserialize, Serialize};

/// One table cell. Numbers keep their type so views can round them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    fn to_csv_field(&self) -> String {
        match self {
            Cell::Int(v) => v.to_string(),
            Cell::Float(v) => v.to_string(),
            Cell::Text(s) => escape_csv(s),
        }
    }

    fn rounded(&self, places: i32) -> Cell {
        match self {
            Cell::Float(v) => {
                let factor = 10f64.powi(places);
                Cell::Float((v * factor).round() / factor)
            }
            other => other.clone(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Float(v)
    }
}

impl From<u64> for Cell {
    fn from(v: u64) -> Self {
        Cell::Int(i64::try_from(v).unwrap_or(i64::MAX))
    }
}

/// A tabular artifact, persisted as `<name>` (CSV) and shown in the results view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: &str, headers: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = self.headers.iter().map(|h| escape_csv(h)).collect();
        out.push_str(&header.join(","));
        out.push('\n');
        for row in &self.rows {
            let fields: Vec<String> = row.iter().map(Cell::to_csv_field).collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }

    /// Copy with every float rounded to `places` decimals
    pub fn rounded(&self, places: i32) -> Table {
        Table {
            name: self.name.clone(),
            headers: self.headers.clone(),
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().map(|c| c.rounded(places)).collect())
                .collect(),
        }
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Format seconds as MM:SS timestamp
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

pub fn sentiment_table(results: &[SentimentResult]) -> Table {
    let mut table = Table::new(
        super::COMMENTS_CSV,
        &["comment", "author", "published_at", "like_count", "sentiment", "confidence"],
    );
    table.rows = results
        .iter()
        .map(|r| {
            vec![
                r.comment.text.as_str().into(),
                r.comment.author.as_str().into(),
                r.comment.published_at.clone().unwrap_or_default().into(),
                r.comment.like_count.into(),
                r.label.as_str().into(),
                r.confidence.into(),
            ]
        })
        .collect();
    table
}

pub fn emotion_table(video_id: &str, results: &[EmotionResult]) -> Table {
    let mut table = Table::new(
        super::TRANSCRIPT_CSV,
        &["timestamp", "text", "duration", "emotion", "emotion_score", "start_seconds", "url"],
    );
    table.rows = results
        .iter()
        .map(|r| {
            let start = r.segment.start_time;
            vec![
                format_timestamp(start).into(),
                r.segment.text.as_str().into(),
                r.segment.duration.into(),
                r.label.as_str().into(),
                r.confidence.into(),
                start.into(),
                format!(
                    "https://www.youtube.com/watch?v={}&t={}s",
                    video_id,
                    start.max(0.0) as u64
                )
                .into(),
            ]
        })
        .collect();
    table
}

pub fn keyword_table(keywords: &[Keyword]) -> Table {
    let mut table = Table::new(super::KEYWORDS_CSV, &["keyword", "score"]);
    table.rows = keywords
        .iter()
        .map(|k| vec![k.term.as_str().into(), k.score.into()])
        .collect();
    table
}
