use crate::analysis::{Emotion, EmotionResult, Sentiment, SentimentResult};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut, draw_polygon_mut,
};
use imageproc::point::Point;
use imageproc::rect::Rect;
use std::collections::BTreeMap;

/// Width of a time bin on the emotion charts, in seconds
pub const BIN_SECONDS: f64 = 30.0;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([60, 60, 60]);
const EMPTY: Rgb<u8> = Rgb([220, 220, 220]);
const MARGIN: u32 = 40;

pub fn emotion_color(emotion: Emotion) -> Rgb<u8> {
    match emotion {
        Emotion::Anger => Rgb([214, 39, 40]),
        Emotion::Disgust => Rgb([140, 86, 75]),
        Emotion::Fear => Rgb([148, 103, 189]),
        Emotion::Joy => Rgb([255, 127, 14]),
        Emotion::Neutral => Rgb([127, 127, 127]),
        Emotion::Sadness => Rgb([31, 119, 180]),
        Emotion::Surprise => Rgb([44, 160, 44]),
    }
}

pub fn sentiment_color(sentiment: Sentiment) -> Rgb<u8> {
    match sentiment {
        Sentiment::Positive => Rgb([141, 229, 161]),
        Sentiment::Neutral => Rgb([161, 201, 244]),
        Sentiment::Negative => Rgb([255, 159, 155]),
    }
}

/// Emotion counts per time bin: `counts[emotion][bin]`
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionBins {
    pub bins: usize,
    pub counts: BTreeMap<Emotion, Vec<u32>>,
}

impl EmotionBins {
    pub fn from_results(results: &[EmotionResult], bin_seconds: f64) -> Self {
        let bin_of = |r: &EmotionResult| (r.segment.start_time.max(0.0) / bin_seconds) as usize;
        let bins = results.iter().map(bin_of).max().map_or(0, |b| b + 1);

        let mut counts: BTreeMap<Emotion, Vec<u32>> = Emotion::ALL
            .into_iter()
            .map(|e| (e, vec![0; bins]))
            .collect();
        for result in results {
            if let Some(row) = counts.get_mut(&result.label) {
                row[bin_of(result)] += 1;
            }
        }

        Self { bins, counts }
    }

    pub fn bin_total(&self, bin: usize) -> u32 {
        self.counts.values().map(|row| row[bin]).sum()
    }

    pub fn max_cell(&self) -> u32 {
        self.counts
            .values()
            .flat_map(|row| row.iter().copied())
            .max()
            .unwrap_or(0)
    }
}

fn draw_axes(img: &mut RgbImage) {
    let (w, h) = img.dimensions();
    let left = MARGIN as f32;
    let bottom = (h - MARGIN) as f32;
    draw_line_segment_mut(img, (left, MARGIN as f32), (left, bottom), AXIS);
    draw_line_segment_mut(img, (left, bottom), ((w - MARGIN) as f32, bottom), AXIS);
}

/// Fill a polygon after dropping repeated vertices; degenerate shapes are skipped.
fn fill_polygon(img: &mut RgbImage, points: &[Point<i32>], color: Rgb<u8>) {
    let mut poly: Vec<Point<i32>> = Vec::with_capacity(points.len());
    for p in points {
        if poly.last() != Some(p) {
            poly.push(*p);
        }
    }
    while poly.len() > 1 && poly.first() == poly.last() {
        poly.pop();
    }
    if poly.len() >= 3 {
        draw_polygon_mut(img, &poly, color);
    }
}

fn fill_rect(img: &mut RgbImage, x: i32, y: i32, w: i32, h: i32, color: Rgb<u8>) {
    if w > 0 && h > 0 {
        draw_filled_rect_mut(img, Rect::at(x, y).of_size(w as u32, h as u32), color);
    }
}

/// Stacked area of emotion counts over 30-second bins.
pub fn emotion_stacked_area(results: &[EmotionResult]) -> RgbImage {
    let (width, height) = (1200u32, 450u32);
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let data = EmotionBins::from_results(results, BIN_SECONDS);

    let left = MARGIN as i32;
    let bottom = (height - MARGIN) as i32;
    let plot_w = (width - 2 * MARGIN) as f64;
    let plot_h = (height - 2 * MARGIN) as f64;

    let peak = (0..data.bins).map(|b| data.bin_total(b)).max().unwrap_or(0);
    if peak == 0 {
        draw_axes(&mut img);
        return img;
    }

    let y_of = |count: u32| bottom - (count as f64 / peak as f64 * plot_h).round() as i32;
    let x_of = |bin: usize| {
        if data.bins == 1 {
            left
        } else {
            left + (bin as f64 / (data.bins - 1) as f64 * plot_w).round() as i32
        }
    };

    let mut lower = vec![0u32; data.bins];
    for (emotion, row) in &data.counts {
        let upper: Vec<u32> = lower.iter().zip(row).map(|(l, c)| l + c).collect();
        let color = emotion_color(*emotion);

        if data.bins == 1 {
            let top = y_of(upper[0]);
            fill_rect(&mut img, left, top, plot_w as i32, y_of(lower[0]) - top, color);
        } else {
            for bin in 0..data.bins - 1 {
                let quad = [
                    Point::new(x_of(bin), y_of(lower[bin])),
                    Point::new(x_of(bin + 1), y_of(lower[bin + 1])),
                    Point::new(x_of(bin + 1), y_of(upper[bin + 1])),
                    Point::new(x_of(bin), y_of(upper[bin])),
                ];
                fill_polygon(&mut img, &quad, color);
            }
        }
        lower = upper;
    }

    draw_axes(&mut img);
    img
}

/// Linear interpolation along the YlOrRd color ramp, `t` in [0, 1]
pub fn heat_color(t: f64) -> Rgb<u8> {
    const STOPS: [[f64; 3]; 5] = [
        [255.0, 255.0, 204.0],
        [254.0, 217.0, 118.0],
        [253.0, 141.0, 60.0],
        [227.0, 26.0, 28.0],
        [128.0, 0.0, 38.0],
    ];
    let t = t.clamp(0.0, 1.0) * (STOPS.len() - 1) as f64;
    let i = (t.floor() as usize).min(STOPS.len() - 2);
    let frac = t - i as f64;
    let mix = |c: usize| (STOPS[i][c] + (STOPS[i + 1][c] - STOPS[i][c]) * frac).round() as u8;
    Rgb([mix(0), mix(1), mix(2)])
}

/// Emotion (rows) by time bin (columns) heatmap.
pub fn emotion_heatmap(results: &[EmotionResult]) -> RgbImage {
    let (width, height) = (1120u32, 480u32);
    let mut img = RgbImage::from_pixel(width, height, BACKGROUND);
    let data = EmotionBins::from_results(results, BIN_SECONDS);

    let plot_w = (width - 2 * MARGIN) as f64;
    let plot_h = (height - 2 * MARGIN) as f64;
    let max = data.max_cell();

    if data.bins == 0 {
        fill_rect(
            &mut img,
            MARGIN as i32,
            MARGIN as i32,
            plot_w as i32,
            plot_h as i32,
            EMPTY,
        );
        return img;
    }

    let rows = data.counts.len();
    for (row_idx, (_, row)) in data.counts.iter().enumerate() {
        let y0 = MARGIN as i32 + (row_idx as f64 * plot_h / rows as f64).round() as i32;
        let y1 = MARGIN as i32 + ((row_idx + 1) as f64 * plot_h / rows as f64).round() as i32;
        for (bin, count) in row.iter().enumerate() {
            let x0 = MARGIN as i32 + (bin as f64 * plot_w / data.bins as f64).round() as i32;
            let x1 = MARGIN as i32 + ((bin + 1) as f64 * plot_w / data.bins as f64).round() as i32;
            let t = if max == 0 { 0.0 } else { *count as f64 / max as f64 };
            fill_rect(&mut img, x0, y0, (x1 - x0).max(1), (y1 - y0).max(1), heat_color(t));
        }
    }

    img
}

/// Pie chart of comment sentiment shares.
pub fn sentiment_pie(results: &[SentimentResult]) -> RgbImage {
    let size = 600u32;
    let mut img = RgbImage::from_pixel(size, size, BACKGROUND);
    let center = (size as i32 / 2, size as i32 / 2 + 20);
    let radius = 240i32;

    let counts: Vec<(Sentiment, usize)> = Sentiment::ALL
        .into_iter()
        .map(|s| (s, results.iter().filter(|r| r.label == s).count()))
        .collect();
    let total: usize = counts.iter().map(|(_, c)| c).sum();

    // Legend swatches, one per label in fixed order
    for (i, (sentiment, _)) in counts.iter().enumerate() {
        fill_rect(&mut img, 10 + i as i32 * 30, 10, 20, 20, sentiment_color(*sentiment));
    }

    if total == 0 {
        draw_filled_circle_mut(&mut img, center, radius, EMPTY);
        return img;
    }

    let mut start_deg = -90.0f64;
    for (sentiment, count) in counts {
        if count == 0 {
            continue;
        }
        let color = sentiment_color(sentiment);
        if count == total {
            draw_filled_circle_mut(&mut img, center, radius, color);
            break;
        }

        let sweep = count as f64 / total as f64 * 360.0;
        let steps = sweep.ceil().max(2.0) as usize;
        let mut wedge = vec![Point::new(center.0, center.1)];
        for step in 0..=steps {
            let angle = (start_deg + sweep * step as f64 / steps as f64).to_radians();
            wedge.push(Point::new(
                center.0 + (radius as f64 * angle.cos()).round() as i32,
                center.1 + (radius as f64 * angle.sin()).round() as i32,
            ));
        }
        fill_polygon(&mut img, &wedge, color);
        start_deg += sweep;
    }

    img
}
