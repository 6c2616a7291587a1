//! Candlestick + volume chart rasterizer

use crate::chart::draw::{draw_filled_rect, draw_horizontal_line, draw_vertical_line};
use crate::errors::ChartError;
use crate::logger::{self, LogTag};
use crate::market_data::Candle;
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

/// Share of the drawable height given to the price panel
const PRICE_PANEL_RATIO: f64 = 0.72;
/// Candle body width as a share of its slot
const BODY_WIDTH_RATIO: f64 = 0.6;
/// Headroom above the highest high and below the lowest low
const PRICE_PADDING_RATIO: f64 = 0.05;
const MARGIN: u32 = 12;
const PANEL_GAP: u32 = 8;
const GRID_LINES: u32 = 4;

/// Palette (light background, green up / red down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStyle {
    pub background: Rgb<u8>,
    pub grid: Rgb<u8>,
    pub frame: Rgb<u8>,
    pub bullish: Rgb<u8>,
    pub bearish: Rgb<u8>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            background: Rgb([255, 255, 255]),
            grid: Rgb([232, 232, 232]),
            frame: Rgb([170, 170, 170]),
            bullish: Rgb([0, 99, 64]),
            bearish: Rgb([160, 33, 40]),
        }
    }
}

/// Pixel rectangle of one panel
#[derive(Debug, Clone, Copy)]
struct Panel {
    left: u32,
    top: u32,
    width: u32,
    height: u32,
}

impl Panel {
    fn bottom(&self) -> u32 {
        self.top + self.height
    }

    fn right(&self) -> u32 {
        self.left + self.width
    }
}

/// Linear price → row mapping for the price panel
struct PriceScale {
    low: f64,
    high: f64,
}

impl PriceScale {
    fn from_series(series: &[Candle]) -> Self {
        let mut low = series.iter().map(|c| c.low).fold(f64::INFINITY, f64::min);
        let mut high = series
            .iter()
            .map(|c| c.high)
            .fold(f64::NEG_INFINITY, f64::max);

        // A flat or single-price series still needs a non-zero range
        if high - low <= f64::EPSILON * high.abs().max(1.0) {
            let pad = (high.abs() * 0.01).max(1e-8);
            low -= pad;
            high += pad;
        }

        let padding = (high - low) * PRICE_PADDING_RATIO;
        Self {
            low: low - padding,
            high: high + padding,
        }
    }

    fn row(&self, price: f64, panel: &Panel) -> u32 {
        let t = ((self.high - price) / (self.high - self.low)).clamp(0.0, 1.0);
        panel.top + (t * (panel.height.saturating_sub(1)) as f64).round() as u32
    }
}

/// Renders a candle series into a PNG image. Pure: no state survives a call.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    width: u32,
    height: u32,
    style: ChartStyle,
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            style: ChartStyle::default(),
        }
    }

    /// Create a renderer from the `[chart]` config section
    pub fn from_config() -> Self {
        let (width, height) = crate::config::with_config(|c| (c.chart.width, c.chart.height));
        Self::new(width, height)
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    /// Render `series` as PNG bytes
    ///
    /// Returns `Ok(None)` when there is nothing to draw (empty series, or no
    /// candle with finite values).
    pub fn render(&self, series: &[Candle]) -> Result<Option<Vec<u8>>, ChartError> {
        match self.draw(series) {
            Some(img) => encode_png(&img).map(Some),
            None => Ok(None),
        }
    }

    /// Render on the blocking pool so the async workers keep serving updates
    pub async fn render_blocking(&self, series: Vec<Candle>) -> Result<Option<Vec<u8>>, ChartError> {
        let renderer = self.clone();
        tokio::task::spawn_blocking(move || renderer.render(&series))
            .await
            .map_err(|e| ChartError::Worker(e.to_string()))?
    }

    /// Rasterize without encoding
    pub fn draw(&self, series: &[Candle]) -> Option<RgbImage> {
        let candles: Vec<Candle> = series.iter().copied().filter(Candle::is_finite).collect();
        if candles.is_empty() {
            return None;
        }
        if candles.len() < series.len() {
            logger::warning(
                LogTag::Chart,
                &format!(
                    "Skipped {} candles with non-finite values",
                    series.len() - candles.len()
                ),
            );
        }

        let mut img = RgbImage::from_pixel(self.width, self.height, self.style.background);
        let (price_panel, volume_panel) = self.layout();

        self.draw_grid(&mut img, &price_panel, &volume_panel);

        let scale = PriceScale::from_series(&candles);
        let max_volume = candles.iter().map(|c| c.volume).fold(0.0, f64::max);
        let slot = price_panel.width as f64 / candles.len() as f64;
        let body_width = ((slot * BODY_WIDTH_RATIO).floor() as u32).max(1);

        for (i, candle) in candles.iter().enumerate() {
            let center = price_panel.left + (slot * (i as f64 + 0.5)).floor() as u32;
            let body_left = center.saturating_sub(body_width / 2);
            let color = if candle.is_bullish() {
                self.style.bullish
            } else {
                self.style.bearish
            };

            // Wick spans high..low
            let wick_top = scale.row(candle.high, &price_panel);
            let wick_bottom = scale.row(candle.low, &price_panel);
            draw_vertical_line(&mut img, center, wick_top, wick_bottom, color);

            // Body spans open..close, at least one pixel tall
            let body_top = scale.row(candle.open.max(candle.close), &price_panel);
            let body_bottom = scale.row(candle.open.min(candle.close), &price_panel);
            let body_height = (body_bottom - body_top).max(1);
            draw_filled_rect(&mut img, body_left, body_top, body_width, body_height, color);

            // Volume bar shares the x slot
            if max_volume > 0.0 {
                let bar_height =
                    ((candle.volume / max_volume) * volume_panel.height as f64).round() as u32;
                if bar_height > 0 {
                    let bar_top = volume_panel.bottom() - bar_height;
                    draw_filled_rect(&mut img, body_left, bar_top, body_width, bar_height, color);
                }
            }
        }

        Some(img)
    }

    fn layout(&self) -> (Panel, Panel) {
        let inner_width = self.width.saturating_sub(2 * MARGIN).max(1);
        let inner_height = self.height.saturating_sub(2 * MARGIN + PANEL_GAP).max(2);
        let price_height = ((inner_height as f64 * PRICE_PANEL_RATIO) as u32).max(1);
        let volume_height = (inner_height - price_height).max(1);

        let price = Panel {
            left: MARGIN,
            top: MARGIN,
            width: inner_width,
            height: price_height,
        };
        let volume = Panel {
            left: MARGIN,
            top: price.bottom() + PANEL_GAP,
            width: inner_width,
            height: volume_height,
        };
        (price, volume)
    }

    fn draw_grid(&self, img: &mut RgbImage, price: &Panel, volume: &Panel) {
        for i in 1..GRID_LINES {
            let y = price.top + price.height * i / GRID_LINES;
            draw_horizontal_line(img, y, price.left, price.right(), self.style.grid);
        }

        for panel in [price, volume] {
            draw_horizontal_line(img, panel.top, panel.left, panel.right(), self.style.frame);
            draw_horizontal_line(img, panel.bottom(), panel.left, panel.right(), self.style.frame);
            draw_vertical_line(img, panel.left, panel.top, panel.bottom(), self.style.frame);
            draw_vertical_line(img, panel.right(), panel.top, panel.bottom(), self.style.frame);
        }
    }
}

fn encode_png(img: &RgbImage) -> Result<Vec<u8>, ChartError> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ChartError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn candle(ts: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle::new(ts, open, high, low, close, volume)
    }

    fn sample_series(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.7).sin() * 5.0;
                let close = if i % 2 == 0 { base + 1.0 } else { base - 1.0 };
                candle(i as i64 * 3_600_000, base, base + 2.0, base - 2.0, close, 10.0 + i as f64)
            })
            .collect()
    }

    #[test]
    fn test_empty_series_renders_nothing() {
        let renderer = ChartRenderer::new(900, 500);
        assert_eq!(renderer.render(&[]).unwrap(), None);
    }

    #[test]
    fn test_single_candle_renders_png() {
        let renderer = ChartRenderer::new(900, 500);
        let png = renderer
            .render(&[candle(1, 100.0, 115.0, 95.0, 110.0, 3.0)])
            .unwrap()
            .expect("one candle is drawable");

        assert_eq!(&png[..8], &PNG_SIGNATURE);
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!(decoded.width(), 900);
        assert_eq!(decoded.height(), 500);
    }

    #[test]
    fn test_full_series_has_requested_size() {
        let renderer = ChartRenderer::new(640, 360);
        let img = renderer.draw(&sample_series(200)).unwrap();
        assert_eq!(img.dimensions(), (640, 360));
    }

    #[test]
    fn test_body_color_follows_direction() {
        let renderer = ChartRenderer::new(400, 300);
        let style = *renderer.style();

        let up = renderer.draw(&[candle(1, 10.0, 12.0, 9.0, 11.0, 1.0)]).unwrap();
        assert!(up.pixels().any(|p| *p == style.bullish));
        assert!(!up.pixels().any(|p| *p == style.bearish));

        let down = renderer.draw(&[candle(1, 11.0, 12.0, 9.0, 10.0, 1.0)]).unwrap();
        assert!(down.pixels().any(|p| *p == style.bearish));
        assert!(!down.pixels().any(|p| *p == style.bullish));
    }

    #[test]
    fn test_volume_panel_is_drawn_below_prices() {
        let renderer = ChartRenderer::new(400, 300);
        let style = *renderer.style();
        let img = renderer.draw(&[candle(1, 10.0, 12.0, 9.0, 11.0, 5.0)]).unwrap();
        let (price, volume) = renderer.layout();

        let x = price.left + price.width / 2;
        let y = volume.bottom() - 1;
        assert!(y > price.bottom());
        assert_eq!(*img.get_pixel(x, y), style.bullish);
    }

    #[test]
    fn test_flat_series_does_not_fault() {
        let renderer = ChartRenderer::new(400, 300);
        let flat = vec![candle(1, 5.0, 5.0, 5.0, 5.0, 0.0); 3];
        assert!(renderer.render(&flat).unwrap().is_some());
    }

    #[test]
    fn test_non_finite_candles_are_skipped() {
        let renderer = ChartRenderer::new(400, 300);
        let bad = vec![candle(1, f64::NAN, 1.0, 1.0, 1.0, 1.0)];
        assert_eq!(renderer.render(&bad).unwrap(), None);

        let mixed = vec![bad[0], candle(2, 1.0, 2.0, 0.5, 1.5, 1.0)];
        assert!(renderer.render(&mixed).unwrap().is_some());
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let renderer = ChartRenderer::new(300, 200);
        let series = sample_series(20);
        assert_eq!(
            renderer.render(&series).unwrap(),
            renderer.render(&series).unwrap()
        );
    }

    #[tokio::test]
    async fn test_render_blocking_matches_sync() {
        let renderer = ChartRenderer::new(300, 200);
        let series = sample_series(10);
        let expected = renderer.render(&series).unwrap();
        assert_eq!(renderer.render_blocking(series).await.unwrap(), expected);
    }
}
