// src/presentation/chart.rs
use crate::analysis::indicators::{calculate_ema, FAST_EMA_PERIOD, SLOW_EMA_PERIOD};
use crate::domain::artifacts::ChartHandle;
use crate::domain::errors::{PresentationError, PresentationResult};
use crate::domain::models::PriceSeries;
use std::io::Write;
use std::path::PathBuf;

/// Renders a price series to an image file
pub trait ChartRenderer: Send + Sync {
    fn render(&self, symbol: &str, series: &PriceSeries) -> PresentationResult<ChartHandle>;
}

/// Candlestick chart with EMA overlays and a volume panel, written as SVG
#[derive(Debug, Clone)]
pub struct SvgChartRenderer {
    width: u32,
    height: u32,
    output_dir: Option<PathBuf>,
}

const PADDING: f64 = 40.0;
const UP_COLOR: &str = "#26a69a";
const DOWN_COLOR: &str = "#ef5350";
const FAST_EMA_COLOR: &str = "#ff9800";
const SLOW_EMA_COLOR: &str = "#2962ff";

impl Default for SvgChartRenderer {
    fn default() -> Self {
        Self::new(1000, 600, None)
    }
}

impl SvgChartRenderer {
    pub fn new(width: u32, height: u32, output_dir: Option<PathBuf>) -> Self {
        Self {
            width: width.max(200),
            height: height.max(150),
            output_dir,
        }
    }

    /// SVG document for the series
    pub fn to_svg(&self, symbol: &str, series: &PriceSeries) -> String {
        let bars = series.bars();
        let width = self.width as f64;
        let height = self.height as f64;
        let plot_width = width - 2.0 * PADDING;
        let price_height = (height - 2.0 * PADDING) * 0.75;
        let volume_top = PADDING + price_height + 10.0;
        let volume_height = height - PADDING - volume_top;

        let max_high = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
        let min_low = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
        let price_range = if max_high > min_low { max_high - min_low } else { 1.0 };
        let max_volume = bars.iter().map(|b| b.volume).fold(0.0, f64::max);

        let step = plot_width / bars.len() as f64;
        let body_width = (step * 0.7).max(1.0);
        let x_of = |i: usize| PADDING + step * (i as f64 + 0.5);
        let y_of = |price: f64| PADDING + (max_high - price) / price_range * price_height;

        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width,
            h = self.height
        ));
        svg.push_str("<rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"16\">{} Chart ({})</text>\n",
            PADDING,
            PADDING / 2.0 + 6.0,
            escape(symbol),
            escape(series.interval())
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\" text-anchor=\"end\">{:.4}</text>\n",
            width - 4.0,
            y_of(max_high) + 4.0,
            max_high
        ));
        svg.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\" text-anchor=\"end\">{:.4}</text>\n",
            width - 4.0,
            y_of(min_low) + 4.0,
            min_low
        ));

        if let (Some(first), Some(last)) = (bars[0].open_datetime(), series.last().open_datetime()) {
            svg.push_str(&format!(
                "<text x=\"{}\" y=\"{}\" font-family=\"sans-serif\" font-size=\"11\">{} - {} UTC</text>\n",
                PADDING,
                height - 12.0,
                first.format("%Y-%m-%d %H:%M"),
                last.format("%Y-%m-%d %H:%M")
            ));
        }

        for (i, bar) in bars.iter().enumerate() {
            let x = x_of(i);
            let color = if bar.close >= bar.open { UP_COLOR } else { DOWN_COLOR };
            let body_top = y_of(bar.open.max(bar.close));
            let body_height = (y_of(bar.open.min(bar.close)) - body_top).max(1.0);

            svg.push_str(&format!(
                "<line x1=\"{x:.2}\" y1=\"{:.2}\" x2=\"{x:.2}\" y2=\"{:.2}\" stroke=\"{c}\"/>\n",
                y_of(bar.high),
                y_of(bar.low),
                x = x,
                c = color
            ));
            svg.push_str(&format!(
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>\n",
                x - body_width / 2.0,
                body_top,
                body_width,
                body_height,
                color
            ));

            if max_volume > 0.0 {
                let volume_bar = bar.volume / max_volume * volume_height;
                svg.push_str(&format!(
                    "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" fill-opacity=\"0.5\"/>\n",
                    x - body_width / 2.0,
                    volume_top + volume_height - volume_bar,
                    body_width,
                    volume_bar,
                    color
                ));
            }
        }

        let closes = series.close_prices();
        for (period, color) in [(FAST_EMA_PERIOD, FAST_EMA_COLOR), (SLOW_EMA_PERIOD, SLOW_EMA_COLOR)] {
            let ema = match calculate_ema(&closes, period) {
                Ok(ema) if ema.len() > 1 => ema,
                _ => continue,
            };
            let points: Vec<String> = ema
                .iter()
                .enumerate()
                .map(|(j, &value)| format!("{:.2},{:.2}", x_of(j + period - 1), y_of(value)))
                .collect();
            svg.push_str(&format!(
                "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"><title>EMA{}</title></polyline>\n",
                points.join(" "),
                color,
                period
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, symbol: &str, series: &PriceSeries) -> PresentationResult<ChartHandle> {
        let svg = self.to_svg(symbol, series);

        let mut builder = tempfile::Builder::new();
        builder.prefix("chart-").suffix(".svg");
        let mut file = match &self.output_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(svg.as_bytes())?;

        let (_, path) = file
            .keep()
            .map_err(|e| PresentationError::Render(format!("Failed to persist chart: {}", e)))?;

        log::info!("Rendered {} chart to {}", symbol, path.display());
        Ok(ChartHandle::new(path))
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
