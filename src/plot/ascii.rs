//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! The x-axis is calendar months since the first historical date.
//!
//! Plot elements:
//! - historical costs: `o`
//! - forecast estimates: `*`, joined to the last historical point by a `-` line
//! - forecast band (lower/upper bounds): `.` lines

use chrono::NaiveDate;

use crate::domain::{ForecastPoint, ForecastReport, Observation};
use crate::series::months_between;

/// Render history plus forecast into a `width` x `height` character grid.
pub fn render_forecast_plot(
    historical: &[Observation],
    forecast: &[ForecastPoint],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let origin = historical
        .iter()
        .map(|o| o.date)
        .chain(forecast.iter().map(|p| p.date))
        .min();
    let Some(origin) = origin else {
        return "Plot: no data\n".to_string();
    };

    let xs_hist: Vec<(f64, f64)> = historical
        .iter()
        .map(|o| (month_offset(origin, o.date), o.cost))
        .collect();
    let xs_fc: Vec<(f64, f64)> = forecast
        .iter()
        .map(|p| (month_offset(origin, p.date), p.point_estimate))
        .collect();
    let lower: Vec<(f64, f64)> = forecast
        .iter()
        .map(|p| (month_offset(origin, p.date), p.lower_bound))
        .collect();
    let upper: Vec<(f64, f64)> = forecast
        .iter()
        .map(|p| (month_offset(origin, p.date), p.upper_bound))
        .collect();

    let (x_min, x_max) = x_range(&xs_hist, &xs_fc);
    let all = [xs_hist.as_slice(), xs_fc.as_slice(), lower.as_slice(), upper.as_slice()];
    let (y_min, y_max) = y_range(&all).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];
    let frame = Frame { x_min, x_max, y_min, y_max };

    // Lines first so that markers overlay them.
    let mut path: Vec<(f64, f64)> = xs_hist.last().copied().into_iter().collect();
    path.extend(xs_fc.iter().copied());
    draw_polyline(&mut grid, &path, &frame, '-');
    draw_polyline(&mut grid, &lower, &frame, '.');
    draw_polyline(&mut grid, &upper, &frame, '.');

    for &(x, y) in &xs_hist {
        let (col, row) = frame.cell(x, y, width, height);
        grid[row][col] = 'o';
    }
    for &(x, y) in &xs_fc {
        let (col, row) = frame.cell(x, y, width, height);
        grid[row][col] = '*';
    }

    let last_date = historical
        .iter()
        .map(|o| o.date)
        .chain(forecast.iter().map(|p| p.date))
        .max()
        .unwrap_or(origin);

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {origin} .. {last_date} | cost=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

/// Render a saved report (history + forecast).
pub fn render_report_plot(report: &ForecastReport, width: usize, height: usize) -> String {
    render_forecast_plot(&report.historical, &report.result.forecast, width, height)
}

struct Frame {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn cell(&self, x: f64, y: f64, width: usize, height: usize) -> (usize, usize) {
        (
            map_x(x, self.x_min, self.x_max, width),
            map_y(y, self.y_min, self.y_max, height),
        )
    }
}

fn month_offset(origin: NaiveDate, date: NaiveDate) -> f64 {
    months_between(origin, date) as f64
}

fn x_range(hist: &[(f64, f64)], fc: &[(f64, f64)]) -> (f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for &(x, _) in hist.iter().chain(fc) {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        (min_x, max_x)
    } else {
        (0.0, 1.0)
    }
}

fn y_range(series: &[&[(f64, f64)]]) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for s in series {
        for &(_, y) in *s {
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }
    if !(min_y.is_finite() && max_y.is_finite()) {
        return None;
    }
    if max_y > min_y {
        Some((min_y, max_y))
    } else {
        // Flat series: centre it.
        Some((min_y - 1.0, max_y + 1.0))
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(t: f64, t_min: f64, t_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((t - t_min) / (t_max - t_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], points: &[(f64, f64)], frame: &Frame, ch: char) {
    let height = grid.len();
    let Some(width) = grid.first().map(Vec::len) else {
        return;
    };

    let mut prev = None;
    for &(x, y) in points {
        let (col, row) = frame.cell(x, y, width, height);
        let (x0, y0) = prev.unwrap_or((col, row));
        draw_line(grid, x0, y0, col, row, ch);
        prev = Some((col, row));
    }
}

/// Integer line drawing (Bresenham-ish). Only fills empty cells.
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, m, 1).unwrap()
    }

    #[test]
    fn plot_golden_snapshot_small() {
        let history = vec![Observation::new(month(1), 100.0), Observation::new(month(2), 110.0)];
        let forecast = vec![ForecastPoint {
            date: month(3),
            point_estimate: 120.0,
            lower_bound: 120.0,
            upper_bound: 120.0,
        }];

        let txt = render_forecast_plot(&history, &forecast, 10, 5);
        let expected = concat!(
            "Plot: 2023-01-01 .. 2023-03-01 | cost=[99.00, 121.00]\n",
            "        -*\n",
            "      --  \n",
            "     o    \n",
            "          \n",
            "o         \n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn band_is_drawn_around_the_forecast() {
        let history = vec![Observation::new(month(1), 100.0), Observation::new(month(2), 100.0)];
        let forecast: Vec<ForecastPoint> = (3..=6)
            .map(|m| ForecastPoint {
                date: month(m),
                point_estimate: 100.0,
                lower_bound: 80.0,
                upper_bound: 120.0,
            })
            .collect();

        let txt = render_forecast_plot(&history, &forecast, 20, 9);
        let rows: Vec<&str> = txt.lines().skip(1).collect();
        assert_eq!(rows.len(), 9);
        assert!(rows.iter().all(|r| r.chars().count() == 20));
        assert!(rows[0].contains('.'));
        assert!(rows[8].contains('.'));
        assert_eq!(rows.iter().map(|r| r.matches('*').count()).sum::<usize>(), 4);
        assert_eq!(rows.iter().map(|r| r.matches('o').count()).sum::<usize>(), 2);
    }

    #[test]
    fn empty_input_renders_placeholder() {
        assert_eq!(render_forecast_plot(&[], &[], 40, 10), "Plot: no data\n");
    }
}
