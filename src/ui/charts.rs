use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoints, Points};

use crate::color::exit_color;
use crate::data::aggregate::GroupCount;
use crate::state::Orbit;
use crate::view::{ScatterPoint3, ViewModel};

const CHART_HEIGHT: f32 = 320.0;

fn exit_label(exited: bool) -> &'static str {
    if exited {
        "Exited = 1"
    } else {
        "Exited = 0"
    }
}

// ---------------------------------------------------------------------------
// Balance vs credit score
// ---------------------------------------------------------------------------

/// 2-D scatter of balance against credit score, one series per exit status.
pub fn balance_scatter(ui: &mut Ui, view: &ViewModel) {
    Plot::new("balance_vs_credit")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Balance")
        .y_axis_label("Credit Score")
        .show(ui, |plot_ui| {
            for exited in [false, true] {
                let points: PlotPoints = view
                    .scatter
                    .iter()
                    .filter(|p| p.exited == exited)
                    .map(|p| [p.balance, p.credit_score])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .radius(2.0)
                        .color(exit_color(exited).gamma_multiply(0.7))
                        .name(exit_label(exited)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Projected 3-D scatter
// ---------------------------------------------------------------------------

/// Min / max of one axis; degenerate axes are widened so they normalise to 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    pub fn of(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |acc, v| match acc {
            None => Some(AxisRange { min: v, max: v }),
            Some(r) => Some(AxisRange {
                min: r.min.min(v),
                max: r.max.max(v),
            }),
        })
    }

    /// Map into `[-1, 1]`.
    pub fn normalize(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            0.0
        } else {
            2.0 * (v - self.min) / span - 1.0
        }
    }
}

/// Orthographic projection of a normalised `(x, y, z)` point, z up.
pub fn project(p: [f64; 3], orbit: Orbit) -> [f64; 2] {
    let (sy, cy) = (orbit.yaw as f64).sin_cos();
    let (sp, cp) = (orbit.pitch as f64).sin_cos();
    let x = p[0] * cy - p[1] * sy;
    let depth = p[0] * sy + p[1] * cy;
    let y = p[2] * cp + depth * sp;
    [x, y]
}

/// Credit score × age × number of products, rotated by the orbit sliders.
pub fn scatter_3d(ui: &mut Ui, view: &ViewModel, orbit: &mut Orbit) {
    ui.horizontal(|ui: &mut Ui| {
        ui.add(egui::Slider::new(&mut orbit.yaw, -std::f32::consts::PI..=std::f32::consts::PI).text("yaw"));
        ui.add(egui::Slider::new(&mut orbit.pitch, -1.5..=1.5).text("pitch"));
    });

    let pts = &view.scatter_3d;
    let ranges = (
        AxisRange::of(pts.iter().map(|p| p.credit_score)),
        AxisRange::of(pts.iter().map(|p| p.age)),
        AxisRange::of(pts.iter().map(|p| p.num_of_products)),
    );
    let (Some(rx), Some(ry), Some(rz)) = ranges else {
        ui.label("No data");
        return;
    };
    let orbit = *orbit;
    let normalized = |p: &ScatterPoint3| {
        [
            rx.normalize(p.credit_score),
            ry.normalize(p.age),
            rz.normalize(p.num_of_products),
        ]
    };

    Plot::new("scatter_3d")
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .legend(Legend::default())
        .show_axes(false)
        .show_grid(false)
        .show(ui, |plot_ui| {
            let origin = [-1.0, -1.0, -1.0];
            let axes = [
                ("Credit Score", [1.0, -1.0, -1.0]),
                ("Age", [-1.0, 1.0, -1.0]),
                ("Number of Products", [-1.0, -1.0, 1.0]),
            ];
            for (name, end) in axes {
                let line: PlotPoints = vec![project(origin, orbit), project(end, orbit)].into();
                plot_ui.line(Line::new(line).color(Color32::GRAY).name(name));
                let [x, y] = project(end, orbit);
                plot_ui.text(egui_plot::Text::new(
                    egui_plot::PlotPoint::new(x, y),
                    RichText::new(name).small(),
                ));
            }

            for exited in [false, true] {
                let points: PlotPoints = pts
                    .iter()
                    .filter(|p| p.exited == exited)
                    .map(|p| project(normalized(p), orbit))
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .radius(2.0)
                        .color(exit_color(exited).gamma_multiply(0.7))
                        .name(exit_label(exited)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped bar charts
// ---------------------------------------------------------------------------

/// Grouped bars of `(category, exited)` counts; one bar per exit status in each group.
pub fn group_bars(ui: &mut Ui, id: &str, axis_label: &str, counts: &[GroupCount]) {
    let mut categories: Vec<String> = counts.iter().map(|g| g.category.clone()).collect();
    categories.dedup();
    let labels = categories.clone();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(axis_label)
        .y_axis_label("Count")
        .allow_drag(false)
        .allow_scroll(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() < 1e-6 && idx >= 0.0 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            for exited in [false, true] {
                let offset = if exited { 0.2 } else { -0.2 };
                let bars: Vec<Bar> = counts
                    .iter()
                    .filter(|g| g.exited == exited)
                    .filter_map(|g| {
                        let i = categories.iter().position(|c| *c == g.category)?;
                        Some(
                            Bar::new(i as f64 + offset, g.count as f64)
                                .width(0.4)
                                .name(format!("{} ({})", g.category, exit_label(exited))),
                        )
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .color(exit_color(exited))
                        .name(exit_label(exited)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Salary box plot
// ---------------------------------------------------------------------------

/// Estimated salary distribution per exit status.
pub fn salary_boxes(ui: &mut Ui, view: &ViewModel) {
    Plot::new("salary_by_exit")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Exited")
        .y_axis_label("Estimated Salary")
        .x_axis_formatter(|mark, _range| {
            match mark.value.round() as i64 {
                0 if mark.value.abs() < 1e-6 => "0".to_string(),
                1 if (mark.value - 1.0).abs() < 1e-6 => "1".to_string(),
                _ => String::new(),
            }
        })
        .show(ui, |plot_ui| {
            for d in &view.salary_boxes {
                let x = f64::from(u8::from(d.exited));
                let color = exit_color(d.exited);
                let elem = BoxElem::new(
                    x,
                    BoxSpread::new(d.lower_whisker, d.q1, d.median, d.q3, d.upper_whisker),
                )
                .box_width(0.5)
                .fill(color.gamma_multiply(0.3))
                .stroke(egui::Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(exit_label(d.exited)));

                if !d.outliers.is_empty() {
                    let outliers: PlotPoints = d.outliers.iter().map(|&v| [x, v]).collect();
                    plot_ui.points(Points::new(outliers).radius(2.5).color(color));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_range_normalizes_to_unit_interval() {
        let r = AxisRange::of([350.0, 850.0, 600.0].into_iter()).unwrap();
        assert_eq!(r.normalize(350.0), -1.0);
        assert_eq!(r.normalize(850.0), 1.0);
        assert_eq!(r.normalize(600.0), 0.0);
        assert!(AxisRange::of(std::iter::empty()).is_none());

        let flat = AxisRange::of([2.0, 2.0].into_iter()).unwrap();
        assert_eq!(flat.normalize(2.0), 0.0);
    }

    #[test]
    fn projection_without_rotation_shows_x_and_z() {
        let front = Orbit { yaw: 0.0, pitch: 0.0 };
        assert_eq!(project([0.5, 0.9, -0.25], front), [0.5, -0.25]);
    }

    #[test]
    fn quarter_turn_yaw_swaps_horizontal_axis() {
        let side = Orbit {
            yaw: std::f32::consts::FRAC_PI_2,
            pitch: 0.0,
        };
        let [x, y] = project([0.0, 1.0, 0.5], side);
        assert!((x + 1.0).abs() < 1e-6);
        assert!((y - 0.5).abs() < 1e-6);
    }
}
