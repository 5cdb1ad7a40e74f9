//! Display text for a computed report.
//!
//! Everything here is plain strings; the Yew components place them in text
//! nodes, so user-typed values can never be read as markup.

use crate::form::Report;

/// Colour family of a result card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Slate,
    Emerald,
    Amber,
}

impl Tone {
    pub fn card_class(&self) -> &'static str {
        match self {
            Tone::Slate => "result-card tone-slate",
            Tone::Emerald => "result-card tone-emerald",
            Tone::Amber => "result-card tone-amber",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub title: String,
    pub value: String,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub cards: Vec<ResultCard>,
    pub summary: Vec<String>,
}

/// Fixed-point text the way the browser's `Number.prototype.toFixed` writes it.
///
/// Exact halves round away from zero (`80.5` gives `"81"`), where `format!`
/// would round them to even. Values that only look like halves in decimal,
/// such as `1.005`, are not ties and round by their exact binary value.
pub fn to_fixed(value: f64, digits: usize) -> String {
    let scale = 10f64.powi(digits as i32);
    let magnitude = value.abs();
    let scaled = magnitude * scale;
    // Zero residual means the product was exact, so a .5 fraction is a true tie.
    let exact = magnitude.mul_add(scale, -scaled) == 0.0;
    if exact && scaled.fract() == 0.5 {
        let sign = if value < 0.0 { "-" } else { "" };
        format!("{}{:.*}", sign, digits, (scaled.trunc() + 1.0) / scale)
    } else {
        format!("{:.*}", digits, value)
    }
}

/// Format story points with two decimals, e.g. `16.87 pts`.
pub fn format_points(points: f64) -> String {
    format!("{} pts", to_fixed(points, 2))
}

impl ResultView {
    pub fn new(report: &Report) -> Self {
        let config = &report.config;
        let result = &report.result;

        let cards = vec![
            ResultCard {
                title: "Capacité ajustée".to_string(),
                value: format_points(result.adjusted_capacity),
                tone: Tone::Slate,
            },
            ResultCard {
                title: format!("Build ({} %)", to_fixed(config.build_percent, 0)),
                value: format_points(result.build_capacity),
                tone: Tone::Emerald,
            },
            ResultCard {
                title: format!(
                    "Fix, dette, améliorations ({} %)",
                    to_fixed(100.0 - config.build_percent, 0)
                ),
                value: format_points(result.tech_capacity),
                tone: Tone::Amber,
            },
        ];

        let summary = vec![
            format!("Équipe: {} développeurs", config.developer_count),
            format!("Sprint: {} jours ouvrés", config.sprint_days),
            format!(
                "Absence totale équivalente développeur: {}",
                to_fixed(result.total_absence_dev_equivalent, 2)
            ),
            format!("Perte relative: {} %", to_fixed(result.loss_ratio * 100.0, 1)),
        ];

        Self { cards, summary }
    }
}
