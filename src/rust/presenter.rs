//! Turns a predicted label into the text shown to the user.

use std::collections::HashMap;
use std::fmt;

use lazy_static::lazy_static;
use serde::Serialize;

use crate::labels::ObesityLevel;
use crate::Prediction;

/// Shown when a prediction cannot be mapped to a known category.
pub const GENERIC_ERROR: &str = "Something went wrong while predicting. Please try again.";

/// Colour used to highlight a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Blue,
    Green,
    Yellow,
    Orange,
    Red,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Blue => "blue",
            Severity::Green => "green",
            Severity::Yellow => "yellow",
            Severity::Orange => "orange",
            Severity::Red => "red",
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            Severity::Blue => "\x1b[34m",
            Severity::Green => "\x1b[32m",
            Severity::Yellow => "\x1b[33m",
            Severity::Orange => "\x1b[38;5;208m",
            Severity::Red => "\x1b[31m",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelInfo {
    pub description: &'static str,
    pub recommendation: &'static str,
    pub severity: Severity,
}

lazy_static! {
    static ref LABEL_INFO: HashMap<&'static str, LabelInfo> = {
        let mut table = HashMap::new();
        table.insert("Insufficient_Weight", LabelInfo {
            description: "You are in the Insufficient Weight category. Your body may need more nutritional intake to reach a healthy weight.",
            recommendation: "Consider consulting a nutritionist for a suitable diet and to look after your overall health.",
            severity: Severity::Blue,
        });
        table.insert("Normal_Weight", LabelInfo {
            description: "Your weight is within the healthy normal range. Keep an active lifestyle and a balanced, nutritious diet.",
            recommendation: "Continue your healthy lifestyle and have regular health check-ups.",
            severity: Severity::Green,
        });
        table.insert("Overweight_Level_I", LabelInfo {
            description: "You are in the Overweight Level I category. This is an early warning to start paying attention to diet and physical activity.",
            recommendation: "Increase physical activity and gradually reduce high-calorie foods.",
            severity: Severity::Yellow,
        });
        table.insert("Overweight_Level_II", LabelInfo {
            description: "You are in the Overweight Level II category. The risk of health problems rises without lifestyle changes.",
            recommendation: "Consult a health professional soon and set up a structured diet and exercise plan.",
            severity: Severity::Orange,
        });
        table.insert("Obesity_Type_I", LabelInfo {
            description: "You are in the Obesity Type I category: excess body fat that can increase the risk of chronic disease.",
            recommendation: "Talking to a doctor or nutritionist is strongly advised to start a safe and effective weight-loss program.",
            severity: Severity::Orange,
        });
        table.insert("Obesity_Type_II", LabelInfo {
            description: "You are in the Obesity Type II category, a severe level with significant health risks.",
            recommendation: "Lifestyle changes under close medical supervision are needed to avoid serious complications.",
            severity: Severity::Red,
        });
        table.insert("Obesity_Type_III", LabelInfo {
            description: "Obesity Type III (morbid obesity) is very serious and needs prompt medical intervention.",
            recommendation: "See a specialist as soon as possible for appropriate care, which may include medical therapy or surgery.",
            severity: Severity::Red,
        });
        table
    };
}

/// Looks up the canned text for a label name
pub fn describe(label: &str) -> Option<&'static LabelInfo> {
    LABEL_INFO.get(label)
}

/// The text report for one prediction.
pub struct Report<'a> {
    pub prediction: &'a Prediction,
    pub color: bool,
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prediction = self.prediction;
        match describe(prediction.label.name()) {
            Some(info) => {
                writeln!(f, "{}", heading(prediction.label, info.severity, self.color))?;
                writeln!(f, "Severity: {}", info.severity.name())?;
                writeln!(f, "{}", info.description)?;
                writeln!(f, "Recommendation: {}", info.recommendation)?;
            }
            None => writeln!(f, "{}", render_unknown())?,
        }
        writeln!(f, "BMI (weight / height^2): {:.2}", prediction.bmi)?;

        if !prediction.warnings.is_empty() {
            writeln!(f, "Warnings:")?;
            for warning in &prediction.warnings {
                writeln!(f, "  - {}", warning)?;
            }
        }
        Ok(())
    }
}

/// Renders the result block for a successful prediction
pub fn render_prediction(prediction: &Prediction, color: bool) -> String {
    Report { prediction, color }.to_string()
}

pub fn render_unknown() -> &'static str {
    GENERIC_ERROR
}

fn heading(label: ObesityLevel, severity: Severity, color: bool) -> String {
    let text = format!("Prediction: {}", label.display_name());
    if color {
        format!("{}{}\x1b[0m", severity.ansi(), text)
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::InputWarning;
    use crate::encoder::PipelineVariant;

    fn prediction(label: ObesityLevel) -> Prediction {
        Prediction {
            label,
            bmi: 26.234567,
            warnings: Vec::new(),
            variant: PipelineVariant::OneHot,
        }
    }

    #[test]
    fn test_every_label_has_info() {
        for level in ObesityLevel::ALL {
            assert!(describe(level.name()).is_some(), "missing info for {}", level);
        }
    }

    #[test]
    fn test_severities() {
        assert_eq!(describe("Insufficient_Weight").unwrap().severity, Severity::Blue);
        assert_eq!(describe("Normal_Weight").unwrap().severity, Severity::Green);
        assert_eq!(describe("Overweight_Level_I").unwrap().severity, Severity::Yellow);
        assert_eq!(describe("Obesity_Type_I").unwrap().severity, Severity::Orange);
        assert_eq!(describe("Obesity_Type_III").unwrap().severity, Severity::Red);
    }

    #[test]
    fn test_unknown_label() {
        assert!(describe("Very_Heavy").is_none());
        assert_eq!(render_unknown(), GENERIC_ERROR);
    }

    #[test]
    fn test_render_plain() {
        let text = render_prediction(&prediction(ObesityLevel::OverweightLevelI), false);
        assert!(text.starts_with("Prediction: Overweight Level I\n"));
        assert!(text.contains("Severity: yellow"));
        assert!(text.contains("BMI (weight / height^2): 26.23"));
        assert!(!text.contains("Warnings:"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_report_lines() {
        let mut p = prediction(ObesityLevel::NormalWeight);
        p.warnings.push(InputWarning::BmiMismatch {
            entered: 30.0,
            computed: 26.234567,
        });
        let report = Report {
            prediction: &p,
            color: false,
        };
        let text = format!("{}", report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Prediction: Normal Weight");
        assert_eq!(lines[1], "Severity: green");
        assert!(lines[3].starts_with("Recommendation: "));
        assert_eq!(lines[4], "BMI (weight / height^2): 26.23");
        assert_eq!(lines[5], "Warnings:");
        assert_eq!(lines.len(), 7);
        assert_eq!(text, render_prediction(&p, false));
    }

    #[test]
    fn test_render_with_color_and_warnings() {
        let mut p = prediction(ObesityLevel::ObesityTypeII);
        p.warnings.push(InputWarning::OutOfTrainingRange {
            field: "Age",
            value: 70.0,
            range: (14.0, 61.0),
        });
        let text = render_prediction(&p, true);
        assert!(text.starts_with("\x1b[31mPrediction: Obesity Type II\x1b[0m"));
        assert!(text.contains("Warnings:\n  - Age = 70 is outside the training range 14 - 61"));
    }
}
