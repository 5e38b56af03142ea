//! Interactive terminal form collecting one set of [`PatientAttributes`].
//!
//! Generic over the reader and writer so it can be driven by scripted input in tests.

use std::io::{BufRead, Write};

use crate::attributes::{FieldRange, Gender, PatientAttributes};
use crate::encoder::{FeatureEncoder, OneHotEncoder};
use crate::{Classifier, ClassifierError};

/// A numeric question with its range hint. Empty input selects `default`.
#[derive(Debug, Clone, Copy)]
pub struct NumericPrompt {
    pub label: &'static str,
    pub hint: FieldRange,
    pub default: f64,
}

impl NumericPrompt {
    const fn new(label: &'static str, min: f64, max: f64) -> Self {
        Self {
            label,
            hint: FieldRange::new(min, max),
            default: min,
        }
    }
}

pub const AGE: NumericPrompt = NumericPrompt::new("Age (years)", 10.0, 100.0);
pub const HEIGHT: NumericPrompt = NumericPrompt::new("Height (m)", 1.20, 2.20);
pub const WEIGHT: NumericPrompt = NumericPrompt::new("Weight (kg)", 30.0, 200.0);
pub const BMI: NumericPrompt = NumericPrompt::new("BMI", 10.0, 60.0);
pub const FCVC: NumericPrompt = NumericPrompt::new("Vegetable consumption frequency", 1.0, 3.0);
pub const NCP: NumericPrompt = NumericPrompt::new("Number of main meals", 1.0, 4.0);
pub const CH2O: NumericPrompt = NumericPrompt::new("Daily water intake (litres)", 1.0, 4.0);
pub const FAF: NumericPrompt = NumericPrompt::new("Weekly physical activity (hours)", 0.0, 6.0);
pub const TUE: NumericPrompt = NumericPrompt::new("Daily screen time (hours)", 0.0, 10.0);

// Display order; only values the model was trained on are listed.
const FREQUENCIES: [&str; 4] = ["no", "Sometimes", "Frequently", "Always"];
const TRANSPORTS: [&str; 5] = ["Public_Transportation", "Walking", "Automobile", "Motorbike", "Bike"];

/// Options listed for the categorical questions. The first option is the default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryOptions {
    pub caec: Vec<String>,
    pub calc: Vec<String>,
    pub mtrans: Vec<String>,
}

impl CategoryOptions {
    /// Lists the values `encoder` was trained on
    pub fn for_encoder(encoder: &dyn FeatureEncoder) -> Self {
        Self {
            caec: display_order(encoder.trained_categories("CAEC"), &FREQUENCIES),
            calc: display_order(encoder.trained_categories("CALC"), &FREQUENCIES),
            mtrans: display_order(encoder.trained_categories("MTRANS"), &TRANSPORTS),
        }
    }

    pub fn for_classifier(classifier: &Classifier) -> Self {
        Self::for_encoder(classifier.encoder())
    }
}

impl Default for CategoryOptions {
    fn default() -> Self {
        Self::for_encoder(&OneHotEncoder::default())
    }
}

/// Known values first in `preferred` order, then any other trained values as given
fn display_order(trained: Vec<String>, preferred: &[&str]) -> Vec<String> {
    let mut ordered: Vec<String> = preferred
        .iter()
        .filter(|p| trained.iter().any(|t| t == *p))
        .map(|p| p.to_string())
        .collect();
    ordered.extend(trained.into_iter().filter(|t| !preferred.contains(&t.as_str())));
    ordered
}

macro_rules! or_eof {
    ($e:expr) => {
        match $e? {
            Some(value) => value,
            None => return Ok(None),
        }
    };
}

pub struct Form<R, W> {
    input: R,
    output: W,
    options: CategoryOptions,
}

impl<R: BufRead, W: Write> Form<R, W> {
    /// A form listing the one-hot pipeline's categories
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            options: CategoryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: CategoryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &CategoryOptions {
        &self.options
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Asks every question once. Returns `Ok(None)` if the input ends first.
    ///
    /// # Errors
    /// `InputError` for a value that is not a number, or a choice that matches no option
    pub fn collect(&mut self) -> Result<Option<PatientAttributes>, ClassifierError> {
        let age = or_eof!(self.number(&AGE));
        let gender = or_eof!(self.choice("Gender", &[("Female", Gender::Female), ("Male", Gender::Male)]));
        let height = or_eof!(self.number(&HEIGHT));
        let weight = or_eof!(self.number(&WEIGHT));

        let computed = weight / (height * height);
        let bmi = or_eof!(self.optional_number(&BMI, computed));

        let favc = or_eof!(self.yes_no("Frequent consumption of high-calorie food?"));
        let fcvc = or_eof!(self.number(&FCVC));
        let ncp = or_eof!(self.number(&NCP));
        let scc = or_eof!(self.yes_no("Monitors calorie intake / nutrition consultation?"));
        let smoke = or_eof!(self.yes_no("Smoker?"));
        let ch2o = or_eof!(self.number(&CH2O));
        let family_history = or_eof!(self.yes_no("Family history of overweight?"));
        let faf = or_eof!(self.number(&FAF));
        let tue = or_eof!(self.number(&TUE));
        let options = self.options.clone();
        let caec = or_eof!(self.category("Eating between meals", &options.caec));
        let calc = or_eof!(self.category("Alcohol consumption", &options.calc));
        let mtrans = or_eof!(self.category("Usual transportation", &options.mtrans));

        Ok(Some(PatientAttributes {
            age,
            gender,
            height,
            weight,
            bmi,
            favc,
            fcvc,
            ncp,
            scc,
            smoke,
            ch2o,
            family_history,
            faf,
            tue,
            caec,
            calc,
            mtrans,
        }))
    }

    /// Asks a yes/no question, defaulting to no. Returns `Ok(None)` at end of input.
    pub fn confirm(&mut self, question: &str) -> Result<Option<bool>, ClassifierError> {
        self.yes_no(question)
    }

    /// Writes a line of text to the form's output
    pub fn say(&mut self, text: &str) -> Result<(), ClassifierError> {
        writeln!(self.output, "{}", text).map_err(io_error)
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, ClassifierError> {
        write!(self.output, "{}", prompt).map_err(io_error)?;
        self.output.flush().map_err(io_error)?;

        let mut line = String::new();
        if self.input.read_line(&mut line).map_err(io_error)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn number(&mut self, prompt: &NumericPrompt) -> Result<Option<f64>, ClassifierError> {
        let text = format!("{} [{}, default {}]: ", prompt.label, prompt.hint, prompt.default);
        let line = or_eof!(self.read_line(&text));
        if line.is_empty() {
            return Ok(Some(prompt.default));
        }
        parse_number(prompt.label, &line).map(Some)
    }

    /// Empty input keeps `None`, meaning the computed value will be used
    fn optional_number(&mut self, prompt: &NumericPrompt, computed: f64) -> Result<Option<Option<f64>>, ClassifierError> {
        let text = format!("{} [{}, Enter for computed {:.2}]: ", prompt.label, prompt.hint, computed);
        let line = or_eof!(self.read_line(&text));
        if line.is_empty() {
            return Ok(Some(None));
        }
        parse_number(prompt.label, &line).map(|v| Some(Some(v)))
    }

    /// A closed choice; the first option is the default
    fn choice<T: Copy>(&mut self, label: &str, options: &[(&str, T)]) -> Result<Option<T>, ClassifierError> {
        let listing = options
            .iter()
            .enumerate()
            .map(|(i, (name, _))| format!("{}) {}", i + 1, name))
            .collect::<Vec<_>>()
            .join("  ");
        let line = or_eof!(self.read_line(&format!("{} {} [1]: ", label, listing)));

        let index = match pick(&line, options.iter().map(|(name, _)| *name)) {
            Some(index) => index,
            None => {
                return Err(ClassifierError::InputError(format!(
                    "'{}' is not a valid choice for {}",
                    line, label
                )))
            }
        };
        Ok(Some(options[index].1))
    }

    /// Accepts a number, the full word or its first letter; empty input means no
    fn yes_no(&mut self, label: &str) -> Result<Option<bool>, ClassifierError> {
        let line = or_eof!(self.read_line(&format!("{} 1) No  2) Yes [1]: ", label)));
        match line.to_ascii_lowercase().as_str() {
            "" | "1" | "n" | "no" => Ok(Some(false)),
            "2" | "y" | "yes" => Ok(Some(true)),
            _ => Err(ClassifierError::InputError(format!(
                "'{}' is not a valid choice for {}",
                line, label
            ))),
        }
    }

    /// Like `choice`, but text matching no option is passed through unchanged
    /// so the encoder can decide how to treat it.
    fn category(&mut self, label: &str, options: &[String]) -> Result<Option<String>, ClassifierError> {
        let listing = options
            .iter()
            .enumerate()
            .map(|(i, name)| format!("{}) {}", i + 1, name))
            .collect::<Vec<_>>()
            .join("  ");
        let line = or_eof!(self.read_line(&format!("{} {} [1]: ", label, listing)));

        Ok(Some(match pick(&line, options.iter().map(String::as_str)) {
            Some(index) => options[index].clone(),
            None => line,
        }))
    }
}

/// Resolves empty input (first option), a 1-based number, or a case-insensitive name
fn pick<'a>(line: &str, names: impl Iterator<Item = &'a str> + Clone) -> Option<usize> {
    let count = names.clone().count();
    if line.is_empty() {
        return (count > 0).then_some(0);
    }
    if let Ok(n) = line.parse::<usize>() {
        return (1..=count).contains(&n).then(|| n - 1);
    }
    names.into_iter().position(|name| name.eq_ignore_ascii_case(line))
}

/// Parses a finite decimal number
pub fn parse_number(label: &str, text: &str) -> Result<f64, ClassifierError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ClassifierError::InputError(format!(
            "'{}' is not a valid number for {}",
            text.trim(),
            label
        ))),
    }
}

fn io_error(err: std::io::Error) -> ClassifierError {
    ClassifierError::IoError(format!("Failed to read or write the form: {}", err))
}
