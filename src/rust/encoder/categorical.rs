use log::warn;

use crate::attributes::InputWarning;

/// A categorical input with a closed set of trained variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalField {
    pub name: &'static str,
    pub variants: &'static [&'static str],
    /// Index into `variants` used for values not seen during training
    pub default: usize,
}

impl CategoricalField {
    /// Returns the index of `value` within the trained variants.
    ///
    /// Unknown values degrade to `default` and record a warning instead of failing.
    pub fn resolve(&self, value: &str, warnings: &mut Vec<InputWarning>) -> usize {
        match position(self.variants.iter().copied(), value) {
            Some(index) => index,
            None => {
                let substitute = self.variants[self.default];
                warn!("Unknown {} value '{}', substituting '{}'", self.name, value.trim(), substitute);
                warnings.push(InputWarning::UnknownCategory {
                    field: self.name,
                    value: value.trim().to_string(),
                    substitute: substitute.to_string(),
                });
                self.default
            }
        }
    }

    /// Expands `value` into indicator columns, exactly one of which is 1.0
    pub fn one_hot<const K: usize>(&self, value: &str, warnings: &mut Vec<InputWarning>) -> [f64; K] {
        debug_assert_eq!(self.variants.len(), K);
        let active = self.resolve(value, warnings);
        std::array::from_fn(|i| if i == active { 1.0 } else { 0.0 })
    }
}

/// Label-encodes `value` against a class list loaded at runtime, falling back to code 0.
pub(crate) fn resolve_code(
    field: &'static str,
    classes: &[String],
    value: &str,
    warnings: &mut Vec<InputWarning>,
) -> usize {
    match position(classes.iter().map(String::as_str), value) {
        Some(code) => code,
        None => {
            let substitute = classes.first().cloned().unwrap_or_default();
            warn!("Unknown {} value '{}', substituting code 0 ('{}')", field, value.trim(), substitute);
            warnings.push(InputWarning::UnknownCategory {
                field,
                value: value.trim().to_string(),
                substitute,
            });
            0
        }
    }
}

fn position<'a>(mut candidates: impl Iterator<Item = &'a str>, value: &str) -> Option<usize> {
    let value = value.trim();
    candidates.position(|candidate| candidate == value)
}
