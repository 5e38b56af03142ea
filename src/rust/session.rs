//! The interactive loop: form, prediction, report, and again.

use std::io::{BufRead, Write};

use log::warn;

use crate::form::{CategoryOptions, Form};
use crate::presenter::{render_prediction, render_unknown};
use crate::{Classifier, ClassifierError};

pub const BANNER: &str = "\n=== Obesity Category Prediction ===";
pub const ANOTHER_PROMPT: &str = "Run another prediction?";

/// Repeats form → prediction → report until the user declines or input ends.
///
/// The form lists only the categories `classifier` was trained on. A malformed
/// entry aborts the current submission only: it is reported inline and the user
/// may start another. Returns the writer once the session is over.
///
/// # Errors
/// `IoError` if the terminal cannot be read or written
pub fn run_session<R: BufRead, W: Write>(
    classifier: &Classifier,
    input: R,
    output: W,
    color: bool,
) -> Result<W, ClassifierError> {
    let mut form = Form::new(input, output).with_options(CategoryOptions::for_classifier(classifier));

    loop {
        form.say(BANNER)?;

        match form.collect() {
            Ok(Some(attributes)) => match classifier.predict(&attributes) {
                Ok(prediction) => form.say(&render_prediction(&prediction, color))?,
                Err(ClassifierError::UnknownLabel(index)) => {
                    warn!("Model returned unknown class index {}", index);
                    form.say(render_unknown())?;
                }
                Err(e) => form.say(&e.to_string())?,
            },
            Ok(None) => break,
            Err(e @ ClassifierError::InputError(_)) => form.say(&e.to_string())?,
            Err(e) => return Err(e),
        }

        if !ask_again(&mut form)? {
            break;
        }
    }

    Ok(form.into_output())
}

/// Asks until the answer is understood. End of input counts as no.
fn ask_again<R: BufRead, W: Write>(form: &mut Form<R, W>) -> Result<bool, ClassifierError> {
    loop {
        match form.confirm(ANOTHER_PROMPT) {
            Ok(answer) => return Ok(answer == Some(true)),
            Err(e @ ClassifierError::InputError(_)) => form.say(&e.to_string())?,
            Err(e) => return Err(e),
        }
    }
}
