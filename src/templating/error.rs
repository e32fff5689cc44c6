//! Conversion of Tera errors into handler errors.

use std::error::Error;

use crate::core::HandlerError;

/// Format a Tera error chain into a readable message.
///
/// Every message of the chain is kept, minus the internal `__tera_one_off`
/// template name Tera uses for one-off renders.
#[must_use]
pub fn format_tera_error(error: &tera::Error) -> String {
    let mut all_messages = vec![error.to_string()];
    let mut current_error: Option<&dyn Error> = error.source();
    while let Some(err) = current_error {
        all_messages.push(err.to_string());
        current_error = err.source();
    }

    let messages: Vec<String> = all_messages
        .into_iter()
        .map(|msg| {
            msg.replace("while rendering '__tera_one_off'", "")
                .replace("Failed to render '__tera_one_off'", "Template rendering failed")
                .replace("Failed to parse '__tera_one_off'", "Template syntax error")
                .replace("'__tera_one_off'", "template")
                .trim()
                .to_string()
        })
        .filter(|cleaned| {
            !cleaned.is_empty()
                && cleaned != "Template rendering failed"
                && cleaned != "Template syntax error"
        })
        .collect();

    if messages.is_empty() {
        "Template syntax error (see details above)".to_string()
    } else {
        messages.join("\n  → ")
    }
}

/// Wrap a Tera error raised while rendering or loading `template`.
#[must_use]
pub fn template_error(template: &str, error: &tera::Error) -> HandlerError {
    HandlerError::Template {
        template: template.to_string(),
        message: format_tera_error(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tera::{Context, Tera};

    #[test]
    fn test_one_off_name_is_removed() {
        let error = Tera::one_off("{{ missing }}", &Context::new(), false).unwrap_err();
        let message = format_tera_error(&error);
        assert!(!message.contains("__tera_one_off"));
        assert!(message.contains("missing"));
    }

    #[test]
    fn test_template_error_names_template() {
        let mut tera = Tera::default();
        tera.add_raw_template("module.html", "{{ module.name | nope }}").unwrap();
        let error = tera.render("module.html", &Context::new()).unwrap_err();
        let converted = template_error("module.html", &error);
        match converted {
            HandlerError::Template { template, .. } => assert_eq!(template, "module.html"),
            other => panic!("expected a template error, got {other:?}"),
        }
    }
}
