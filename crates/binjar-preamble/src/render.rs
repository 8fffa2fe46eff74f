//! Placeholder substitution for launcher templates.

use tracing::debug;

use crate::options::RuntimeOptions;
use crate::template::Template;

/// Values substituted into a template.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub name: &'a str,
    pub version: &'a str,
    /// Entry point (main namespace or class).
    pub main: &'a str,
    pub options: &'a RuntimeOptions,
}

impl RenderContext<'_> {
    fn lookup(&self, placeholder: &str) -> Option<String> {
        match placeholder {
            "name" => Some(self.name.to_string()),
            "version" => Some(self.version.to_string()),
            "main" => Some(self.main.to_string()),
            "jvm_opts" => Some(self.options.posix()),
            "win_jvm_opts" => Some(self.options.windows()),
            _ => None,
        }
    }
}

/// Rendered launcher bytes, ready to be placed in front of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble(Vec<u8>);

impl Preamble {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Render `template` with the values in `ctx`.
///
/// `{{name}}`, `{{version}}`, `{{main}}`, `{{jvm_opts}}` and
/// `{{win_jvm_opts}}` are substituted in one pass; unknown placeholders stay
/// as written. Every `\$` in the template text becomes `$`, once, left to
/// right; substituted values are inserted as given. Verbatim templates come
/// back unchanged.
pub fn render(template: &Template, ctx: &RenderContext<'_>) -> Preamble {
    let bytes = match template {
        Template::Verbatim(bytes) => bytes.clone(),
        Template::Text(text) => substitute(text, ctx).into_bytes(),
    };
    debug!(bytes = bytes.len(), "rendered preamble");
    Preamble(bytes)
}

fn substitute(text: &str, ctx: &RenderContext<'_>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        out.push_str(&unescape(&rest[..open]));
        let after = &rest[open + 2..];
        let replaced = after
            .find("}}")
            .and_then(|close| Some((close, ctx.lookup(&after[..close])?)));
        match replaced {
            Some((close, value)) => {
                out.push_str(&value);
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(&unescape(rest));
    out
}

fn unescape(literal: &str) -> String {
    literal.replace("\\$", "$")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(options: &RuntimeOptions) -> RenderContext<'_> {
        RenderContext {
            name: "app",
            version: "1.2.0",
            main: "app.core",
            options,
        }
    }

    fn text(template: &str, options: &RuntimeOptions) -> String {
        let preamble = render(&Template::Text(template.to_string()), &ctx(options));
        String::from_utf8(preamble.into_bytes()).unwrap()
    }

    #[test]
    fn test_placeholders() {
        let options = RuntimeOptions::new(["-Dhome=$HOME"]);
        assert_eq!(
            text("{{name}}-{{version}} {{main}} [{{jvm_opts}}] [{{win_jvm_opts}}]", &options),
            "app-1.2.0 app.core [-Dhome=$HOME] [-Dhome=%HOME%]"
        );
    }

    #[test]
    fn test_unknown_placeholder_untouched() {
        let options = RuntimeOptions::default();
        assert_eq!(text("{{nope}} {{name}} {{", &options), "{{nope}} app {{");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let options = RuntimeOptions::default();
        let ctx = RenderContext {
            name: "{{version}}",
            ..ctx(&options)
        };
        let preamble = render(&Template::Text("{{name}}".to_string()), &ctx);
        assert_eq!(preamble.as_bytes(), b"{{version}}");
    }

    #[test]
    fn test_unescape_once() {
        let options = RuntimeOptions::default();
        assert_eq!(text(r"echo \$HOME", &options), "echo $HOME");
        assert_eq!(text(r"echo \\$HOME", &options), r"echo \$HOME");
    }

    #[test]
    fn test_escaped_marker_in_values_kept() {
        let options = RuntimeOptions::new([r"-Dx=\$y"]);
        assert_eq!(
            text(r"\$A {{jvm_opts}} \$B", &options),
            r"$A -Dx=\$y $B"
        );
    }

    #[test]
    fn test_verbatim_bytes() {
        let options = RuntimeOptions::default();
        let raw = b"#!/bin/sh\n{{name}} \\$\xff\n".to_vec();
        let preamble = render(&Template::Verbatim(raw.clone()), &ctx(&options));
        assert_eq!(preamble.into_bytes(), raw);
    }
}
