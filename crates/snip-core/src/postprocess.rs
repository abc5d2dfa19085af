//! Post-processing of raw recognition output
//!
//! - `clean_markup`: fixes spacing artifacts the math model leaves around `|`, `(` and `)`
//! - `markup_to_text`: best-effort LaTeX to Unicode transliteration
//! - `process`: turns a raw result into what is displayed and what is copied

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use snip_types::{Mode, ProcessedResult, RecognitionResult};

lazy_static! {
    static ref WHITESPACE_REGEX: Regex = Regex::new(r"\s+").unwrap();

    /// `\frac{A}{B}`, arguments without nested braces
    static ref FRACTION_REGEX: Regex = Regex::new(r"\\frac\{([^}]+)\}\{([^}]+)\}").unwrap();

    /// `\sqrt{A}`
    static ref SQRT_REGEX: Regex = Regex::new(r"\\sqrt\{([^}]+)\}").unwrap();

    /// A whole command token; the greedy letter run is what makes `\int` not match `\infty`
    static ref COMMAND_REGEX: Regex = Regex::new(r"\\([a-zA-Z]+)").unwrap();

    static ref SUBSCRIPT_GROUP_REGEX: Regex = Regex::new(r"_\{([^}]+)\}").unwrap();
    static ref SUPERSCRIPT_GROUP_REGEX: Regex = Regex::new(r"\^\{([^}]+)\}").unwrap();
}

/// Command names with a single-glyph Unicode rendering
const SYMBOLS: &[(&str, &str)] = &[
    ("int", "∫"),
    ("sum", "∑"),
    ("prod", "∏"),
    ("infty", "∞"),
    ("alpha", "α"),
    ("beta", "β"),
    ("gamma", "γ"),
    ("delta", "δ"),
    ("theta", "θ"),
    ("pi", "π"),
    ("sigma", "σ"),
    ("omega", "ω"),
    ("leq", "≤"),
    ("geq", "≥"),
    ("neq", "≠"),
    ("approx", "≈"),
    ("times", "×"),
    ("div", "÷"),
    ("pm", "±"),
    ("cdot", "·"),
    ("partial", "∂"),
    ("nabla", "∇"),
    ("in", "∈"),
    ("subset", "⊂"),
    ("cup", "∪"),
    ("cap", "∩"),
    ("rightarrow", "→"),
    ("leftarrow", "←"),
    ("Rightarrow", "⇒"),
    ("Leftarrow", "⇐"),
];

type Rule = (&'static str, fn(&str) -> String);

/// Transliteration passes, in the order they must run.
///
/// Structural forms have to be rewritten before `strip_commands` deletes
/// every command it does not know.
const RULES: &[Rule] = &[
    ("structural forms", rewrite_structural),
    ("symbol table", replace_symbols),
    ("script groups", rewrite_script_groups),
    ("unknown commands", strip_commands),
    ("whitespace", tidy_whitespace),
];

/// Collapse whitespace and drop the spaces the model tends to put around
/// `|`, `(` and `)`. Idempotent.
pub fn clean_markup(markup: &str) -> String {
    WHITESPACE_REGEX
        .replace_all(markup, " ")
        .trim()
        .replace("| ", "|")
        .replace(" |", "|")
        .replace("( ", "(")
        .replace(" )", ")")
}

/// Render markup as readable plain text.
///
/// Lossy on purpose: any command outside the symbol table is removed.
pub fn markup_to_text(markup: &str) -> String {
    RULES
        .iter()
        .fold(markup.to_string(), |text, (_, rule)| rule(&text))
        .trim()
        .to_string()
}

fn rewrite_structural(text: &str) -> String {
    let text = FRACTION_REGEX.replace_all(text, "($1)/($2)");
    SQRT_REGEX.replace_all(&text, "√($1)").into_owned()
}

fn replace_symbols(text: &str) -> String {
    COMMAND_REGEX
        .replace_all(text, |caps: &Captures| {
            SYMBOLS
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, glyph)| glyph.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// `_{ij}` becomes `_(ij)`; bare `_i` is already readable and left alone
fn rewrite_script_groups(text: &str) -> String {
    let text = SUBSCRIPT_GROUP_REGEX.replace_all(text, "_($1)");
    SUPERSCRIPT_GROUP_REGEX
        .replace_all(&text, "^($1)")
        .into_owned()
}

fn strip_commands(text: &str) -> String {
    COMMAND_REGEX.replace_all(text, "").into_owned()
}

fn tidy_whitespace(text: &str) -> String {
    WHITESPACE_REGEX
        .replace_all(text, " ")
        .replace("{ ", "{")
        .replace(" }", "}")
}

/// Build the displayed and copied forms of a recognition result.
///
/// Math: the clipboard gets the cleaned markup only; the display adds the
/// transliteration when `plain_text` is set. Text: both get the trimmed text.
pub fn process(result: &RecognitionResult, plain_text: bool) -> ProcessedResult {
    match result {
        RecognitionResult::Math(raw) => {
            let markup = clean_markup(raw);
            let mut display_text = format!("LaTeX: {markup}");
            if plain_text {
                display_text.push_str(&format!("\n\nText:  {}", markup_to_text(&markup)));
            }

            ProcessedResult {
                display_text,
                clipboard_payload: markup,
                kind: Mode::Math,
            }
        }
        RecognitionResult::Text { text, languages } => {
            let text = text.trim().to_string();
            ProcessedResult {
                display_text: format!("Text ({languages}):\n{text}"),
                clipboard_payload: text,
                kind: Mode::Text,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_markup_collapses_whitespace() {
        assert_eq!(clean_markup("x  +  1"), "x + 1");
        assert_eq!(clean_markup("\n\t a \n b\t"), "a b");
    }

    #[test]
    fn test_clean_markup_tightens_delimiters() {
        assert_eq!(clean_markup("f ( x )"), "f (x)");
        assert_eq!(clean_markup("\\left | x \\right |"), "\\left|x \\right|");
        assert_eq!(clean_markup("( ( a ) )"), "((a))");
    }

    #[test]
    fn test_clean_markup_idempotent() {
        let samples = [
            "",
            "   ",
            "x  +  1",
            "| | |",
            "a ( | b",
            "( )",
            " ( x | y ) ",
            "\\frac { a } { b }",
            "|  (  |  )  |",
            "a\t\t|\n(b)",
            "x |) y",
        ];
        for sample in samples {
            let once = clean_markup(sample);
            assert_eq!(clean_markup(&once), once, "input {sample:?}");
        }
    }

    #[test]
    fn test_fraction() {
        assert_eq!(markup_to_text("\\frac{1}{2}"), "(1)/(2)");
        assert_eq!(markup_to_text("\\frac{a+b}{c}"), "(a+b)/(c)");
    }

    #[test]
    fn test_sqrt_of_fraction() {
        assert_eq!(markup_to_text("\\sqrt{\\frac{1}{2}}"), "√((1)/(2))");
        assert_eq!(markup_to_text("\\sqrt{x}"), "√(x)");
    }

    #[test]
    fn test_greek_and_relations() {
        assert_eq!(markup_to_text("\\alpha \\leq \\beta"), "α ≤ β");
        assert_eq!(markup_to_text("a \\neq b \\approx c"), "a ≠ b ≈ c");
    }

    #[test]
    fn test_whole_command_matching() {
        assert_eq!(markup_to_text("\\infty"), "∞");
        assert_eq!(markup_to_text("\\int_0^1"), "∫_0^1");
        assert_eq!(markup_to_text("x \\in A"), "x ∈ A");
        // `\pin` is not `\pi` followed by `n`
        assert_eq!(markup_to_text("\\pin"), "");
        assert_eq!(markup_to_text("\\Rightarrow \\rightarrow"), "⇒ →");
    }

    #[test]
    fn test_script_groups() {
        assert_eq!(markup_to_text("x_{ij}"), "x_(ij)");
        assert_eq!(markup_to_text("x_i"), "x_i");
        assert_eq!(markup_to_text("e^{i\\pi}"), "e^(iπ)");
        assert_eq!(markup_to_text("x^2"), "x^2");
    }

    #[test]
    fn test_unknown_commands_vanish() {
        assert_eq!(markup_to_text("\\mathrm{d}x"), "{d}x");
        assert_eq!(markup_to_text("\\left( x \\right)"), "( x )");
    }

    #[test]
    fn test_brace_spacing_trimmed() {
        assert_eq!(markup_to_text("\\hat{ x }"), "{x}");
        assert_eq!(markup_to_text("  a   b  "), "a b");
    }

    #[test]
    fn test_operators_and_sets() {
        assert_eq!(
            markup_to_text("\\sum_{n=1}^{\\infty} a_n \\cdot b"),
            "∑_(n=1)^(∞) a_n · b"
        );
        assert_eq!(markup_to_text("A \\cup B \\cap C \\subset D"), "A ∪ B ∩ C ⊂ D");
        assert_eq!(markup_to_text("\\partial f \\times \\nabla g \\pm 1 \\div 2"), "∂ f × ∇ g ± 1 ÷ 2");
    }

    #[test]
    fn test_markup_to_text_deterministic() {
        let input = "\\frac{\\alpha}{\\beta} + \\gamma_{k}^{2} \\foo";
        assert_eq!(markup_to_text(input), markup_to_text(input));
        assert_eq!(markup_to_text(input), "(α)/(β) + γ_(k)^(2)");
    }

    #[test]
    fn test_process_math_with_plain_text() {
        let result = process(&RecognitionResult::Math("x^{2}+1".into()), true);
        assert_eq!(result.clipboard_payload, "x^{2}+1");
        assert_eq!(result.display_text, "LaTeX: x^{2}+1\n\nText:  x^(2)+1");
        assert_eq!(result.kind, Mode::Math);
    }

    #[test]
    fn test_process_math_markup_only() {
        let result = process(&RecognitionResult::Math(" f ( x )  ".into()), false);
        assert_eq!(result.display_text, "LaTeX: f (x)");
        assert_eq!(result.clipboard_payload, "f (x)");
    }

    #[test]
    fn test_process_text() {
        let result = process(
            &RecognitionResult::Text {
                text: "\n Bonjour le monde \n\x0c".into(),
                languages: "eng+fra".parse().unwrap(),
            },
            true,
        );
        assert_eq!(result.display_text, "Text (eng+fra):\nBonjour le monde");
        assert_eq!(result.clipboard_payload, "Bonjour le monde");
        assert_eq!(result.kind, Mode::Text);
    }
}
