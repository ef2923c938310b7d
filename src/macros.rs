// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression: literals, consts, or vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Compile a fixed regex once and hand out a `&'static Regex`.
/// Only for literal patterns known to be valid.
#[macro_export]
macro_rules! regex {
    ($re:literal $(,)?) => {{
        static RE: ::std::sync::OnceLock<::regex::Regex> = ::std::sync::OnceLock::new();
        RE.get_or_init(|| ::regex::Regex::new($re).unwrap())
    }};
}

/// Same as `regex!`, for CSS selectors.
#[macro_export]
macro_rules! selector {
    ($css:literal $(,)?) => {{
        static SEL: ::std::sync::OnceLock<::scraper::Selector> = ::std::sync::OnceLock::new();
        SEL.get_or_init(|| ::scraper::Selector::parse($css).unwrap())
    }};
}
