// src/macros.rs
//! String helpers used across the catalog pipeline.

/// Owned copy of a device name, chip label or knowledge-base value.
///
/// `s!()` is an empty buffer; `s!(UNKNOWN)` is the usual fallback for an
/// unresolved field.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Glue `&str` pieces into one `String`, e.g. a Wikipedia page URL or an
/// opening-tag needle such as `join!("<", "table")`.
#[macro_export]
macro_rules! join {
    ($first:expr $(, $rest:expr)+ $(,)?) => {{
        let mut out = ::std::string::String::from($first);
        $(
            out.push_str($rest);
        )+
        out
    }};
}
